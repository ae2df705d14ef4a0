// SPDX-License-Identifier: ISC
use ulz_rust::{DEFAULT_LEVEL, compress, decompress, decompress_growing, max_compressed_size};

fn main() {
    let input = b"ULZ ULZ ULZ ULZ ULZ ULZ ULZ ULZ";
    let mut compressed = vec![0u8; max_compressed_size(input.len())];
    let compressed_len =
        compress(input, &mut compressed, DEFAULT_LEVEL).expect("compression failed");
    compressed.truncate(compressed_len);

    let mut restored = vec![0u8; input.len()];
    let restored_len = decompress(&compressed, &mut restored).expect("decompression failed");
    assert_eq!(&restored, input);

    let grown = decompress_growing(&compressed).expect("growing decompression failed");
    assert_eq!(grown, input);

    println!("in={} compressed={} out={}", input.len(), compressed_len, restored_len);
}
