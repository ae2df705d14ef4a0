// SPDX-License-Identifier: ISC
use ulz_rust::{
    EXCESS, Error, MAX_LEVEL, MIN_LEVEL, WINDOW_SIZE, compress, compress_to_vec, decompress,
    decompress_growing, decompress_to_vec, max_compressed_size,
};

fn lcg_data(size: usize) -> Vec<u8> {
    let mut x = 0x1234_5678u32;
    let mut out = vec![0u8; size];
    for b in &mut out {
        x = x.wrapping_mul(1664525).wrapping_add(1013904223);
        *b = (x >> 24) as u8;
    }
    out
}

fn text_data(size: usize) -> Vec<u8> {
    const WORDS: [&[u8]; 8] =
        [b"lorem ", b"ipsum ", b"dolor ", b"sit ", b"amet, ", b"consectetur ", b"elit. ", b"\n"];
    let mut x = 0x9e37_79b9u32;
    let mut out = Vec::with_capacity(size + 16);
    while out.len() < size {
        x = x.wrapping_mul(1664525).wrapping_add(1013904223);
        out.extend_from_slice(WORDS[(x >> 29) as usize]);
    }
    out.truncate(size);
    out
}

fn roundtrip(input: &[u8], level: u8) -> Vec<u8> {
    let mut compressed = vec![0u8; max_compressed_size(input.len())];
    let compressed_len = compress(input, &mut compressed, level).expect("compress");
    compressed.truncate(compressed_len);
    assert!(
        compressed.len() <= input.len() + EXCESS,
        "level {level}: {} bytes compressed to {}",
        input.len(),
        compressed.len()
    );

    let mut output = vec![0u8; input.len()];
    let restored_len = decompress(&compressed, &mut output).expect("decompress");
    assert_eq!(restored_len, input.len(), "level {level}");
    assert_eq!(output, input, "level {level}");
    compressed
}

#[test]
fn raw_roundtrip_small_cases() {
    let cases: [&[u8]; 7] = [
        b"",
        b"a",
        b"aaaa",
        b"aaaaaa",
        b"abcabcabcabcabcabc",
        b"the quick brown fox jumps over the lazy dog",
        b"abcdabcdXabcdabcdXabcdabcdXabcdabcdX",
    ];

    for input in cases {
        for level in MIN_LEVEL..=MAX_LEVEL {
            roundtrip(input, level);
        }
    }
}

#[test]
fn raw_roundtrip_random_data() {
    for size in [1usize, 3, 4, 5, 32, 257, 1000, 4096, 65_536] {
        let input = lcg_data(size);
        for level in [1, 5, 9] {
            roundtrip(&input, level);
        }
    }
}

#[test]
fn raw_roundtrip_text_at_every_level() {
    let input = text_data(100_000);
    let mut sizes = Vec::new();
    for level in MIN_LEVEL..=MAX_LEVEL {
        sizes.push(roundtrip(&input, level).len());
    }
    assert!(sizes.iter().all(|&s| s < input.len() * 3 / 4), "sizes: {sizes:?}");
}

#[test]
fn every_level_decodes_to_the_same_bytes() {
    let input = text_data(50_000);
    let outputs: Vec<Vec<u8>> = (MIN_LEVEL..=MAX_LEVEL)
        .map(|level| {
            let compressed = compress_to_vec(&input, level).expect("compress_to_vec");
            decompress_to_vec(&compressed, input.len()).expect("decompress_to_vec")
        })
        .collect();
    for output in &outputs {
        assert_eq!(output, &input);
    }
}

#[test]
fn empty_input_compresses_to_empty_payload() {
    let compressed = compress_to_vec(b"", 5).expect("compress");
    assert!(compressed.is_empty());
    assert_eq!(decompress_growing(&compressed).expect("decompress"), b"");

    let mut out = [0u8; 0];
    assert_eq!(decompress(&compressed, &mut out), Ok(0));
}

#[test]
fn highly_compressible_input_shrinks() {
    let input = vec![b'A'; 100_000];
    for level in MIN_LEVEL..=MAX_LEVEL {
        let compressed = roundtrip(&input, level);
        assert!(compressed.len() < 64, "level {level}: {} bytes", compressed.len());
    }
}

#[test]
fn incompressible_input_stays_within_bound() {
    let input = lcg_data(1000);
    let compressed = compress_to_vec(&input, 9).expect("compress");
    assert!(compressed.len() <= 1000 + EXCESS);
    assert_eq!(decompress_growing(&compressed).expect("decompress"), input);
}

#[test]
fn sparse_short_matches_stay_within_bound() {
    // Long literal runs broken up by short repeats: the worst case for token
    // overhead.
    let noise = lcg_data(40_000);
    let mut input = Vec::new();
    for chunk in noise.chunks(20_000) {
        input.extend_from_slice(chunk);
        input.extend_from_slice(&noise[..5]);
    }
    for level in [1, 9] {
        roundtrip(&input, level);
    }
}

#[test]
fn far_matches_use_the_high_distance_bit() {
    let block = lcg_data(100_000);
    let mut input = block.clone();
    input.extend_from_slice(&block);

    let compressed = roundtrip(&input, 5);
    assert!(compressed.len() < 110_000, "compressed to {}", compressed.len());
}

#[test]
fn repeats_beyond_the_window_still_roundtrip() {
    let block = lcg_data(WINDOW_SIZE + 1000);
    let mut input = block.clone();
    input.extend_from_slice(&block);

    let compressed = roundtrip(&input, 9);
    assert!(compressed.len() > WINDOW_SIZE);
}

#[test]
fn invalid_level_is_rejected() {
    let mut out = vec![0u8; max_compressed_size(3)];
    assert_eq!(compress(b"abc", &mut out, 0), Err(Error::InvalidParameter));
    assert_eq!(compress(b"abc", &mut out, 10), Err(Error::InvalidParameter));
    assert_eq!(compress_to_vec(b"abc", 42), Err(Error::InvalidParameter));
}

#[test]
fn compress_requires_worst_case_capacity() {
    let input = vec![b'A'; 1000];
    let mut out = vec![0u8; max_compressed_size(input.len()) - 1];
    assert_eq!(compress(&input, &mut out, 5), Err(Error::OutputTooSmall));
}

#[test]
fn too_small_output_fails() {
    let input = b"aaaaabaaaaabaaaaabaaaaab";
    let compressed = compress_to_vec(input, 5).expect("compress");

    let mut out = vec![0u8; input.len() - 1];
    let err = decompress(&compressed, &mut out).expect_err("expected output-too-small");
    assert_eq!(err, Error::OutputTooSmall);
    assert!(err.is_recoverable());
}

#[test]
fn size_hint_controls_single_attempt() {
    let input = text_data(10_000);
    let compressed = compress_to_vec(&input, 5).expect("compress");

    assert_eq!(decompress_to_vec(&compressed, input.len()).expect("exact hint"), input);
    assert_eq!(decompress_to_vec(&compressed, input.len() + 100).expect("loose hint"), input);
    assert_eq!(decompress_to_vec(&compressed, 0).expect("unknown size"), input);
    assert_eq!(decompress_to_vec(&compressed, 10), Err(Error::OutputTooSmall));
}

#[test]
fn concurrent_calls_are_independent() {
    let inputs: Vec<Vec<u8>> = (0..4).map(|i| text_data(20_000 + i * 777)).collect();
    std::thread::scope(|scope| {
        for input in &inputs {
            scope.spawn(move || {
                let compressed = compress_to_vec(input, 7).expect("compress");
                assert_eq!(&decompress_growing(&compressed).expect("decompress"), input);
            });
        }
    });
}
