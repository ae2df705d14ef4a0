// SPDX-License-Identifier: ISC
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::builder::RangedI64ValueParser;
use clap::{Args, Parser, Subcommand};
use ulz_rust::{MAX_LEVEL, MIN_LEVEL, compress_to_vec, decompress_growing, decompress_to_vec};

#[cfg(unix)]
use rustix::termios;
#[cfg(unix)]
use std::os::fd::AsFd;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

const SUFFIX: &str = ".ulz";
const STDIO: &str = "-";
const PACK_LEVEL: u8 = MAX_LEVEL;

/// ULZ compression/decompression utility.
#[derive(Parser, Debug)]
#[command(name = "ulz", version)]
struct Cli {
    /// Print sizes, ratio and timing to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file (default output: FILE.ulz).
    Pack {
        #[command(flatten)]
        io: IoArgs,
        /// Compression level, 1 (fastest) to 9 (smallest).
        #[arg(
            short,
            long,
            env = "ULZ_LEVEL",
            default_value_t = PACK_LEVEL,
            value_parser = level_parser(),
        )]
        level: u8,
    },
    /// Decompress a .ulz file (default output: FILE without .ulz).
    Unpack {
        #[command(flatten)]
        io: IoArgs,
        /// Original size in bytes, if known; skips buffer growth.
        #[arg(short, long)]
        size: Option<usize>,
    },
    /// Decompress a .ulz file to stdout.
    Cat {
        /// Input file, `-` for stdin.
        file: PathBuf,
        /// Read compressed data from a terminal.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input file, `-` for stdin.
    file: PathBuf,
    /// Output file, `-` for stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Overwrite existing output and allow terminal input/output.
    #[arg(short, long)]
    force: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Compress,
    Uncompress,
}

fn level_parser() -> RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(i64::from(MIN_LEVEL)..=i64::from(MAX_LEVEL))
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}

#[cfg(unix)]
fn stdin_is_tty() -> bool {
    termios::isatty(io::stdin().as_fd())
}

#[cfg(not(unix))]
fn stdin_is_tty() -> bool {
    false
}

#[cfg(unix)]
fn stdout_is_tty() -> bool {
    termios::isatty(io::stdout().as_fd())
}

#[cfg(not(unix))]
fn stdout_is_tty() -> bool {
    false
}

fn compose_name(mode: Mode, input: &Path) -> Result<PathBuf, String> {
    if is_stdio(input) {
        return Ok(PathBuf::from(STDIO));
    }
    let s = input.to_str().ok_or_else(|| format!("{}: invalid path", input.display()))?;
    match mode {
        Mode::Compress => Ok(PathBuf::from(format!("{s}{SUFFIX}"))),
        Mode::Uncompress => {
            let Some(stripped) = s.strip_suffix(SUFFIX) else {
                return Ok(PathBuf::from(format!("{s}.restored")));
            };
            let candidate = PathBuf::from(stripped);
            if !candidate.exists() {
                return Ok(candidate);
            }
            let stem = candidate.file_stem().and_then(|p| p.to_str()).unwrap_or(stripped);
            let name = match candidate.extension().and_then(|e| e.to_str()) {
                Some(ext) => format!("{stem}_restored.{ext}"),
                None => format!("{stem}_restored"),
            };
            Ok(candidate.with_file_name(name))
        }
    }
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    if is_stdio(path) {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    fs::read(path)
}

fn write_output(path: &Path, data: &[u8], force: bool) -> io::Result<()> {
    if is_stdio(path) {
        let mut out = io::stdout().lock();
        out.write_all(data)?;
        return out.flush();
    }
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    if !force {
        opts.create_new(true);
    }
    let mut f = opts.open(path)?;
    f.write_all(data)
}

fn print_verbose(
    mode: Mode,
    src: &Path,
    dst: &Path,
    nr_read: usize,
    nr_written: usize,
    took: Duration,
) {
    let (original, packed) = match mode {
        Mode::Compress => (nr_read, nr_written),
        Mode::Uncompress => (nr_written, nr_read),
    };
    let ratio = if original == 0 { 0.0 } else { packed as f64 / original as f64 * 100.0 };

    eprintln!("{} -> {}", src.display(), dst.display());
    eprintln!("original size:   {original} bytes");
    eprintln!("compressed size: {packed} bytes");
    eprintln!("ratio:           {ratio:.2}%");
    eprintln!("time taken:      {:.2} ms", took.as_secs_f64() * 1000.0);
}

fn check_terminals(mode: Mode, input: &Path, output: &Path, force: bool) -> Result<(), String> {
    if force {
        return Ok(());
    }
    if mode == Mode::Uncompress && is_stdio(input) && stdin_is_tty() {
        return Err("compressed data not read from a terminal. Use -f to force decompression."
            .into());
    }
    if mode == Mode::Compress && is_stdio(output) && stdout_is_tty() {
        return Err("compressed data not written to a terminal. Use -f to force compression."
            .into());
    }
    Ok(())
}

fn transcode(
    mode: Mode,
    input: &Path,
    output: &Path,
    force: bool,
    verbose: bool,
    codec: impl FnOnce(&[u8]) -> ulz_rust::Result<Vec<u8>>,
) -> Result<(), String> {
    check_terminals(mode, input, output, force)?;

    let in_bytes = read_input(input).map_err(|e| format!("{}: {e}", input.display()))?;
    let started = Instant::now();
    let out_bytes = codec(&in_bytes).map_err(|e| match mode {
        Mode::Compress => format!("{}: compress failed: {e}", input.display()),
        Mode::Uncompress => format!("{}: decompress: {e}", input.display()),
    })?;
    let took = started.elapsed();

    write_output(output, &out_bytes, force).map_err(|e| format!("{}: {e}", output.display()))?;

    #[cfg(unix)]
    if !is_stdio(input) && !is_stdio(output) {
        if let Ok(meta) = fs::metadata(input) {
            let perms = meta.permissions().mode();
            let _ = fs::set_permissions(output, fs::Permissions::from_mode(perms));
        }
    }

    if verbose {
        print_verbose(mode, input, output, in_bytes.len(), out_bytes.len(), took);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Pack { io, level } => {
            let output = match io.output {
                Some(path) => path,
                None => compose_name(Mode::Compress, &io.file)?,
            };
            transcode(Mode::Compress, &io.file, &output, io.force, cli.verbose, |data| {
                compress_to_vec(data, level)
            })
        }
        Command::Unpack { io, size } => {
            let output = match io.output {
                Some(path) => path,
                None => compose_name(Mode::Uncompress, &io.file)?,
            };
            transcode(Mode::Uncompress, &io.file, &output, io.force, cli.verbose, |data| {
                match size {
                    Some(size) => decompress_to_vec(data, size),
                    None => decompress_growing(data),
                }
            })
        }
        Command::Cat { file, force } => {
            let stdout = PathBuf::from(STDIO);
            transcode(Mode::Uncompress, &file, &stdout, force, cli.verbose, decompress_growing)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("ulz: {msg}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pack_appends_suffix() {
        let out = compose_name(Mode::Compress, Path::new("data/report.txt")).unwrap();
        assert_eq!(out, PathBuf::from("data/report.txt.ulz"));
    }

    #[test]
    fn unpack_without_suffix_gets_restored_extension() {
        let out = compose_name(Mode::Uncompress, Path::new("blob.bin")).unwrap();
        assert_eq!(out, PathBuf::from("blob.bin.restored"));
    }

    #[test]
    fn unpack_strips_suffix_when_free() {
        let out = compose_name(Mode::Uncompress, Path::new("no/such/dir/file.txt.ulz")).unwrap();
        assert_eq!(out, PathBuf::from("no/such/dir/file.txt"));
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ulz-cli-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn unpack_avoids_existing_stripped_name() {
        let dir = scratch_dir("restored");
        fs::write(dir.join("x.txt"), b"keep").unwrap();

        let out = compose_name(Mode::Uncompress, &dir.join("x.txt.ulz")).unwrap();
        assert_eq!(out, dir.join("x_restored.txt"));

        fs::write(dir.join("plain"), b"keep").unwrap();
        let out = compose_name(Mode::Uncompress, &dir.join("plain.ulz")).unwrap();
        assert_eq!(out, dir.join("plain_restored"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn existing_output_needs_force() {
        let dir = scratch_dir("force");
        let target = dir.join("out.bin");
        fs::write(&target, b"old").unwrap();

        let err = write_output(&target, b"new", false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&target).unwrap(), b"old");

        write_output(&target, b"new", true).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn stdin_maps_to_stdout() {
        let out = compose_name(Mode::Compress, Path::new("-")).unwrap();
        assert!(is_stdio(&out));
    }

    #[test]
    fn level_is_range_checked() {
        assert!(Cli::try_parse_from(["ulz", "pack", "f", "-l", "0"]).is_err());
        assert!(Cli::try_parse_from(["ulz", "pack", "f", "-l", "10"]).is_err());
        let cli = Cli::try_parse_from(["ulz", "-v", "pack", "f", "-l", "3"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Pack { level: 3, .. }));
    }
}
