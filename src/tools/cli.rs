use clap::{ArgEnum, Parser};
use log::LevelFilter;

use crate::codec::Codec;

/// Compress or decompress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
}

/// Codec choice as it appears on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
pub enum Method {
    Deflate,
    Huffman,
    Lzss,
}

impl From<Method> for Codec {
    fn from(method: Method) -> Codec {
        match method {
            Method::Deflate => Codec::Deflate,
            Method::Huffman => Codec::Huffman,
            Method::Lzss => Codec::Lzss,
        }
    }
}

/// Command line interpretation - uses the external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "A lossless file compressor",
    long_about = "Compresses files with a Deflate-style two stage pipeline: an LZSS
sliding-window dictionary coder feeding a Huffman entropy coder. Either
stage can also be used on its own with --method."
)]
pub struct Args {
    /// Files to process
    #[clap(required = true)]
    pub files: Vec<String>,

    /// Perform compression on the input files (the default)
    #[clap(short = 'z', long = "compress")]
    pub compress: bool,

    /// Perform decompression on the input files
    #[clap(short = 'd', long = "decompress")]
    pub decompress: bool,

    /// Keep input files
    #[clap(short = 'k', long = "keep")]
    pub keep: bool,

    /// Force overwriting output files
    #[clap(short = 'f', long = "force")]
    pub force: bool,

    /// Compression method
    #[clap(short = 'm', long = "method", arg_enum, default_value = "deflate")]
    pub method: Method,

    /// Sets verbosity. Repeat for more: -v adds progress, -vvv is chatty
    #[clap(short = 'v', parse(from_occurrences))]
    pub verbose: usize,
}

impl Args {
    pub fn mode(&self) -> Mode {
        if self.decompress {
            Mode::Unzip
        } else {
            Mode::Zip
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_test() {
        let args = Args::parse_from(["nzip", "a.txt"]);
        assert_eq!(args.mode(), Mode::Zip);
        assert_eq!(args.method, Method::Deflate);
        assert!(!args.keep);
        assert!(!args.force);
        assert_eq!(args.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn decompress_and_method_test() {
        let args = Args::parse_from(["nzip", "-d", "-m", "huffman", "a.huff"]);
        assert_eq!(args.mode(), Mode::Unzip);
        assert_eq!(args.method, Method::Huffman);
    }

    #[test]
    fn verbosity_accumulates_test() {
        let args = Args::parse_from(["nzip", "-vv", "a.txt"]);
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn files_are_required_test() {
        assert!(Args::try_parse_from(["nzip", "-z"]).is_err());
    }
}
