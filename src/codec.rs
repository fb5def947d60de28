//! The closed set of stream formats and the dispatch from a format to its
//! codec pair. Streams carry no format marker of their own; the selection
//! travels out of band, conventionally as the file extension.

use crate::error::Error;
use crate::tools::progress::Progress;
use crate::{deflate, huffman, lzss};

/// Available stream formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    /// Dictionary coding followed by entropy coding. The default.
    Deflate,
    /// Entropy coding alone.
    Huffman,
    /// Dictionary coding alone.
    Lzss,
}

impl Codec {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Deflate => "Deflate",
            Codec::Huffman => "Huffman",
            Codec::Lzss => "LZSS",
        }
    }

    /// Extension appended to compressed file names, dot included.
    pub fn extension(&self) -> &'static str {
        match self {
            Codec::Deflate => ".nzip",
            Codec::Huffman => ".huff",
            Codec::Lzss => ".lzss",
        }
    }

    /// Recover the format from a file name, or `None` when the name ends
    /// in none of the known extensions.
    pub fn from_extension(name: &str) -> Option<Codec> {
        [Codec::Deflate, Codec::Huffman, Codec::Lzss]
            .into_iter()
            .find(|c| name.ends_with(c.extension()))
    }

    /// Compress `data` with this format. Infallible; every format falls
    /// back to a near-verbatim stream rather than growing the input. The
    /// optional sink receives whole-percent progress in 0..=100.
    pub fn compress(&self, data: &[u8], sink: Option<&mut dyn FnMut(u8)>) -> Vec<u8> {
        let mut progress = match sink {
            Some(sink) => Progress::new(sink),
            None => Progress::none(),
        };
        match self {
            Codec::Deflate => deflate::compress(data, &mut progress),
            Codec::Huffman => huffman::compress(data, &mut progress),
            Codec::Lzss => lzss::compress(data, &mut progress),
        }
    }

    /// Decompress a stream previously produced by this same format.
    pub fn decompress(
        &self,
        data: &[u8],
        sink: Option<&mut dyn FnMut(u8)>,
    ) -> Result<Vec<u8>, Error> {
        let mut progress = match sink {
            Some(sink) => Progress::new(sink),
            None => Progress::none(),
        };
        match self {
            Codec::Deflate => deflate::decompress(data, &mut progress),
            Codec::Huffman => huffman::decompress(data, &mut progress),
            Codec::Lzss => lzss::decompress(data, &mut progress),
        }
    }
}
