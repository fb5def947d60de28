//! nzip: a lossless byte-stream compression engine.
//!
//! Three related codecs built on one bit-level I/O primitive:
//!
//! * [`huffman`] — entropy coding with a canonical frequency-table header.
//! * [`lzss`] — dictionary (copy-reference) coding over a sliding window.
//! * [`deflate`] — the two-stage pipeline, LZSS output fed into Huffman.
//!
//! Every codec produces a self-describing stream with a leading flag bit:
//! `1` means a structured payload follows, `0` means the original bytes are
//! stored verbatim (the raw fallback, taken whenever structured encoding
//! would not shrink the input). Compression never fails; decompression
//! fails with [`error::Error`] when handed a stream the matching codec did
//! not produce.
//!
//! Basic usage to round-trip a buffer through the pipeline codec:
//!
//! ```
//! use nzip::codec::Codec;
//!
//! let data = b"to be, or not to be, that is the question".to_vec();
//! let packed = Codec::Deflate.compress(&data, None);
//! assert_eq!(Codec::Deflate.decompress(&packed, None).unwrap(), data);
//! ```

pub mod bitstream;
pub mod codec;
pub mod deflate;
pub mod error;
pub mod huffman;
pub mod lzss;
pub mod tools;

pub use codec::Codec;
pub use error::Error;
