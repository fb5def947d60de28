//! Entropy coding: a prefix-code tree built from symbol frequencies, a
//! compact header describing the frequency table, and the entropy-only
//! codec itself.

pub mod encoder;
pub mod tree;

pub use encoder::{compress, decode_header, decompress, encode_header};
pub use tree::{FreqTable, HuffmanTree};
