//! Dictionary (copy-reference) coding: a sliding-window substring index
//! feeding a literal/reference token codec, with match lengths entropy
//! coded through the Huffman header machinery.

pub mod encoder;
pub mod match_finder;

pub use encoder::{compress, decompress};
pub use match_finder::{Match, MatchFinder};
