//! Bit-level I/O. Foundation for every stream format in this crate.
//!
//! Bits are packed most-significant-bit-first within each byte, and bytes
//! appear in the order their bits were pushed. The writer pads the final
//! partial byte with zero bits; the reader exposes both exact bit counts
//! and the whole-bytes-untouched count the token decoders terminate on.

pub mod bitreader;
pub mod bitwriter;

pub use bitreader::BitReader;
pub use bitwriter::BitWriter;
