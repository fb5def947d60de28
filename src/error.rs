use thiserror::Error;

/// Failures surfaced by the decode paths. Compression itself never fails:
/// a width error on the write side is a programming error and asserts.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bit operation or a header field declared a width outside the
    /// range this engine can represent.
    #[error("bit width {0} outside supported range")]
    InvalidWidth(u32),

    /// The input byte sequence ran out before the requested bits were
    /// available. A truncated or corrupted stream.
    #[error("unexpected end of compressed data")]
    OutOfData,

    /// The header does not describe a tree the decoder can rebuild
    /// (impossible symbol count, duplicate symbols, or a symbol payload
    /// with no tree to decode it).
    #[error("inconsistent stream header")]
    InconsistentHeader,

    /// A copy reference points further back than the bytes produced so
    /// far. The stream was not made by the matching encoder.
    #[error("copy reference outside the produced output")]
    InvalidReference,
}
