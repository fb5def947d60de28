//! Two-stage pipeline: dictionary coding to strip repeats, then entropy
//! coding over the token stream. Each stage carries its own raw fallback,
//! so a pathological input degrades to a few flag bytes of overhead
//! instead of growing.

use crate::error::Error;
use crate::tools::progress::Progress;
use crate::{huffman, lzss};

/// Dictionary stage into entropy stage, each reporting half the range.
pub fn compress(data: &[u8], progress: &mut Progress<'_>) -> Vec<u8> {
    let tokens = lzss::compress(data, &mut progress.stage(0.0, 50.0));
    let output = huffman::compress(&tokens, &mut progress.stage(50.0, 50.0));
    progress.finish();
    output
}

/// Stages undone in reverse order.
pub fn decompress(data: &[u8], progress: &mut Progress<'_>) -> Result<Vec<u8>, Error> {
    let tokens = huffman::decompress(data, &mut progress.stage(0.0, 50.0))?;
    let output = lzss::decompress(&tokens, &mut progress.stage(50.0, 50.0))?;
    progress.finish();
    Ok(output)
}
