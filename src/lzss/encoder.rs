use crate::bitstream::{BitReader, BitWriter};
use crate::error::Error;
use crate::huffman::encoder::ORIGINAL_LEN_BITS;
use crate::huffman::tree::{FreqTable, HuffmanTree};
use crate::huffman::{decode_header, encode_header};
use crate::lzss::match_finder::{Match, MatchFinder, MIN_DISTANCE, MIN_MATCH};
use crate::tools::progress::Progress;

/// Width of a long distance field; reaches the whole search window.
const DISTANCE_BITS: u32 = 16;
/// Width of a short distance field, flagged by one bit. A pure size
/// optimization for nearby copies.
const SHORT_DISTANCE_BITS: u32 = 10;

/// Dictionary compression. Layout: `1` flag, 31-bit original length,
/// Huffman header for the match lengths, then the token stream. A literal
/// is its raw byte, prefixed by one extra `1` bit when its own top bit is
/// set; a reference is `10`, the huffman code of `length - 4`, a
/// short/long flag, and the distance minus one in 10 or 16 bits. Falls
/// back to `0` flag plus the verbatim bytes whenever the structured
/// stream would not be smaller.
pub fn compress(data: &[u8], progress: &mut Progress<'_>) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }
    assert!(data.len() < 1 << ORIGINAL_LEN_BITS, "input exceeds 2^31-1 bytes");

    let mut bw = BitWriter::with_capacity(data.len() / 2);
    bw.push_bits(1, 1);
    bw.push_bits(data.len() as u64, ORIGINAL_LEN_BITS);

    // Pre-pass: walk the whole input once to collect the references and
    // the frequency table of their biased lengths, so the length header
    // can be emitted up front.
    let mut finder = MatchFinder::new(data);
    let mut references: Vec<Match> = Vec::new();
    let mut length_counts = [0_u32; 256];
    let mut position = 0;
    {
        let mut pass = progress.stage(0.0, 60.0);
        while position + MIN_MATCH < data.len() {
            match finder.next_match(position) {
                Some(m) => {
                    length_counts[m.len - MIN_MATCH] += 1;
                    position += m.len;
                    references.push(m);
                }
                None => position += 1,
            }
            pass.report(position, data.len());
        }
    }

    let table = FreqTable::from_counts(&length_counts);
    let tree = HuffmanTree::from_table(&table);
    encode_header(&mut bw, &table);

    // Token pass: literals up to each reference, then the reference.
    position = 0;
    {
        let mut pass = progress.stage(60.0, 30.0);
        for m in &references {
            while position < m.pos {
                push_literal(&mut bw, data[position]);
                position += 1;
            }
            push_reference(&mut bw, &tree, m);
            position += m.len;
            pass.report(position, data.len());
        }
    }

    // Trailing literals after the last reference.
    {
        let mut pass = progress.stage(90.0, 10.0);
        for (i, &byte) in data.iter().enumerate().skip(position) {
            push_literal(&mut bw, byte);
            pass.report(i + 1, data.len());
        }
    }

    let output = crate::huffman::encoder::finish(bw, data);
    progress.finish();
    output
}

fn push_literal(bw: &mut BitWriter, byte: u8) {
    // A raw byte starting with a 1 bit needs one disambiguating tag bit,
    // otherwise the byte itself is the token.
    if byte >> 7 == 1 {
        bw.push_bits(1, 1);
    }
    bw.push_bits(byte as u64, 8);
}

fn push_reference(bw: &mut BitWriter, tree: &HuffmanTree, m: &Match) {
    let offset = (m.pos - m.src - MIN_DISTANCE) as u64;
    let long = offset > (1 << SHORT_DISTANCE_BITS) - 1;

    bw.push_bits(0b10, 2);
    let (bits, len) = tree
        .code((m.len - MIN_MATCH) as u16)
        .expect("length missing from code table");
    bw.push_bits(bits, len as u32);
    bw.push_bits(long as u64, 1);
    bw.push_bits(offset, if long { DISTANCE_BITS } else { SHORT_DISTANCE_BITS });
}

/// Dictionary decompression, the exact mirror of [`compress`]: peek the
/// tag bits in encode order, then either copy one literal byte forward or
/// perform a cyclic backward copy, until the declared original length has
/// been produced. A stream that runs out of bits first fails rather than
/// returning a short result.
pub fn decompress(data: &[u8], progress: &mut Progress<'_>) -> Result<Vec<u8>, Error> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let mut br = BitReader::new(data);

    if br.get_bits(1)? == 0 {
        let output = crate::huffman::encoder::read_raw(&mut br, progress)?;
        progress.finish();
        return Ok(output);
    }

    let size = br.get_bits(ORIGINAL_LEN_BITS)? as usize;
    let tree = HuffmanTree::from_table(&decode_header(&mut br)?);
    let mut output: Vec<u8> = Vec::with_capacity(size);

    while output.len() < size {
        // Tag 0: a literal whose top bit is clear.
        if br.peek_bits(1)? == 0 {
            output.push(br.get_bits(8)? as u8);
            progress.report(output.len(), size);
            continue;
        }
        br.get_bits(1)?;

        // Tag 11: a literal whose top bit is set; the second 1 is the
        // byte's own leading bit, so it is peeked, not consumed.
        if br.peek_bits(1)? == 1 {
            output.push(br.get_bits(8)? as u8);
            progress.report(output.len(), size);
            continue;
        }
        br.get_bits(1)?;

        // Tag 10: a back-reference.
        let length = tree.decode_symbol(&mut br)? as usize + MIN_MATCH;
        let long = br.get_bits(1)? == 1;
        let width = if long { DISTANCE_BITS } else { SHORT_DISTANCE_BITS };
        let distance = br.get_bits(width)? as usize + MIN_DISTANCE;
        if distance > output.len() {
            return Err(Error::InvalidReference);
        }

        // Cyclic copy: when length exceeds distance this re-reads bytes
        // the copy itself just appended.
        let from = output.len() - distance;
        for i in 0..length {
            output.push(output[from + i]);
        }
        progress.report(output.len(), size);
    }

    // A final reference can only overrun the declared length if the
    // stream is corrupt.
    if output.len() != size {
        return Err(Error::InconsistentHeader);
    }

    progress.finish();
    Ok(output)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::progress::Progress;

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let packed = compress(data, &mut Progress::none());
        decompress(&packed, &mut Progress::none()).unwrap()
    }

    #[test]
    fn empty_input_test() {
        assert!(compress(&[], &mut Progress::none()).is_empty());
        assert_eq!(decompress(&[], &mut Progress::none()), Ok(Vec::new()));
    }

    #[test]
    fn single_byte_roundtrips_test() {
        assert_eq!(roundtrip(&[0x41]), [0x41]);
    }

    #[test]
    fn high_bit_literals_roundtrip_test() {
        // Bytes with the top bit set exercise the 11 tag path.
        let data = [0x80, 0xff, 0x7f, 0x81, 0x00, 0xfe];
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn repetitive_input_shrinks_test() {
        let data = b"ABABABABABABABABABABABABABABABAB";
        let packed = compress(data, &mut Progress::none());
        assert!(packed.len() < data.len(), "got {} bytes", packed.len());
        assert_eq!(
            decompress(&packed, &mut Progress::none()).unwrap(),
            data
        );
    }

    #[test]
    fn self_overlapping_copy_roundtrips_test() {
        let mut data = vec![b'x'; 1000];
        data.extend_from_slice(b"tail");
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn long_distance_references_roundtrip_test() {
        // A repeat far enough back to need the 16-bit distance field.
        let mut data = b"needle in the haystack".to_vec();
        data.resize(5000, b'.');
        data.extend_from_slice(b"needle in the haystack");
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn text_roundtrip_test() {
        let data = b"the quick brown fox jumps over the lazy dog, \
                     the quick brown fox jumps over the lazy dog"
            .to_vec();
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn fallback_bound_test() {
        let data: Vec<u8> = (0_u32..512).map(|i| (i * 7 + i / 3) as u8).collect();
        let packed = compress(&data, &mut Progress::none());
        assert!(packed.len() <= data.len() + 1);
        assert_eq!(decompress(&packed, &mut Progress::none()).unwrap(), data);
    }

    #[test]
    fn determinism_test() {
        let data = b"mirror mirror on the wall".repeat(10);
        assert_eq!(
            compress(&data, &mut Progress::none()),
            compress(&data, &mut Progress::none())
        );
    }

    #[test]
    fn truncated_header_fails_test() {
        let data = b"compressible compressible compressible".repeat(8);
        let packed = compress(&data, &mut Progress::none());
        assert_eq!(packed[0] >> 7, 1, "expected the structured path");
        assert_eq!(
            decompress(&packed[..2], &mut Progress::none()),
            Err(Error::OutOfData)
        );
    }

    #[test]
    fn reference_into_thin_air_fails_test() {
        // Flag 1, empty length header, then a fabricated reference tag.
        // With no produced output a back-copy cannot be satisfied.
        let mut bw = crate::bitstream::BitWriter::new();
        bw.push_bits(1, 1); // compressed flag
        bw.push_bits(8, 31); // original length
        bw.push_bits(0, 1); // non-empty header flag
        bw.push_bits(1, 6); // freq bits
        bw.push_bits(1, 6); // sym bits
        bw.push_bits(1, 6); // count bits
        bw.push_bits(0, 1); // one entry
        bw.push_bits(0, 1); // symbol 0
        bw.push_bits(1, 1); // frequency 1
        bw.push_bits(0b10, 2); // reference tag
        bw.push_bits(0, 1); // length code (symbol 0 via padded tree)
        bw.push_bits(0, 1); // short distance
        bw.push_bits(5, 10); // distance 6, but nothing written yet
        bw.push_bytes(&[0; 4]);
        let stream = bw.into_bytes();
        assert_eq!(
            decompress(&stream, &mut Progress::none()),
            Err(Error::InvalidReference)
        );
    }

    #[test]
    fn truncated_token_stream_fails_test() {
        // Cutting bytes off a structured stream must never produce a
        // short Ok result: fewer bytes than the declared original length
        // is always an error.
        let data = b"cut me short, cut me short, cut me short".repeat(10);
        let packed = compress(&data, &mut Progress::none());
        assert_eq!(packed[0] >> 7, 1, "expected the structured path");
        for cut in [packed.len() - 1, packed.len() / 2, 9] {
            assert_eq!(
                decompress(&packed[..cut], &mut Progress::none()),
                Err(Error::OutOfData),
                "cut at {} bytes",
                cut
            );
        }
    }

    #[test]
    fn progress_covers_all_stages_test() {
        let data = b"stage one, stage two, stage three".repeat(12);
        let mut seen: Vec<u8> = Vec::new();
        let mut sink = |pct: u8| seen.push(pct);
        compress(&data, &mut Progress::new(&mut sink));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 100);
    }
}
