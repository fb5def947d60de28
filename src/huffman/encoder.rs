use crate::bitstream::{BitReader, BitWriter};
use crate::error::Error;
use crate::huffman::tree::{FreqTable, HuffmanTree};
use crate::tools::freq_count::byte_freqs;
use crate::tools::progress::Progress;

/// Fixed width of the three header width fields. Frequencies are 32-bit
/// quantities, and 6 bits encode the bit-length of any of them.
const WIDTH_FIELD_BITS: u32 = 6;
/// Width of the original-length field in every structured stream.
pub(crate) const ORIGINAL_LEN_BITS: u32 = 31;

/// Bit-length of a value, with 0 counting as one bit.
fn bit_len(value: u32) -> u32 {
    (32 - value.leading_zeros()).max(1)
}

/// Serialize a frequency table: 1-bit empty flag, then the three width
/// fields (frequency, symbol, count), the entry count minus one, and one
/// (symbol, frequency) pair per entry.
pub fn encode_header(bw: &mut BitWriter, table: &FreqTable) {
    if table.is_empty() {
        bw.push_bits(1, 1);
        return;
    }
    bw.push_bits(0, 1);

    let entries = table.entries();
    let max_freq = entries.iter().map(|&(_, f)| f).max().unwrap_or(0);
    let max_sym = entries.iter().map(|&(s, _)| s).max().unwrap_or(0);
    let freq_bits = bit_len(max_freq);
    let sym_bits = bit_len(max_sym as u32);
    // The table holds at most 256 distinct symbols and is not empty here,
    // so count-1 fits the field its own bit-length describes.
    let count_bits = bit_len(entries.len() as u32 - 1);

    bw.push_bits(freq_bits as u64, WIDTH_FIELD_BITS);
    bw.push_bits(sym_bits as u64, WIDTH_FIELD_BITS);
    bw.push_bits(count_bits as u64, WIDTH_FIELD_BITS);
    bw.push_bits(entries.len() as u64 - 1, count_bits);

    for &(symbol, freq) in entries {
        bw.push_bits(symbol as u64, sym_bits);
        bw.push_bits(freq as u64, freq_bits);
    }
}

/// Mirror of [`encode_header`]: rebuilds the frequency table the encoder
/// wrote, validating the declared widths before trusting them.
pub fn decode_header(br: &mut BitReader<'_>) -> Result<FreqTable, Error> {
    if br.get_bits(1)? == 1 {
        return Ok(FreqTable::default());
    }

    let freq_bits = br.get_bits(WIDTH_FIELD_BITS)? as u32;
    let sym_bits = br.get_bits(WIDTH_FIELD_BITS)? as u32;
    let count_bits = br.get_bits(WIDTH_FIELD_BITS)? as u32;
    if !(1..=32).contains(&freq_bits) || !(1..=32).contains(&sym_bits) {
        return Err(Error::InvalidWidth(freq_bits.max(sym_bits)));
    }
    if !(1..=16).contains(&count_bits) {
        return Err(Error::InvalidWidth(count_bits));
    }

    let count = br.get_bits(count_bits)? as usize + 1;
    if count > 256 {
        return Err(Error::InconsistentHeader);
    }

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let symbol = br.get_bits(sym_bits)?;
        let freq = br.get_bits(freq_bits)? as u32;
        if symbol > u8::MAX as u64 {
            return Err(Error::InconsistentHeader);
        }
        entries.push((symbol as u16, freq));
    }
    FreqTable::from_entries(entries)
}

/// Entropy-only compression. Layout: `1` flag, 31-bit original length,
/// frequency header, one code per input byte. Falls back to `0` flag plus
/// the verbatim bytes whenever the structured stream would not be smaller
/// than the input, so output never exceeds input by more than one byte.
pub fn compress(data: &[u8], progress: &mut Progress<'_>) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }
    assert!(data.len() < 1 << ORIGINAL_LEN_BITS, "input exceeds 2^31-1 bytes");

    let table = FreqTable::from_counts(&byte_freqs(data));
    let tree = HuffmanTree::from_table(&table);

    let mut bw = BitWriter::with_capacity(data.len() / 2);
    bw.push_bits(1, 1);
    bw.push_bits(data.len() as u64, ORIGINAL_LEN_BITS);
    encode_header(&mut bw, &table);

    for (i, &byte) in data.iter().enumerate() {
        let (bits, len) = tree.code(byte as u16).expect("symbol missing from code table");
        bw.push_bits(bits, len as u32);
        progress.report(i + 1, data.len());
    }

    let output = finish(bw, data);
    progress.finish();
    output
}

/// Entropy-only decompression, the exact mirror of [`compress`].
pub fn decompress(data: &[u8], progress: &mut Progress<'_>) -> Result<Vec<u8>, Error> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let mut br = BitReader::new(data);

    let output = if br.get_bits(1)? == 1 {
        let size = br.get_bits(ORIGINAL_LEN_BITS)? as usize;
        let tree = HuffmanTree::from_table(&decode_header(&mut br)?);
        if tree.is_empty() && size > 0 {
            return Err(Error::InconsistentHeader);
        }

        let mut output = Vec::with_capacity(size);
        while output.len() < size {
            output.push(tree.decode_symbol(&mut br)? as u8);
            progress.report(output.len(), size);
        }
        output
    } else {
        read_raw(&mut br, progress)?
    };

    progress.finish();
    Ok(output)
}

/// Pick the structured stream or the raw fallback, whichever is smaller.
/// Shared with the dictionary codec, which makes the same choice.
pub(crate) fn finish(bw: BitWriter, data: &[u8]) -> Vec<u8> {
    if bw.byte_len() <= data.len() {
        return bw.into_bytes();
    }
    let mut raw = BitWriter::with_capacity(data.len() + 1);
    raw.push_bits(0, 1);
    raw.push_bytes(data);
    raw.into_bytes()
}

/// Consume the raw-fallback payload: one byte at a time until no untouched
/// input bytes remain (the final partial byte holds only pad bits).
pub(crate) fn read_raw(br: &mut BitReader<'_>, progress: &mut Progress<'_>) -> Result<Vec<u8>, Error> {
    let total = br.bytes_available();
    let mut output = Vec::with_capacity(total);
    while br.bytes_available() > 0 {
        output.push(br.get_byte()?);
        progress.report(output.len(), total);
    }
    Ok(output)
}
