use crate::error::Error;

/// Reads a packed bitstream from a borrowed byte slice, MSB first.
///
/// The cursor only moves forward; the one non-consuming operation is
/// [`BitReader::peek_bits`], used to test token tag bits before deciding
/// how many bits to actually consume.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Index of the byte holding the next unread bit.
    cursor: usize,
    /// Bits already consumed from that byte (0..8).
    bit_index: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: 0,
            bit_index: 0,
        }
    }

    /// Read and consume `width` bits, returned in the low-order positions.
    ///
    /// Fails with `InvalidWidth` for widths outside 1..=64 and with
    /// `OutOfData` if the input is exhausted first. Failure consumes
    /// nothing.
    pub fn get_bits(&mut self, width: u32) -> Result<u64, Error> {
        if !(1..=64).contains(&width) {
            return Err(Error::InvalidWidth(width));
        }
        if (width as usize) > self.bits_available() {
            return Err(Error::OutOfData);
        }

        let mut result = 0_u64;
        let mut needed = width;
        while needed > 0 {
            // Take what we can from the current byte.
            let take = needed.min(8 - self.bit_index as u32);
            let shift = 8 - self.bit_index as u32 - take;
            let bits = (self.data[self.cursor] >> shift) as u64 & (0xff >> (8 - take));
            result = result << take | bits;

            self.bit_index += take as u8;
            if self.bit_index == 8 {
                self.cursor += 1;
                self.bit_index = 0;
            }
            needed -= take;
        }
        Ok(result)
    }

    /// Read `width` bits without advancing the cursor.
    pub fn peek_bits(&mut self, width: u32) -> Result<u64, Error> {
        let (cursor, bit_index) = (self.cursor, self.bit_index);
        let result = self.get_bits(width);
        self.cursor = cursor;
        self.bit_index = bit_index;
        result
    }

    /// Convenience function, reads the next 8 bits as a byte.
    pub fn get_byte(&mut self) -> Result<u8, Error> {
        self.get_bits(8).map(|byte| byte as u8)
    }

    /// Convenience function, reads `n` bytes.
    pub fn get_bytes(&mut self, n: usize) -> Result<Vec<u8>, Error> {
        let mut result = Vec::with_capacity(n);
        for _ in 0..n {
            result.push(self.get_byte()?);
        }
        Ok(result)
    }

    /// Exact count of unread bits.
    pub fn bits_available(&self) -> usize {
        (self.data.len() - self.cursor) * 8 - self.bit_index as usize
    }

    /// Count of whole input bytes the reader has not yet touched. A
    /// partially consumed byte does not count, so when this reaches zero
    /// only the tail of the current token plus pad bits can remain — the
    /// termination rule for every token-stream decode loop.
    pub fn bytes_available(&self) -> usize {
        let in_flight = (self.bit_index > 0) as usize;
        self.data.len() - self.cursor - in_flight
    }
}
