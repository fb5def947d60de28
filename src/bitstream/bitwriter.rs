/// Packs integers of 1-64 bits into a byte buffer, MSB first.
pub struct BitWriter {
    /// Output buffer holding the packed bytes.
    output: Vec<u8>,
    /// Queue of bits waiting to be pushed as full bytes into the output.
    queue: u64,
    /// Count of valid bits in the queue. Never exceeds 7 between calls.
    q_bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a writer with a preallocated output buffer. Suggest the
    /// expected compressed size to avoid reallocation.
    pub fn with_capacity(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            queue: 0,
            q_bits: 0,
        }
    }

    /// Append the `width` low-order bits of `value`, MSB first.
    ///
    /// `width` must be in 1..=64. Every call site in this crate passes a
    /// compile-time width, so an out-of-range width is a programming error.
    pub fn push_bits(&mut self, value: u64, width: u32) {
        assert!((1..=64).contains(&width), "bit width must be in 1..=64");
        if width > 32 {
            self.push_queue(value >> 32, width - 32);
            self.push_queue(value & 0xffff_ffff, 32);
        } else {
            self.push_queue(value, width);
        }
    }

    /// Append one byte, preserving bit order.
    pub fn push_byte(&mut self, data: u8) {
        self.push_bits(data as u64, 8);
    }

    /// Append a run of bytes, preserving order.
    pub fn push_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.push_byte(byte);
        }
    }

    /// Internal write function. `width` is at most 32, so the queue depth
    /// stays within u64 (at most 7 carried bits plus 32 new ones).
    fn push_queue(&mut self, value: u64, width: u32) {
        self.queue <<= width; //shift queue by bit length
        self.queue |= value & (u64::MAX >> (64 - width)); //add data portion to queue
        self.q_bits += width as u8; //update depth of queue bits
        self.write_stream();
    }

    /// Drain all full bytes from the queue into the output buffer.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Exact count of bits pushed so far.
    pub fn bits_written(&self) -> usize {
        self.output.len() * 8 + self.q_bits as usize
    }

    /// Number of bytes the finished stream will occupy, counting the
    /// pending partial byte.
    pub fn byte_len(&self) -> usize {
        (self.bits_written() + 7) / 8
    }

    /// Pad any pending partial byte with zero bits in the least
    /// significant positions and return the accumulated bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        if self.q_bits > 0 {
            let byte = (self.queue as u8) << (8 - self.q_bits);
            self.output.push(byte);
            self.q_bits = 0;
        }
        self.output
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
