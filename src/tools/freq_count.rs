/// Returns a slot-per-value frequency count of the input data.
pub fn byte_freqs(data: &[u8]) -> [u32; 256] {
    let mut freqs = [0_u32; 256];
    data.iter().for_each(|&el| freqs[el as usize] += 1);
    freqs
}
