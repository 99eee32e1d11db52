//! Randomness test (C4): does a candidate plaintext look like ciphertext?
//!
//! Two independent checks must both pass: the overall bit-balance must sit
//! close to 50/50, and a chi-square goodness-of-fit over a sliding 6-bit
//! window across the bitstream must be low. This is the gate a cracked
//! header or outguess payload has to clear before anything downstream looks
//! at whether it's actually plaintext.

const NBUCKETS: usize = 64;

fn popcount_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = (i as u8).count_ones();
    }
    table
}

/// True iff `buf` passes both the bit-balance and chi-square tests.
pub fn is_random(buf: &[u8]) -> bool {
    if buf.is_empty() {
        return false;
    }

    let table = popcount_table();
    let ones: u32 = buf.iter().map(|&b| table[b as usize]).sum();
    let ratio = ones as f64 / (buf.len() as f64 * 8.0);
    if !(0.46..=0.54).contains(&ratio) {
        return false;
    }

    let mut buckets = [0u32; NBUCKETS];
    let mut window: u32 = buf[0] as u32;
    let mut val: u8 = 0;
    let mut byte_idx = 1usize;
    let total_bits = (buf.len() - 1) * 8;

    for j in 0..total_bits {
        buckets[(window as usize) & (NBUCKETS - 1)] += 1;
        if j % 8 == 0 {
            val = buf[byte_idx];
            byte_idx += 1;
        }
        window >>= 1;
        window |= (val & 0x80) as u32;
        val <<= 1;
    }

    let expected = total_bits as f64 / NBUCKETS as f64;
    let chi_square: f64 = buckets
        .iter()
        .map(|&count| {
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum();

    chi_square <= 160.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zero_buffer_is_not_random() {
        let buf = vec![0u8; 256];
        assert!(!is_random(&buf));
    }

    #[test]
    fn test_empty_buffer_is_not_random() {
        assert!(!is_random(&[]));
    }

    #[test]
    fn test_alternating_bits_pass_balance_but_fail_chi_square() {
        // 0xAA has a perfect bit balance but is maximally regular, so it
        // should fail the chi-square half of the test.
        let buf = vec![0xAAu8; 256];
        assert!(!is_random(&buf));
    }
}
