//! outguess dictionary attack (part of C9).
//!
//! outguess scatters its payload bits across the coefficient LSB bitmap at
//! positions chosen by a keyed pseudo-random walk, adapting its step size
//! down as the walk consumes more of the image (`iterator_adapt`). A
//! candidate password only has to reproduce that walk well enough to pull
//! a 4-byte seed/length header and a `min_len`-byte prefix before the
//! randomness gate ([`steg_analyze::is_random`]) and a content sniff decide
//! whether it's really plaintext.

use steg_crypto::Arc4;

use crate::error::{CrackError, Result};

const DEFAULT_MIN_LEN: usize = 256;
const DEFAULT_MAX_SEED: u32 = 55000;
const INIT_SKIPMOD: u32 = 32;
const PROBE_CAP: usize = 512;

/// Packed LSB bitmap plus the coefficient count it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutguessTarget {
    pub bits: usize,
    coeff: Vec<u32>,
}

impl OutguessTarget {
    /// Serialise to the `.og` on-disk layout: `bits` and the bitmap word
    /// count as big-endian u32s, then each bitmap word big-endian.
    pub fn serialise(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.coeff.len() * 4);
        out.extend_from_slice(&(self.bits as u32).to_be_bytes());
        out.extend_from_slice(&(self.coeff.len() as u32).to_be_bytes());
        for word in &self.coeff {
            out.extend_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Parse an `.og` record produced by [`OutguessTarget::serialise`].
    pub fn deserialise(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(CrackError::MalformedJob("outguess job record truncated"));
        }

        let bits = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
        let words = u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as usize;
        if bytes.len() != 8 + words * 4 {
            return Err(CrackError::MalformedJob("outguess job record has the wrong length"));
        }

        let coeff = bytes[8..]
            .chunks_exact(4)
            .map(|chunk| u32::from_be_bytes(chunk.try_into().unwrap()))
            .collect();

        Ok(OutguessTarget { bits, coeff })
    }
}

fn test_bit(bitmap: &[u32], pos: u32) -> bool {
    (bitmap[(pos / 32) as usize] & (1 << (pos & 31))) != 0
}

fn write_bit(bitmap: &mut [u32], pos: u32, value: bool) {
    let word = &mut bitmap[(pos / 32) as usize];
    let mask = 1u32 << (pos & 31);
    if value {
        *word |= mask;
    } else {
        *word &= !mask;
    }
}

/// Extract the LSB bitmap outguess embeds into, capped at the reference
/// tool's fixed 4096-word (131072-bit) capture window.
pub fn prepare(dcts: &[i16]) -> OutguessTarget {
    let max_bits = 4096 * 32;
    let bits = dcts.len().min(max_bits);
    let mut coeff = vec![0u32; max_bits / 32];
    for (i, &val) in dcts.iter().take(bits).enumerate() {
        write_bit(&mut coeff, i as u32, (val & 0x01) != 0);
    }
    OutguessTarget { bits: dcts.len(), coeff }
}

/// Keyed pseudo-random walk over the bitmap, matching `iterator_*` exactly:
/// the step size (`skipmod`) shrinks as the walk consumes more of the
/// embedding capacity relative to the declared payload length.
#[derive(Clone)]
struct Walker {
    stream: Arc4,
    skipmod: u32,
    off: u32,
}

impl Walker {
    fn new(stream: Arc4) -> Self {
        let mut it = Walker { stream, skipmod: INIT_SKIPMOD, off: 0 };
        let mut derive = [0u8; 16];
        for b in &mut derive {
            *b = it.stream.get_byte();
        }
        it.stream.add_randomness(&derive);
        it.off = it.stream.get_word() % it.skipmod;
        it
    }

    fn current(&self) -> u32 {
        self.off
    }

    fn next(&mut self) -> u32 {
        self.off += (self.stream.get_word() % self.skipmod) + 1;
        self.off
    }

    fn seed(&mut self, seed: u16) {
        let reseed = [seed as u8, (seed >> 8) as u8];
        self.stream.add_randomness(&reseed);
    }

    fn adapt(&mut self, total_bits: usize, datalen: usize) {
        let remaining = total_bits as i64 - self.off as i64;
        let x = total_bits as f64;
        let y = remaining as f64;
        let factor = if y > x / 32.0 { 2.0 } else { 2.0 - (x / 32.0 - y) / (x / 32.0) };
        self.skipmod = ((factor * remaining as f64) / (8.0 * datalen as f64)).max(1.0) as u32;
    }
}

fn retrieve_byte(bitmap: &[u32], it: &mut Walker) -> u8 {
    let mut tmp = 0u8;
    for where_ in 0..8 {
        if test_bit(bitmap, it.current()) {
            tmp |= 1 << where_;
        }
        it.next();
    }
    tmp
}

/// Outcome of a successful trial: the decrypted payload prefix.
pub struct OutguessHit {
    pub payload: Vec<u8>,
}

/// Try `word` against a prepared target, with the reference tool's tunable
/// `min_len`/`max_seed` bounds.
pub fn try_password(
    target: &OutguessTarget,
    word: &[u8],
    min_len: usize,
    max_seed: u32,
) -> Option<OutguessHit> {
    let min_len = if min_len == 0 { DEFAULT_MIN_LEN } else { min_len };
    let max_seed = if max_seed == 0 { DEFAULT_MAX_SEED } else { max_seed };

    let as_stream = Arc4::init_key(word);
    let mut it = Walker::new(as_stream); // Arc4 is Copy; `as_stream` is still usable below
    let mut tas = as_stream;

    let mut state = [0u8; 4];
    for s in &mut state {
        *s = retrieve_byte(&target.coeff, &mut it) ^ tas.get_byte();
    }

    let seed = (state[1] as u32) << 8 | state[0] as u32;
    let length = (state[3] as usize) << 8 | state[2] as usize;

    if seed > max_seed || length * 8 >= target.bits / 2 || length < min_len {
        return None;
    }

    it.seed(seed as u16);

    let bits = target.bits.min(4096 * 32);
    let mut buf = Vec::with_capacity(PROBE_CAP);
    let mut remaining = length;

    while (it.current() as usize) < bits && remaining > 0 && buf.len() < PROBE_CAP {
        it.adapt(target.bits, remaining);
        buf.push(retrieve_byte(&target.coeff, &mut it));
        remaining -= 1;
    }

    let need = min_len.min(PROBE_CAP);
    if buf.len() < need || !steg_analyze::is_random(&buf) {
        return None;
    }

    for b in buf.iter_mut() {
        *b ^= tas.get_byte();
    }

    Some(OutguessHit { payload: buf })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_caps_at_window_size() {
        let dcts = vec![1i16; 200_000];
        let target = prepare(&dcts);
        assert_eq!(target.coeff.len(), 4096);
    }

    #[test]
    fn test_try_password_rejects_implausible_seed() {
        let dcts = vec![0i16; 2048];
        let target = prepare(&dcts);
        assert!(try_password(&target, b"password", 256, 55000).is_none());
    }

    /// T1: `deserialise(serialise(target)) == target`, including the
    /// endianness of the bitmap words.
    #[test]
    fn test_serialise_deserialise_roundtrip() {
        let dcts: Vec<i16> = (0..5000).map(|i| (i % 3) as i16).collect();
        let target = prepare(&dcts);

        let bytes = target.serialise();
        let back = OutguessTarget::deserialise(&bytes).unwrap();
        assert_eq!(back, target);
    }

    #[test]
    fn test_deserialise_rejects_truncated_record() {
        assert!(OutguessTarget::deserialise(&[0u8; 3]).is_err());
    }

    #[test]
    fn test_deserialise_rejects_inconsistent_word_count() {
        let mut bytes = vec![0u8; 8];
        bytes[4..8].copy_from_slice(&5u32.to_be_bytes());
        assert!(OutguessTarget::deserialise(&bytes).is_err());
    }
}
