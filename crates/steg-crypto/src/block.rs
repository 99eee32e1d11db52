//! 64-bit Feistel block cipher (Blowfish), used by the jphide breaker's PRNG.
//!
//! The reference implementation reinterpreted each 8-byte block as two
//! native `u32` halves and byte-swapped them around `encrypt`/`decrypt` on
//! big-endian hosts, purely to keep the on-the-wire bytes portable across
//! architectures. Operating on `[u8; 8]` blocks directly (as the `blowfish`
//! crate does) sidesteps that quirk rather than reproducing it: there is no
//! native-endian reinterpretation step to compensate for.

use blowfish::cipher::generic_array::GenericArray;
use blowfish::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use blowfish::Blowfish;

use crate::error::{CryptoError, Result};

/// A keyed 64-bit Feistel cipher over a 448-bit (1–56 byte) key.
pub struct BlockCipher {
    inner: Blowfish,
}

impl BlockCipher {
    /// Derive a key schedule from `key` (1–56 bytes).
    pub fn set_key(key: &[u8]) -> Result<Self> {
        let inner = Blowfish::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
        Ok(BlockCipher { inner })
    }

    /// Encrypt one 8-byte block in place.
    pub fn encrypt(&self, block: &mut [u8; 8]) {
        let ga = GenericArray::from_mut_slice(block);
        self.inner.encrypt_block(ga);
    }

    /// Decrypt one 8-byte block in place.
    pub fn decrypt(&self, block: &mut [u8; 8]) {
        let ga = GenericArray::from_mut_slice(block);
        self.inner.decrypt_block(ga);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_key() {
        assert!(BlockCipher::set_key(&[]).is_err());
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = BlockCipher::set_key(b"a reasonably long test key").unwrap();
        let original = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut block = original;
        cipher.encrypt(&mut block);
        assert_ne!(block, original);
        cipher.decrypt(&mut block);
        assert_eq!(block, original);
    }
}
