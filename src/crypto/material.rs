use zeroize::Zeroize;

use super::{IV_SEED_LEN, KEY_LEN, SALT_LEN};
use crate::error::CryptError;

/// Key material for one session: the raw 128-bit key, the IV seed the
/// chain whitens its initial feedback from, and the KDF salt when the
/// key was derived from a passphrase.
///
/// Immutable after creation; every byte is wiped when dropped.
#[derive(Debug)]
pub struct KeyMaterial {
    key: [u8; KEY_LEN],
    iv_seed: [u32; 2],
    salt: Option<[u8; SALT_LEN]>,
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv_seed.zeroize();
        if let Some(salt) = self.salt.as_mut() {
            salt.zeroize();
        }
    }
}

impl KeyMaterial {
    pub(crate) fn new(key: [u8; KEY_LEN], iv_seed: [u32; 2], salt: Option<[u8; SALT_LEN]>) -> Self {
        Self { key, iv_seed, salt }
    }

    /// Interprets the first 32 hex characters of `hexstr` as the raw
    /// 128-bit key. Anything shorter is rejected with
    /// [`CryptError::KeyTooSmall`]; crypto stays disabled.
    ///
    /// The IV seed falls out of the key itself: the fourth and third
    /// little-endian key words, so the upper key half doubles as the
    /// whitening source for the initial chaining value.
    pub fn from_hex(hexstr: &str) -> Result<Self, CryptError> {
        let bytes = hexstr.as_bytes();
        if bytes.len() < KEY_LEN * 2 {
            return Err(CryptError::KeyTooSmall);
        }

        let mut key = [0u8; KEY_LEN];
        hex::decode_to_slice(&bytes[..KEY_LEN * 2], &mut key)
            .map_err(|e| CryptError::DecodeFormat(e.to_string()))?;

        let iv_seed = seed_from_key(&key);
        Ok(Self::new(key, iv_seed, None))
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn iv_seed(&self) -> [u32; 2] {
        self.iv_seed
    }

    pub fn salt(&self) -> Option<&[u8; SALT_LEN]> {
        self.salt.as_ref()
    }
}

/// Derives the IV seed from the upper half of the key: words 3 and 2,
/// little-endian, in that order.
pub(crate) fn seed_from_key(key: &[u8; KEY_LEN]) -> [u32; 2] {
    let w2 = u32::from_le_bytes([key[8], key[9], key[10], key[11]]);
    let w3 = u32::from_le_bytes([key[12], key[13], key[14], key[15]]);
    [w3, w2]
}

/// Decodes an 8-byte hex IV seed into its two little-endian words.
pub(crate) fn seed_from_bytes(bytes: &[u8; IV_SEED_LEN]) -> [u32; 2] {
    [
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
    ]
}
