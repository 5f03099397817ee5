use aes::Aes128;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use super::KEY_LEN;

/// Keyed block cipher primitive: AES-128, one 16-byte block at a time.
///
/// The round-key schedule is derived once at construction and wiped on
/// drop. A context caches no per-call state beyond the schedule, but it
/// is not meant to be shared across threads mid-buffer; build one per
/// session or synchronize externally.
pub struct CipherContext {
    aes: Aes128,
}

impl CipherContext {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            aes: Aes128::new(GenericArray::from_slice(key)),
        }
    }

    /// Forward transform, in place. `block` must be exactly 16 bytes.
    pub fn encrypt_block(&self, block: &mut [u8]) {
        self.aes.encrypt_block(GenericArray::from_mut_slice(block));
    }

    /// Inverse transform, in place. `block` must be exactly 16 bytes.
    pub fn decrypt_block(&self, block: &mut [u8]) {
        self.aes.decrypt_block(GenericArray::from_mut_slice(block));
    }
}
