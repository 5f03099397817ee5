use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use super::{KEY_LEN, SALT_LEN};
use crate::error::CryptError;

/// Derives the 128-bit key from a passphrase and salt.
///
/// PBKDF2-HMAC-SHA256 for `rounds` iterations. The round count is part
/// of the key contract: the same passphrase, salt and rounds always
/// yield the same key, so changing it invalidates stored values.
pub fn derive(passphrase: &str, salt: &[u8], rounds: u32) -> Result<[u8; KEY_LEN], CryptError> {
    if passphrase.is_empty() {
        return Err(CryptError::InvalidInput("empty passphrase"));
    }
    if salt.len() != SALT_LEN {
        return Err(CryptError::InvalidInput("salt must be 16 bytes"));
    }
    if rounds == 0 {
        return Err(CryptError::InvalidInput("kdf rounds must be >= 1"));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, rounds, &mut key);
    Ok(key)
}
