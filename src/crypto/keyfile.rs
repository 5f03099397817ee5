use std::fs;
use std::path::Path;

use zeroize::Zeroizing;

use super::material::{seed_from_bytes, seed_from_key};
use super::{IV_SEED_LEN, KDF_ROUNDS, KeyMaterial, SALT_LEN, kdf};
use crate::error::CryptError;

/// Loads key material from a `name=value` key file.
///
/// At most three lines are read. Recognized names are `salt` (32 hex
/// chars), `key` (the raw passphrase fed to the KDF) and `iv` (16 hex
/// chars). Unknown names and malformed pairs are skipped, not rejected.
///
/// `salt` and `key` are required: if either is still unset after
/// parsing, the file is rejected with [`CryptError::KeyFileMalformed`]
/// instead of deriving a key from zero-filled fields. A missing `iv` is
/// tolerated; the seed then derives from the key, as with a direct hex
/// key.
pub fn load_key_file(path: &Path) -> Result<KeyMaterial, CryptError> {
    let text = fs::read_to_string(path)
        .map_err(|_| CryptError::KeyFileNotFound(path.display().to_string()))?;

    let mut salt: Option<[u8; SALT_LEN]> = None;
    let mut passphrase: Option<Zeroizing<String>> = None;
    let mut iv: Option<[u8; IV_SEED_LEN]> = None;

    for line in text.lines().take(3) {
        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let Some(value) = value.split_whitespace().next() else {
            continue;
        };

        match name {
            "salt" => {
                let mut buf = [0u8; SALT_LEN];
                if hex::decode_to_slice(value, &mut buf).is_ok() {
                    salt = Some(buf);
                }
            }
            "key" => passphrase = Some(Zeroizing::new(value.to_string())),
            "iv" => {
                let mut buf = [0u8; IV_SEED_LEN];
                if hex::decode_to_slice(value, &mut buf).is_ok() {
                    iv = Some(buf);
                }
            }
            _ => {}
        }
    }

    let salt = salt.ok_or(CryptError::KeyFileMalformed("salt"))?;
    let passphrase = passphrase.ok_or(CryptError::KeyFileMalformed("key"))?;

    let key = kdf::derive(&passphrase, &salt, KDF_ROUNDS)?;
    let iv_seed = match iv {
        Some(bytes) => seed_from_bytes(&bytes),
        None => seed_from_key(&key),
    };

    Ok(KeyMaterial::new(key, iv_seed, Some(salt)))
}
