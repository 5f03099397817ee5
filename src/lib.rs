mod align;
mod config;
mod encode;
mod error;
mod store;

pub mod crypto;

pub use crate::align::align;
pub use crate::config::{Config, DEFAULT_URL};
pub use crate::encode::{decode, encode, encoded_len};
pub use crate::error::CryptError;
pub use crate::store::{MemoryStore, RedisStore, Store};

use anyhow::{Context, Result};
use zeroize::Zeroizing;

use crate::crypto::{CipherContext, KeyMaterial, chain};

/// A store session with optional transparent value encryption.
///
/// With crypt enabled, `set` runs plaintext through the chain transform
/// and stores it base64-encoded; `get` inverts the pipeline. With crypt
/// disabled, values pass through untouched, which is also how an
/// operator inspects what is actually at rest.
pub struct Rediseal<S: Store> {
    store: S,
    crypt: Option<CryptContext>,
}

/// Per-session cipher state. Dropping it wipes the key material and the
/// round-key schedule.
struct CryptContext {
    material: KeyMaterial,
    cipher: CipherContext,
}

impl Rediseal<RedisStore> {
    /// Connects to the configured store and enables crypt when the
    /// config carries a key source.
    pub fn open(config: &Config) -> Result<Self> {
        let store = RedisStore::connect(&config.url)?;
        let mut db = Self::with_store(store);
        if let Some(material) = config.key_material()? {
            db.enable_crypt(material);
        }
        Ok(db)
    }
}

impl<S: Store> Rediseal<S> {
    /// Wraps a store backend with crypt disabled.
    pub fn with_store(store: S) -> Self {
        Self { store, crypt: None }
    }

    /// Enables value encryption with the given key material.
    ///
    /// The cipher context is built here, once per session; there is no
    /// shared module-level state.
    pub fn enable_crypt(&mut self, material: KeyMaterial) {
        let cipher = CipherContext::new(material.key());
        self.crypt = Some(CryptContext { material, cipher });
        tracing::debug!("crypt enabled");
    }

    /// Disables value encryption and wipes the session key material.
    pub fn disable_crypt(&mut self) {
        self.crypt = None;
        tracing::debug!("crypt disabled");
    }

    pub fn crypt_enabled(&self) -> bool {
        self.crypt.is_some()
    }

    /// Stores a value, encrypting it first when crypt is enabled.
    ///
    /// The plaintext is copied into a zero-filled buffer of the aligned
    /// length; the buffer is wiped once the ciphertext exists. Values
    /// must not contain NUL bytes, since recovery trims at the first
    /// zero byte of the padded plaintext.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let Some(crypt) = &self.crypt else {
            return self.store.set(key, value);
        };

        let mut buf = Zeroizing::new(vec![0u8; align(value.len())]);
        buf[..value.len()].copy_from_slice(value.as_bytes());

        let ciphertext = chain::encrypt(&crypt.cipher, crypt.material.iv_seed(), &buf)?;
        let encoded = encode::encode(&ciphertext);

        tracing::debug!(key = %key, stored_len = encoded.len(), "set");
        self.store.set(key, &encoded)
    }

    /// Fetches a value, decrypting it when crypt is enabled.
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };

        let Some(crypt) = &self.crypt else {
            return Ok(Some(raw));
        };

        let ciphertext = encode::decode(&raw)?;
        let padded = chain::decrypt(&crypt.cipher, crypt.material.iv_seed(), &ciphertext)?;

        let len = padded.iter().position(|&b| b == 0).unwrap_or(padded.len());
        let value = std::str::from_utf8(&padded[..len])
            .context("decrypted value is not valid UTF-8; wrong key?")?
            .to_string();

        tracing::debug!(key = %key, "get");
        Ok(Some(value))
    }

    pub fn exists(&mut self, key: &str) -> Result<bool> {
        self.store.exists(key)
    }

    pub fn del(&mut self, key: &str) -> Result<bool> {
        self.store.del(key)
    }

    pub fn ping(&mut self) -> Result<()> {
        self.store.ping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Rediseal<MemoryStore> {
        let material = KeyMaterial::from_hex("41d962ad5479795a10de0a369dea3b1e").unwrap();
        let mut db = Rediseal::with_store(MemoryStore::new());
        db.enable_crypt(material);
        db
    }

    #[test]
    fn set_get_roundtrip_with_crypt() {
        let mut db = session();
        db.set("greeting", "test hello world").unwrap();
        assert_eq!(db.get("greeting").unwrap().as_deref(), Some("test hello world"));
    }

    #[test]
    fn value_at_rest_is_ciphertext() {
        let mut db = session();
        db.set("greeting", "test hello world").unwrap();

        db.disable_crypt();
        let raw = db.get("greeting").unwrap().unwrap();
        assert_ne!(raw, "test hello world");

        // base64 of the aligned ciphertext, sized by the codec formula
        let expected = encoded_len(align("test hello world".len()));
        assert_eq!(raw.len(), expected);
        assert!(decode(&raw).is_ok());
    }

    #[test]
    fn roundtrip_across_sessions_with_same_key() {
        let material = KeyMaterial::from_hex("41d962ad5479795a10de0a369dea3b1e").unwrap();
        let mut writer = Rediseal::with_store(MemoryStore::new());
        writer.enable_crypt(material);
        writer.set("k", "stable value").unwrap();

        writer.disable_crypt();
        let at_rest = writer.get("k").unwrap().unwrap();

        let material = KeyMaterial::from_hex("41d962ad5479795a10de0a369dea3b1e").unwrap();
        let mut reader = Rediseal::with_store(MemoryStore::new());
        reader.enable_crypt(material);
        reader.store.set("k", &at_rest).unwrap();
        assert_eq!(reader.get("k").unwrap().as_deref(), Some("stable value"));
    }

    #[test]
    fn encryption_is_deterministic_at_rest() {
        let mut db = session();
        db.set("a", "same value").unwrap();
        db.set("b", "same value").unwrap();

        db.disable_crypt();
        // no nonce: equal plaintext leaks equality of stored values
        assert_eq!(db.get("a").unwrap(), db.get("b").unwrap());
    }

    #[test]
    fn values_longer_than_one_block_roundtrip() {
        let mut db = session();
        let value = "x".repeat(300);
        db.set("long", &value).unwrap();
        assert_eq!(db.get("long").unwrap().as_deref(), Some(value.as_str()));
    }

    #[test]
    fn empty_value_roundtrips() {
        let mut db = session();
        db.set("empty", "").unwrap();
        assert_eq!(db.get("empty").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn missing_key_is_none() {
        let mut db = session();
        assert_eq!(db.get("absent").unwrap(), None);
    }

    #[test]
    fn exists_and_del_pass_through() {
        let mut db = session();
        db.set("k", "v").unwrap();
        assert!(db.exists("k").unwrap());
        assert!(db.del("k").unwrap());
        assert!(!db.exists("k").unwrap());
        assert_eq!(db.get("k").unwrap(), None);
    }

    #[test]
    fn plaintext_session_stores_verbatim() {
        let mut db = Rediseal::with_store(MemoryStore::new());
        assert!(!db.crypt_enabled());

        db.set("k", "plain").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("plain"));
    }

    #[test]
    fn tampered_ciphertext_is_rejected_or_garbled() {
        let mut db = session();
        db.set("k", "test hello world").unwrap();

        db.disable_crypt();
        let raw = db.get("k").unwrap().unwrap();
        db.store.set("k", &raw[..raw.len() - 4]).unwrap();

        let material = KeyMaterial::from_hex("41d962ad5479795a10de0a369dea3b1e").unwrap();
        db.enable_crypt(material);
        // truncated base64 either fails to decode or yields a non-aligned buffer
        assert!(db.get("k").is_err());
    }
}
