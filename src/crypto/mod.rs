//! Cryptographic primitives for the value pipeline.
//!
//! Provides key material handling, key derivation, the block cipher
//! context and the chaining transform.

pub mod chain;
pub mod cipher;
pub mod kdf;
pub mod keyfile;
pub mod material;

pub use chain::{decrypt, encrypt, initial_feedback};
pub use cipher::CipherContext;
pub use kdf::derive;
pub use keyfile::load_key_file;
pub use material::KeyMaterial;

/// Length of the symmetric key (16 bytes / 128 bits).
pub const KEY_LEN: usize = 16;
/// Length of a cipher block (16 bytes / 128 bits).
pub const BLOCK_LEN: usize = 16;
/// Length of the KDF salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the raw IV seed (two 32-bit words).
pub const IV_SEED_LEN: usize = 8;
/// Default KDF iteration count.
pub const KDF_ROUNDS: u32 = 16;
