//! The chaining transform.
//!
//! A CBC-style mode with a whitened initial chaining value. It is not a
//! standard named mode: the initial feedback is the forward encryption
//! of an IV block built from the seed words and their bitwise
//! complements, and the decrypt side chains on the raw ciphertext block
//! it just consumed. Swapping in a library CBC/CFB implementation would
//! silently change the stored format and strand every value already at
//! rest, so the steps below are the wire contract.
//!
//! There is no authentication tag and no per-call nonce: identical
//! `(key, iv_seed, plaintext)` always produces identical ciphertext.

use zeroize::Zeroizing;

use super::BLOCK_LEN;
use super::cipher::CipherContext;
use crate::error::CryptError;

/// Computes the feedback value every buffer starts from.
///
/// The IV block is the two seed words followed by their complements,
/// little-endian, run through the forward cipher once before any data
/// is processed.
pub fn initial_feedback(ctx: &CipherContext, iv_seed: [u32; 2]) -> [u8; BLOCK_LEN] {
    let mut block = [0u8; BLOCK_LEN];
    block[0..4].copy_from_slice(&iv_seed[0].to_le_bytes());
    block[4..8].copy_from_slice(&iv_seed[1].to_le_bytes());
    block[8..12].copy_from_slice(&(!iv_seed[0]).to_le_bytes());
    block[12..16].copy_from_slice(&(!iv_seed[1]).to_le_bytes());
    ctx.encrypt_block(&mut block);
    block
}

fn check_len(len: usize) -> Result<(), CryptError> {
    if len == 0 || len % BLOCK_LEN != 0 {
        return Err(CryptError::InvalidLength(len));
    }
    Ok(())
}

/// Encrypts an aligned buffer.
///
/// Blocks are processed in strict sequential order; each step's feedback
/// is the ciphertext block just produced.
pub fn encrypt(
    ctx: &CipherContext,
    iv_seed: [u32; 2],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptError> {
    check_len(plaintext.len())?;

    let mut feedback = initial_feedback(ctx, iv_seed);
    let mut out = vec![0u8; plaintext.len()];

    for (src, dst) in plaintext
        .chunks_exact(BLOCK_LEN)
        .zip(out.chunks_exact_mut(BLOCK_LEN))
    {
        for (d, (s, f)) in dst.iter_mut().zip(src.iter().zip(feedback.iter())) {
            *d = s ^ f;
        }
        ctx.encrypt_block(dst);
        feedback.copy_from_slice(dst);
    }

    Ok(out)
}

/// Decrypts an aligned buffer.
///
/// The initial feedback is computed exactly as on the encrypt side, with
/// the same forward cipher operation. Each step then chains on the raw
/// ciphertext block it consumed, not a re-encryption of it.
pub fn decrypt(
    ctx: &CipherContext,
    iv_seed: [u32; 2],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptError> {
    check_len(ciphertext.len())?;

    let mut feedback = initial_feedback(ctx, iv_seed);
    let mut out = Zeroizing::new(vec![0u8; ciphertext.len()]);

    for (src, dst) in ciphertext
        .chunks_exact(BLOCK_LEN)
        .zip(out.chunks_exact_mut(BLOCK_LEN))
    {
        dst.copy_from_slice(src);
        ctx.decrypt_block(dst);
        for (d, f) in dst.iter_mut().zip(feedback.iter()) {
            *d ^= f;
        }
        feedback.copy_from_slice(src);
    }

    Ok(out)
}
