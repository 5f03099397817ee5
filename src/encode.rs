//! Binary-to-text codec for stored ciphertext.
//!
//! Ciphertext travels through a text-oriented store protocol, so raw
//! bytes are carried as RFC 4648 base64 with the padded alphabet. An
//! earlier revision used backslash-escaped hex per 32-bit word; base64
//! superseded it and is the only wire contract.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::CryptError;

/// Encodes raw ciphertext bytes as base64 text.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Length of the text produced by [`encode`] for `n` input bytes.
///
/// Callers pre-size buffers from this, so it must match the padded
/// base64 formula exactly: `4 * ceil(n / 3)`.
pub fn encoded_len(n: usize) -> usize {
    4 * n.div_ceil(3)
}

/// Decodes base64 text back into raw bytes.
///
/// Rejects input outside the padded RFC 4648 alphabet rather than
/// returning truncated or garbage bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, CryptError> {
    STANDARD
        .decode(text)
        .map_err(|e| CryptError::DecodeFormat(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_bytes() {
        let cases: &[&[u8]] = &[b"", b"a", b"ab", b"abc", b"test hello world", &[0xff; 64]];
        for bytes in cases {
            assert_eq!(decode(&encode(bytes)).unwrap(), *bytes);
        }
    }

    #[test]
    fn encoded_len_matches_output() {
        for n in 0..=128 {
            let bytes = vec![0x5au8; n];
            assert_eq!(encode(&bytes).len(), encoded_len(n), "n = {n}");
        }
    }

    #[test]
    fn empty_input_encodes_to_empty_text() {
        assert_eq!(encode(b""), "");
        assert_eq!(encoded_len(0), 0);
        assert_eq!(decode("").unwrap(), b"");
    }

    #[test]
    fn wrong_alphabet_is_rejected() {
        match decode("abc!def=") {
            Err(CryptError::DecodeFormat(_)) => {}
            other => panic!("expected DecodeFormat, got: {other:?}"),
        }
    }

    #[test]
    fn wrong_padding_is_rejected() {
        assert!(decode("AAAA=").is_err());
        assert!(decode("A").is_err());
    }

    #[test]
    fn known_vector() {
        assert_eq!(encode(b"test hello world"), "dGVzdCBoZWxsbyB3b3JsZA==");
        assert_eq!(
            decode("dGVzdCBoZWxsbyB3b3JsZA==").unwrap(),
            b"test hello world"
        );
    }
}
