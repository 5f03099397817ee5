use std::fmt;

#[derive(Debug)]
pub enum CryptError {
    KeyTooSmall,
    KeyFileNotFound(String),
    KeyFileMalformed(&'static str),
    DecodeFormat(String),
    InvalidLength(usize),
    InvalidInput(&'static str),
}

impl fmt::Display for CryptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptError::KeyTooSmall => {
                write!(f, "key is too small (less than 128 bits)")
            }
            CryptError::KeyFileNotFound(path) => write!(f, "key file '{path}' not found"),
            CryptError::KeyFileMalformed(field) => {
                write!(f, "key file is missing required field '{field}'")
            }
            CryptError::DecodeFormat(detail) => write!(f, "malformed encoded input: {detail}"),
            CryptError::InvalidLength(len) => {
                write!(f, "buffer length {len} is not a non-zero multiple of 16")
            }
            CryptError::InvalidInput(what) => write!(f, "invalid input: {what}"),
        }
    }
}

impl std::error::Error for CryptError {}
