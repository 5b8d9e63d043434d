//! Validation error type shared across crates.

use thiserror::Error;

/// The specific rule a cipher request violated.
///
/// Callers of the facade see a single "invalid parameters" error kind; this
/// enum is carried inside it as the source so the reason is not lost.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The encryption key is empty.
    #[error("encryption key must not be empty")]
    EmptyKey,

    /// The initialisation vector is empty.
    #[error("initialisation vector must not be empty")]
    EmptyIv,

    /// The initialisation vector length does not match the algorithm.
    #[error("initialisation vector must be {expected} bytes, got {actual}")]
    IvLength { expected: usize, actual: usize },

    /// The key size is not one of 128, 192 or 256 bits.
    #[error("unsupported key size: {0}")]
    KeySize(u32),

    /// The mode name is not one of the supported modes.
    #[error("unsupported mode: {0}")]
    Mode(String),

    /// The mode cannot be used with the key size.
    #[error("mode {mode} is not available with {key_size}-bit keys")]
    ModeKeySize { mode: String, key_size: u32 },

    /// The option bits are not one of 0, RAW_DATA or ZERO_PADDING.
    #[error("unsupported option bits: {0}")]
    Options(u32),

    /// The algorithm identifier is not of the form `AES-<keysize>-<mode>`.
    #[error("malformed algorithm identifier: {0}")]
    Algorithm(String),

    /// A requested key length of zero bytes or above the generation limit.
    #[error("key length out of range")]
    KeyLength,

    /// The ciphertext is not valid hexadecimal.
    #[error("ciphertext is not valid hex")]
    MalformedHex,
}
