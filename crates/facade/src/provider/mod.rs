//! The cryptography provider the facade delegates to.
//!
//! The facade never touches cipher internals. Everything below the
//! [`CryptoProvider`] seam (block cipher, modes, padding, authentication
//! tags, randomness) belongs to a provider, addressed by algorithm
//! identifier string the way general-purpose crypto libraries expose their
//! cipher registries.
//!
//! [`RustCryptoProvider`] is the default provider, backed by the RustCrypto
//! crates and the operating system CSPRNG.

mod cfb1;
mod key;
pub mod rustcrypto;

pub use rustcrypto::RustCryptoProvider;

use common::CipherOptions;
use thiserror::Error;

/// Errors raised by a provider.
///
/// The facade propagates these to its callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider has no cipher registered under this identifier.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The input could not be transformed (bad padding, bad encoding, wrong length).
    #[error("invalid cipher input: {0}")]
    InvalidInput(&'static str),

    /// An authentication tag did not verify.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The secure random source failed.
    #[error("random source failure: {0}")]
    Random(String),
}

/// A symmetric cipher registry plus secure random source.
#[cfg_attr(test, mockall::automock)]
pub trait CryptoProvider: Send + Sync {
    /// Encrypt `data` with the cipher registered as `algorithm`.
    ///
    /// With [`CipherOptions::RawData`] the result is raw ciphertext; otherwise
    /// it is base64 text.
    fn encrypt(
        &self,
        algorithm: &str,
        data: &[u8],
        key: &[u8],
        iv: &[u8],
        options: CipherOptions,
    ) -> Result<Vec<u8>, ProviderError>;

    /// Inverse of [`CryptoProvider::encrypt`] for the same arguments.
    fn decrypt(
        &self,
        algorithm: &str,
        data: &[u8],
        key: &[u8],
        iv: &[u8],
        options: CipherOptions,
    ) -> Result<Vec<u8>, ProviderError>;

    /// IV length in bytes required by `algorithm`.
    fn iv_length(&self, algorithm: &str) -> Result<usize, ProviderError>;

    /// `len` cryptographically secure random bytes.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, ProviderError>;
}
