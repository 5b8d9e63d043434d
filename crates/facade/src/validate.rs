//! The single rule set every facade operation validates against.

use common::{AlgorithmId, CipherParams, KeySize, ValidationError};
use tracing::warn;

use crate::error::AesError;
use crate::provider::CryptoProvider;

/// Build the `AES-<keysize>-<mode>` identifier from loosely typed parts.
///
/// # Errors
///
/// Returns a [`ValidationError`] for an unknown key size or mode, or for a
/// mode that does not support the key size.
pub fn build_identifier(key_size: u32, mode: &str) -> Result<AlgorithmId, ValidationError> {
    AlgorithmId::new(KeySize::try_from(key_size)?, mode.parse()?)
}

/// Check `key`, `iv`, and `params`, returning the algorithm identifier.
///
/// Rules, first failure wins: key non-empty; IV non-empty; key size and mode
/// compatible; IV length equal to what the provider requires for the
/// algorithm. Key size, mode, and options are already closed enums here.
///
/// # Errors
///
/// [`AesError::InvalidParameters`] for a rule violation;
/// [`AesError::Provider`] if the provider does not know the algorithm.
pub(crate) fn validate<P: CryptoProvider + ?Sized>(
    provider: &P,
    key: &[u8],
    iv: &[u8],
    params: &CipherParams,
) -> Result<AlgorithmId, AesError> {
    let id = check(key, iv, params).map_err(reject)?;
    let expected = provider.iv_length(&id.to_string())?;
    if iv.len() != expected {
        return Err(reject(ValidationError::IvLength {
            expected,
            actual: iv.len(),
        }));
    }
    Ok(id)
}

fn check(key: &[u8], iv: &[u8], params: &CipherParams) -> Result<AlgorithmId, ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    if iv.is_empty() {
        return Err(ValidationError::EmptyIv);
    }
    params.algorithm()
}

pub(crate) fn reject(reason: ValidationError) -> AesError {
    warn!(reason = %reason, "rejected cipher parameters");
    AesError::InvalidParameters(reason)
}
