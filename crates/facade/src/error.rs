//! [`AesError`]: the facade's public error type.

use common::ValidationError;
use thiserror::Error;

use crate::provider::ProviderError;

/// Errors returned by [`crate::Aes`].
///
/// There are two kinds only. Which validation rule failed is kept as the
/// source of [`AesError::InvalidParameters`] rather than as separate variants.
#[derive(Debug, Error)]
pub enum AesError {
    /// A parameter failed validation; no cipher operation was attempted.
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] ValidationError),

    /// The crypto provider rejected the operation.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl AesError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AesError::InvalidParameters(_) => "invalid_parameters",
            AesError::Provider(_) => "crypto_failure",
        }
    }

    /// The validation rule that failed, if this is a parameter error.
    pub fn reason(&self) -> Option<&ValidationError> {
        match self {
            AesError::InvalidParameters(reason) => Some(reason),
            AesError::Provider(_) => None,
        }
    }
}
