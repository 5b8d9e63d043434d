//! Response types emitted by the `aesctl` binary.
//!
//! Every invocation prints exactly one of these as a JSON object on stdout.
//! Binary material is always hex-encoded.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cipher operations
// ---------------------------------------------------------------------------

/// Output of `aesctl encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Algorithm identifier used, e.g. `"AES-256-CBC"`.
    pub algorithm: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

/// Output of `aesctl decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub algorithm: String,
    /// Recovered plaintext, lossily decoded as UTF-8.
    pub plaintext: String,
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Output of `aesctl keygen`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResponse {
    /// Hex-encoded random key.
    pub key: String,
    /// Key length in raw bytes.
    pub length: usize,
}

/// Output of `aesctl ivgen`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IvResponse {
    pub algorithm: String,
    /// Hex-encoded random IV.
    pub iv: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Printed instead of a success response when an operation fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"invalid_parameters"`).
    pub code: String,
    /// Human-readable description. Never contains key material.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
