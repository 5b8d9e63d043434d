//! Cipher vocabularies, validation errors, and protocol types shared across `aes-facade` crates.

pub mod error;
pub mod params;
pub mod protocol;

pub use error::ValidationError;
pub use params::{AlgorithmId, CipherMode, CipherOptions, CipherParams, KeySize};
