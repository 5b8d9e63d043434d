//! Thin AES encryption facade.
//!
//! [`Aes`] validates key, IV, key size, mode, and option flags, builds the
//! `AES-<keysize>-<mode>` algorithm identifier, and hands the actual cipher
//! work to a [`CryptoProvider`]. Ciphertext, keys, and IVs leave the facade
//! hex-encoded.
//!
//! ```no_run
//! use aes_facade::{Aes, CipherMode, CipherOptions, CipherParams, KeySize};
//!
//! # fn main() -> Result<(), aes_facade::AesError> {
//! let aes = Aes::new();
//! let key = hex::decode(aes.generate_default_key()?).unwrap();
//! let iv = hex::decode(aes.generate_iv(KeySize::Aes256, CipherMode::Cbc)?).unwrap();
//!
//! let params = CipherParams::new(KeySize::Aes256, CipherMode::Cbc, CipherOptions::None);
//! let ciphertext = aes.encrypt(b"hello", &key, &iv, &params)?;
//! assert_eq!(aes.decrypt(&ciphertext, &key, &iv, &params)?, b"hello");
//! # Ok(())
//! # }
//! ```
//!
//! # Logging invariants
//!
//! Keys, IVs, and plaintext never appear in any log field. Only the algorithm
//! identifier, option bits, and failure reasons are recorded.

pub mod cipher;
pub mod error;
pub mod provider;
pub mod validate;

pub use cipher::{Aes, DEFAULT_KEY_LEN, MAX_KEY_LEN};
pub use common::{AlgorithmId, CipherMode, CipherOptions, CipherParams, KeySize, ValidationError};
pub use error::AesError;
pub use provider::{CryptoProvider, ProviderError, RustCryptoProvider};
pub use validate::build_identifier;
