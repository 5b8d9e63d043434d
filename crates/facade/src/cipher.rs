//! [`Aes`]: hex-in/hex-out AES encryption and decryption.
//!
//! All binary output crossing this boundary is lowercase hex. Keys and IVs
//! go in as raw bytes; [`Aes::generate_key`] and [`Aes::generate_iv`] return
//! hex, so decode them before passing them back in.

use common::{AlgorithmId, CipherMode, CipherParams, KeySize, ValidationError};
use tracing::{debug, warn};

use crate::error::AesError;
use crate::provider::{CryptoProvider, RustCryptoProvider};
use crate::validate::{reject, validate};

/// Length in bytes of keys from [`Aes::generate_default_key`].
pub const DEFAULT_KEY_LEN: usize = 32;

/// Largest key length [`Aes::generate_key`] accepts, in bytes.
pub const MAX_KEY_LEN: usize = 1024;

/// Stateless AES facade over a [`CryptoProvider`].
///
/// Every method takes `&self` and holds no state between calls, so one
/// instance can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Aes<P = RustCryptoProvider> {
    provider: P,
}

impl Aes {
    /// A facade backed by [`RustCryptoProvider`].
    pub fn new() -> Self {
        Self::with_provider(RustCryptoProvider)
    }
}

impl<P: CryptoProvider> Aes<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Encrypt `data` and return the provider output hex-encoded.
    ///
    /// # Errors
    ///
    /// [`AesError::InvalidParameters`] if validation fails (the provider is
    /// not asked to encrypt); [`AesError::Provider`] if the provider fails.
    pub fn encrypt(
        &self,
        data: &[u8],
        key: &[u8],
        iv: &[u8],
        params: &CipherParams,
    ) -> Result<String, AesError> {
        let id = validate(&self.provider, key, iv, params)?;
        debug!(algorithm = %id, options = params.options.bits(), "encrypt");

        let out = self
            .provider
            .encrypt(&id.to_string(), data, key, iv, params.options)
            .map_err(|e| {
                warn!(algorithm = %id, error = %e, "encryption failed");
                e
            })?;
        Ok(hex::encode(out))
    }

    /// Decrypt hex-encoded `hex_data`.
    ///
    /// Leading and trailing whitespace and NUL bytes are trimmed from the
    /// plaintext; this is what removes zero padding.
    ///
    /// # Errors
    ///
    /// [`AesError::InvalidParameters`] for malformed hex or a failed
    /// validation rule; [`AesError::Provider`] for bad padding or a tag
    /// mismatch.
    pub fn decrypt(
        &self,
        hex_data: &str,
        key: &[u8],
        iv: &[u8],
        params: &CipherParams,
    ) -> Result<Vec<u8>, AesError> {
        let data = hex::decode(hex_data.trim()).map_err(|_| reject(ValidationError::MalformedHex))?;
        let id = validate(&self.provider, key, iv, params)?;
        debug!(algorithm = %id, options = params.options.bits(), "decrypt");

        let out = self
            .provider
            .decrypt(&id.to_string(), &data, key, iv, params.options)
            .map_err(|e| {
                warn!(algorithm = %id, error = %e, "decryption failed");
                e
            })?;
        Ok(trim_incidental(out))
    }

    /// `length_bytes` random bytes from the provider, hex-encoded.
    ///
    /// # Errors
    ///
    /// [`AesError::InvalidParameters`] if `length_bytes` is zero or above
    /// [`MAX_KEY_LEN`].
    pub fn generate_key(&self, length_bytes: usize) -> Result<String, AesError> {
        if length_bytes == 0 || length_bytes > MAX_KEY_LEN {
            return Err(reject(ValidationError::KeyLength));
        }
        Ok(hex::encode(self.provider.random_bytes(length_bytes)?))
    }

    /// A [`DEFAULT_KEY_LEN`]-byte random key, hex-encoded.
    pub fn generate_default_key(&self) -> Result<String, AesError> {
        self.generate_key(DEFAULT_KEY_LEN)
    }

    /// A random IV of the length the provider requires for this key size
    /// and mode, hex-encoded.
    ///
    /// # Errors
    ///
    /// [`AesError::InvalidParameters`] if the mode does not support the key size.
    pub fn generate_iv(&self, key_size: KeySize, mode: CipherMode) -> Result<String, AesError> {
        let id = AlgorithmId::new(key_size, mode).map_err(reject)?;
        let len = self.provider.iv_length(&id.to_string())?;
        Ok(hex::encode(self.provider.random_bytes(len)?))
    }

    /// Validate typed parameters without running a cipher.
    pub fn validate(
        &self,
        key: &[u8],
        iv: &[u8],
        params: &CipherParams,
    ) -> Result<AlgorithmId, AesError> {
        validate(&self.provider, key, iv, params)
    }

    /// Validate loosely typed parameters (`256`, `"CBC"`, `0`) without
    /// running a cipher.
    pub fn validate_params(
        &self,
        key: &[u8],
        iv: &[u8],
        key_size: u32,
        mode: &str,
        options: u32,
    ) -> Result<AlgorithmId, AesError> {
        let params = CipherParams::parse(key_size, mode, options).map_err(reject)?;
        self.validate(key, iv, &params)
    }
}

/// Strip ASCII whitespace, vertical tab, and NUL from both ends.
fn trim_incidental(mut data: Vec<u8>) -> Vec<u8> {
    let incidental = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\0' | 0x0B);
    let end = data.iter().rposition(|b| !incidental(b)).map_or(0, |i| i + 1);
    data.truncate(end);
    let start = data.iter().position(|b| !incidental(b)).unwrap_or(data.len());
    data.drain(..start);
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockCryptoProvider, ProviderError};
    use common::CipherOptions;
    use std::sync::Arc;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";
    const IV: &[u8] = b"fedcba9876543210";

    fn every_valid_params() -> Vec<CipherParams> {
        let mut out = Vec::new();
        for key_size in KeySize::ALL {
            for mode in CipherMode::ALL {
                if !mode.supports(key_size) {
                    continue;
                }
                for options in [
                    CipherOptions::None,
                    CipherOptions::RawData,
                    CipherOptions::ZeroPadding,
                ] {
                    out.push(CipherParams::new(key_size, mode, options));
                }
            }
        }
        out
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let aes = Aes::new();
        let plaintext = b"123-45-6789 belongs to Alice";
        for params in every_valid_params() {
            let ct = aes.encrypt(plaintext, KEY, IV, &params).unwrap();
            let pt = aes.decrypt(&ct, KEY, IV, &params).unwrap();
            assert_eq!(pt, plaintext, "{params:?}");
        }
    }

    #[test]
    fn ciphertext_is_lowercase_hex() {
        let ct = Aes::new()
            .encrypt(b"hello", KEY, IV, &CipherParams::default())
            .unwrap();
        assert!(ct.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert_eq!(ct.len() % 2, 0);
    }

    #[test]
    fn fixed_iv_is_deterministic_and_iv_matters() {
        let aes = Aes::new();
        let other_iv = b"0000000000000000";
        for params in every_valid_params() {
            let a = aes.encrypt(b"same plaintext, same key", KEY, IV, &params).unwrap();
            let b = aes.encrypt(b"same plaintext, same key", KEY, IV, &params).unwrap();
            let c = aes
                .encrypt(b"same plaintext, same key", KEY, other_iv, &params)
                .unwrap();
            assert_eq!(a, b, "{params:?}");
            assert_ne!(a, c, "{params:?}");
        }
    }

    #[test]
    fn decrypt_trims_incidental_whitespace() {
        let aes = Aes::new();
        let params = CipherParams::new(KeySize::Aes128, CipherMode::Ctr, CipherOptions::RawData);
        let ct = aes.encrypt(b"  padded\0\0\n", KEY, IV, &params).unwrap();
        assert_eq!(aes.decrypt(&ct, KEY, IV, &params).unwrap(), b"padded");
    }

    #[test]
    fn decrypt_rejects_malformed_hex() {
        let err = Aes::new()
            .decrypt("not hex", KEY, IV, &CipherParams::default())
            .unwrap_err();
        assert_eq!(err.reason(), Some(&ValidationError::MalformedHex));
    }

    #[test]
    fn decrypt_with_wrong_key_fails_or_differs() {
        let aes = Aes::new();
        let params = CipherParams::new(
            KeySize::Aes256,
            CipherMode::CbcHmacSha256,
            CipherOptions::None,
        );
        let ct = aes.encrypt(b"secret", KEY, IV, &params).unwrap();
        let err = aes
            .decrypt(&ct, b"another key entirely, 32 bytes!!", IV, &params)
            .unwrap_err();
        assert!(matches!(
            err,
            AesError::Provider(ProviderError::AuthenticationFailed)
        ));
    }

    #[test]
    fn validate_params_rejects_bad_input() {
        let aes = Aes::new();
        let reason = |r: Result<AlgorithmId, AesError>| r.unwrap_err().reason().cloned().unwrap();

        assert_eq!(
            reason(aes.validate_params(b"", IV, 256, "CBC", 0)),
            ValidationError::EmptyKey
        );
        assert!(matches!(
            reason(aes.validate_params(KEY, b"short", 256, "CBC", 0)),
            ValidationError::IvLength { .. }
        ));
        assert!(matches!(
            reason(aes.validate_params(KEY, IV, 192, "XTS", 0)),
            ValidationError::ModeKeySize { .. }
        ));
        assert!(matches!(
            reason(aes.validate_params(KEY, IV, 256, "BOGUS", 0)),
            ValidationError::Mode(_)
        ));
        assert_eq!(
            reason(aes.validate_params(KEY, IV, 100, "CBC", 0)),
            ValidationError::KeySize(100)
        );
        assert_eq!(
            reason(aes.validate_params(KEY, IV, 256, "CBC", 3)),
            ValidationError::Options(3)
        );
        assert_eq!(
            aes.validate_params(KEY, IV, 256, "CBC", 0).unwrap().to_string(),
            "AES-256-CBC"
        );
    }

    #[test]
    fn generate_key_length_and_charset() {
        let aes = Aes::new();
        for n in [1, 16, 32, 64] {
            let key = aes.generate_key(n).unwrap();
            assert_eq!(key.len(), 2 * n);
            assert!(key.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        }
        assert_eq!(aes.generate_default_key().unwrap().len(), 64);
        assert!(aes.generate_key(0).is_err());
        assert_eq!(aes.generate_key(MAX_KEY_LEN).unwrap().len(), 2 * MAX_KEY_LEN);
    }

    #[test]
    fn generate_iv_is_one_block() {
        let aes = Aes::new();
        let iv = aes.generate_iv(KeySize::Aes256, CipherMode::Cbc).unwrap();
        assert_eq!(iv.len(), 32);
        assert_eq!(hex::decode(&iv).unwrap().len(), 16);
        assert!(aes.generate_iv(KeySize::Aes192, CipherMode::Xts).is_err());
    }

    #[test]
    fn generated_material_works_end_to_end() {
        let aes = Aes::new();
        let key = hex::decode(aes.generate_default_key().unwrap()).unwrap();
        let iv = hex::decode(aes.generate_iv(KeySize::Aes256, CipherMode::Ofb).unwrap()).unwrap();
        let params = CipherParams::new(KeySize::Aes256, CipherMode::Ofb, CipherOptions::None);
        let ct = aes.encrypt(b"payload", &key, &iv, &params).unwrap();
        assert_eq!(aes.decrypt(&ct, &key, &iv, &params).unwrap(), b"payload");
    }

    #[test]
    fn shared_across_threads() {
        let aes = Arc::new(Aes::new());
        std::thread::scope(|s| {
            for i in 0..4u8 {
                let aes = Arc::clone(&aes);
                s.spawn(move || {
                    let plaintext = vec![b'a' + i; 40];
                    let params = CipherParams::default();
                    let ct = aes.encrypt(&plaintext, KEY, IV, &params).unwrap();
                    assert_eq!(aes.decrypt(&ct, KEY, IV, &params).unwrap(), plaintext);
                });
            }
        });
    }

    // -----------------------------------------------------------------------
    // Provider delegation
    // -----------------------------------------------------------------------

    #[test]
    fn invalid_parameters_never_reach_provider_transform() {
        let mut provider = MockCryptoProvider::new();
        provider.expect_iv_length().returning(|_| Ok(16));
        provider.expect_encrypt().never();
        provider.expect_decrypt().never();
        let aes = Aes::with_provider(provider);

        assert!(aes.encrypt(b"x", b"", IV, &CipherParams::default()).is_err());
        assert!(aes.encrypt(b"x", KEY, b"tiny", &CipherParams::default()).is_err());
        assert!(aes.decrypt("00", KEY, b"", &CipherParams::default()).is_err());
        assert!(aes.decrypt("zz", KEY, IV, &CipherParams::default()).is_err());
    }

    #[test]
    fn oversized_key_length_never_reaches_provider() {
        let mut provider = MockCryptoProvider::new();
        provider.expect_random_bytes().never();
        let aes = Aes::with_provider(provider);

        for n in [MAX_KEY_LEN + 1, usize::MAX] {
            let err = aes.generate_key(n).unwrap_err();
            assert!(matches!(
                err,
                AesError::InvalidParameters(ValidationError::KeyLength)
            ));
        }
    }

    #[test]
    fn provider_receives_identifier_and_output_is_hex() {
        let mut provider = MockCryptoProvider::new();
        provider.expect_iv_length().returning(|_| Ok(16));
        provider
            .expect_encrypt()
            .withf(|alg, _, _, _, options| {
                alg.to_string() == "AES-128-CFB8" && *options == CipherOptions::RawData
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(vec![0xde, 0xad, 0xbe, 0xef]));
        let aes = Aes::with_provider(provider);

        let params = CipherParams::new(KeySize::Aes128, CipherMode::Cfb8, CipherOptions::RawData);
        assert_eq!(aes.encrypt(b"x", KEY, IV, &params).unwrap(), "deadbeef");
    }

    #[test]
    fn provider_errors_propagate_unchanged() {
        let mut provider = MockCryptoProvider::new();
        provider.expect_iv_length().returning(|_| Ok(16));
        provider
            .expect_decrypt()
            .returning(|_, _, _, _, _| Err(ProviderError::AuthenticationFailed));
        let aes = Aes::with_provider(provider);

        let err = aes
            .decrypt("00112233", KEY, IV, &CipherParams::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AesError::Provider(ProviderError::AuthenticationFailed)
        ));
    }

    #[test]
    fn iv_length_comes_from_provider() {
        let mut provider = MockCryptoProvider::new();
        provider.expect_iv_length().returning(|_| Ok(12));
        provider
            .expect_encrypt()
            .times(1)
            .returning(|_, data, _, _, _| Ok(data.to_vec()));
        let aes = Aes::with_provider(provider);

        let err = aes
            .encrypt(b"x", KEY, IV, &CipherParams::default())
            .unwrap_err();
        assert_eq!(
            err.reason(),
            Some(&ValidationError::IvLength {
                expected: 12,
                actual: 16
            })
        );
        assert!(aes
            .encrypt(b"x", KEY, b"twelve bytes", &CipherParams::default())
            .is_ok());
    }

    #[test]
    fn generate_iv_uses_provider_length() {
        let mut provider = MockCryptoProvider::new();
        provider
            .expect_iv_length()
            .withf(|alg| alg.to_string() == "AES-256-XTS")
            .returning(|_| Ok(8));
        provider
            .expect_random_bytes()
            .withf(|len| *len == 8)
            .returning(|len| Ok(vec![0xab; len]));
        let aes = Aes::with_provider(provider);

        assert_eq!(
            aes.generate_iv(KeySize::Aes256, CipherMode::Xts).unwrap(),
            "abababababababab"
        );
    }

    #[test]
    fn trim_incidental_both_ends() {
        assert_eq!(trim_incidental(b"\0 \tabc \x0b\0".to_vec()), b"abc");
        assert_eq!(trim_incidental(b" \0 ".to_vec()), b"");
        assert_eq!(trim_incidental(b"a b".to_vec()), b"a b");
    }
}
