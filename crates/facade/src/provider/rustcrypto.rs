//! [`RustCryptoProvider`]: AES in every supported mode via the RustCrypto crates.
//!
//! # Output format
//!
//! ```text
//! RawData:              ciphertext[ || tag]
//! None / ZeroPadding:   base64(ciphertext[ || tag])
//! ```
//!
//! The tag is present only for the CBC-HMAC modes, which encrypt-then-MAC:
//! `HMAC(mac_key, iv || ciphertext)` is appended to the CBC ciphertext and
//! verified in constant time before any decryption happens. `mac_key` is
//! `HMAC-SHA256(key, "aes-facade cbc-hmac mac key")`.
//!
//! This tag format belongs to this crate. It does not interoperate with
//! OpenSSL's stitched `AES-*-CBC-HMAC-SHA*` ciphers, which emit plain CBC
//! output when used outside TLS record processing.

use aes::cipher::{
    AsyncStreamCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, StreamCipher,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::block_padding::{Pkcs7, ZeroPadding};
use common::{AlgorithmId, CipherMode, CipherOptions, KeySize};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha1::Sha1;
use sha2::Sha256;
use tracing::trace;
use xts_mode::Xts128;

use super::{cfb1, key::KeyMaterial, CryptoProvider, ProviderError};

/// AES block length, and the IV length of every supported mode.
pub const BLOCK_LEN: usize = 16;

/// Run `$body` with `$cipher` bound to the AES type for `$key_size`.
macro_rules! with_aes {
    ($key_size:expr, $cipher:ident => $body:expr) => {
        match $key_size {
            KeySize::Aes128 => {
                type $cipher = aes::Aes128;
                $body
            }
            KeySize::Aes192 => {
                type $cipher = aes::Aes192;
                $body
            }
            KeySize::Aes256 => {
                type $cipher = aes::Aes256;
                $body
            }
        }
    };
}

/// The default provider. Stateless and zero-sized.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CryptoProvider for RustCryptoProvider {
    fn encrypt(
        &self,
        algorithm: &str,
        data: &[u8],
        key: &[u8],
        iv: &[u8],
        options: CipherOptions,
    ) -> Result<Vec<u8>, ProviderError> {
        let id = lookup(algorithm)?;
        check_iv(iv)?;
        let key = KeyMaterial::normalise(key, key_length(id));
        trace!(algorithm, len = data.len(), "provider encrypt");

        let raw = seal(id, key.as_bytes(), iv, data, options)?;
        Ok(if options.is_raw() {
            raw
        } else {
            STANDARD.encode(raw).into_bytes()
        })
    }

    fn decrypt(
        &self,
        algorithm: &str,
        data: &[u8],
        key: &[u8],
        iv: &[u8],
        options: CipherOptions,
    ) -> Result<Vec<u8>, ProviderError> {
        let id = lookup(algorithm)?;
        check_iv(iv)?;
        let key = KeyMaterial::normalise(key, key_length(id));
        trace!(algorithm, len = data.len(), "provider decrypt");

        if options.is_raw() {
            open(id, key.as_bytes(), iv, data, options)
        } else {
            let raw = STANDARD
                .decode(data)
                .map_err(|_| ProviderError::InvalidInput("ciphertext is not valid base64"))?;
            open(id, key.as_bytes(), iv, &raw, options)
        }
    }

    fn iv_length(&self, algorithm: &str) -> Result<usize, ProviderError> {
        lookup(algorithm).map(|_| BLOCK_LEN)
    }

    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, ProviderError> {
        let mut buf = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| ProviderError::Random(e.to_string()))?;
        Ok(buf)
    }
}

fn lookup(algorithm: &str) -> Result<AlgorithmId, ProviderError> {
    algorithm
        .parse()
        .map_err(|_| ProviderError::UnsupportedAlgorithm(algorithm.to_owned()))
}

fn check_iv(iv: &[u8]) -> Result<(), ProviderError> {
    if iv.len() != BLOCK_LEN {
        return Err(ProviderError::InvalidInput("IV must be one block long"));
    }
    Ok(())
}

/// Cipher key length in bytes. XTS takes two keys of the nominal size.
fn key_length(id: AlgorithmId) -> usize {
    match id.mode() {
        CipherMode::Xts => id.key_size().bytes() * 2,
        _ => id.key_size().bytes(),
    }
}

fn key_iv_error<E>(_: E) -> ProviderError {
    ProviderError::InvalidInput("key or IV has the wrong length")
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

fn seal(
    id: AlgorithmId,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
    options: CipherOptions,
) -> Result<Vec<u8>, ProviderError> {
    let zero_padding = options == CipherOptions::ZeroPadding;
    match id.mode() {
        CipherMode::Cbc => cbc_encrypt(id.key_size(), key, iv, data, zero_padding),
        CipherMode::CbcHmacSha1 => {
            let mut out = cbc_encrypt(id.key_size(), key, iv, data, zero_padding)?;
            let tag_key = mac_key(key)?;
            let tag = hmac_sha1(tag_key.as_bytes(), iv, &out)?;
            out.extend_from_slice(&tag);
            Ok(out)
        }
        CipherMode::CbcHmacSha256 => {
            let mut out = cbc_encrypt(id.key_size(), key, iv, data, zero_padding)?;
            let tag_key = mac_key(key)?;
            let tag = hmac_sha256(tag_key.as_bytes(), iv, &out)?;
            out.extend_from_slice(&tag);
            Ok(out)
        }
        CipherMode::Xts => xts(id.key_size(), key, iv, data, false),
        _ => stream(id, key, iv, data, false),
    }
}

fn open(
    id: AlgorithmId,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
    options: CipherOptions,
) -> Result<Vec<u8>, ProviderError> {
    let zero_padding = options == CipherOptions::ZeroPadding;
    match id.mode() {
        CipherMode::Cbc => cbc_decrypt(id.key_size(), key, iv, data, zero_padding),
        CipherMode::CbcHmacSha1 => {
            let tag_key = mac_key(key)?;
            let ciphertext = verify_tag::<Hmac<Sha1>>(tag_key.as_bytes(), iv, data, 20)?;
            cbc_decrypt(id.key_size(), key, iv, ciphertext, zero_padding)
        }
        CipherMode::CbcHmacSha256 => {
            let tag_key = mac_key(key)?;
            let ciphertext = verify_tag::<Hmac<Sha256>>(tag_key.as_bytes(), iv, data, 32)?;
            cbc_decrypt(id.key_size(), key, iv, ciphertext, zero_padding)
        }
        CipherMode::Xts => xts(id.key_size(), key, iv, data, true),
        _ => stream(id, key, iv, data, true),
    }
}

// ---------------------------------------------------------------------------
// CBC
// ---------------------------------------------------------------------------

fn cbc_encrypt(
    key_size: KeySize,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
    zero_padding: bool,
) -> Result<Vec<u8>, ProviderError> {
    with_aes!(key_size, C => {
        let enc = cbc::Encryptor::<C>::new_from_slices(key, iv).map_err(key_iv_error)?;
        Ok(if zero_padding {
            enc.encrypt_padded_vec_mut::<ZeroPadding>(data)
        } else {
            enc.encrypt_padded_vec_mut::<Pkcs7>(data)
        })
    })
}

fn cbc_decrypt(
    key_size: KeySize,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
    zero_padding: bool,
) -> Result<Vec<u8>, ProviderError> {
    if data.len() % BLOCK_LEN != 0 {
        return Err(ProviderError::InvalidInput(
            "ciphertext is not a whole number of blocks",
        ));
    }
    with_aes!(key_size, C => {
        let dec = cbc::Decryptor::<C>::new_from_slices(key, iv).map_err(key_iv_error)?;
        let out = if zero_padding {
            dec.decrypt_padded_vec_mut::<ZeroPadding>(data)
        } else {
            dec.decrypt_padded_vec_mut::<Pkcs7>(data)
        };
        out.map_err(|_| ProviderError::InvalidInput("bad padding"))
    })
}

// ---------------------------------------------------------------------------
// HMAC tags
// ---------------------------------------------------------------------------

/// Label mixed into the cipher key to derive the MAC key.
const MAC_KEY_LABEL: &[u8] = b"aes-facade cbc-hmac mac key";

/// `HMAC-SHA256(cipher key, MAC_KEY_LABEL)`, so the cipher and MAC keys differ.
fn mac_key(key: &[u8]) -> Result<KeyMaterial, ProviderError> {
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key).map_err(key_iv_error)?;
    mac.update(MAC_KEY_LABEL);
    let derived = mac.finalize().into_bytes();
    Ok(KeyMaterial::normalise(&derived, derived.len()))
}

fn hmac_sha1(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(key).map_err(key_iv_error)?;
    mac.update(iv);
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn hmac_sha256(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key).map_err(key_iv_error)?;
    mac.update(iv);
    mac.update(ciphertext);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Split `tag_len` trailing bytes off `data`, verify them, and return the ciphertext.
fn verify_tag<'a, M: Mac + KeyInit>(
    key: &[u8],
    iv: &[u8],
    data: &'a [u8],
    tag_len: usize,
) -> Result<&'a [u8], ProviderError> {
    if data.len() < tag_len {
        return Err(ProviderError::AuthenticationFailed);
    }
    let (ciphertext, tag) = data.split_at(data.len() - tag_len);
    let mut mac = <M as Mac>::new_from_slice(key).map_err(key_iv_error)?;
    mac.update(iv);
    mac.update(ciphertext);
    mac.verify_slice(tag)
        .map_err(|_| ProviderError::AuthenticationFailed)?;
    Ok(ciphertext)
}

// ---------------------------------------------------------------------------
// XTS
// ---------------------------------------------------------------------------

fn xts(
    key_size: KeySize,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
    decrypt: bool,
) -> Result<Vec<u8>, ProviderError> {
    if data.len() < BLOCK_LEN {
        return Err(ProviderError::InvalidInput(
            "XTS input must be at least one block",
        ));
    }
    let tweak: [u8; BLOCK_LEN] = iv.try_into().map_err(key_iv_error)?;
    let (k1, k2) = key.split_at(key.len() / 2);
    let mut buf = data.to_vec();
    with_aes!(key_size, C => {
        let xts = Xts128::<C>::new(
            C::new_from_slice(k1).map_err(key_iv_error)?,
            C::new_from_slice(k2).map_err(key_iv_error)?,
        );
        if decrypt {
            xts.decrypt_sector(&mut buf, tweak);
        } else {
            xts.encrypt_sector(&mut buf, tweak);
        }
    });
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Stream modes: CFB, CFB1, CFB8, CTR, OFB
// ---------------------------------------------------------------------------

fn stream(
    id: AlgorithmId,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
    decrypt: bool,
) -> Result<Vec<u8>, ProviderError> {
    let mut buf = data.to_vec();
    with_aes!(id.key_size(), C => match id.mode() {
        CipherMode::Ctr => ctr::Ctr128BE::<C>::new_from_slices(key, iv)
            .map_err(key_iv_error)?
            .apply_keystream(&mut buf),
        CipherMode::Ofb => ofb::Ofb::<C>::new_from_slices(key, iv)
            .map_err(key_iv_error)?
            .apply_keystream(&mut buf),
        CipherMode::Cfb if decrypt => cfb_mode::Decryptor::<C>::new_from_slices(key, iv)
            .map_err(key_iv_error)?
            .decrypt(&mut buf),
        CipherMode::Cfb => cfb_mode::Encryptor::<C>::new_from_slices(key, iv)
            .map_err(key_iv_error)?
            .encrypt(&mut buf),
        CipherMode::Cfb8 if decrypt => cfb8::Decryptor::<C>::new_from_slices(key, iv)
            .map_err(key_iv_error)?
            .decrypt(&mut buf),
        CipherMode::Cfb8 => cfb8::Encryptor::<C>::new_from_slices(key, iv)
            .map_err(key_iv_error)?
            .encrypt(&mut buf),
        CipherMode::Cfb1 => {
            let cipher = C::new_from_slice(key).map_err(key_iv_error)?;
            cfb1::apply(&cipher, iv, &mut buf, decrypt);
        }
        other => return Err(ProviderError::UnsupportedAlgorithm(other.to_string())),
    });
    Ok(buf)
}
