//! Closed vocabularies for AES requests: key sizes, modes, option flags, and
//! the `AES-<keysize>-<mode>` algorithm identifier built from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Option bit requesting raw binary output instead of base64 text.
pub const RAW_DATA: u32 = 1;

/// Option bit requesting zero padding instead of PKCS#7.
pub const ZERO_PADDING: u32 = 2;

// ---------------------------------------------------------------------------
// Key size
// ---------------------------------------------------------------------------

/// AES key size in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum KeySize {
    Aes128,
    Aes192,
    #[default]
    Aes256,
}

impl KeySize {
    /// All supported key sizes, smallest first.
    pub const ALL: [KeySize; 3] = [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256];

    /// Size in bits.
    pub fn bits(self) -> u32 {
        match self {
            KeySize::Aes128 => 128,
            KeySize::Aes192 => 192,
            KeySize::Aes256 => 256,
        }
    }

    /// Size in bytes.
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u32> for KeySize {
    type Error = ValidationError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            128 => Ok(KeySize::Aes128),
            192 => Ok(KeySize::Aes192),
            256 => Ok(KeySize::Aes256),
            other => Err(ValidationError::KeySize(other)),
        }
    }
}

impl From<KeySize> for u32 {
    fn from(size: KeySize) -> Self {
        size.bits()
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Block cipher mode of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CipherMode {
    #[default]
    #[serde(rename = "CBC")]
    Cbc,
    #[serde(rename = "CBC-HMAC-SHA1")]
    CbcHmacSha1,
    #[serde(rename = "CBC-HMAC-SHA256")]
    CbcHmacSha256,
    #[serde(rename = "CFB")]
    Cfb,
    #[serde(rename = "CFB1")]
    Cfb1,
    #[serde(rename = "CFB8")]
    Cfb8,
    #[serde(rename = "CTR")]
    Ctr,
    #[serde(rename = "OFB")]
    Ofb,
    #[serde(rename = "XTS")]
    Xts,
}

impl CipherMode {
    pub const ALL: [CipherMode; 9] = [
        CipherMode::Cbc,
        CipherMode::CbcHmacSha1,
        CipherMode::CbcHmacSha256,
        CipherMode::Cfb,
        CipherMode::Cfb1,
        CipherMode::Cfb8,
        CipherMode::Ctr,
        CipherMode::Ofb,
        CipherMode::Xts,
    ];

    /// Canonical upper-case name, as used in algorithm identifiers.
    pub fn as_str(self) -> &'static str {
        match self {
            CipherMode::Cbc => "CBC",
            CipherMode::CbcHmacSha1 => "CBC-HMAC-SHA1",
            CipherMode::CbcHmacSha256 => "CBC-HMAC-SHA256",
            CipherMode::Cfb => "CFB",
            CipherMode::Cfb1 => "CFB1",
            CipherMode::Cfb8 => "CFB8",
            CipherMode::Ctr => "CTR",
            CipherMode::Ofb => "OFB",
            CipherMode::Xts => "XTS",
        }
    }

    /// Whether the mode pads plaintext to the block size.
    pub fn is_padded(self) -> bool {
        matches!(
            self,
            CipherMode::Cbc | CipherMode::CbcHmacSha1 | CipherMode::CbcHmacSha256
        )
    }

    /// Whether the mode can be combined with `key_size`.
    ///
    /// The stitched CBC-HMAC modes and XTS exist only for 128- and 256-bit keys.
    pub fn supports(self, key_size: KeySize) -> bool {
        !(key_size == KeySize::Aes192
            && matches!(
                self,
                CipherMode::CbcHmacSha1 | CipherMode::CbcHmacSha256 | CipherMode::Xts
            ))
    }
}

impl FromStr for CipherMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CipherMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ValidationError::Mode(s.to_owned()))
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Output and padding behaviour.
///
/// Exactly one of the three settings applies; the two flags are never combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CipherOptions {
    /// PKCS#7 padding, base64 text.
    #[default]
    None,
    /// PKCS#7 padding, raw bytes.
    RawData,
    /// Zero padding, base64 text.
    ///
    /// The last block is filled with NUL bytes, so unaligned input is
    /// accepted. OpenSSL's `OPENSSL_ZERO_PADDING` only disables padding and
    /// rejects unaligned input instead.
    ZeroPadding,
}

impl CipherOptions {
    /// Parse the numeric flag form (`0`, [`RAW_DATA`], or [`ZERO_PADDING`]).
    pub fn from_bits(bits: u32) -> Result<Self, ValidationError> {
        match bits {
            0 => Ok(CipherOptions::None),
            RAW_DATA => Ok(CipherOptions::RawData),
            ZERO_PADDING => Ok(CipherOptions::ZeroPadding),
            other => Err(ValidationError::Options(other)),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            CipherOptions::None => 0,
            CipherOptions::RawData => RAW_DATA,
            CipherOptions::ZeroPadding => ZERO_PADDING,
        }
    }

    /// Whether provider output is raw bytes rather than base64 text.
    pub fn is_raw(self) -> bool {
        self == CipherOptions::RawData
    }
}

impl TryFrom<u32> for CipherOptions {
    type Error = ValidationError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        CipherOptions::from_bits(bits)
    }
}

impl From<CipherOptions> for u32 {
    fn from(options: CipherOptions) -> Self {
        options.bits()
    }
}

// ---------------------------------------------------------------------------
// Algorithm identifier
// ---------------------------------------------------------------------------

/// Prefix shared by every algorithm identifier.
pub const ALGORITHM_PREFIX: &str = "AES";

/// A validated `AES-<keysize>-<mode>` algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlgorithmId {
    key_size: KeySize,
    mode: CipherMode,
}

impl AlgorithmId {
    /// Combine a key size and mode, rejecting combinations the mode does not support.
    pub fn new(key_size: KeySize, mode: CipherMode) -> Result<Self, ValidationError> {
        if !mode.supports(key_size) {
            return Err(ValidationError::ModeKeySize {
                mode: mode.as_str().to_owned(),
                key_size: key_size.bits(),
            });
        }
        Ok(Self { key_size, mode })
    }

    pub fn key_size(&self) -> KeySize {
        self.key_size
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", ALGORITHM_PREFIX, self.key_size, self.mode)
    }
}

impl FromStr for AlgorithmId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::Algorithm(s.to_owned());
        let rest = s
            .strip_prefix(ALGORITHM_PREFIX)
            .and_then(|r| r.strip_prefix('-'))
            .ok_or_else(malformed)?;
        let (bits, mode) = rest.split_once('-').ok_or_else(malformed)?;
        let bits: u32 = bits.parse().map_err(|_| malformed())?;
        AlgorithmId::new(KeySize::try_from(bits)?, mode.parse()?)
    }
}

// ---------------------------------------------------------------------------
// Request parameters
// ---------------------------------------------------------------------------

/// Key size, mode, and options for one encrypt/decrypt call.
///
/// Defaults to 256-bit CBC with no option flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CipherParams {
    #[serde(default)]
    pub key_size: KeySize,
    #[serde(default)]
    pub mode: CipherMode,
    #[serde(default)]
    pub options: CipherOptions,
}

impl CipherParams {
    pub fn new(key_size: KeySize, mode: CipherMode, options: CipherOptions) -> Self {
        Self {
            key_size,
            mode,
            options,
        }
    }

    /// Parse loosely typed parameters, checking each value and the
    /// key-size/mode combination.
    pub fn parse(key_size: u32, mode: &str, options: u32) -> Result<Self, ValidationError> {
        let params = Self {
            key_size: KeySize::try_from(key_size)?,
            mode: mode.parse()?,
            options: CipherOptions::from_bits(options)?,
        };
        params.algorithm()?;
        Ok(params)
    }

    /// The algorithm identifier for this key size and mode.
    pub fn algorithm(&self) -> Result<AlgorithmId, ValidationError> {
        AlgorithmId::new(self.key_size, self.mode)
    }
}
