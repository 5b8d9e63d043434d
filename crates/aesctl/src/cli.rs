//! Command-line surface and command dispatch.

use aes_facade::{Aes, AesError, CipherParams, CryptoProvider};
use clap::{Args, Parser, Subcommand};
use common::protocol::{DecryptResponse, EncryptResponse, IvResponse, KeyResponse};
use serde::Serialize;

use crate::config::Config;

/// Encrypt, decrypt, and generate key material with AES.
///
/// Defaults for key size, mode, and options come from `AESCTL_*` environment
/// variables; the flags below override them.
#[derive(Debug, Parser)]
#[command(name = "aesctl", version)]
pub struct Cli {
    /// Key size in bits: 128, 192, or 256.
    #[arg(long, global = true)]
    pub key_size: Option<u32>,

    /// Mode: CBC, CBC-HMAC-SHA1, CBC-HMAC-SHA256, CFB, CFB1, CFB8, CTR, OFB, XTS.
    #[arg(long, global = true)]
    pub mode: Option<String>,

    /// Option bits: 0, 1 (raw data), or 2 (zero padding).
    #[arg(long, global = true)]
    pub options: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encrypt UTF-8 plaintext; prints hex ciphertext.
    Encrypt {
        #[command(flatten)]
        material: Material,
        plaintext: String,
    },
    /// Decrypt hex ciphertext; prints the plaintext.
    Decrypt {
        #[command(flatten)]
        material: Material,
        ciphertext: String,
    },
    /// Generate a random hex key.
    Keygen {
        /// Key length in bytes.
        #[arg(long)]
        length: Option<usize>,
    },
    /// Generate a random hex IV for the selected key size and mode.
    Ivgen,
}

/// Hex-encoded key and IV.
#[derive(Debug, Args)]
pub struct Material {
    #[arg(long, value_parser = parse_hex)]
    pub key: HexBytes,
    #[arg(long, value_parser = parse_hex)]
    pub iv: HexBytes,
}

/// Raw bytes parsed from a hex argument.
#[derive(Debug, Clone)]
pub struct HexBytes(pub Vec<u8>);

fn parse_hex(s: &str) -> Result<HexBytes, hex::FromHexError> {
    hex::decode(s).map(HexBytes)
}

/// One successful result, printed as a JSON object.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Encrypted(EncryptResponse),
    Decrypted(DecryptResponse),
    Key(KeyResponse),
    Iv(IvResponse),
}

/// Cipher parameters from `cfg`, overridden by the command-line flags.
pub fn resolve_params(cli: &Cli, cfg: &Config) -> Result<CipherParams, AesError> {
    Ok(cfg.params(cli.key_size, cli.mode.as_deref(), cli.options)?)
}

/// Execute `command` against `aes`.
pub fn run<P: CryptoProvider>(
    aes: &Aes<P>,
    command: &Command,
    params: &CipherParams,
    key_length: usize,
) -> Result<Outcome, AesError> {
    let algorithm = || params.algorithm().map(|id| id.to_string());
    match command {
        Command::Encrypt {
            material,
            plaintext,
        } => {
            let ciphertext =
                aes.encrypt(plaintext.as_bytes(), &material.key.0, &material.iv.0, params)?;
            Ok(Outcome::Encrypted(EncryptResponse {
                algorithm: algorithm()?,
                ciphertext,
            }))
        }
        Command::Decrypt {
            material,
            ciphertext,
        } => {
            let plaintext = aes.decrypt(ciphertext, &material.key.0, &material.iv.0, params)?;
            Ok(Outcome::Decrypted(DecryptResponse {
                algorithm: algorithm()?,
                plaintext: String::from_utf8_lossy(&plaintext).into_owned(),
            }))
        }
        Command::Keygen { length } => {
            let length = length.unwrap_or(key_length);
            Ok(Outcome::Key(KeyResponse {
                key: aes.generate_key(length)?,
                length,
            }))
        }
        Command::Ivgen => Ok(Outcome::Iv(IvResponse {
            algorithm: algorithm()?,
            iv: aes.generate_iv(params.key_size, params.mode)?,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const IV: &str = "0f0e0d0c0b0a09080706050403020100";

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from(["aesctl", "ivgen", "--mode", "CTR", "--key-size", "128"])
            .unwrap();
        assert_eq!(cli.mode.as_deref(), Some("CTR"));
        assert_eq!(cli.key_size, Some(128));
        assert!(matches!(cli.command, Command::Ivgen));
    }

    #[test]
    fn rejects_non_hex_key() {
        let res = Cli::try_parse_from(["aesctl", "encrypt", "--key", "xyz", "--iv", IV, "hi"]);
        assert!(res.is_err());
    }

    #[test]
    fn encrypt_then_decrypt() {
        let aes = Aes::new();
        let params = CipherParams::default();

        let cli = Cli::try_parse_from(["aesctl", "encrypt", "--key", KEY, "--iv", IV, "hello"])
            .unwrap();
        let Outcome::Encrypted(enc) = run(&aes, &cli.command, &params, 32).unwrap() else {
            panic!("expected encrypt outcome");
        };
        assert_eq!(enc.algorithm, "AES-256-CBC");

        let cli = Cli::try_parse_from([
            "aesctl",
            "decrypt",
            "--key",
            KEY,
            "--iv",
            IV,
            enc.ciphertext.as_str(),
        ])
        .unwrap();
        let Outcome::Decrypted(dec) = run(&aes, &cli.command, &params, 32).unwrap() else {
            panic!("expected decrypt outcome");
        };
        assert_eq!(dec.plaintext, "hello");
    }

    #[test]
    fn keygen_uses_configured_length() {
        let aes = Aes::new();
        let out = run(&aes, &Command::Keygen { length: None }, &CipherParams::default(), 24)
            .unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["length"], 24);
        assert_eq!(json["key"].as_str().unwrap().len(), 48);
    }

    #[test]
    fn short_iv_reports_invalid_parameters() {
        let aes = Aes::new();
        let cli = Cli::try_parse_from(["aesctl", "encrypt", "--key", KEY, "--iv", "0011", "hi"])
            .unwrap();
        let err = run(&aes, &cli.command, &CipherParams::default(), 32).unwrap_err();
        assert_eq!(err.code(), "invalid_parameters");
    }

    #[test]
    fn bad_mode_override_reports_invalid_parameters() {
        let cli = Cli::try_parse_from(["aesctl", "ivgen", "--mode", "BOGUS"]).unwrap();
        let err = resolve_params(&cli, &Config::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_parameters");

        let cli = Cli::try_parse_from(["aesctl", "ivgen", "--key-size", "100"]).unwrap();
        let err = resolve_params(&cli, &Config::default()).unwrap_err();
        assert_eq!(err.code(), "invalid_parameters");
    }

    #[test]
    fn keygen_rejects_oversized_length() {
        let aes = Aes::new();
        let command = Command::Keygen {
            length: Some(usize::MAX),
        };
        let err = run(&aes, &command, &CipherParams::default(), 32).unwrap_err();
        assert_eq!(err.code(), "invalid_parameters");
    }
}
