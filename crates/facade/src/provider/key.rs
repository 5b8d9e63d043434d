//! [`KeyMaterial`]: the provider's working copy of a caller key.

/// Key bytes normalised to the exact length a cipher expects.
///
/// Shorter keys are right-padded with NUL bytes and longer keys are
/// truncated, matching what general-purpose crypto libraries do with
/// passphrase-style keys. The buffer is overwritten with zeroes on drop.
pub(crate) struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub(crate) fn normalise(key: &[u8], len: usize) -> Self {
        let mut buf = vec![0u8; len];
        let n = key.len().min(len);
        buf[..n].copy_from_slice(&key[..n]);
        Self(buf)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("KeyMaterial([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_key_is_nul_padded() {
        let k = KeyMaterial::normalise(b"abc", 8);
        assert_eq!(k.as_bytes(), b"abc\0\0\0\0\0");
    }

    #[test]
    fn long_key_is_truncated() {
        let k = KeyMaterial::normalise(&[7u8; 40], 32);
        assert_eq!(k.as_bytes(), &[7u8; 32][..]);
    }

    #[test]
    fn exact_key_is_unchanged() {
        let key = [0x42u8; 16];
        let k = KeyMaterial::normalise(&key, 16);
        assert_eq!(k.as_bytes(), &key[..]);
    }

    #[test]
    fn redacted_in_debug() {
        let k = KeyMaterial::normalise(b"secret", 16);
        let s = format!("{k:?}");
        assert!(s.contains("REDACTED"));
        assert!(!s.contains("secret"));
    }
}
