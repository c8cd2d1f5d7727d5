//! SHA-256 credential digests.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_LEN: usize = 64;

/// Lowercase hex SHA-256 of the UTF-8 bytes of `plaintext`.
pub fn digest(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// Returns `Some(digest)` unchanged when `plaintext` hashes to it, `None` otherwise.
pub fn verify(plaintext: &str, digest: &str) -> Option<String> {
    let computed = self::digest(plaintext);
    bool::from(computed.as_bytes().ct_eq(digest.as_bytes())).then(|| digest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_known_vector() {
        assert_eq!(
            digest("testpassword"),
            "9f735e0df9a1ddc702bf0a1a7b83033f9f7153a00c29de82cedadc9957289b05"
        );
    }

    #[test]
    fn digest_is_deterministic_and_fixed_length() {
        for input in ["a", "hunter2", &"x".repeat(10_000), "ünïcødé"] {
            let first = digest(input);
            assert_eq!(first, digest(input));
            assert_eq!(first.len(), DIGEST_LEN);
            assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn verify_returns_digest_on_match() {
        let hashed = digest("testpassword");
        assert_eq!(verify("testpassword", &hashed), Some(hashed.clone()));
    }

    #[test]
    fn verify_rejects_other_plaintext() {
        let hashed = digest("testpassword");
        assert_eq!(verify("wrongpassword", &hashed), None);
        assert_eq!(verify("testpassword", ""), None);
        assert_eq!(verify("testpassword", "not-a-digest"), None);
    }
}
