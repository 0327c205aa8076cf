//! Opaque token generation and at-rest hashing.
//!
//! Invite, setup, reset, bootstrap, and portal session tokens all share the
//! same shape: 32 random bytes hex-encoded on the wire, with only the blake3
//! hash persisted. A database leak exposes no usable tokens.

use rand::{rng, RngCore};

const TOKEN_BYTES: usize = 32;

/// Generates a fresh opaque token (64 hex characters) from the CSPRNG.
#[must_use]
pub fn generate_secure_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hashes a token for storage or lookup.
#[must_use]
pub fn hash_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_secure_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_secure_token(), generate_secure_token());
    }

    #[test]
    fn test_hash_is_deterministic_and_distinct() {
        let token = generate_secure_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), token);
    }
}
