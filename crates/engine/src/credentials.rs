//! Password salting and hashing.

use rand::Rng;
use sha2::{Digest, Sha256};

/// 16 random bytes, hex-encoded.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}

/// Salted SHA-256 digest of a password, hex-encoded.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a candidate password against a stored salt + digest.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}
