use sha2::{Digest, Sha256};

use super::normalize;

pub fn hash_norm(norm: &str) -> String {
    hex::encode(Sha256::digest(norm.as_bytes()))
}

/// Normalized text and its hash, the memory's lookup key.
pub fn key_for(source: &str) -> (String, String) {
    let norm = normalize::normalize(source);
    let h = hash_norm(&norm);
    (norm, h)
}
