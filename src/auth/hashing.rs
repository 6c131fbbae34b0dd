use sha2::{Digest, Sha256};

/// Hash an API key the way it is stored on the team record:
/// SHA-256 over the raw key bytes, lowercase hex.
pub fn hash_api_key(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}
