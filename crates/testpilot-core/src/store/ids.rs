//! Identifier and commit hash generation.

use jiff::Timestamp;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of a generated commit hash in hex characters.
pub const COMMIT_HASH_LEN: usize = 40;

/// Generates an opaque, collision-resistant record identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a 40 character lowercase hex token shaped like a VCS commit hash.
///
/// Random material is folded through SHA-256 and truncated. The value is an
/// audit token only and carries no cryptographic meaning.
pub fn generate_commit_hash() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Timestamp::now().as_nanosecond().to_le_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());
    hash_hex[..COMMIT_HASH_LEN].to_string()
}

/// Returns true if `value` has the shape of a generated commit hash.
pub fn is_commit_hash(value: &str) -> bool {
    value.len() == COMMIT_HASH_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_commit_hash_shape() {
        for _ in 0..32 {
            let hash = generate_commit_hash();
            assert!(is_commit_hash(&hash), "unexpected hash {hash}");
        }
    }

    #[test]
    fn test_commit_hashes_differ() {
        let hashes: HashSet<String> = (0..100).map(|_| generate_commit_hash()).collect();
        assert_eq!(hashes.len(), 100);
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = (0..100).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_is_commit_hash_rejects_bad_input() {
        assert!(!is_commit_hash("abc"));
        assert!(!is_commit_hash(&"G".repeat(40)));
        assert!(!is_commit_hash(&"A".repeat(40)));
        assert!(is_commit_hash(&"0".repeat(40)));
    }
}
