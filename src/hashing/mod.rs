use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Truncation Rationale
///
/// Competency keys only need to tell apart the rows of one taxonomy (hundreds to a few
/// thousand entries). With 64 bits the collision probability for `n` items is roughly
/// `n² / (2 × 2^64)`, which is negligible at that scale.
///
/// A collision would make two competencies resolve to the same cached vector. This is
/// not a security boundary; use the full digest from [`hash_generation`] where
/// uniqueness matters more.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    truncate_le(hash.as_bytes())
}

/// Stable identifier for a competency row: `(id, text)` joined with a separator.
#[inline]
pub fn hash_competency(id: &str, text: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(id.as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());

    let hash = hasher.finalize();
    truncate_le(hash.as_bytes())
}

#[inline]
fn truncate_le(digest: &[u8; 32]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Full 32-byte digest of a generation request.
///
/// Only the purpose tag and prompt content enter the hash, so identical requests map to
/// the same key across processes and restarts.
#[inline]
pub fn hash_generation(purpose: &str, prompt: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(purpose.as_bytes());
    hasher.update(b"|");
    hasher.update(prompt.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Human-readable cache key: `"{PURPOSE}_{hex digest}"`.
pub fn generation_cache_key(purpose: &str, prompt: &str) -> String {
    let digest = blake3::Hash::from(hash_generation(purpose, prompt));
    format!("{}_{}", purpose, digest.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_to_u64_determinism() {
        let data = b"bloc_1:C1.1";

        let hash1 = hash_to_u64(data);
        let hash2 = hash_to_u64(data);
        let hash3 = hash_to_u64(data);

        assert_eq!(hash1, hash2);
        assert_eq!(hash2, hash3);
    }

    #[test]
    fn test_hash_to_u64_empty_input() {
        assert_eq!(hash_to_u64(b""), hash_to_u64(b""));
    }

    #[test]
    fn test_hash_competency_determinism() {
        let a = hash_competency("C1.1", "Design relational data models");
        let b = hash_competency("C1.1", "Design relational data models");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_competency_sensitivity() {
        let base = hash_competency("C1.1", "Design relational data models");
        let other_id = hash_competency("C1.2", "Design relational data models");
        let other_text = hash_competency("C1.1", "Design relational data models.");

        assert_ne!(base, other_id);
        assert_ne!(base, other_text);
    }

    #[test]
    fn test_hash_competency_separator_prevents_ambiguity() {
        let hash1 = hash_competency("ab", "cd");
        let hash2 = hash_competency("abc", "d");
        let hash3 = hash_competency("a", "bcd");

        assert_ne!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_ne!(hash2, hash3);
    }

    #[test]
    fn test_hash_generation_purpose_sensitivity() {
        let prompts = [
            hash_generation("BIO", "same prompt"),
            hash_generation("PLAN", "same prompt"),
            hash_generation("ENRICH", "same prompt"),
        ];
        let unique: HashSet<_> = prompts.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_generation_cache_key_format() {
        let key = generation_cache_key("BIO", "Write a bio");
        assert!(key.starts_with("BIO_"));
        assert_eq!(key.len(), "BIO_".len() + 64);
        assert_eq!(key, generation_cache_key("BIO", "Write a bio"));
    }

    #[test]
    fn test_generation_cache_key_whitespace_sensitive() {
        assert_ne!(
            generation_cache_key("BIO", "Write a bio"),
            generation_cache_key("BIO", "Write a bio ")
        );
    }
}
