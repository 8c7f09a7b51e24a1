//! Integration tests for hashing.

use std::collections::HashSet;

use rkyv::rancor::Error;
use rkyv::{from_bytes, to_bytes};
use skillmatch::index::{VectorArtifact, VectorEntry};
use skillmatch::store::{CompetencyRecord, CompetencyStore};
use skillmatch::{generation_cache_key, hash_competency};

#[test]
fn test_blake3_determinism() {
    let input = b"C1.1|Design relational data models";

    let hash1 = blake3::hash(input);
    let hash2 = blake3::hash(input);

    assert_eq!(hash1, hash2);
}

#[test]
fn test_record_key_matches_hash_competency() {
    let record = CompetencyRecord::new("C1.1", "Design data models", "bloc_1", "Data");
    assert_eq!(record.key(), hash_competency("C1.1", "Design data models"));
}

#[test]
fn test_record_key_ignores_block_assignment() {
    let a = CompetencyRecord::new("C1.1", "Design data models", "bloc_1", "Data");
    let b = CompetencyRecord::new("C1.1", "Design data models", "bloc_9", "Elsewhere");
    assert_eq!(a.key(), b.key());
}

#[test]
fn test_store_keys_are_unique_for_realistic_taxonomy() {
    let records: Vec<CompetencyRecord> = (0..2_000)
        .map(|i| {
            CompetencyRecord::new(
                format!("C{}.{}", i / 10, i % 10),
                format!("Competency statement number {}", i),
                format!("bloc_{}", i / 10),
                format!("Block {}", i / 10),
            )
        })
        .collect();
    let store = CompetencyStore::from_records(records);

    let keys: HashSet<u64> = store.keys().into_iter().collect();
    assert_eq!(keys.len(), 2_000);
}

#[test]
fn test_generation_keys_are_stable_and_purpose_scoped() {
    let bio = generation_cache_key("BIO", "Write a bio for a data engineer");
    let plan = generation_cache_key("PLAN", "Write a bio for a data engineer");

    assert_eq!(bio, generation_cache_key("BIO", "Write a bio for a data engineer"));
    assert_ne!(bio, plan);
    assert!(bio.starts_with("BIO_"));
    assert!(plan.starts_with("PLAN_"));
}

#[test]
fn test_artifact_keys_survive_archiving() {
    let records = [
        CompetencyRecord::new("C1.1", "Design data models", "bloc_1", "Data"),
        CompetencyRecord::new("C2.1", "Build web interfaces", "bloc_2", "Web"),
    ];
    let artifact = VectorArtifact {
        model_id: "stub-2".to_string(),
        dimension: 2,
        entries: records
            .iter()
            .map(|r| VectorEntry {
                key: r.key(),
                competency_id: r.id.clone(),
                vector: vec![1.0, 0.0],
            })
            .collect(),
    };

    let bytes = to_bytes::<Error>(&artifact).expect("Serialization should succeed");
    let restored: VectorArtifact =
        from_bytes::<VectorArtifact, Error>(&bytes).expect("Deserialization should succeed");

    for (entry, record) in restored.entries.iter().zip(&records) {
        assert_eq!(entry.key, record.key());
    }
}
