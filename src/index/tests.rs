use super::*;
use crate::embedding::{MockEmbedder, SentenceEncoder};
use crate::store::CompetencyRecord;
use tempfile::TempDir;

fn store() -> CompetencyStore {
    CompetencyStore::from_records(vec![
        CompetencyRecord::new("C1", "Design relational data models", "bloc_1", "Data"),
        CompetencyRecord::new("C2", "Write ETL pipelines", "bloc_1", "Data"),
        CompetencyRecord::new("C3", "Operate Kubernetes clusters", "bloc_2", "Cloud"),
    ])
}

fn mock_embedder() -> Arc<MockEmbedder> {
    Arc::new(
        MockEmbedder::new(2)
            .with_vector("Design relational data models", vec![1.0, 0.0])
            .with_vector("Write ETL pipelines", vec![0.6, 0.8])
            .with_vector("Operate Kubernetes clusters", vec![0.0, 1.0]),
    )
}

mod artifact_tests {
    use super::*;

    fn artifact_for(store: &CompetencyStore) -> VectorArtifact {
        VectorArtifact {
            model_id: "mock-2".to_string(),
            dimension: 2,
            entries: store
                .records()
                .iter()
                .map(|r| VectorEntry {
                    key: r.key(),
                    competency_id: r.id.clone(),
                    vector: vec![1.0, 0.0],
                })
                .collect(),
        }
    }

    #[test]
    fn test_check_valid() {
        let store = store();
        assert!(artifact_for(&store).check(&store, "mock-2", 2).is_ok());
    }

    #[test]
    fn test_check_count_mismatch() {
        let store = store();
        let mut artifact = artifact_for(&store);
        artifact.entries.pop();

        assert_eq!(
            artifact.check(&store, "mock-2", 2),
            Err(Staleness::CountMismatch {
                stored: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn test_check_missing_key_with_equal_count() {
        let store = store();
        let mut artifact = artifact_for(&store);
        artifact.entries[1].key ^= 1;

        assert_eq!(
            artifact.check(&store, "mock-2", 2),
            Err(Staleness::MissingKey {
                competency_id: "C2".to_string()
            })
        );
    }

    #[test]
    fn test_check_model_and_dimension() {
        let store = store();
        let artifact = artifact_for(&store);

        assert!(matches!(
            artifact.check(&store, "other-model", 2),
            Err(Staleness::ModelMismatch { .. })
        ));
        assert!(matches!(
            artifact.check(&store, "mock-2", 3),
            Err(Staleness::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_check_malformed_vector() {
        let store = store();
        let mut artifact = artifact_for(&store);
        artifact.entries[2].vector.push(0.5);

        assert!(matches!(
            artifact.check(&store, "mock-2", 2),
            Err(Staleness::MalformedVector { len: 3, .. })
        ));
    }

    #[test]
    fn test_staleness_display() {
        let s = Staleness::CountMismatch {
            stored: 2,
            expected: 3,
        };
        assert_eq!(s.to_string(), "entry count 2 != competency count 3");
    }
}

mod file_store_tests {
    use super::*;

    #[test]
    fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = FileVectorStore::new(dir.path().join("embeddings.rkyv"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = FileVectorStore::new(dir.path().join("nested").join("embeddings.rkyv"));
        let artifact = VectorArtifact {
            model_id: "stub-3".to_string(),
            dimension: 3,
            entries: vec![VectorEntry {
                key: 42,
                competency_id: "C1".to_string(),
                vector: vec![0.1, 0.2, 0.3],
            }],
        };

        store.save(&artifact).unwrap();
        assert_eq!(store.load().unwrap(), Some(artifact));
    }

    #[test]
    fn test_garbage_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("embeddings.rkyv");
        std::fs::write(&path, b"definitely not an rkyv archive").unwrap();

        assert!(FileVectorStore::new(&path).load().is_err());
    }

    #[test]
    fn test_empty_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("embeddings.rkyv");
        std::fs::write(&path, b"").unwrap();

        assert!(FileVectorStore::new(&path).load().is_err());
    }
}

mod cache_tests {
    use super::*;

    #[test]
    fn test_ensure_builds_and_persists_when_absent() {
        let embedder = mock_embedder();
        let cache = EmbeddingCache::new(embedder.clone(), MemoryVectorStore::new());
        let store = store();

        let vectors = cache.ensure(&store).unwrap();

        assert_eq!(vectors.len(), store.len());
        assert_eq!(embedder.calls(), 1);
        assert_eq!(embedder.texts_encoded(), 3);
        assert_eq!(vectors.get(store.records()[1].key()), Some(&[0.6, 0.8][..]));
        assert!(cache.is_warm());
    }

    #[test]
    fn test_ensure_reuses_snapshot() {
        let embedder = mock_embedder();
        let cache = EmbeddingCache::new(embedder.clone(), MemoryVectorStore::new());
        let store = store();

        let first = cache.ensure(&store).unwrap();
        let second = cache.ensure(&store).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(embedder.calls(), 1);
    }

    #[test]
    fn test_ensure_reuses_valid_persisted_artifact() {
        let store = store();
        let vector_store = Arc::new(MemoryVectorStore::new());
        EmbeddingCache::new(mock_embedder(), vector_store.clone())
            .ensure(&store)
            .unwrap();
        assert_eq!(vector_store.saves(), 1);

        let embedder = mock_embedder();
        let cache = EmbeddingCache::new(embedder.clone(), vector_store.clone());
        let vectors = cache.ensure(&store).unwrap();

        assert_eq!(vectors.len(), 3);
        assert_eq!(embedder.calls(), 0);
        assert_eq!(vector_store.saves(), 1);
    }

    #[test]
    fn test_ensure_rebuilds_on_count_mismatch() {
        let store = store();
        let stale = VectorArtifact {
            model_id: "mock-2".to_string(),
            dimension: 2,
            entries: vec![VectorEntry {
                key: store.records()[0].key(),
                competency_id: "C1".to_string(),
                vector: vec![1.0, 0.0],
            }],
        };
        let embedder = mock_embedder();
        let cache = EmbeddingCache::new(embedder.clone(), MemoryVectorStore::with_artifact(stale));

        let vectors = cache.ensure(&store).unwrap();

        assert_eq!(vectors.len(), 3);
        assert_eq!(embedder.calls(), 1);
    }

    #[test]
    fn test_ensure_rebuilds_on_model_change() {
        let store = store();
        let vector_store = Arc::new(MemoryVectorStore::new());
        EmbeddingCache::new(mock_embedder(), vector_store.clone())
            .ensure(&store)
            .unwrap();

        let embedder = Arc::new(MockEmbedder::new(2).with_model_id("mock-2-v2"));
        let cache = EmbeddingCache::new(embedder.clone(), vector_store.clone());
        let vectors = cache.ensure(&store).unwrap();

        assert_eq!(embedder.calls(), 1);
        assert_eq!(vectors.model_id(), "mock-2-v2");
        assert_eq!(vector_store.saves(), 2);
        assert_eq!(vector_store.artifact().unwrap().model_id, "mock-2-v2");
    }

    #[test]
    fn test_ensure_resolves_reordered_store_by_key() {
        let store = store();
        let embedder = mock_embedder();
        let cache = EmbeddingCache::new(embedder.clone(), MemoryVectorStore::new());
        cache.ensure(&store).unwrap();

        let mut reversed: Vec<CompetencyRecord> = store.records().to_vec();
        reversed.reverse();
        let reordered = CompetencyStore::from_records(reversed);

        let vectors = cache.ensure(&reordered).unwrap();
        let aligned = vectors.aligned(&reordered).unwrap();

        assert_eq!(embedder.calls(), 1);
        assert_eq!(aligned[0], &[0.0, 1.0][..]);
        assert_eq!(aligned[2], &[1.0, 0.0][..]);
    }

    #[test]
    fn test_ensure_treats_load_error_as_absent() {
        let vector_store = MemoryVectorStore::new();
        vector_store.set_fail_load(true);
        let embedder = mock_embedder();
        let cache = EmbeddingCache::new(embedder.clone(), vector_store);

        let vectors = cache.ensure(&store()).unwrap();

        assert_eq!(vectors.len(), 3);
        assert_eq!(embedder.calls(), 1);
    }

    #[test]
    fn test_ensure_returns_vectors_when_persist_fails() {
        let vector_store = MemoryVectorStore::new();
        vector_store.set_fail_save(true);
        let cache = EmbeddingCache::new(mock_embedder(), vector_store);

        let vectors = cache.ensure(&store()).unwrap();
        assert_eq!(vectors.len(), 3);
    }

    #[test]
    fn test_ensure_propagates_embedder_failure() {
        let embedder = mock_embedder();
        embedder.set_failing(true);
        let cache = EmbeddingCache::new(embedder, MemoryVectorStore::new());

        let result = cache.ensure(&store());
        assert!(matches!(result, Err(IndexError::Embedding(_))));
        assert!(!cache.is_warm());
    }

    #[test]
    fn test_ensure_empty_store() {
        let cache = EmbeddingCache::new(mock_embedder(), MemoryVectorStore::new());
        let vectors = cache.ensure(&CompetencyStore::default()).unwrap();
        assert!(vectors.is_empty());
    }

    #[test]
    fn test_corrupt_file_is_rebuilt_and_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("embeddings.rkyv");
        std::fs::write(&path, b"corrupt").unwrap();

        let encoder: Arc<dyn Embedder> = Arc::new(SentenceEncoder::stub().unwrap());
        let cache = EmbeddingCache::new(encoder, FileVectorStore::new(&path));
        let store = store();

        let vectors = cache.ensure(&store).unwrap();
        assert_eq!(vectors.len(), store.len());

        let persisted = FileVectorStore::new(&path).load().unwrap().unwrap();
        assert_eq!(persisted.len(), store.len());
        assert_eq!(persisted.model_id, "stub-384");
    }

    #[test]
    fn test_len_matches_store_regardless_of_prior_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("embeddings.rkyv");
        let encoder: Arc<dyn Embedder> = Arc::new(SentenceEncoder::stub().unwrap());
        let store = store();

        let small = CompetencyStore::from_records(store.records()[..1].to_vec());
        EmbeddingCache::new(encoder.clone(), FileVectorStore::new(&path))
            .ensure(&small)
            .unwrap();

        let vectors = EmbeddingCache::new(encoder, FileVectorStore::new(&path))
            .ensure(&store)
            .unwrap();
        assert_eq!(vectors.len(), store.len());
    }
}

mod concurrency_tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn slow_embedder(delay: Duration) -> Arc<MockEmbedder> {
        Arc::new(
            MockEmbedder::new(2)
                .with_vector("Design relational data models", vec![1.0, 0.0])
                .with_delay(delay),
        )
    }

    #[test]
    fn test_is_warm_does_not_wait_for_rebuild() {
        let embedder = slow_embedder(Duration::from_millis(1500));
        let cache = Arc::new(EmbeddingCache::new(embedder.clone(), MemoryVectorStore::new()));

        let builder = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || cache.ensure(&store()).map(|v| v.len()))
        };

        while embedder.calls() == 0 {
            std::thread::sleep(Duration::from_millis(5));
        }

        let started = Instant::now();
        let warm = cache.is_warm();
        let len = cache.snapshot_len();
        let waited = started.elapsed();

        assert!(!warm);
        assert_eq!(len, None);
        assert!(
            waited < Duration::from_millis(200),
            "is_warm blocked for {:?}",
            waited
        );
        assert!(format!("{:?}", cache).contains("warm: false"));

        assert_eq!(builder.join().unwrap().unwrap(), 3);
        assert!(cache.is_warm());
    }

    #[test]
    fn test_concurrent_ensure_runs_single_rebuild() {
        let embedder = slow_embedder(Duration::from_millis(200));
        let cache = Arc::new(EmbeddingCache::new(embedder.clone(), MemoryVectorStore::new()));
        let store = Arc::new(store());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let store = Arc::clone(&store);
                std::thread::spawn(move || cache.ensure(&store))
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();

        assert_eq!(embedder.calls(), 1);
        for vectors in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], vectors));
        }
    }
}
