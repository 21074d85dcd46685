//! Fixture-rotation state: which canned bundle each identity currently sees

use dashmap::DashMap;
use sha2::{Digest, Sha256};

use super::fixtures::DATASET_COUNT;

/// Per-identity fixture index store.
///
/// Reads never mutate; only an explicit sync toggles the index.
pub trait RotationStore: Send + Sync {
    /// Current bundle index (`0..DATASET_COUNT`) for an identity
    fn current(&self, identity: &str) -> u8;

    /// Advance to the next bundle and return the new index
    fn toggle(&self, identity: &str) -> u8;
}

/// Stable starting index for an identity, derived from its SHA-256 digest
pub fn initial_index(identity: &str) -> u8 {
    let digest = Sha256::digest(identity.as_bytes());
    digest.last().copied().unwrap_or(0) % DATASET_COUNT
}

/// Process-local rotation store.
///
/// Toggles for the same identity are serialised by the map shard lock.
#[derive(Debug, Default)]
pub struct InMemoryRotationStore {
    indices: DashMap<String, u8>,
}

impl InMemoryRotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl RotationStore for InMemoryRotationStore {
    fn current(&self, identity: &str) -> u8 {
        self.indices
            .get(identity)
            .map(|entry| *entry)
            .unwrap_or_else(|| initial_index(identity))
    }

    fn toggle(&self, identity: &str) -> u8 {
        let mut entry = self
            .indices
            .entry(identity.to_string())
            .or_insert_with(|| initial_index(identity));
        *entry = (*entry + 1) % DATASET_COUNT;
        *entry
    }
}
