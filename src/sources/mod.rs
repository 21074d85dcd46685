//! Item sources: the file-backed store, fixture bundles and the Google collaborator

pub mod fixtures;
pub mod google;
pub mod resolver;
pub mod rotation;
pub mod store;

use async_trait::async_trait;

use crate::error::Result;
use crate::items::Item;

pub use fixtures::{FixtureBundle, DATASET_COUNT};
pub use resolver::{FallbackResolver, ItemOrigin, ResolvedItems};
pub use rotation::{initial_index, InMemoryRotationStore, RotationStore};
pub use store::{validate_identity, Document, FileItemStore};

/// Anything that can list the raw items owned by an identity.
///
/// "No data" is an empty list, never an error.
#[async_trait]
pub trait ItemProvider: Send + Sync {
    async fn list_items(&self, identity: &str) -> Result<Vec<Item>>;
}
