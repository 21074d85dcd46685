//! Resolve the effective item list for an identity

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::fixtures::FixtureBundle;
use super::rotation::RotationStore;
use super::ItemProvider;
use crate::error::Result;
use crate::items::Item;
use crate::metrics::METRICS;

/// Where the items in a [`ResolvedItems`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemOrigin {
    Synced,
    Fixture { dataset: u8 },
}

impl ItemOrigin {
    /// Fixture dataset number, `None` for synced data
    pub fn dataset(&self) -> Option<u8> {
        match self {
            Self::Synced => None,
            Self::Fixture { dataset } => Some(*dataset),
        }
    }
}

/// Items one aggregation runs over, plus the bundle its fallbacks draw from
#[derive(Debug, Clone)]
pub struct ResolvedItems {
    pub identity: String,
    pub items: Vec<Item>,
    pub origin: ItemOrigin,
    pub bundle: FixtureBundle,
}

/// Reads real items and substitutes the identity's current fixture bundle
/// when there are none.
#[derive(Clone)]
pub struct FallbackResolver {
    provider: Arc<dyn ItemProvider>,
    rotation: Arc<dyn RotationStore>,
}

impl FallbackResolver {
    pub fn new(provider: Arc<dyn ItemProvider>, rotation: Arc<dyn RotationStore>) -> Self {
        Self { provider, rotation }
    }

    pub fn rotation(&self) -> &Arc<dyn RotationStore> {
        &self.rotation
    }

    pub async fn resolve(&self, identity: &str) -> Result<ResolvedItems> {
        let bundle = FixtureBundle::build(self.rotation.current(identity), identity);
        let items = self.provider.list_items(identity).await?;

        if !items.is_empty() {
            debug!(items = items.len(), "Resolved synced items");
            return Ok(ResolvedItems {
                identity: identity.to_string(),
                items,
                origin: ItemOrigin::Synced,
                bundle,
            });
        }

        warn!(
            dataset = bundle.dataset,
            "No synced data for {}..., using fixture bundle",
            identity.chars().take(8).collect::<String>()
        );
        METRICS.record_fixture_fallback(bundle.dataset);

        Ok(ResolvedItems {
            identity: identity.to_string(),
            items: bundle.items(),
            origin: ItemOrigin::Fixture {
                dataset: bundle.dataset,
            },
            bundle,
        })
    }
}
