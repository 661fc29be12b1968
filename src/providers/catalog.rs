//! Catalog Provider
//!
//! Secondary tier: an advertisement catalogue loaded once from a JSON file.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{ProviderError, SecondaryProvider};
use crate::models::Advertisement;

// == Catalog Provider ==
/// In-memory catalogue keyed by `web_id`.
#[derive(Debug, Clone, Default)]
pub struct CatalogProvider {
    advertisements: HashMap<String, Advertisement>,
}

impl CatalogProvider {
    /// Builds a catalogue from advertisements; later duplicates win.
    pub fn new(advertisements: impl IntoIterator<Item = Advertisement>) -> Self {
        Self {
            advertisements: advertisements
                .into_iter()
                .map(|adv| (adv.web_id.clone(), adv))
                .collect(),
        }
    }

    /// Loads a JSON array of advertisements from `path`.
    ///
    /// A missing file gives an empty catalogue; an unreadable or malformed
    /// file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Catalog {} not found, starting with an empty catalog", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(ProviderError::Io(format!("{}: {}", path.display(), e))),
        };

        let advertisements: Vec<Advertisement> = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Decode(format!("{}: {}", path.display(), e)))?;

        let catalog = Self::new(advertisements);
        info!("Loaded {} advertisements from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.advertisements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advertisements.is_empty()
    }
}

#[async_trait]
impl SecondaryProvider<Advertisement> for CatalogProvider {
    async fn fetch(&self, id: &str) -> Result<Option<Advertisement>, ProviderError> {
        Ok(self.advertisements.get(id).cloned())
    }
}
