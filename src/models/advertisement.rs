//! Advertisement entity served by the lookup service.

use serde::{Deserialize, Serialize};

/// An advertisement as returned by both providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    /// Stable public identifier
    pub web_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Advertisement {
    pub fn new(
        web_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            web_id: web_id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}
