use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeDocument;

/// Owner-tagged wrapper around a cached document.
///
/// `owner` is the session identity that wrote the record; `None` means an
/// anonymous session wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEnvelope {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub content: ResumeDocument,
}

impl StorageEnvelope {
    pub fn is_owned_by(&self, owner: Option<&str>) -> bool {
        self.owner.as_deref() == owner
    }
}
