//! Resource types exchanged with API callers.

use serde::{Deserialize, Serialize};

/// Whether a key names a file or a folder-like prefix.
///
/// Serialized as an integer: `0` for files, `1` for folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ResourceType {
    /// A regular object.
    File,
    /// A key ending in `/`.
    Folder,
}

impl From<ResourceType> for u8 {
    fn from(kind: ResourceType) -> Self {
        match kind {
            ResourceType::File => 0,
            ResourceType::Folder => 1,
        }
    }
}

impl TryFrom<u8> for ResourceType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::File),
            1 => Ok(Self::Folder),
            other => Err(format!("unknown resource type {other}, expected 0 or 1")),
        }
    }
}

/// An object key as seen by API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: ResourceType,
}

impl Resource {
    /// Create a resource from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ResourceType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Storage key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name (basename of the key).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File or folder.
    #[must_use]
    pub fn kind(&self) -> ResourceType {
        self.kind
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult<T> {
    /// Items in backend order.
    pub resources: Vec<T>,
    /// Cursor for the next page; `None` when there are no more pages.
    pub cursor: Option<String>,
}

impl<T> ListResult<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(resources: Vec<T>, cursor: Option<String>) -> Self {
        Self { resources, cursor }
    }

    /// Whether another page can be requested.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }
}
