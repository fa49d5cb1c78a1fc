//! Source and content document schemas
//!
//! A source is a registered external location (URL, file, or folder) owned
//! by a user. Contents are the opaque blobs an ingestion run pulls from a
//! source; each content row belongs to exactly one source and is read-only
//! after creation.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for sources
pub const SOURCE_COLLECTION: &str = "sources";

/// Collection name for ingested contents
pub const CONTENT_COLLECTION: &str = "contents";

/// Kind of external source
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Url,
    File,
    Folder,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// Source document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SourceDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user id
    pub owner: String,

    /// Kind of source (url, file, folder)
    pub kind: SourceKind,

    /// Path or URI of the source
    pub uri: String,
}

impl SourceDoc {
    pub fn new(owner: &str, kind: SourceKind, uri: &str) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            owner: owner.to_string(),
            kind,
            uri: uri.to_string(),
        }
    }
}

impl IntoIndexes for SourceDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "owner": 1, "kind": 1, "uri": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("owner_kind_uri_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for SourceDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Content blob ingested from a source
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ContentDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user id
    pub owner: String,

    /// Parent source id (weak reference)
    pub source: String,

    /// Opaque content body
    pub body: String,
}

impl IntoIndexes for ContentDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "source": 1 },
            Some(
                IndexOptions::builder()
                    .name("source_lookup".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ContentDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
