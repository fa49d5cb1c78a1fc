//! Label document schema
//!
//! A label is a per-user named set of opaque resource ids.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for labels
pub const LABEL_COLLECTION: &str = "labels";

/// Label document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LabelDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user id
    pub owner: String,

    /// Label name, unique per owner
    pub name: String,

    /// Tagged resource ids; no duplicates
    #[serde(default)]
    pub resources: Vec<String>,
}

impl LabelDoc {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            owner: owner.to_string(),
            name: name.to_string(),
            resources: Vec::new(),
        }
    }
}

impl IntoIndexes for LabelDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "owner": 1, "name": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("owner_name_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for LabelDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
