//! Sort profile document schema
//!
//! One weight profile per user: a label → numeric weight mapping consumed
//! by the (unimplemented) feed-ranking step.

use std::collections::HashMap;

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for sort profiles
pub const SORT_PROFILE_COLLECTION: &str = "sort_profiles";

/// Weight profile stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SortProfileDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user id
    pub owner: String,

    /// Label name → weight; each label present at most once
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

impl SortProfileDoc {
    pub fn new(owner: &str) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            owner: owner.to_string(),
            weights: HashMap::new(),
        }
    }
}

impl IntoIndexes for SortProfileDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "owner": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("owner_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for SortProfileDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
