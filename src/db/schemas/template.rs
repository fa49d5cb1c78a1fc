//! Template and render document schemas
//!
//! Templates are registered per user; renders record a template applied to
//! a named-slot → content-id mapping. Render rows are written only by the
//! (unimplemented) rendering step and read-only afterward.

use std::collections::HashMap;

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for templates
pub const TEMPLATE_COLLECTION: &str = "templates";

/// Collection name for render records
pub const RENDER_COLLECTION: &str = "renders";

/// Template document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TemplateDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user id
    pub owner: String,

    /// Template kind
    pub kind: String,

    /// Resource kinds the template's slots accept
    #[serde(default)]
    pub resource_kinds: Vec<String>,

    /// Backing content id (weak reference)
    pub content: String,
}

impl TemplateDoc {
    pub fn new(owner: &str, kind: &str, resource_kinds: Vec<String>, content: &str) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            owner: owner.to_string(),
            kind: kind.to_string(),
            resource_kinds,
            content: content.to_string(),
        }
    }
}

impl IntoIndexes for TemplateDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "owner": 1 },
            Some(
                IndexOptions::builder()
                    .name("owner_lookup".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for TemplateDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Record of a template render
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RenderDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user id
    pub owner: String,

    /// Rendered template id (weak reference)
    pub template: String,

    /// Slot name → content id
    #[serde(default)]
    pub slots: HashMap<String, String>,
}

impl IntoIndexes for RenderDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        Vec::new()
    }
}

impl MutMetadata for RenderDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
