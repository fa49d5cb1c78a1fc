//! Feed and post document schemas

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for feeds
pub const FEED_COLLECTION: &str = "feeds";

/// Collection name for posts
pub const POST_COLLECTION: &str = "posts";

/// Named feed; posts reference it by id
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FeedDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Globally unique feed name
    pub name: String,
}

impl FeedDoc {
    pub fn new(name: &str) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name: name.to_string(),
        }
    }
}

impl IntoIndexes for FeedDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "name": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("name_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for FeedDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Post inside a feed. Author and content are weak references: the
/// formatting layer resolves them and tolerates dangling ids.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Parent feed id
    pub feed: String,

    /// Author user id (weak reference)
    pub author: String,

    /// Content id or inline content (weak reference)
    pub content: String,

    /// Optional display options, stored as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Document>,
}

impl PostDoc {
    pub fn new(feed: &str, author: &str, content: &str, options: Option<Document>) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            feed: feed.to_string(),
            author: author.to_string(),
            content: content.to_string(),
            options,
        }
    }
}

impl IntoIndexes for PostDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "feed": 1 },
            Some(
                IndexOptions::builder()
                    .name("feed_lookup".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for PostDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
