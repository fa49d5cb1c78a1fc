//! Posting concept
//!
//! Named feeds containing author/content posts. Feed names are global;
//! posts belong to exactly one feed and carry weak references to their
//! author and content.

use bson::{doc, Document};
use tracing::info;

use crate::concepts::parse_object_id;
use crate::db::mongo::{assert_exists, assert_not_exists};
use crate::db::schemas::{FeedDoc, PostDoc, FEED_COLLECTION, POST_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::types::{AgoraError, Result};

/// Posting concept: feeds and their posts
#[derive(Clone)]
pub struct Posting {
    feeds: MongoCollection<FeedDoc>,
    posts: MongoCollection<PostDoc>,
}

impl Posting {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            feeds: client.collection(FEED_COLLECTION).await?,
            posts: client.collection(POST_COLLECTION).await?,
        })
    }

    async fn feed_by_name(&self, name: &str) -> Result<FeedDoc> {
        let filter = doc! { "name": name };
        let feed = self.feeds.find_one(filter.clone()).await?;

        assert_exists(feed, "feed", &filter)
    }

    /// Register a feed; `NotAllowed` when the name is taken
    pub async fn register_feed(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(AgoraError::BadValues("feed name must be non-empty".into()));
        }

        let filter = doc! { "name": name };
        let existing = self.feeds.find_one(filter.clone()).await?;
        assert_not_exists(&existing, "feed", &filter)?;

        let id = self.feeds.insert_one(FeedDoc::new(name)).await?;

        info!("Registered feed {:?}", name);

        Ok(id.to_hex())
    }

    /// Remove a feed and every post in it; `NotFound` when absent
    pub async fn unregister_feed(&self, name: &str) -> Result<()> {
        let feed = self.feeds.pop_one("feed", doc! { "name": name }).await?;

        if let Some(oid) = feed._id {
            let removed = self
                .posts
                .delete_many(doc! { "feed": oid.to_hex() })
                .await?;
            info!("Unregistered feed {:?} ({} posts removed)", name, removed);
        }

        Ok(())
    }

    /// Add a post to a feed; the feed must exist
    pub async fn post(
        &self,
        feed_name: &str,
        author: &str,
        content: &str,
        options: Option<Document>,
    ) -> Result<String> {
        let feed = self.feed_by_name(feed_name).await?;
        let feed_id = feed._id.map(|oid| oid.to_hex()).unwrap_or_default();

        let id = self
            .posts
            .insert_one(PostDoc::new(&feed_id, author, content, options))
            .await?;

        Ok(id.to_hex())
    }

    /// Remove a post from a feed; `NotFound` when the feed or post is absent
    pub async fn unpost(&self, feed_name: &str, post_id: &str) -> Result<()> {
        let feed = self.feed_by_name(feed_name).await?;
        let feed_id = feed._id.map(|oid| oid.to_hex()).unwrap_or_default();

        let oid = parse_object_id(post_id, "post")?;
        self.posts
            .pop_one("post", doc! { "_id": oid, "feed": feed_id })
            .await?;

        Ok(())
    }

    /// Posts of a feed in creation order
    pub async fn get_posts(&self, feed_name: &str) -> Result<Vec<PostDoc>> {
        let feed = self.feed_by_name(feed_name).await?;
        let feed_id = feed._id.map(|oid| oid.to_hex()).unwrap_or_default();

        let mut posts = self.posts.find_many(doc! { "feed": feed_id }).await?;
        posts.sort_by_key(|p| p.metadata.created_at);

        Ok(posts)
    }
}
