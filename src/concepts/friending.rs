//! Friending concept
//!
//! Request/accept/reject state machine over friend requests plus symmetric
//! friendship edges. Per unordered pair the states run
//! `none → pending → {accepted, rejected}`; terminal rows remain as an
//! append-only log, and a new pending request may follow them.
//!
//! Accepting is a three-step sequence (pop pending, log accepted, insert
//! edge) with no cross-operation transaction: an interleaving or crash can
//! consume the request without creating the edge. The order is chosen so a
//! duplicate edge can never appear.

use bson::doc;
use tracing::info;

use crate::db::mongo::assert_not_exists;
use crate::db::schemas::{
    ordered_pair, FriendRequestDoc, FriendshipDoc, RequestStatus, FRIENDSHIP_COLLECTION,
    FRIEND_REQUEST_COLLECTION,
};
use crate::db::{MongoClient, MongoCollection};
use crate::types::{AgoraError, Result};

/// Friending concept: requests and friendship edges
#[derive(Clone)]
pub struct Friending {
    requests: MongoCollection<FriendRequestDoc>,
    friendships: MongoCollection<FriendshipDoc>,
}

impl Friending {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            requests: client.collection(FRIEND_REQUEST_COLLECTION).await?,
            friendships: client.collection(FRIENDSHIP_COLLECTION).await?,
        })
    }

    /// Filter matching a pending request between the pair, either direction
    fn pending_between(a: &str, b: &str) -> bson::Document {
        doc! {
            "status": RequestStatus::Pending.as_str(),
            "$or": [
                { "from": a, "to": b },
                { "from": b, "to": a },
            ],
        }
    }

    /// Filter matching the friendship edge for the unordered pair
    fn edge_filter(a: &str, b: &str) -> bson::Document {
        let (user1, user2) = ordered_pair(a, b);
        doc! { "user1": user1, "user2": user2 }
    }

    /// Create a pending request; `NotAllowed` when the pair is already
    /// friends or a pending request already exists in either direction
    pub async fn create_request(&self, from: &str, to: &str) -> Result<String> {
        if from == to {
            return Err(AgoraError::BadValues(
                "cannot send a friend request to yourself".into(),
            ));
        }

        let edge_filter = Self::edge_filter(from, to);
        let edge = self.friendships.find_one(edge_filter.clone()).await?;
        assert_not_exists(&edge, "friendship", &edge_filter)?;

        let pending_filter = Self::pending_between(from, to);
        let pending = self.requests.find_one(pending_filter.clone()).await?;
        assert_not_exists(&pending, "friend request", &pending_filter)?;

        let id = self
            .requests
            .insert_one(FriendRequestDoc::new(from, to, RequestStatus::Pending))
            .await?;

        info!("Friend request {} -> {}", from, to);

        Ok(id.to_hex())
    }

    /// Accept a pending request: consume it, log acceptance, insert the edge
    pub async fn accept_request(&self, from: &str, to: &str) -> Result<()> {
        let filter = doc! { "from": from, "to": to, "status": RequestStatus::Pending.as_str() };
        self.requests.pop_one("friend request", filter).await?;

        // The pending row is consumed even if the steps below fail; the
        // order guarantees a duplicate edge can never be created.
        self.requests
            .insert_one(FriendRequestDoc::new(from, to, RequestStatus::Accepted))
            .await?;
        self.friendships
            .insert_one(FriendshipDoc::new(from, to))
            .await?;

        info!("Friend request accepted: {} <-> {}", from, to);

        Ok(())
    }

    /// Reject a pending request: consume it and log the rejection
    pub async fn reject_request(&self, from: &str, to: &str) -> Result<()> {
        let filter = doc! { "from": from, "to": to, "status": RequestStatus::Pending.as_str() };
        self.requests.pop_one("friend request", filter).await?;

        self.requests
            .insert_one(FriendRequestDoc::new(from, to, RequestStatus::Rejected))
            .await?;

        Ok(())
    }

    /// Withdraw a pending request without logging a terminal row
    pub async fn remove_request(&self, from: &str, to: &str) -> Result<()> {
        let filter = doc! { "from": from, "to": to, "status": RequestStatus::Pending.as_str() };
        self.requests.pop_one("friend request", filter).await?;

        Ok(())
    }

    /// Remove the friendship edge; `NotFound` when the pair is not friends
    pub async fn remove_friend(&self, user: &str, friend: &str) -> Result<()> {
        self.friendships
            .pop_one("friendship", Self::edge_filter(user, friend))
            .await?;

        info!("Friendship removed: {} <-> {}", user, friend);

        Ok(())
    }

    /// Ids of everyone sharing a friendship edge with `user`
    pub async fn get_friends(&self, user: &str) -> Result<Vec<String>> {
        let edges = self
            .friendships
            .find_many(doc! { "$or": [ { "user1": user }, { "user2": user } ] })
            .await?;

        Ok(edges
            .iter()
            .filter_map(|edge| edge.other(user))
            .map(str::to_string)
            .collect())
    }

    /// Pending requests involving `user`, both directions
    pub async fn get_requests(&self, user: &str) -> Result<Vec<FriendRequestDoc>> {
        self.requests
            .find_many(doc! {
                "status": RequestStatus::Pending.as_str(),
                "$or": [ { "from": user }, { "to": user } ],
            })
            .await
    }
}
