//! Persistence layer: MongoDB client wrapper and document schemas

pub mod mongo;
pub mod schemas;

pub use mongo::{assert_exists, assert_not_exists, IntoIndexes, MongoClient, MongoCollection, MutMetadata};
