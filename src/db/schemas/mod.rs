//! Database schemas for Agora
//!
//! One module per concept's document family; every document embeds the
//! shared [`Metadata`] block maintained by the store.

mod feed;
mod friend;
mod label;
mod metadata;
mod sort_profile;
mod source;
mod template;
mod user;

pub use feed::{FeedDoc, PostDoc, FEED_COLLECTION, POST_COLLECTION};
pub use friend::{
    ordered_pair, FriendRequestDoc, FriendshipDoc, RequestStatus, FRIENDSHIP_COLLECTION,
    FRIEND_REQUEST_COLLECTION,
};
pub use label::{LabelDoc, LABEL_COLLECTION};
pub use metadata::Metadata;
pub use sort_profile::{SortProfileDoc, SORT_PROFILE_COLLECTION};
pub use source::{ContentDoc, SourceDoc, SourceKind, CONTENT_COLLECTION, SOURCE_COLLECTION};
pub use template::{RenderDoc, TemplateDoc, RENDER_COLLECTION, TEMPLATE_COLLECTION};
pub use user::{UserDoc, UserView, USER_COLLECTION};
