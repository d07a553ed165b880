//! Stores backed by the [`KeyValueStore`](crate::ports::KeyValueStore) port.

mod drafts;
mod posts;

pub use drafts::{DRAFT_PREFIX, DraftStore, draft_key};
pub use posts::{POSTS_KEY, PostRepository};
