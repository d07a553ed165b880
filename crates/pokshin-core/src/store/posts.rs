//! The post collection, mirrored to durable storage on every mutation.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{NewPost, Post};
use crate::error::StoreError;
use crate::ports::KeyValueStore;

/// Storage key holding the serialized collection.
pub const POSTS_KEY: &str = "pokshin_archive_posts_v1";

/// Owns every archived post, newest first.
///
/// The repository is the only writer of [`POSTS_KEY`]. Each mutation writes
/// the whole collection before committing it in memory, so a failed write
/// leaves both copies as they were.
pub struct PostRepository {
    store: Arc<dyn KeyValueStore>,
    posts: RwLock<Vec<Post>>,
}

impl PostRepository {
    /// Restore the collection from storage.
    ///
    /// A missing or unparseable record yields an empty archive; startup never fails here.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let posts = match store.get(POSTS_KEY).await {
            None => {
                tracing::debug!("No stored posts, starting with an empty archive");
                Vec::new()
            }
            Some(raw) => match serde_json::from_str::<Vec<Post>>(&raw) {
                Ok(posts) => {
                    tracing::info!(count = posts.len(), "Loaded archived posts");
                    posts
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stored posts are unreadable, starting empty");
                    Vec::new()
                }
            },
        };

        Self {
            store,
            posts: RwLock::new(posts),
        }
    }

    pub async fn list(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    /// Posts of one group, newest first. Unknown groups yield nothing.
    pub async fn list_by_group(&self, group_id: &str) -> Vec<Post> {
        self.posts
            .read()
            .await
            .iter()
            .filter(|p| p.group_id.as_str() == group_id)
            .cloned()
            .collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<Post> {
        self.posts.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    /// Archive a new post as the newest entry.
    ///
    /// Fields are stored as given; checking title and content is the composer's job.
    pub async fn create(&self, fields: NewPost) -> Result<Post, StoreError> {
        let mut posts = self.posts.write().await;

        // Millisecond precision matches the stored form; never earlier than the newest post.
        let now = Utc::now().trunc_subsecs(3);
        let created_at = posts
            .first()
            .map(|newest| newest.created_at.max(now))
            .unwrap_or(now);
        let post = Post::new(fields, created_at);

        let mut next = Vec::with_capacity(posts.len() + 1);
        next.push(post.clone());
        next.extend(posts.iter().cloned());

        self.persist(&next).await?;
        *posts = next;

        tracing::info!(post_id = %post.id, group = %post.group_id, "Post archived");
        Ok(post)
    }

    /// Remove a post. Unknown ids are a no-op.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;

        let next: Vec<Post> = posts.iter().filter(|p| p.id != id).cloned().collect();
        if next.len() == posts.len() {
            tracing::debug!(post_id = %id, "Delete of unknown post ignored");
        }

        self.persist(&next).await?;
        *posts = next;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn persist(&self, posts: &[Post]) -> Result<(), StoreError> {
        let json = serde_json::to_string(posts)?;
        self.store.set(POSTS_KEY, &json).await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist posts");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Genre, GroupId, RichText};
    use crate::store::test_support::{FailingStore, MemoryStore};

    fn fields(group: GroupId, title: &str) -> NewPost {
        NewPost::new(group, title, RichText::from_plain_text("본문"))
    }

    async fn empty_repo() -> (Arc<MemoryStore>, PostRepository) {
        let store = Arc::new(MemoryStore::default());
        let repo = PostRepository::load(store.clone()).await;
        (store, repo)
    }

    #[tokio::test]
    async fn test_create_then_list_by_group() {
        let (_, repo) = empty_repo().await;
        let before = Utc::now();

        let mut first = fields(GroupId::Oneus, "첫 만남");
        first.cp = "섷숀".to_string();
        first.genre = vec![Genre::Daily];
        let first = repo.create(first).await.unwrap();

        let listed = repo.list_by_group("ONEUS").await;
        assert_eq!(listed, vec![first.clone()]);
        assert!(!first.id.is_nil());
        assert!(first.created_at >= before - chrono::Duration::milliseconds(1));
        assert!(first.created_at <= Utc::now());

        let second = repo.create(fields(GroupId::Oneus, "두 번째")).await.unwrap();
        let listed = repo.list_by_group("ONEUS").await;
        assert_eq!(listed, vec![second.clone(), first.clone()]);
        assert!(second.created_at >= first.created_at);
        assert_ne!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_list_by_group_filters_and_keeps_order() {
        let (_, repo) = empty_repo().await;
        let a = repo.create(fields(GroupId::Onf, "a")).await.unwrap();
        let b = repo.create(fields(GroupId::Oneus, "b")).await.unwrap();
        let c = repo.create(fields(GroupId::Onf, "c")).await.unwrap();

        assert_eq!(repo.list().await, vec![c.clone(), b, a.clone()]);
        assert_eq!(repo.list_by_group("ONF").await, vec![c, a]);
        assert!(repo.list_by_group("UNKNOWN").await.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_unknown_id_is_none() {
        let (_, repo) = empty_repo().await;
        repo.create(fields(GroupId::Onf, "a")).await.unwrap();
        assert_eq!(repo.find_by_id(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn test_delete_removes_everywhere() {
        let (_, repo) = empty_repo().await;
        let keep = repo.create(fields(GroupId::Verivery, "keep")).await.unwrap();
        let gone = repo.create(fields(GroupId::Verivery, "gone")).await.unwrap();

        repo.delete(gone.id).await.unwrap();

        assert_eq!(repo.find_by_id(gone.id).await, None);
        assert_eq!(repo.list().await, vec![keep.clone()]);
        assert_eq!(repo.list_by_group("VERIVERY").await, vec![keep]);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_noop() {
        let (_, repo) = empty_repo().await;
        repo.create(fields(GroupId::Onf, "a")).await.unwrap();
        repo.create(fields(GroupId::Onf, "b")).await.unwrap();
        let before = repo.list().await;

        repo.delete(Uuid::new_v4()).await.unwrap();
        assert_eq!(repo.list().await, before);

        let id = before[0].id;
        repo.delete(id).await.unwrap();
        repo.delete(id).await.unwrap();
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_reload_preserves_content_and_order() {
        let (store, repo) = empty_repo().await;
        let mut adult = fields(GroupId::P1harmony, "성인");
        adult.is_adult = true;
        adult.is_collab = true;
        adult.collab_name = "합작".to_string();
        adult.image_url = Some("data:image/png;base64,AAAA".to_string());
        repo.create(adult).await.unwrap();
        repo.create(fields(GroupId::Onf, "second")).await.unwrap();
        repo.create(fields(GroupId::Oneus, "third")).await.unwrap();

        let reloaded = PostRepository::load(store).await;
        assert_eq!(reloaded.list().await, repo.list().await);
    }

    #[tokio::test]
    async fn test_corrupt_or_missing_data_loads_empty() {
        let store = Arc::new(MemoryStore::default());
        assert!(PostRepository::load(store.clone()).await.is_empty().await);

        store.set(POSTS_KEY, "{not json").await.unwrap();
        assert!(PostRepository::load(store.clone()).await.is_empty().await);

        store.set(POSTS_KEY, r#"{"id":"x"}"#).await.unwrap();
        assert!(PostRepository::load(store).await.is_empty().await);
    }

    #[tokio::test]
    async fn test_every_mutation_is_persisted() {
        let (store, repo) = empty_repo().await;
        let post = repo.create(fields(GroupId::Onf, "a")).await.unwrap();

        let raw = store.get(POSTS_KEY).await.unwrap();
        let stored: Vec<Post> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, vec![post.clone()]);

        repo.delete(post.id).await.unwrap();
        assert_eq!(store.get(POSTS_KEY).await.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_collection_unchanged() {
        let repo = PostRepository::load(Arc::new(FailingStore)).await;
        let result = repo.create(fields(GroupId::Onf, "a")).await;
        assert!(result.is_err());
        assert!(repo.is_empty().await);
    }
}
