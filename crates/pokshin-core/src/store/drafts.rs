//! Per-group scratch storage for unfinished entries.

use std::sync::Arc;

use crate::domain::{DraftRecord, GroupId};
use crate::error::StoreError;
use crate::ports::KeyValueStore;

/// Prefix of the per-group draft keys.
pub const DRAFT_PREFIX: &str = "pokshin_archive_draft_";

pub fn draft_key(group: GroupId) -> String {
    format!("{DRAFT_PREFIX}{group}")
}

/// At most one draft per group; every save replaces the previous one.
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The saved draft, or `None` when there is none or it cannot be read.
    pub async fn load(&self, group: GroupId) -> Option<DraftRecord> {
        let raw = self.store.get(&draft_key(group)).await?;
        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::warn!(group = %group, error = %e, "Failed to load draft");
                None
            }
        }
    }

    pub async fn save(&self, group: GroupId, draft: &DraftRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(draft)?;
        self.store.set(&draft_key(group), &json).await?;
        tracing::debug!(group = %group, "Draft saved");
        Ok(())
    }

    pub async fn clear(&self, group: GroupId) -> Result<(), StoreError> {
        self.store.remove(&draft_key(group)).await?;
        tracing::debug!(group = %group, "Draft cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Genre, RichText};
    use crate::store::test_support::MemoryStore;

    fn draft(title: &str) -> DraftRecord {
        DraftRecord {
            title: Some(title.to_string()),
            genre: Some(vec![Genre::Disaster, Genre::Daily]),
            is_collab: Some(true),
            content: Some(RichText::from_plain_text("쓰는 중")),
            ..DraftRecord::default()
        }
    }

    fn drafts() -> (Arc<MemoryStore>, DraftStore) {
        let store = Arc::new(MemoryStore::default());
        (store.clone(), DraftStore::new(store))
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (_, drafts) = drafts();
        let saved = draft("초안");
        drafts.save(GroupId::Oneus, &saved).await.unwrap();
        assert_eq!(drafts.load(GroupId::Oneus).await, Some(saved));
    }

    #[tokio::test]
    async fn test_groups_are_isolated() {
        let (_, drafts) = drafts();
        let g = draft("G");
        let h = draft("H");
        drafts.save(GroupId::Onf, &h).await.unwrap();
        drafts.save(GroupId::Oneus, &g).await.unwrap();

        assert_eq!(drafts.load(GroupId::Onf).await, Some(h.clone()));

        drafts.clear(GroupId::Oneus).await.unwrap();
        assert_eq!(drafts.load(GroupId::Oneus).await, None);
        assert_eq!(drafts.load(GroupId::Onf).await, Some(h));
    }

    #[tokio::test]
    async fn test_save_replaces_wholesale() {
        let (_, drafts) = drafts();
        drafts.save(GroupId::Verivery, &draft("old")).await.unwrap();
        let replacement = DraftRecord {
            title: Some("new".to_string()),
            ..DraftRecord::default()
        };
        drafts.save(GroupId::Verivery, &replacement).await.unwrap();
        assert_eq!(drafts.load(GroupId::Verivery).await, Some(replacement));
    }

    #[tokio::test]
    async fn test_clear_missing_is_noop() {
        let (_, drafts) = drafts();
        drafts.clear(GroupId::P1harmony).await.unwrap();
        assert_eq!(drafts.load(GroupId::P1harmony).await, None);
    }

    #[tokio::test]
    async fn test_unreadable_draft_is_absent() {
        let (store, drafts) = drafts();
        store
            .set("pokshin_archive_draft_ONF", "<html>")
            .await
            .unwrap();
        assert_eq!(drafts.load(GroupId::Onf).await, None);
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(draft_key(GroupId::P1harmony), "pokshin_archive_draft_P1HARMONY");
    }
}
