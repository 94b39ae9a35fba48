//! In-memory editing sessions, keyed by resume id.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::editor::document::EditableResume;

#[derive(Clone, Default)]
pub struct EditorStore {
    resumes: Arc<RwLock<HashMap<Uuid, EditableResume>>>,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, resume: EditableResume) -> Uuid {
        let id = resume.id;
        self.resumes.write().await.insert(id, resume);
        id
    }

    /// Snapshot of the session. Later edits are not reflected in the clone.
    pub async fn get(&self, id: Uuid) -> Option<EditableResume> {
        self.resumes.read().await.get(&id).cloned()
    }

    /// Runs `f` against the session under the write lock.
    pub async fn update<F, R>(&self, id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut EditableResume) -> R,
    {
        self.resumes.write().await.get_mut(&id).map(f)
    }

    pub async fn remove(&self, id: Uuid) -> Option<EditableResume> {
        self.resumes.write().await.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = EditorStore::new();
        let id = store.insert(EditableResume::new("text")).await;

        assert_eq!(store.get(id).await.unwrap().raw_text, "text");
        assert!(store.remove(id).await.is_some());
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_update_is_shared_across_clones() {
        let store = EditorStore::new();
        let id = store.insert(EditableResume::new("")).await;

        let handle = store.clone();
        let added = handle
            .update(id, |resume| resume.add_section("Skills", "- Rust"))
            .await;
        assert_eq!(added, Some(true));

        let resume = store.get(id).await.unwrap();
        assert_eq!(resume.section("Skills").unwrap().content, "- Rust");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = EditorStore::new();
        assert!(store.update(Uuid::new_v4(), |_| ()).await.is_none());
    }
}
