use super::collection::{Collection, Snapshot};
use crate::{
    errorf,
    model::{slug, ShoppingItem},
    utils::Result,
};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::watch;
use tracing::info;

/// Per-user shopping list: `{name}` documents keyed by `slug(name)`.
#[derive(Debug, Clone)]
pub struct ShoppingList {
    inner: Arc<Collection<ShoppingItem>>,
}

impl ShoppingList {
    pub async fn open(path: PathBuf) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Collection::open(path).await?),
        })
    }

    /// Rejects names already on the list (by slug); the caller surfaces the
    /// error as a notice.
    pub async fn add(&self, name: &str) -> Result<()> {
        let key = slug(name);
        if self.inner.snapshot().contains(&key) == Some(true) {
            return Err(errorf!("{name} is already on your shopping list."));
        }
        info!(ingredient = name, "adding to shopping list");
        self.inner
            .insert(key, ShoppingItem { name: name.to_owned() })
            .await
    }

    pub async fn remove(&self, name: &str) -> Result<()> {
        self.inner.remove(&slug(name)).await
    }

    /// All-or-nothing; on failure the prior snapshot stands unchanged.
    pub async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }

    pub fn is_in_list(&self, name: &str) -> Option<bool> {
        self.inner.snapshot().contains(&slug(name))
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<ShoppingItem>> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn scratch() -> (tempfile::TempDir, ShoppingList) {
        let dir = tempfile::tempdir().unwrap();
        let list = ShoppingList::open(dir.path().join("shopping-list.json"))
            .await
            .unwrap();
        (dir, list)
    }

    #[tokio::test]
    async fn add_and_membership_by_slug() {
        let (_dir, list) = scratch().await;
        list.add("Olive Oil").await.unwrap();

        assert_eq!(list.is_in_list("Olive Oil"), Some(true));
        // Slug equality, not raw string equality.
        assert_eq!(list.is_in_list("olive   oil"), Some(true));
        assert_eq!(list.is_in_list("Butter"), Some(false));
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected_and_size_unchanged() {
        let (_dir, list) = scratch().await;
        let mut rx = list.subscribe();
        list.add("Olive Oil").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        let error = list.add("olive oil").await.unwrap_err();
        assert!(error.to_string().contains("already on your shopping list"));
        assert_eq!(list.subscribe().borrow().len(), 1);
    }

    #[tokio::test]
    async fn clear_results_in_an_empty_snapshot() {
        let (_dir, list) = scratch().await;
        for name in ["Milk", "Eggs", "Flour"] {
            list.add(name).await.unwrap();
        }
        list.clear().await.unwrap();
        assert_eq!(list.subscribe().borrow().len(), 0);
    }

    #[tokio::test]
    async fn remove_deletes_by_slug() {
        let (_dir, list) = scratch().await;
        list.add("Olive Oil").await.unwrap();
        list.remove("OLIVE OIL").await.unwrap();
        assert_eq!(list.is_in_list("Olive Oil"), Some(false));
    }
}
