pub mod collection;
pub mod favorites;
pub mod shopping;

pub use collection::Snapshot;
pub use favorites::Favorites;
pub use shopping::ShoppingList;

use crate::utils::Result;
use std::{hash::Hash, path::PathBuf, sync::Arc};
use tokio::sync::watch;
use tracing::info;

/// Per-user document store, constructed at sign-in and passed by reference
/// to every consumer. Collections live under `<root>/users/<uid>/`.
#[derive(Debug)]
pub struct StoreService {
    pub favorites: Favorites,
    pub shopping: ShoppingList,
}

impl StoreService {
    pub async fn open(root: PathBuf, uid: &str) -> Result<Arc<Self>> {
        let dir = root.join("users").join(uid);
        tokio::fs::create_dir_all(&dir).await?;
        info!(dir = %dir.display(), "opening user store");

        Ok(Arc::new(Self {
            favorites: Favorites::open(dir.join("favorites.json")).await?,
            shopping: ShoppingList::open(dir.join("shopping-list.json")).await?,
        }))
    }

    /// Store root from `FRIDGE_GENIE_DATA`, falling back to the platform
    /// data directory.
    pub fn default_root() -> PathBuf {
        std::env::var_os("FRIDGE_GENIE_DATA").map_or_else(
            || {
                dirs::data_local_dir()
                    .unwrap_or_else(std::env::temp_dir)
                    .join("fridge-genie")
            },
            PathBuf::from,
        )
    }
}

/// Bridges a collection's watch channel into an iced subscription: emits the
/// current snapshot immediately, then one message per committed mutation.
/// Dropping the subscription (session teardown) drops the receiver.
pub fn snapshots<I, T>(id: I, rx: watch::Receiver<Snapshot<T>>) -> iced::Subscription<Snapshot<T>>
where
    I: Hash + 'static,
    T: Clone + Send + Sync + 'static,
{
    iced::subscription::unfold(id, (rx, false), |(mut rx, primed)| async move {
        if primed && rx.changed().await.is_err() {
            // Store dropped; park until iced tears the subscription down.
            futures::future::pending::<()>().await;
        }
        let snapshot = rx.borrow_and_update().clone();
        (snapshot, (rx, true))
    })
}
