use crate::utils::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::BTreeMap, path::PathBuf};
use tokio::sync::{watch, Mutex};
use tracing::debug;

/// The most recently pushed, internally consistent view of a collection.
/// `Loading` means no snapshot has arrived yet; membership checks against it
/// are indeterminate, not false.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot<T> {
    Loading,
    Ready(BTreeMap<String, T>),
}

impl<T> Snapshot<T> {
    pub fn contains(&self, key: &str) -> Option<bool> {
        match self {
            Self::Loading => None,
            Self::Ready(docs) => Some(docs.contains_key(key)),
        }
    }

    pub fn docs(&self) -> impl Iterator<Item = (&String, &T)> {
        match self {
            Self::Loading => None,
            Self::Ready(docs) => Some(docs.iter()),
        }
        .into_iter()
        .flatten()
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Loading => 0,
            Self::Ready(docs) => docs.len(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// A keyed document collection persisted as one JSON file. Every committed
/// mutation broadcasts a full snapshot to all subscribers; duplicate keys
/// overwrite (last write wins). Writes go through a temp-file rename, so a
/// failed commit leaves both the file and the last snapshot untouched.
pub struct Collection<T> {
    path: PathBuf,
    state: Mutex<BTreeMap<String, T>>,
    tx: watch::Sender<Snapshot<T>>,
}

impl<T> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Collection {{ path: {} }}", self.path.display())
    }
}

impl<T> Collection<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub async fn open(path: PathBuf) -> Result<Self> {
        let docs: BTreeMap<String, T> = match tokio::fs::read(&path).await {
            Ok(bytes) => json::from_slice(&bytes)?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };
        debug!(path = %path.display(), docs = docs.len(), "collection opened");

        let (tx, _) = watch::channel(Snapshot::Loading);
        tx.send_replace(Snapshot::Ready(docs.clone()));
        Ok(Self {
            path,
            state: Mutex::new(docs),
            tx,
        })
    }

    /// New subscribers receive the current snapshot immediately, then every
    /// committed mutation. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.tx.borrow().clone()
    }

    pub async fn insert(&self, key: String, value: T) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        next.insert(key, value);
        self.commit(&mut state, next).await
    }

    /// Absent keys are a no-op.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.contains_key(key) {
            return Ok(());
        }
        let mut next = state.clone();
        next.remove(key);
        self.commit(&mut state, next).await
    }

    /// Removes the first document matching `predicate`; absent is a no-op.
    pub async fn remove_where(&self, predicate: impl Fn(&T) -> bool) -> Result<()> {
        let mut state = self.state.lock().await;
        let Some(key) = state
            .iter()
            .find(|(_, doc)| predicate(doc))
            .map(|(key, _)| key.clone())
        else {
            return Ok(());
        };
        let mut next = state.clone();
        next.remove(&key);
        self.commit(&mut state, next).await
    }

    /// All-or-nothing: the empty state is committed with a single file
    /// replace, so a failure leaves the prior snapshot fully intact.
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.commit(&mut state, BTreeMap::new()).await
    }

    async fn commit(
        &self,
        state: &mut BTreeMap<String, T>,
        next: BTreeMap<String, T>,
    ) -> Result<()> {
        self.persist(&next).await?;
        *state = next;
        self.tx.send_replace(Snapshot::Ready(state.clone()));
        Ok(())
    }

    async fn persist(&self, docs: &BTreeMap<String, T>) -> Result<()> {
        let bytes = json::to_vec_pretty(docs)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
