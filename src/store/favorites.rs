use super::collection::{Collection, Snapshot};
use crate::{
    model::{slug, Favorite, RecipeWithId},
    utils::Result,
};
use std::{
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::watch;
use tracing::info;

/// Per-user saved recipes, keyed by `slug(recipe.name)`. Saving a recipe
/// with an already-saved name overwrites the prior entry; membership is
/// checked by recipe id against the latest snapshot.
#[derive(Debug, Clone)]
pub struct Favorites {
    inner: Arc<Collection<Favorite>>,
}

impl Favorites {
    pub async fn open(path: PathBuf) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Collection::open(path).await?),
        })
    }

    pub async fn add(&self, recipe: RecipeWithId) -> Result<()> {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64);
        info!(recipe = %recipe.recipe.name, "saving favorite");
        self.inner
            .insert(slug(&recipe.recipe.name), Favorite { recipe, created_at })
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        let id = id.to_owned();
        self.inner
            .remove_where(move |favorite| favorite.recipe.id == id)
            .await
    }

    /// `None` until the first snapshot: indeterminate, not false.
    pub fn is_favorite(&self, id: &str) -> Option<bool> {
        match self.inner.snapshot() {
            Snapshot::Loading => None,
            Snapshot::Ready(docs) => {
                Some(docs.values().any(|favorite| favorite.recipe.id == id))
            }
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Favorite>> {
        self.inner.subscribe()
    }
}

/// Membership by recipe id against a pushed snapshot.
pub fn is_favorite(snapshot: &Snapshot<Favorite>, id: &str) -> Option<bool> {
    match snapshot {
        Snapshot::Loading => None,
        Snapshot::Ready(docs) => Some(docs.values().any(|favorite| favorite.recipe.id == id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Recipe};

    fn recipe(id: &str, name: &str) -> RecipeWithId {
        RecipeWithId {
            id: id.into(),
            image: String::new(),
            image_hint: String::new(),
            recipe: Recipe {
                name: name.into(),
                short_description: String::new(),
                prep_time: String::new(),
                cook_time: String::new(),
                servings: "4 people".into(),
                difficulty: Difficulty::Easy,
                cuisine: String::new(),
                calories: 0.0,
                ingredients: vec![],
                instructions: String::new(),
                nutrition: None,
            },
        }
    }

    async fn scratch() -> (tempfile::TempDir, Favorites) {
        let dir = tempfile::tempdir().unwrap();
        let favorites = Favorites::open(dir.path().join("favorites.json"))
            .await
            .unwrap();
        (dir, favorites)
    }

    #[tokio::test]
    async fn add_then_check_round_trips_through_snapshots() {
        let (_dir, favorites) = scratch().await;
        let mut rx = favorites.subscribe();

        favorites.add(recipe("1-0", "Caprese Salad")).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(is_favorite(&rx.borrow_and_update(), "1-0"), Some(true));

        favorites.remove("1-0").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(is_favorite(&rx.borrow_and_update(), "1-0"), Some(false));
    }

    #[tokio::test]
    async fn same_name_overwrites_instead_of_duplicating() {
        let (_dir, favorites) = scratch().await;
        favorites.add(recipe("1-0", "Caprese Salad")).await.unwrap();
        favorites.add(recipe("2-0", "Caprese Salad")).await.unwrap();

        assert_eq!(favorites.is_favorite("1-0"), Some(false));
        assert_eq!(favorites.is_favorite("2-0"), Some(true));
    }

    #[tokio::test]
    async fn remove_absent_id_is_noop() {
        let (_dir, favorites) = scratch().await;
        favorites.add(recipe("1-0", "Caprese Salad")).await.unwrap();
        favorites.remove("not-there").await.unwrap();
        assert_eq!(favorites.is_favorite("1-0"), Some(true));
    }

    #[test]
    fn membership_is_indeterminate_before_first_snapshot() {
        assert_eq!(is_favorite(&Snapshot::Loading, "1-0"), None);
    }
}
