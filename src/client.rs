use crate::{
    model::{Complementary, HealthReport, Recipe, User},
    utils::{Error, Result},
};
use json::json;
use serde::Deserialize;
use std::{
    fmt::{Debug, Formatter},
    ops::Deref,
};

macro_rules! api {
    ($api:expr, $($tt:tt)*) => {
        format!("{}/{}", $api, format!($($tt)*))
    };
}

/// Generation-backend replies are either the expected payload or an
/// `{ "error": "..." }` envelope; both arrive with HTTP 200.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reply<T> {
    Err { error: String },
    Ok(T),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err { error } => Err(Error::msg(error)),
        }
    }
}

#[derive(Deserialize)]
struct RecipesReply {
    recipes: Vec<Recipe>,
}

pub struct Client {
    api: String,
    inner: reqwest::Client,
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Client {{ api: {}, client: reqwest::Client }}", self.api)
    }
}

impl Deref for Client {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Client {
    pub const DEFAULT_API: &'static str = "http://localhost:9002/api";

    pub fn new(api: &str, inner: reqwest::Client) -> Self {
        Self {
            api: api.to_owned(),
            inner,
        }
    }

    /// Base URL from `FRIDGE_GENIE_API`, falling back to the dev default.
    pub fn from_env() -> Self {
        let api = std::env::var("FRIDGE_GENIE_API")
            .unwrap_or_else(|_| Self::DEFAULT_API.to_owned());
        Self::new(&api, reqwest::Client::new())
    }

    pub async fn sign_in(&self, email: &str) -> Result<User> {
        self.post(api!(self.api, "auth"))
            .json(&json!({ "email": email }))
            .send()
            .await?
            .json::<Reply<User>>()
            .await?
            .into_result()
    }

    pub async fn generate_recipes(&self, ingredients: &[String]) -> Result<Vec<Recipe>> {
        self.post(api!(self.api, "generate-recipes"))
            .json(&json!({ "ingredients": ingredients }))
            .send()
            .await?
            .json::<Reply<RecipesReply>>()
            .await?
            .into_result()
            .map(|reply| reply.recipes)
    }

    pub async fn complementary_ingredients(
        &self,
        ingredients: &[String],
        recipe_name: &str,
    ) -> Result<Complementary> {
        self.post(api!(self.api, "suggest-ingredients"))
            .json(&json!({
                "ingredients": ingredients,
                "recipeName": recipe_name,
            }))
            .send()
            .await?
            .json::<Reply<Complementary>>()
            .await?
            .into_result()
    }

    pub async fn healthier_recipe(&self, recipe: &Recipe) -> Result<HealthReport> {
        self.post(api!(self.api, "healthier-recipe"))
            .json(&json!({ "recipe": recipe }))
            .send()
            .await?
            .json::<Reply<HealthReport>>()
            .await?
            .into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    #[test]
    fn reply_decodes_recipes() {
        let raw = r#"{
            "recipes": [{
                "name": "Tomato Basil Pasta",
                "shortDescription": "Quick weeknight pasta.",
                "prepTime": "10 minutes",
                "cookTime": "15 minutes",
                "servings": "4 people",
                "difficulty": "Medium",
                "cuisine": "Italian",
                "calories": 420,
                "ingredients": ["2 cups flour"],
                "instructions": "1. Cook."
            }]
        }"#;
        let reply: Reply<RecipesReply> = json::from_str(raw).unwrap();
        let recipes = reply.into_result().map(|r| r.recipes).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].difficulty, Difficulty::Medium);
    }

    #[test]
    fn reply_decodes_error_envelope() {
        let reply: Reply<RecipesReply> =
            json::from_str(r#"{"error": "Failed to generate recipes. Please try again."}"#)
                .unwrap();
        let error = reply.into_result().map(|_| ()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Failed to generate recipes. Please try again."
        );
    }

    #[test]
    fn complementary_accepts_both_wire_shapes() {
        let flat: Reply<Complementary> = json::from_str(
            r#"{"suggestedIngredients": ["Garlic", "Lemon"], "reasoning": "Brightness."}"#,
        )
        .unwrap();
        assert!(matches!(
            flat.into_result().unwrap(),
            Complementary::Flat { ingredients, .. } if ingredients.len() == 2
        ));

        let categorized: Reply<Complementary> = json::from_str(
            r#"{
                "suggestedCategories": [{"category": "Herbs", "items": ["Basil"]}],
                "reasoning": "Aromatics."
            }"#,
        )
        .unwrap();
        assert!(matches!(
            categorized.into_result().unwrap(),
            Complementary::Categorized { categories, .. } if categories[0].category == "Herbs"
        ));
    }
}
