use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
        .fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub short_description: String,
    pub prep_time: String,
    pub cook_time: String,
    /// Free text, e.g. "4 people".
    pub servings: String,
    pub difficulty: Difficulty,
    pub cuisine: String,
    /// Per serving.
    pub calories: f64,
    pub ingredients: Vec<String>,
    /// Single blob with numbered steps embedded.
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

/// A generated recipe decorated for display: a session-stable id and a
/// placeholder illustration. The id is the sole key for favorite checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeWithId {
    pub id: String,
    pub image: String,
    pub image_hint: String,
    #[serde(flatten)]
    pub recipe: Recipe,
}

/// Favorites collection document: the saved recipe plus the creation
/// timestamp the store assigns at write time (unix millis).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(flatten)]
    pub recipe: RecipeWithId,
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientCategory {
    pub category: String,
    pub items: Vec<String>,
}

/// Complementary-ingredient reply. The backend has shipped two shapes; both
/// are accepted and rendered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Complementary {
    Categorized {
        #[serde(rename = "suggestedCategories")]
        categories: Vec<IngredientCategory>,
        reasoning: String,
    },
    Flat {
        #[serde(rename = "suggestedIngredients")]
        ingredients: Vec<String>,
        reasoning: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSwap {
    pub original_ingredient: String,
    pub healthier_alternative: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub suggestions: Vec<HealthSwap>,
    pub general_tips: String,
}

/// Storage key for favorites and shopping list documents: lowercased, with
/// whitespace runs and slashes collapsed to hyphens. Lossy; colliding names
/// overwrite rather than duplicate.
pub fn slug(name: &str) -> String {
    static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s/]+").unwrap());
    SEPARATOR
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

static STEP_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\s").unwrap());

/// Splits an instruction blob on its embedded `1. `-style numbering.
pub fn instruction_steps(instructions: &str) -> Vec<String> {
    STEP_BOUNDARY
        .split(instructions)
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub struct Placeholder {
    pub url: &'static str,
    pub hint: &'static str,
}

/// Fixed pool of illustrative images cycled round-robin over each
/// generation batch.
pub const PLACEHOLDERS: [Placeholder; 6] = [
    Placeholder {
        url: "https://picsum.photos/seed/fridge-genie-1/800/400",
        hint: "rustic pasta",
    },
    Placeholder {
        url: "https://picsum.photos/seed/fridge-genie-2/800/400",
        hint: "fresh salad",
    },
    Placeholder {
        url: "https://picsum.photos/seed/fridge-genie-3/800/400",
        hint: "hearty stew",
    },
    Placeholder {
        url: "https://picsum.photos/seed/fridge-genie-4/800/400",
        hint: "grilled dish",
    },
    Placeholder {
        url: "https://picsum.photos/seed/fridge-genie-5/800/400",
        hint: "baked casserole",
    },
    Placeholder {
        url: "https://picsum.photos/seed/fridge-genie-6/800/400",
        hint: "stir fry",
    },
];

pub fn placeholder(index: usize) -> &'static Placeholder {
    &PLACEHOLDERS[index % PLACEHOLDERS.len()]
}
