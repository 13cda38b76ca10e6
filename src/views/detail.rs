use crate::{
    client::Client,
    model::{instruction_steps, Complementary, HealthReport, RecipeWithId},
    scale,
    utils::Result,
};
use iced::{
    widget::{button, column, container, horizontal_rule, row, scrollable, text},
    Command, Element, Length,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
enum Fetch<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Fetch<T> {
    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Failed(error.to_string()),
        }
    }
}

#[derive(Debug)]
struct Current {
    recipe: RecipeWithId,
    original_servings: u32,
    servings: u32,
    complementary: Fetch<Complementary>,
    health: Fetch<HealthReport>,
}

#[derive(Debug, Clone)]
pub enum Message {
    Open(RecipeWithId),
    Close,

    MoreServings,
    FewerServings,

    Complementary {
        id: String,
        result: Result<Complementary>,
    },
    Health {
        id: String,
        result: Result<HealthReport>,
    },

    /// Handled by the shell (needs the session).
    ToggleFavorite,
    AddToList(String),
}

/// Recipe detail: the serving-size counter and two secondary requests that
/// fire on open, independently of each other. Results arriving for a recipe
/// that is no longer shown are discarded; reopening re-requests.
#[derive(Debug)]
pub struct Detail {
    client: Arc<Client>,
    current: Option<Current>,
}

impl Detail {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            current: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn recipe(&self) -> Option<&RecipeWithId> {
        self.current.as_ref().map(|current| &current.recipe)
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Open(recipe) => {
                let servings = scale::declared_servings(&recipe.recipe.servings);
                let commands = self.request_suggestions(&recipe);
                self.current = Some(Current {
                    recipe,
                    original_servings: servings,
                    servings,
                    complementary: Fetch::Loading,
                    health: Fetch::Loading,
                });
                commands
            }
            Message::Close => {
                self.current = None;
                Command::none()
            }
            Message::MoreServings => {
                if let Some(current) = &mut self.current {
                    current.servings += 1;
                }
                Command::none()
            }
            Message::FewerServings => {
                if let Some(current) = &mut self.current {
                    current.servings = current.servings.saturating_sub(1).max(1);
                }
                Command::none()
            }
            Message::Complementary { id, result } => {
                match &mut self.current {
                    Some(current) if current.recipe.id == id => {
                        current.complementary = Fetch::from_result(result);
                    }
                    _ => debug!(id, "discarding complementary reply for a closed recipe"),
                }
                Command::none()
            }
            Message::Health { id, result } => {
                match &mut self.current {
                    Some(current) if current.recipe.id == id => {
                        current.health = Fetch::from_result(result);
                    }
                    _ => debug!(id, "discarding health reply for a closed recipe"),
                }
                Command::none()
            }
            Message::ToggleFavorite | Message::AddToList(_) => Command::none(),
        }
    }

    /// Two independent requests, each tagged with the recipe id so stale
    /// replies can be dropped on arrival. One failing never touches the
    /// other.
    fn request_suggestions(&self, recipe: &RecipeWithId) -> Command<Message> {
        let complementary = {
            let client = self.client.clone();
            let id = recipe.id.clone();
            let ingredients = recipe.recipe.ingredients.clone();
            let name = recipe.recipe.name.clone();
            Command::perform(
                async move { client.complementary_ingredients(&ingredients, &name).await },
                move |result| Message::Complementary { id, result },
            )
        };
        let health = {
            let client = self.client.clone();
            let id = recipe.id.clone();
            let inner = recipe.recipe.clone();
            Command::perform(
                async move { client.healthier_recipe(&inner).await },
                move |result| Message::Health { id, result },
            )
        };
        Command::batch([complementary, health])
    }

    pub fn view(&self, favorite: Option<bool>) -> Element<'_, Message> {
        let Some(current) = &self.current else {
            return text("").into();
        };
        let recipe = &current.recipe;

        let favorite_label = match favorite {
            Some(true) => "Saved",
            Some(false) => "Save",
            None => "Save...",
        };
        let header = row![
            button("Back").on_press(Message::Close),
            text(recipe.recipe.name.clone()).size(28),
            button(favorite_label).on_press(Message::ToggleFavorite),
        ]
        .spacing(12);

        let meta = row![
            text(format!("{} cuisine", recipe.recipe.cuisine)).size(14),
            text(recipe.recipe.difficulty.to_string()).size(14),
            text(format!("{} kcal per serving", recipe.recipe.calories)).size(14),
            text(format!(
                "prep {} / cook {}",
                recipe.recipe.prep_time, recipe.recipe.cook_time
            ))
            .size(14),
        ]
        .spacing(12);

        let servings = row![
            text("Servings:"),
            button("-").on_press(Message::FewerServings),
            text(current.servings.to_string()),
            button("+").on_press(Message::MoreServings),
            text(format!("(recipe: {})", recipe.recipe.servings)).size(13),
        ]
        .spacing(8);

        let ingredient = |description: &String| {
            let adjusted =
                scale::adjust(description, current.original_servings, current.servings);
            row![
                text(adjusted),
                button(text("+ list").size(12))
                    .on_press(Message::AddToList(description.clone())),
            ]
            .spacing(8)
            .into()
        };
        let ingredients = column(
            recipe
                .recipe
                .ingredients
                .iter()
                .map(ingredient)
                .collect::<Vec<_>>(),
        )
        .spacing(4);

        let steps = column(
            instruction_steps(&recipe.recipe.instructions)
                .into_iter()
                .enumerate()
                .map(|(index, step)| text(format!("{}. {step}", index + 1)).into())
                .collect::<Vec<_>>(),
        )
        .spacing(6);

        let content = column![
            header,
            text(format!("illustration: {}", recipe.image_hint)).size(12),
            meta,
            horizontal_rule(2),
            servings,
            text("Ingredients").size(20),
            ingredients,
            text("Instructions").size(20),
            steps,
            horizontal_rule(2),
            text("Genie's Suggestions").size(20),
            Self::complementary(&current.complementary),
            text("Health Tips").size(20),
            Self::health(&current.health),
        ]
        .spacing(12);

        container(scrollable(content).height(Length::Fill))
            .padding(16)
            .into()
    }

    fn complementary(fetch: &Fetch<Complementary>) -> Element<'_, Message> {
        match fetch {
            Fetch::Loading => text("Thinking of complementary ingredients...").into(),
            Fetch::Failed(_) => text("Could not get suggestions at this time.").into(),
            Fetch::Ready(Complementary::Flat {
                ingredients,
                reasoning,
            }) => column![
                text(reasoning.clone()).size(14),
                text(ingredients.join(", ")),
            ]
            .spacing(6)
            .into(),
            Fetch::Ready(Complementary::Categorized {
                categories,
                reasoning,
            }) => {
                let group = |category: &crate::model::IngredientCategory| {
                    text(format!(
                        "{}: {}",
                        category.category,
                        category.items.join(", ")
                    ))
                    .into()
                };
                column![
                    text(reasoning.clone()).size(14),
                    column(categories.iter().map(group).collect::<Vec<_>>()).spacing(4),
                ]
                .spacing(6)
                .into()
            }
        }
    }

    fn health(fetch: &Fetch<HealthReport>) -> Element<'_, Message> {
        match fetch {
            Fetch::Loading => text("The Genie is thinking...").into(),
            Fetch::Failed(_) => text("Could not get health tips at this time.").into(),
            Fetch::Ready(report) => {
                let swap = |swap: &crate::model::HealthSwap| {
                    column![
                        text(format!(
                            "Instead of {}, try {}.",
                            swap.original_ingredient, swap.healthier_alternative
                        )),
                        text(swap.reasoning.clone()).size(13),
                    ]
                    .spacing(2)
                    .into()
                };
                column![
                    column(report.suggestions.iter().map(swap).collect::<Vec<_>>())
                        .spacing(8),
                    text(format!("General tips: {}", report.general_tips)).size(14),
                ]
                .spacing(10)
                .into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errorf,
        model::{Difficulty, Recipe},
    };

    fn detail() -> Detail {
        Detail::new(Arc::new(Client::new(
            "http://localhost:0/api",
            reqwest::Client::new(),
        )))
    }

    fn recipe(id: &str, servings: &str) -> RecipeWithId {
        RecipeWithId {
            id: id.into(),
            image: String::new(),
            image_hint: String::new(),
            recipe: Recipe {
                name: "Caprese".into(),
                short_description: String::new(),
                prep_time: String::new(),
                cook_time: String::new(),
                servings: servings.into(),
                difficulty: Difficulty::Easy,
                cuisine: String::new(),
                calories: 0.0,
                ingredients: vec!["2 cups flour".into()],
                instructions: "1. Cook.".into(),
                nutrition: None,
            },
        }
    }

    fn complementary() -> Complementary {
        Complementary::Flat {
            ingredients: vec!["Garlic".into()],
            reasoning: "Depth.".into(),
        }
    }

    #[test]
    fn open_starts_at_the_declared_serving_count() {
        let mut view = detail();
        let _ = view.update(Message::Open(recipe("1-0", "4 people")));
        let current = view.current.as_ref().unwrap();
        assert_eq!(current.servings, 4);
        assert_eq!(current.original_servings, 4);
        assert!(matches!(current.complementary, Fetch::Loading));
        assert!(matches!(current.health, Fetch::Loading));
    }

    #[test]
    fn servings_are_bounded_below_by_one() {
        let mut view = detail();
        let _ = view.update(Message::Open(recipe("1-0", "1 person")));
        let _ = view.update(Message::FewerServings);
        let _ = view.update(Message::FewerServings);
        assert_eq!(view.current.as_ref().unwrap().servings, 1);
    }

    #[test]
    fn viewing_a_different_recipe_resets_the_counter() {
        let mut view = detail();
        let _ = view.update(Message::Open(recipe("1-0", "4 people")));
        let _ = view.update(Message::MoreServings);
        let _ = view.update(Message::MoreServings);
        assert_eq!(view.current.as_ref().unwrap().servings, 6);

        let _ = view.update(Message::Open(recipe("2-0", "2 people")));
        assert_eq!(view.current.as_ref().unwrap().servings, 2);
    }

    #[test]
    fn replies_for_other_recipes_are_discarded() {
        let mut view = detail();
        let _ = view.update(Message::Open(recipe("1-0", "4 people")));
        let _ = view.update(Message::Complementary {
            id: "9-9".into(),
            result: Ok(complementary()),
        });
        assert!(matches!(
            view.current.as_ref().unwrap().complementary,
            Fetch::Loading
        ));

        let _ = view.update(Message::Complementary {
            id: "1-0".into(),
            result: Ok(complementary()),
        });
        assert!(matches!(
            view.current.as_ref().unwrap().complementary,
            Fetch::Ready(_)
        ));
    }

    #[test]
    fn one_requester_failing_leaves_the_other_intact() {
        let mut view = detail();
        let _ = view.update(Message::Open(recipe("1-0", "4 people")));
        let _ = view.update(Message::Health {
            id: "1-0".into(),
            result: Err(errorf!("backend down")),
        });

        let current = view.current.as_ref().unwrap();
        assert!(matches!(current.health, Fetch::Failed(_)));
        assert!(matches!(current.complementary, Fetch::Loading));
    }

    #[test]
    fn replies_after_close_are_dropped() {
        let mut view = detail();
        let _ = view.update(Message::Open(recipe("1-0", "4 people")));
        let _ = view.update(Message::Close);
        let _ = view.update(Message::Complementary {
            id: "1-0".into(),
            result: Ok(complementary()),
        });
        assert!(!view.is_open());
    }
}
