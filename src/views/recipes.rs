use crate::{
    client::Client,
    model::{placeholder, Recipe, RecipeWithId},
    utils::Result,
};
use iced::{
    widget::{button, column, container, row, scrollable, text},
    Command, Element, Length,
};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::debug;

#[derive(Debug, PartialEq)]
enum State {
    /// Nothing requested yet this session.
    Idle,
    Loading,
    Ready,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// A generation request carrying the current (non-empty) ingredient set.
    Request(Vec<String>),
    /// Re-issues the identical last payload.
    Retry,
    Generated {
        seq: u64,
        result: Result<Vec<Recipe>>,
    },

    /// Routed by the shell to the detail view.
    Select(RecipeWithId),
}

/// The generation request cycle and recipe grid. Requests carry a sequence
/// number; a completion that is not the latest issued request is discarded,
/// so the displayed list always belongs to the newest request.
#[derive(Debug)]
pub struct Recipes {
    client: Arc<Client>,
    state: State,
    recipes: Vec<RecipeWithId>,
    error: Option<String>,
    last_request: Option<Vec<String>>,
    seq: u64,
}

/// Decorates a response batch: ids monotonic within the batch, images drawn
/// round-robin from the placeholder pool.
pub fn assign_ids(recipes: Vec<Recipe>) -> Vec<RecipeWithId> {
    let batch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    recipes
        .into_iter()
        .enumerate()
        .map(|(index, recipe)| {
            let placeholder = placeholder(index);
            RecipeWithId {
                id: format!("{batch}-{index}"),
                image: placeholder.url.to_owned(),
                image_hint: placeholder.hint.to_owned(),
                recipe,
            }
        })
        .collect()
}

impl Recipes {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            state: State::Idle,
            recipes: Vec::new(),
            error: None,
            last_request: None,
            seq: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == State::Loading
    }

    pub fn recipes(&self) -> &[RecipeWithId] {
        &self.recipes
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Request(ingredients) => {
                if ingredients.is_empty() {
                    // The shell rejects this before routing.
                    return Command::none();
                }
                self.issue(ingredients)
            }
            Message::Retry => match self.last_request.clone() {
                Some(payload) => self.issue(payload),
                None => Command::none(),
            },
            Message::Generated { seq, result } => {
                if seq != self.seq {
                    debug!(seq, current = self.seq, "discarding stale generation response");
                    return Command::none();
                }
                self.state = State::Ready;
                match result {
                    Ok(recipes) => {
                        self.error = None;
                        self.recipes = assign_ids(recipes);
                    }
                    Err(error) => {
                        self.error = Some(error.to_string());
                        self.recipes.clear();
                    }
                }
                Command::none()
            }
            Message::Select(_) => Command::none(),
        }
    }

    fn issue(&mut self, payload: Vec<String>) -> Command<Message> {
        self.seq += 1;
        let seq = self.seq;
        self.state = State::Loading;
        self.recipes.clear();
        self.error = None;
        self.last_request = Some(payload.clone());

        let client = self.client.clone();
        Command::perform(
            async move { client.generate_recipes(&payload).await },
            move |result| Message::Generated { seq, result },
        )
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.state {
            State::Loading => text("The Genie is thinking...").size(18).into(),
            _ if self.error.is_some() => {
                let message = self.error.clone().unwrap_or_default();
                column![
                    text("Error").size(20),
                    text(message),
                    button("Try again").on_press(Message::Retry),
                ]
                .spacing(8)
                .into()
            }
            State::Idle | State::Ready if self.recipes.is_empty() => column![
                text("No Recipes Yet").size(20),
                text("Add some ingredients and click \"Generate Recipes\" to get started!"),
            ]
            .spacing(8)
            .into(),
            _ => {
                let cards = self.recipes.iter().map(|recipe| Self::card(recipe));
                scrollable(column(cards.collect::<Vec<_>>()).spacing(12))
                    .height(Length::Fill)
                    .into()
            }
        };

        container(content)
            .width(Length::Fill)
            .padding(16)
            .into()
    }

    fn card(recipe: &RecipeWithId) -> Element<'_, Message> {
        let meta = row![
            text(recipe.recipe.cuisine.clone()).size(14),
            text(recipe.recipe.difficulty.to_string()).size(14),
            text(format!("{} kcal", recipe.recipe.calories)).size(14),
            text(format!(
                "prep {} / cook {}",
                recipe.recipe.prep_time, recipe.recipe.cook_time
            ))
            .size(14),
        ]
        .spacing(12);

        container(
            column![
                text(recipe.recipe.name.clone()).size(22),
                text(recipe.recipe.short_description.clone()).size(15),
                meta,
                button("View recipe").on_press(Message::Select(recipe.clone())),
            ]
            .spacing(6),
        )
        .padding(12)
        .width(Length::Fill)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errorf, model::Difficulty, model::PLACEHOLDERS};

    fn recipes() -> Recipes {
        Recipes::new(Arc::new(Client::new(
            "http://localhost:0/api",
            reqwest::Client::new(),
        )))
    }

    fn recipe(name: &str) -> Recipe {
        Recipe {
            name: name.into(),
            short_description: "A dish.".into(),
            prep_time: "10 minutes".into(),
            cook_time: "20 minutes".into(),
            servings: "4 people".into(),
            difficulty: Difficulty::Easy,
            cuisine: "Italian".into(),
            calories: 400.0,
            ingredients: vec!["2 cups flour".into()],
            instructions: "1. Cook.".into(),
            nutrition: None,
        }
    }

    #[test]
    fn request_enters_loading_and_remembers_payload() {
        let mut view = recipes();
        let payload = vec!["Tomatoes".to_owned(), "Cheese".to_owned(), "Basil".to_owned()];
        let _ = view.update(Message::Request(payload.clone()));

        assert!(view.is_loading());
        assert!(view.recipes().is_empty());
        assert_eq!(view.last_request.as_deref(), Some(payload.as_slice()));
    }

    #[test]
    fn empty_request_is_a_local_noop() {
        let mut view = recipes();
        let _ = view.update(Message::Request(vec![]));
        assert!(!view.is_loading());
        assert!(view.last_request.is_none());
    }

    #[test]
    fn successful_batch_gets_distinct_ids_and_pool_images() {
        let mut view = recipes();
        let _ = view.update(Message::Request(vec!["Tomatoes".into()]));
        let _ = view.update(Message::Generated {
            seq: 1,
            result: Ok(vec![recipe("Caprese"), recipe("Margherita")]),
        });

        assert!(!view.is_loading());
        let cards = view.recipes();
        assert_eq!(cards.len(), 2);
        assert_ne!(cards[0].id, cards[1].id);
        assert_eq!(cards[0].image, PLACEHOLDERS[0].url);
        assert_eq!(cards[1].image, PLACEHOLDERS[1].url);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut view = recipes();
        let _ = view.update(Message::Request(vec!["Tomatoes".into()]));
        let _ = view.update(Message::Request(vec!["Tomatoes".into(), "Basil".into()]));

        // The first request resolves after the second was issued.
        let _ = view.update(Message::Generated {
            seq: 1,
            result: Ok(vec![recipe("Stale")]),
        });
        assert!(view.is_loading());
        assert!(view.recipes().is_empty());

        let _ = view.update(Message::Generated {
            seq: 2,
            result: Ok(vec![recipe("Fresh")]),
        });
        assert_eq!(view.recipes()[0].recipe.name, "Fresh");
    }

    #[test]
    fn failure_surfaces_one_message_and_retry_reissues_same_payload() {
        let mut view = recipes();
        let payload = vec!["Tomatoes".to_owned()];
        let _ = view.update(Message::Request(payload.clone()));
        let _ = view.update(Message::Generated {
            seq: 1,
            result: Err(errorf!("Failed to generate recipes. Please try again.")),
        });

        assert!(!view.is_loading());
        assert!(view.recipes().is_empty());
        assert_eq!(
            view.error.as_deref(),
            Some("Failed to generate recipes. Please try again.")
        );

        let _ = view.update(Message::Retry);
        assert!(view.is_loading());
        assert_eq!(view.last_request.as_deref(), Some(payload.as_slice()));
        assert_eq!(view.seq, 2);
    }

    #[test]
    fn ids_are_monotonic_within_a_batch() {
        let batch = assign_ids(vec![recipe("A"), recipe("B"), recipe("C")]);
        let suffixes: Vec<_> = batch
            .iter()
            .map(|r| r.id.rsplit('-').next().unwrap().to_owned())
            .collect();
        assert_eq!(suffixes, ["0", "1", "2"]);
    }
}
