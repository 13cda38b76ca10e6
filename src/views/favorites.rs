use crate::{
    model::{Favorite, RecipeWithId},
    store::Snapshot,
};
use iced::{
    widget::{button, column, container, row, scrollable, text},
    Element, Length,
};

#[derive(Debug, Clone)]
pub enum Message {
    /// Routed by the shell to the detail view.
    Select(RecipeWithId),
    /// Routed by the shell to the favorites store; keyed by recipe id.
    Remove(String),
}

/// Favorites tab. Renders straight from the latest pushed snapshot; the tab
/// holds no state of its own.
pub fn view(snapshot: Option<&Snapshot<Favorite>>) -> Element<'_, Message> {
    let content: Element<'_, Message> = match snapshot {
        None => column![
            text("Please Log In").size(20),
            text("You need to be logged in to see your favorite recipes."),
        ]
        .spacing(8)
        .into(),
        Some(Snapshot::Loading) => text("Loading your favorites...").into(),
        Some(snapshot) if snapshot.len() == 0 => column![
            text("No Favorite Recipes").size(20),
            text("Find a recipe you like and save it!"),
        ]
        .spacing(8)
        .into(),
        Some(snapshot) => {
            let card = |favorite: &Favorite| {
                let recipe = &favorite.recipe;
                container(
                    column![
                        text(recipe.recipe.name.clone()).size(20),
                        text(recipe.recipe.short_description.clone()).size(14),
                        row![
                            button("View recipe").on_press(Message::Select(recipe.clone())),
                            button("Remove").on_press(Message::Remove(recipe.id.clone())),
                        ]
                        .spacing(8),
                    ]
                    .spacing(6),
                )
                .padding(12)
                .width(Length::Fill)
                .into()
            };
            scrollable(
                column(snapshot.docs().map(|(_, favorite)| card(favorite)).collect::<Vec<_>>())
                    .spacing(12),
            )
            .height(Length::Fill)
            .into()
        }
    };

    container(content).padding(16).width(Length::Fill).into()
}
