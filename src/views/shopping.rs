use crate::{model::ShoppingItem, store::Snapshot};
use iced::{
    widget::{button, checkbox, column, container, row, scrollable, text},
    Command, Element, Length,
};

#[derive(Debug, Clone)]
pub enum Message {
    /// Local check/uncheck; never touches the store.
    Toggle(String),

    /// Routed by the shell to the shopping list store.
    Remove(String),
    RemoveChecked,
    Clear,
}

/// Shopping list tab: renders from the latest pushed snapshot, with a local
/// checked-items set for the "remove checked" interaction.
#[derive(Debug, Default)]
pub struct ShoppingTab {
    checked: Vec<String>,
}

impl ShoppingTab {
    pub fn update(&mut self, message: Message) -> Command<Message> {
        if let Message::Toggle(name) = message {
            match self.checked.iter().position(|item| *item == name) {
                Some(index) => {
                    self.checked.remove(index);
                }
                None => self.checked.push(name),
            }
        }
        Command::none()
    }

    /// Drains the checked set; the shell removes each from the store.
    pub fn take_checked(&mut self) -> Vec<String> {
        std::mem::take(&mut self.checked)
    }

    /// Drops checked entries that no longer exist in the pushed snapshot
    /// (removed here or by another session).
    pub fn prune(&mut self, snapshot: &Snapshot<ShoppingItem>) {
        if let Snapshot::Ready(docs) = snapshot {
            self.checked
                .retain(|name| docs.values().any(|item| item.name == *name));
        }
    }

    pub fn view<'a>(
        &'a self,
        snapshot: Option<&'a Snapshot<ShoppingItem>>,
    ) -> Element<'a, Message> {
        let content: Element<'a, Message> = match snapshot {
            None => column![
                text("Please Log In").size(20),
                text("You need to be logged in to see your shopping list."),
            ]
            .spacing(8)
            .into(),
            Some(Snapshot::Loading) => text("Loading your shopping list...").into(),
            Some(snapshot) if snapshot.len() == 0 => column![
                text("Your Shopping List is Empty").size(20),
                text("Add ingredients from recipes to build your list."),
            ]
            .spacing(8)
            .into(),
            Some(snapshot) => {
                let line = |item: &ShoppingItem| {
                    let name = item.name.clone();
                    let is_checked = self.checked.contains(&name);
                    row![
                        checkbox(name.clone(), is_checked)
                            .on_toggle(move |_| Message::Toggle(name.clone())),
                        button(text("x").size(12)).on_press(Message::Remove(item.name.clone())),
                    ]
                    .spacing(8)
                    .into()
                };

                let mut actions = row![button("Clear All").on_press(Message::Clear)].spacing(8);
                if !self.checked.is_empty() {
                    actions = actions.push(
                        button("Remove Checked").on_press(Message::RemoveChecked),
                    );
                }

                column![
                    row![text("Shopping List").size(24), actions].spacing(16),
                    scrollable(
                        column(
                            snapshot
                                .docs()
                                .map(|(_, item)| line(item))
                                .collect::<Vec<_>>(),
                        )
                        .spacing(6),
                    )
                    .height(Length::Fill),
                ]
                .spacing(12)
                .into()
            }
        };

        container(content).padding(16).width(Length::Fill).into()
    }
}
