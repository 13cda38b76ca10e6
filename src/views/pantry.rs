use iced::{
    widget::{button, column, container, row, text, text_input},
    Command, Element, Length,
};

/// The ingredient set editor: a de-duplicated, ordered list of ingredient
/// names, ephemeral to the session. Source of truth for generation requests.
#[derive(Debug)]
pub struct Pantry {
    input: String,
    ingredients: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Message {
    InputChanged(String),
    Add,
    Remove(String),
    Clear,

    /// Routed by the shell to the recipes view with the current set.
    Generate,
}

impl Default for Pantry {
    fn default() -> Self {
        Self {
            input: String::new(),
            ingredients: ["Tomatoes", "Cheese", "Basil"]
                .map(str::to_owned)
                .to_vec(),
        }
    }
}

impl Pantry {
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::InputChanged(input) => self.input = input,
            Message::Add => {
                let ingredient = self.input.trim().to_owned();
                // Too short or already present: silent no-op, input kept.
                if ingredient.chars().count() >= 2 && !self.ingredients.contains(&ingredient) {
                    self.ingredients.push(ingredient);
                    self.input.clear();
                }
            }
            Message::Remove(ingredient) => {
                if let Some(index) = self.ingredients.iter().position(|i| *i == ingredient) {
                    self.ingredients.remove(index);
                }
            }
            Message::Clear => self.ingredients.clear(),
            Message::Generate => {}
        }
        Command::none()
    }

    pub fn view(&self, generating: bool) -> Element<'_, Message> {
        let entry = row![
            text_input("e.g., Chicken breast", &self.input)
                .on_input(Message::InputChanged)
                .on_submit(Message::Add),
            button("Add").on_press(Message::Add),
        ]
        .spacing(8);

        let chip = |ingredient: &String| {
            row![
                text(ingredient.clone()),
                button(text("x").size(12)).on_press(Message::Remove(ingredient.clone())),
            ]
            .spacing(4)
            .into()
        };

        let listing: Element<'_, Message> = if self.ingredients.is_empty() {
            text("Your fridge is empty!").into()
        } else {
            column(self.ingredients.iter().map(chip).collect::<Vec<_>>())
                .spacing(4)
                .into()
        };

        let mut generate = button(text(if generating {
            "Conjuring recipes..."
        } else {
            "Generate Recipes"
        }))
        .width(Length::Fill);
        if !generating {
            generate = generate.on_press(Message::Generate);
        }

        let mut header = row![text("My Fridge").size(24)].spacing(8);
        if !self.ingredients.is_empty() {
            header = header.push(button(text("Clear").size(14)).on_press(Message::Clear));
        }

        container(
            column![
                header,
                text("Add the ingredients you have on hand.").size(14),
                entry,
                listing,
                generate,
            ]
            .spacing(12),
        )
        .padding(16)
        .width(Length::Fixed(360.0))
        .into()
    }
}
