mod client;
mod model;
mod scale;
mod store;
mod utils;
mod views;

use crate::{
    client::Client,
    model::{Favorite, ShoppingItem, User},
    store::{Snapshot, StoreService},
    utils::Result,
    views::{detail, favorites, pantry, recipes, shopping, Detail, Pantry, Recipes, ShoppingTab},
};
use iced::{
    executor,
    widget::{button, column, container, horizontal_rule, row, text, text_input},
    Application, Command, Element, Length, Settings, Subscription, Theme,
};
use std::{io, sync::Arc};
use tap::Pipe;
use tracing::{error, warn};

pub fn main() -> iced::Result {
    dotenv::dotenv().ok();
    let (non_blocking, _guard) = tracing_appender::non_blocking(io::stdout());
    tracing_subscriber::fmt()
        // ---
        .with_writer(non_blocking)
        .init();

    App::run(Settings {
        window: iced::window::Settings {
            size: iced::Size::new(1280.0, 800.0),
            ..Default::default()
        },
        ..Default::default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Generator,
    Favorites,
    ShoppingList,
}

#[derive(Debug)]
enum Auth {
    SignedOut { email: String, error: Option<String> },
    Signing { email: String },
    SignedIn(Session),
}

/// An authenticated session: the user, their store, and the latest pushed
/// snapshot of each collection. Dropped wholesale on sign-out, which also
/// tears down the snapshot subscriptions.
#[derive(Debug)]
struct Session {
    user: User,
    store: Arc<StoreService>,
    favorites: Snapshot<Favorite>,
    shopping: Snapshot<ShoppingItem>,
}

#[derive(Debug, Clone)]
enum Message {
    TabSelected(Tab),

    EmailChanged(String),
    SignIn,
    SignedIn(Result<(User, Arc<StoreService>)>),
    SignOut,

    FavoritesSnapshot(Snapshot<Favorite>),
    ShoppingSnapshot(Snapshot<ShoppingItem>),
    StoreAck(Result<()>),
    DismissNotice,

    Pantry(pantry::Message),
    Recipes(recipes::Message),
    Detail(detail::Message),
    Favorites(favorites::Message),
    Shopping(shopping::Message),
}

struct App {
    client: Arc<Client>,
    tab: Tab,
    auth: Auth,
    /// Transient user-facing notice (validation rejections, write failures).
    notice: Option<String>,

    pantry: Pantry,
    recipes: Recipes,
    detail: Detail,
    shopping_tab: ShoppingTab,
}

impl Application for App {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_: Self::Flags) -> (Self, Command<Self::Message>) {
        let client = Arc::new(Client::from_env());
        (
            Self {
                client: client.clone(),
                tab: Tab::Generator,
                auth: Auth::SignedOut {
                    email: String::new(),
                    error: None,
                },
                notice: None,
                pantry: Pantry::default(),
                recipes: Recipes::new(client.clone()),
                detail: Detail::new(client),
                shopping_tab: ShoppingTab::default(),
            },
            Command::none(),
        )
    }

    fn title(&self) -> String {
        match &self.auth {
            Auth::SignedOut { .. } => "Signed Out",
            Auth::Signing { .. } => "Signing In",
            Auth::SignedIn(session) => session.user.name.as_str(),
        }
        .pipe(|status| format!("Fridge Genie - {status}"))
    }

    fn update(&mut self, message: Self::Message) -> Command<Self::Message> {
        match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
                Command::none()
            }

            Message::EmailChanged(email) => {
                if let Auth::SignedOut { email: current, .. } = &mut self.auth {
                    *current = email;
                }
                Command::none()
            }
            Message::SignIn => self.sign_in(),
            Message::SignedIn(Ok((user, store))) => {
                self.auth = Auth::SignedIn(Session {
                    user,
                    store,
                    favorites: Snapshot::Loading,
                    shopping: Snapshot::Loading,
                });
                Command::none()
            }
            Message::SignedIn(Err(err)) => {
                error!(%err, "sign-in failed");
                let email = match &self.auth {
                    Auth::Signing { email } => email.clone(),
                    _ => String::new(),
                };
                self.auth = Auth::SignedOut {
                    email,
                    error: Some(err.to_string()),
                };
                Command::none()
            }
            Message::SignOut => {
                self.auth = Auth::SignedOut {
                    email: String::new(),
                    error: None,
                };
                Command::none()
            }

            Message::FavoritesSnapshot(snapshot) => {
                if let Auth::SignedIn(session) = &mut self.auth {
                    session.favorites = snapshot;
                }
                Command::none()
            }
            Message::ShoppingSnapshot(snapshot) => {
                if let Auth::SignedIn(session) = &mut self.auth {
                    self.shopping_tab.prune(&snapshot);
                    session.shopping = snapshot;
                }
                Command::none()
            }
            Message::StoreAck(Ok(())) => Command::none(),
            Message::StoreAck(Err(err)) => {
                // Local state stands; the next pushed snapshot is
                // authoritative either way.
                warn!(%err, "store write failed");
                self.notice = Some(err.to_string());
                Command::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Command::none()
            }

            Message::Pantry(pantry::Message::Generate) => {
                if self.pantry.ingredients().is_empty() {
                    warn!("generate requested with an empty ingredient set");
                    self.notice =
                        Some("Please add some ingredients from your fridge first.".to_owned());
                    Command::none()
                } else {
                    self.recipes
                        .update(recipes::Message::Request(
                            self.pantry.ingredients().to_vec(),
                        ))
                        .map(Message::Recipes)
                }
            }
            Message::Pantry(message) => self.pantry.update(message).map(Message::Pantry),

            Message::Recipes(recipes::Message::Select(recipe)) => self
                .detail
                .update(detail::Message::Open(recipe))
                .map(Message::Detail),
            Message::Recipes(message) => {
                if let recipes::Message::Generated {
                    result: Err(err), ..
                } = &message
                {
                    error!(%err, "recipe generation failed");
                }
                self.recipes.update(message).map(Message::Recipes)
            }

            Message::Detail(detail::Message::ToggleFavorite) => self.toggle_favorite(),
            Message::Detail(detail::Message::AddToList(name)) => self.add_to_list(name),
            Message::Detail(message) => self.detail.update(message).map(Message::Detail),

            Message::Favorites(favorites::Message::Select(recipe)) => self
                .detail
                .update(detail::Message::Open(recipe))
                .map(Message::Detail),
            Message::Favorites(favorites::Message::Remove(id)) => {
                let Some(store) = self.store() else {
                    return self.require_login("manage favorites");
                };
                Command::perform(
                    async move { store.favorites.remove(&id).await },
                    Message::StoreAck,
                )
            }

            Message::Shopping(shopping::Message::Remove(name)) => {
                let Some(store) = self.store() else {
                    return self.require_login("edit your shopping list");
                };
                Command::perform(
                    async move { store.shopping.remove(&name).await },
                    Message::StoreAck,
                )
            }
            Message::Shopping(shopping::Message::RemoveChecked) => {
                let Some(store) = self.store() else {
                    return self.require_login("edit your shopping list");
                };
                let names = self.shopping_tab.take_checked();
                Command::perform(
                    async move {
                        for name in &names {
                            store.shopping.remove(name).await?;
                        }
                        Ok(())
                    },
                    Message::StoreAck,
                )
            }
            Message::Shopping(shopping::Message::Clear) => {
                let Some(store) = self.store() else {
                    return self.require_login("edit your shopping list");
                };
                Command::perform(
                    async move { store.shopping.clear().await },
                    Message::StoreAck,
                )
            }
            Message::Shopping(message) => {
                self.shopping_tab.update(message).map(Message::Shopping)
            }
        }
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        match &self.auth {
            Auth::SignedIn(session) => {
                let uid = session.user.uid.clone();
                Subscription::batch([
                    store::snapshots(
                        ("favorites", uid.clone()),
                        session.store.favorites.subscribe(),
                    )
                    .map(Message::FavoritesSnapshot),
                    store::snapshots(("shopping-list", uid), session.store.shopping.subscribe())
                        .map(Message::ShoppingSnapshot),
                ])
            }
            _ => Subscription::none(),
        }
    }

    fn view(&self) -> Element<'_, Self::Message> {
        let content: Element<'_, Message> = if self.detail.is_open() {
            let favorite = match (&self.auth, self.detail.recipe()) {
                (Auth::SignedIn(session), Some(recipe)) => {
                    store::favorites::is_favorite(&session.favorites, &recipe.id)
                }
                _ => Some(false),
            };
            self.detail.view(favorite).map(Message::Detail)
        } else {
            match self.tab {
                Tab::Generator => row![
                    self.pantry
                        .view(self.recipes.is_loading())
                        .map(Message::Pantry),
                    self.recipes.view().map(Message::Recipes),
                ]
                .spacing(8)
                .into(),
                Tab::Favorites => {
                    favorites::view(self.favorites_snapshot()).map(Message::Favorites)
                }
                Tab::ShoppingList => self
                    .shopping_tab
                    .view(self.shopping_snapshot())
                    .map(Message::Shopping),
            }
        };

        let mut page = column![self.header(), self.tabs(), horizontal_rule(2)].spacing(8);
        if let Some(notice) = &self.notice {
            page = page.push(
                row![
                    text(notice.clone()),
                    button(text("Dismiss").size(12)).on_press(Message::DismissNotice),
                ]
                .spacing(8),
            );
        }

        container(page.push(content))
            .padding(12)
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Self::Theme {
        Theme::Dark
    }
}

impl App {
    fn sign_in(&mut self) -> Command<Message> {
        let Auth::SignedOut { email, .. } = &self.auth else {
            return Command::none();
        };
        let email = email.trim().to_owned();
        if email.is_empty() {
            error!("email cannot be empty");
            self.auth = Auth::SignedOut {
                email,
                error: Some("Email cannot be empty".to_owned()),
            };
            return Command::none();
        }

        let client = self.client.clone();
        self.auth = Auth::Signing {
            email: email.clone(),
        };
        Command::perform(
            async move {
                let user = client.sign_in(&email).await?;
                let store = StoreService::open(StoreService::default_root(), &user.uid).await?;
                Ok((user, store))
            },
            Message::SignedIn,
        )
    }

    fn store(&self) -> Option<Arc<StoreService>> {
        match &self.auth {
            Auth::SignedIn(session) => Some(session.store.clone()),
            _ => None,
        }
    }

    fn favorites_snapshot(&self) -> Option<&Snapshot<Favorite>> {
        match &self.auth {
            Auth::SignedIn(session) => Some(&session.favorites),
            _ => None,
        }
    }

    fn shopping_snapshot(&self) -> Option<&Snapshot<ShoppingItem>> {
        match &self.auth {
            Auth::SignedIn(session) => Some(&session.shopping),
            _ => None,
        }
    }

    fn require_login(&mut self, action: &str) -> Command<Message> {
        self.notice = Some(format!("Please log in to {action}."));
        Command::none()
    }

    fn toggle_favorite(&mut self) -> Command<Message> {
        let Some(recipe) = self.detail.recipe().cloned() else {
            return Command::none();
        };
        let Auth::SignedIn(session) = &self.auth else {
            return self.require_login("save favorites");
        };

        match store::favorites::is_favorite(&session.favorites, &recipe.id) {
            // First snapshot not in yet: indeterminate, so no blind write.
            None => {
                self.notice = Some("Your favorites are still loading.".to_owned());
                Command::none()
            }
            Some(true) => {
                let store = session.store.clone();
                Command::perform(
                    async move { store.favorites.remove(&recipe.id).await },
                    Message::StoreAck,
                )
            }
            Some(false) => {
                let store = session.store.clone();
                Command::perform(
                    async move { store.favorites.add(recipe).await },
                    Message::StoreAck,
                )
            }
        }
    }

    fn add_to_list(&mut self, name: String) -> Command<Message> {
        let Some(store) = self.store() else {
            return self.require_login("build a shopping list");
        };
        Command::perform(
            async move { store.shopping.add(&name).await },
            Message::StoreAck,
        )
    }

    fn header(&self) -> Element<'_, Message> {
        let account: Element<'_, Message> = match &self.auth {
            Auth::SignedOut { email, error } => {
                let mut entry = row![
                    text_input("email", email)
                        .on_input(Message::EmailChanged)
                        .on_submit(Message::SignIn)
                        .width(Length::Fixed(240.0)),
                    button("Sign In").on_press(Message::SignIn),
                ]
                .spacing(8);
                if let Some(error) = error {
                    entry = entry.push(text(error.clone()).size(13));
                }
                entry.into()
            }
            Auth::Signing { email } => text(format!("Signing in as {email}...")).into(),
            Auth::SignedIn(session) => row![
                text(format!("{} <{}>", session.user.name, session.user.email)).size(14),
                button(text("Sign Out").size(12)).on_press(Message::SignOut),
            ]
            .spacing(8)
            .into(),
        };

        row![text("Fridge Genie").size(30), account]
            .spacing(24)
            .into()
    }

    fn tabs(&self) -> Element<'_, Message> {
        let tab = |label, target| {
            let label = if self.tab == target {
                format!("[{label}]")
            } else {
                label
            };
            button(text(label)).on_press(Message::TabSelected(target))
        };

        row![
            tab("Generator".to_owned(), Tab::Generator),
            tab("Favorites".to_owned(), Tab::Favorites),
            tab("Shopping List".to_owned(), Tab::ShoppingList),
        ]
        .spacing(8)
        .into()
    }
}
