pub mod detail;
pub mod favorites;
pub mod pantry;
pub mod recipes;
pub mod shopping;

pub use detail::Detail;
pub use pantry::Pantry;
pub use recipes::Recipes;
pub use shopping::ShoppingTab;
