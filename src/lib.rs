mod destroyable;
pub mod error;
pub mod events;
pub mod game;
pub mod model;
#[cfg(feature = "gui")]
pub mod ui;

pub use destroyable::Destroyable;
