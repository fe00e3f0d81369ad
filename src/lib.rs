mod destroyable;
pub mod accounts;
pub mod events;
pub mod helpers;
pub mod model;
pub mod quiz;
pub mod social;
pub mod store;

pub use destroyable::Destroyable;
