mod favorites;
mod follows;
mod invites;

pub use favorites::Favorites;
pub use follows::Follows;
pub use invites::{InviteResponse, InviteToggle, Invites};
