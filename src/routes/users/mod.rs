//! Admin user management screens.

mod detail;
mod list;

pub use detail::{UserDetailScreen, UserFormMode, USER_ADDED, USER_UPDATED};
pub use list::UsersListScreen;
