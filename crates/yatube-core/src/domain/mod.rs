//! Domain entities - the core business objects.

mod group;
mod post;
mod principal;
mod user;

pub use group::{Group, SLUG_MAX_LEN, TITLE_MAX_LEN};
pub use post::{Author, COUNT_OF_CUT, Post, PostView};
pub use principal::Principal;
pub use user::{USERNAME_MAX_LEN, User};
