//! Application services - the operations behind each page and form.

mod groups;
mod posts;

pub use groups::{GroupService, NewGroup};
pub use posts::{EditorOutcome, GroupFeed, PostDetail, PostService, ProfileFeed};
