//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod rate_limit;
mod repository;

pub use auth::{ADMIN_ROLE, AuthError, PasswordService, TokenClaims, TokenService, USER_ROLE};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    BaseRepository, GroupRepository, PostFilter, PostOrder, PostRepository, UserRepository,
};
