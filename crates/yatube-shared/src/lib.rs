//! # Yatube Shared
//!
//! Wire types shared by the server and its clients: request bodies, page
//! contexts and the RFC 7807 error body. Free of domain logic so the crate
//! can be compiled for any client.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, TemplateResponse};
