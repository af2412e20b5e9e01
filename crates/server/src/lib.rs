//! StackExchange login via the OAuth2 authorization-code flow.
//!
//! The [`authenticator`] module holds the login itself and depends on its host
//! only through the capability traits in [`host`]. The [`api`] module is a small
//! axum host that serves the login over HTTP.

pub mod api;
pub mod authenticator;
pub mod config;
pub mod error;
pub mod host;
