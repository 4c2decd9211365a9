//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI a store-agnostic API.
//!
//! - [`services::shortener_service::ShortenerService`] - Short code lifecycle and categories
//! - [`services::auth_service::AuthService`] - Management API key check

pub mod services;
