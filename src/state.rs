//! Shared application state.

use std::sync::Arc;

use crate::application::services::{AuthService, ShortenerService};
use crate::domain::repositories::EntryRepository;

/// State injected into every handler and middleware.
///
/// Cloned per request; all members are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService<dyn EntryRepository>>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        shortener: Arc<ShortenerService<dyn EntryRepository>>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self { shortener, auth }
    }
}
