//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod categories;
pub mod entries;
pub mod health;
pub mod redirect;

pub use categories::categories_handler;
pub use entries::{
    create_entry_handler, delete_entry_handler, get_entry_handler, list_entries_handler,
};
pub use health::health_handler;
pub use redirect::redirect_handler;
