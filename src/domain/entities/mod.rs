//! Core domain entities.
//!
//! - [`Entry`] - A short code stored inside a category namespace
//! - [`NewEntry`] - Input for inserting an entry

pub mod entry;

pub use entry::{Entry, NewEntry};
