//! Entry store implementations.
//!
//! - [`PgEntryRepository`] - PostgreSQL storage via SQLx
//! - [`MemoryEntryRepository`] - In-process storage for development and tests
//! - [`pool::connect`] - Pool construction, retry and migrations

pub mod memory_entry_repository;
pub mod pg_entry_repository;
pub mod pool;

pub use memory_entry_repository::MemoryEntryRepository;
pub use pg_entry_repository::PgEntryRepository;
