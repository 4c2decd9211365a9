//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.

pub mod entry_repository;

pub use entry_repository::EntryRepository;

#[cfg(test)]
pub use entry_repository::MockEntryRepository;
