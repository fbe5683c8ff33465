//! Ledger storage boundary.
//!
//! A store loads and saves the whole [`LedgerBook`]. There are no partial
//! writes or transactions: callers serialise access (see
//! [`crate::LedgerService`]) and save the full book after each mutation.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use json_file::JsonFileLedgerStore;
pub use r#trait::{LedgerStore, StoreError};
