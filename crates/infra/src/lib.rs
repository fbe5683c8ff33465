//! Infrastructure layer: ledger storage backends and the service that runs
//! ledger operations against them.

pub mod ledger_service;
pub mod ledger_store;

pub use ledger_service::LedgerService;
pub use ledger_store::{InMemoryLedgerStore, JsonFileLedgerStore, LedgerStore, StoreError};
