use std::sync::Arc;

use thiserror::Error;

use ratedesk_ledger::{LedgerBook, LedgerError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed ledger data in {path}: {source}")]
    Codec {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        LedgerError::storage(value.to_string())
    }
}

/// Load/save contract for the whole ledger state.
pub trait LedgerStore: Send + Sync {
    fn load(&self) -> Result<LedgerBook, StoreError>;
    fn save(&self, book: &LedgerBook) -> Result<(), StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn load(&self) -> Result<LedgerBook, StoreError> {
        (**self).load()
    }

    fn save(&self, book: &LedgerBook) -> Result<(), StoreError> {
        (**self).save(book)
    }
}
