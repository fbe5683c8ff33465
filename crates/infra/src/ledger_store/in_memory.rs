use std::sync::RwLock;

use ratedesk_ledger::LedgerBook;

use super::r#trait::{LedgerStore, StoreError};

/// In-memory ledger store for tests/dev. State is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<LedgerBook>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(book: LedgerBook) -> Self {
        Self {
            inner: RwLock::new(book),
        }
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self) -> Result<LedgerBook, StoreError> {
        let book = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(book.clone())
    }

    fn save(&self, book: &LedgerBook) -> Result<(), StoreError> {
        let mut current = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        *current = book.clone();
        Ok(())
    }
}
