use std::fs;
use std::path::{Path, PathBuf};

use ratedesk_ledger::LedgerBook;

use super::r#trait::{LedgerStore, StoreError};

/// Ledger persisted as one pretty-printed JSON document.
///
/// Every `load` re-reads the file and every `save` rewrites it in place.
/// Writes are not atomic; a crash mid-write can truncate the file.
#[derive(Debug, Clone)]
pub struct JsonFileLedgerStore {
    path: PathBuf,
}

impl JsonFileLedgerStore {
    /// Opens the store, creating the file with an empty ledger if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };

        if !store.path.exists() {
            if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| store.io_error(e))?;
            }
            store.save(&LedgerBook::default())?;
            tracing::info!(path = %store.path.display(), "created empty ledger file");
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn codec_error(&self, source: serde_json::Error) -> StoreError {
        StoreError::Codec {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl LedgerStore for JsonFileLedgerStore {
    fn load(&self) -> Result<LedgerBook, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        serde_json::from_str(&raw).map_err(|e| self.codec_error(e))
    }

    fn save(&self, book: &LedgerBook) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(book).map_err(|e| self.codec_error(e))?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ratedesk_core::AccountId;
    use ratedesk_ledger::{Ledger, LooseInt, SubmitRating};

    #[test]
    fn open_creates_missing_file_with_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("database.json");

        let store = JsonFileLedgerStore::open(&path).unwrap();

        assert!(path.exists());
        let book = store.load().unwrap();
        assert!(book.is_empty());
        assert!(book.settings.rating_enabled);
        assert!(book.settings.withdraw_enabled);
    }

    #[test]
    fn saved_book_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let alice = AccountId::parse("alice").unwrap();

        let store = JsonFileLedgerStore::open(&path).unwrap();
        let mut book = store.load().unwrap();
        Ledger::default()
            .submit_rating(
                &mut book,
                &SubmitRating {
                    account_id: alice.clone(),
                    commission: Some(LooseInt::Int(50)),
                    stars: Some(LooseInt::Int(5)),
                    hotel: Some("Plaza".to_string()),
                    occurred_at: Utc::now(),
                },
            )
            .unwrap();
        store.save(&book).unwrap();

        let reopened = JsonFileLedgerStore::open(&path).unwrap();
        let loaded = reopened.load().unwrap();
        assert_eq!(loaded, book);
        assert_eq!(loaded.account(&alice).unwrap().balance, 9_050);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"ratingsDone\": 1"));
    }

    #[test]
    fn corrupt_file_is_a_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileLedgerStore::open(&path).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Codec { .. })));
    }

    #[test]
    fn missing_file_after_open_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = JsonFileLedgerStore::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }
}
