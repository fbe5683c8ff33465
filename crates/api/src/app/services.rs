use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;

use ratedesk_auth::{AdminCredentials, AdminSessions};
use ratedesk_infra::{InMemoryLedgerStore, JsonFileLedgerStore, LedgerService, LedgerStore};
use ratedesk_ledger::{LedgerError, LedgerResult, LedgerRules};

use crate::config::{ServerConfig, StoreBackend};

pub type SharedLedger = Arc<LedgerService<Arc<dyn LedgerStore>>>;

/// Everything the handlers need, shared behind an `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub ledger: SharedLedger,
    pub sessions: Arc<AdminSessions>,
}

impl AppServices {
    pub fn new(store: Arc<dyn LedgerStore>, rules: LedgerRules, sessions: AdminSessions) -> Self {
        Self {
            ledger: Arc::new(LedgerService::new(store, rules)),
            sessions: Arc::new(sessions),
        }
    }

    pub fn in_memory(rules: LedgerRules, credentials: AdminCredentials, ttl: Duration) -> Self {
        Self::new(
            Arc::new(InMemoryLedgerStore::new()),
            rules,
            AdminSessions::new(credentials, ttl),
        )
    }

    /// Runs a ledger operation on tokio's blocking pool. The service holds a
    /// mutex across store IO, so it must stay off the async workers.
    pub async fn run_ledger<T, F>(&self, op: F) -> LedgerResult<T>
    where
        F: FnOnce(&LedgerService<Arc<dyn LedgerStore>>) -> LedgerResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let ledger = self.ledger.clone();
        tokio::task::spawn_blocking(move || op(&ledger))
            .await
            .map_err(|e| LedgerError::storage(format!("ledger task failed: {e}")))?
    }

    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn LedgerStore> = match config.store {
            StoreBackend::File => {
                let store = JsonFileLedgerStore::open(&config.data_file).with_context(|| {
                    format!("failed to open ledger file {}", config.data_file.display())
                })?;
                tracing::info!(path = %config.data_file.display(), "using json file ledger store");
                Arc::new(store)
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory ledger store; data is lost on restart");
                Arc::new(InMemoryLedgerStore::new())
            }
        };

        Ok(Self::new(
            store,
            config.rules,
            AdminSessions::new(config.admin.clone(), config.admin_token_ttl),
        ))
    }
}
