//! Server configuration loaded from environment variables.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use chrono::Duration;

use ratedesk_auth::AdminCredentials;
use ratedesk_ledger::LedgerRules;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Where the ledger is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Pretty-printed JSON document on disk.
    File,
    /// Process memory only; lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("store must be one of: file, memory (got '{other}')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub store: StoreBackend,
    pub data_file: PathBuf,
    pub admin: AdminCredentials,
    pub admin_token_ttl: Duration,
    pub rules: LedgerRules,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = LedgerRules::default();

        let username = lookup("RATEDESK_ADMIN_USERNAME").unwrap_or_else(|| {
            tracing::warn!("RATEDESK_ADMIN_USERNAME not set, using default: {DEFAULT_ADMIN_USERNAME}");
            DEFAULT_ADMIN_USERNAME.to_string()
        });
        let password = lookup("RATEDESK_ADMIN_PASSWORD").unwrap_or_else(|| {
            tracing::warn!("RATEDESK_ADMIN_PASSWORD not set; using insecure dev default");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });
        if username.trim().is_empty() || password.is_empty() {
            bail!("admin username and password must not be empty");
        }

        let ttl_secs: i64 = try_load(&lookup, "RATEDESK_ADMIN_TOKEN_TTL_SECS", 86_400)?;
        if ttl_secs <= 0 {
            bail!("RATEDESK_ADMIN_TOKEN_TTL_SECS must be positive");
        }

        let rules = LedgerRules {
            starting_balance: try_load(&lookup, "RATEDESK_STARTING_BALANCE", defaults.starting_balance)?,
            daily_cap: try_load(&lookup, "RATEDESK_DAILY_CAP", defaults.daily_cap)?,
            eligibility_floor: try_load(&lookup, "RATEDESK_ELIGIBILITY_FLOOR", defaults.eligibility_floor)?,
            enforce_withdraw_toggle: try_load(
                &lookup,
                "RATEDESK_ENFORCE_WITHDRAW_TOGGLE",
                defaults.enforce_withdraw_toggle,
            )?,
        };
        if rules.starting_balance < 0 {
            bail!("RATEDESK_STARTING_BALANCE must not be negative");
        }

        Ok(Self {
            port: try_load(&lookup, "PORT", 5001)?,
            store: try_load(&lookup, "RATEDESK_STORE", StoreBackend::File)?,
            data_file: lookup("RATEDESK_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("database.json")),
            admin: AdminCredentials::new(username, password),
            admin_token_ttl: Duration::seconds(ttl_secs),
            rules,
        })
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + core::fmt::Debug,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {key} value '{raw}': {e}")),
        None => {
            tracing::info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}
