use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminant of a [`LedgerEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Rating,
    WithdrawRequest,
    WithdrawProcessed,
    AdminAdd,
    AdminCut,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Rating => "rating",
            EntryKind::WithdrawRequest => "withdraw_request",
            EntryKind::WithdrawProcessed => "withdraw_processed",
            EntryKind::AdminAdd => "admin_add",
            EntryKind::AdminCut => "admin_cut",
        }
    }
}

/// Immutable audit record of one balance-affecting event.
///
/// Serialized with a `type` tag, e.g.
/// `{"type":"rating","time":"…","hotel":"Plaza","stars":5,"amount":50}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEntry {
    Rating {
        #[serde(deserialize_with = "entry_time::deserialize")]
        time: DateTime<Utc>,
        hotel: String,
        stars: i64,
        amount: i64,
    },
    WithdrawRequest {
        #[serde(deserialize_with = "entry_time::deserialize")]
        time: DateTime<Utc>,
        amount: i64,
    },
    WithdrawProcessed {
        #[serde(deserialize_with = "entry_time::deserialize")]
        time: DateTime<Utc>,
        amount: i64,
        note: String,
    },
    AdminAdd {
        #[serde(deserialize_with = "entry_time::deserialize")]
        time: DateTime<Utc>,
        amount: i64,
        note: String,
    },
    AdminCut {
        #[serde(deserialize_with = "entry_time::deserialize")]
        time: DateTime<Utc>,
        amount: i64,
        note: String,
    },
}

impl LedgerEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            LedgerEntry::Rating { .. } => EntryKind::Rating,
            LedgerEntry::WithdrawRequest { .. } => EntryKind::WithdrawRequest,
            LedgerEntry::WithdrawProcessed { .. } => EntryKind::WithdrawProcessed,
            LedgerEntry::AdminAdd { .. } => EntryKind::AdminAdd,
            LedgerEntry::AdminCut { .. } => EntryKind::AdminCut,
        }
    }

    pub fn amount(&self) -> i64 {
        match self {
            LedgerEntry::Rating { amount, .. }
            | LedgerEntry::WithdrawRequest { amount, .. }
            | LedgerEntry::WithdrawProcessed { amount, .. }
            | LedgerEntry::AdminAdd { amount, .. }
            | LedgerEntry::AdminCut { amount, .. } => *amount,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEntry::Rating { time, .. }
            | LedgerEntry::WithdrawRequest { time, .. }
            | LedgerEntry::WithdrawProcessed { time, .. }
            | LedgerEntry::AdminAdd { time, .. }
            | LedgerEntry::AdminCut { time, .. } => *time,
        }
    }
}

/// Reads entry timestamps written either as RFC 3339 or as a browser-style
/// locale string (`"10/17/2026, 3:45:12 PM"`, `"17/10/2026, 15:45:12"`).
/// Locale strings carry no zone and are taken as UTC; anything unreadable
/// becomes the Unix epoch so one bad entry cannot make the book unloadable.
mod entry_time {
    use super::*;
    use serde::Deserializer;

    const LOCALE_FORMATS: [&str; 3] = [
        "%m/%d/%Y, %I:%M:%S %p",
        "%d/%m/%Y, %I:%M:%S %p",
        "%d/%m/%Y, %H:%M:%S",
    ];

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(parse(&raw))
    }

    pub(super) fn parse(raw: &str) -> DateTime<Utc> {
        if let Ok(t) = DateTime::parse_from_rfc3339(raw.trim()) {
            return t.with_timezone(&Utc);
        }

        let normalized = raw.replace(['\u{202f}', '\u{a0}'], " ");
        LOCALE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(normalized.trim(), fmt).ok())
            .map(|naive| naive.and_utc())
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}
