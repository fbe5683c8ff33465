//! Rating-reward ledger (accounts, audit trail, platform switches).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns. Callers
//! load a [`LedgerBook`], run one [`Ledger`] operation against it and persist
//! the book again if the operation succeeded.

pub mod account;
pub mod book;
pub mod command;
pub mod entry;
pub mod error;
pub mod input;
pub mod ledger;
pub mod settings;

pub use account::{BankDetails, UserAccount};
pub use book::{LedgerBook, PendingWithdraw, PlatformStats, RatingHistoryRow};
pub use command::{AdjustBalance, AdjustDirection, RequestWithdraw, SaveBankDetails, SubmitRating};
pub use entry::{EntryKind, LedgerEntry};
pub use error::{LedgerError, LedgerResult};
pub use input::LooseInt;
pub use ledger::{AccountLookup, Ledger, RatingReceipt};
pub use settings::{LedgerRules, PlatformSettings};
