//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Longest identifier accepted from callers.
pub const MAX_ACCOUNT_ID_LEN: usize = 128;

/// Identifier of a user account.
///
/// Account ids are caller-chosen strings (the public API creates accounts
/// lazily on first reference), so the only rules are: surrounding whitespace
/// is trimmed, the result is non-empty, at most [`MAX_ACCOUNT_ID_LEN`]
/// characters and free of control characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("AccountId: must not be empty"));
        }
        if trimmed.chars().count() > MAX_ACCOUNT_ID_LEN {
            return Err(DomainError::invalid_id(format!(
                "AccountId: longer than {MAX_ACCOUNT_ID_LEN} characters"
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(DomainError::invalid_id("AccountId: contains control characters"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AccountId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}
