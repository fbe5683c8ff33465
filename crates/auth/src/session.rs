//! Admin sessions: one active bearer token at a time, held in memory.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use subtle::ConstantTimeEq;

use crate::credentials::AdminCredentials;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing admin token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,
}

/// Opaque random bearer token (64 hex characters).
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub token: SessionToken,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.issued_at <= now && now < self.expires_at
    }
}

/// Session registry for the admin panel.
///
/// A successful login replaces any previous session; logout clears it.
#[derive(Debug)]
pub struct AdminSessions {
    credentials: AdminCredentials,
    ttl: Duration,
    current: RwLock<Option<AdminSession>>,
}

impl AdminSessions {
    pub fn new(credentials: AdminCredentials, ttl: Duration) -> Self {
        Self {
            credentials,
            ttl,
            current: RwLock::new(None),
        }
    }

    pub fn login(&self, username: &str, password: &str, now: DateTime<Utc>) -> Result<AdminSession, AuthError> {
        if !self.credentials.matches(username, password) {
            tracing::warn!(username, "admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let session = AdminSession {
            token: SessionToken::generate(),
            issued_at: now,
            expires_at: now + self.ttl,
        };

        let mut current = self.current.write().map_err(|_| AuthError::InvalidToken)?;
        *current = Some(session.clone());
        tracing::info!(expires_at = %session.expires_at, "admin session opened");

        Ok(session)
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let current = self.current.read().map_err(|_| AuthError::InvalidToken)?;
        match current.as_ref() {
            Some(s) if bool::from(s.token.as_str().as_bytes().ct_eq(token.as_bytes())) && s.is_valid_at(now) => Ok(()),
            _ => Err(AuthError::InvalidToken),
        }
    }

    /// Revokes the session identified by `token`.
    pub fn logout(&self, token: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        self.verify(token, now)?;
        let mut current = self.current.write().map_err(|_| AuthError::InvalidToken)?;
        *current = None;
        tracing::info!("admin session closed");
        Ok(())
    }
}
