//! Domain service for account registration and credential checks.
//!
//! Handles registration, login verification, password changes and account
//! removal on top of an injected [`AccountStore`](super::AccountStore).

use serde::Serialize;
use thiserror::Error;

use crate::models::AccountError;
use crate::services::account_store::AccountRow;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Account already exists")]
    AlreadyExists,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<AccountError> for AuthError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidInput(msg) => Self::Validation(msg),
            AccountError::Hashing(msg) => Self::Internal(msg),
        }
    }
}

/// Account info DTO, never carries the credential hash.
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AccountRow> for AccountInfo {
    fn from(row: AccountRow) -> Self {
        Self {
            username: row.account.username().to_string(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AlreadyExists`] if the username is taken, or
    /// [`AuthError::Validation`] if the username or password is rejected.
    async fn register(&self, username: &str, password: &str) -> Result<AccountInfo, AuthError>;

    /// Verifies credentials and returns account info.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a wrong
    /// password alike.
    async fn authenticate(&self, username: &str, password: &str)
    -> Result<AccountInfo, AuthError>;

    /// Changes an account's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if current password is incorrect or new password invalid.
    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    async fn get_account_info(&self, username: &str) -> Result<AccountInfo, AuthError>;

    async fn remove_account(&self, username: &str) -> Result<(), AuthError>;

    async fn list_accounts(&self) -> Result<Vec<AccountInfo>, AuthError>;
}
