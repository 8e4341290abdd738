//! [`AuthService`] implementation over any injected [`AccountStore`].

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::task;
use tracing::{debug, info, warn};

use crate::config::SecurityConfig;
use crate::models::{Account, CredentialHasher};
use crate::services::account_store::{AccountRow, AccountStore};
use crate::services::auth_service::{AccountInfo, AuthError, AuthService};

pub struct StoreAuthService {
    store: Arc<dyn AccountStore>,
    hasher: CredentialHasher,
    /// Verified in place of a missing account so lookups of unknown users cost
    /// the same Argon2 work as a wrong password.
    decoy: Account,
    min_password_length: usize,
    auto_migrate: bool,
}

impl StoreAuthService {
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the configured Argon2 params are invalid.
    pub fn new(store: Arc<dyn AccountStore>, security: &SecurityConfig) -> Result<Self, AuthError> {
        let hasher = CredentialHasher::from_config(security)?;
        let decoy = Account::create_with(&hasher, "decoy", "decoy-credential")?;

        Ok(Self {
            store,
            hasher,
            decoy,
            min_password_length: security.min_password_length,
            auto_migrate: security.auto_migrate_password_hashes,
        })
    }

    fn check_policy(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.min_password_length
            )));
        }
        Ok(())
    }

    /// Verification runs on the blocking pool; Argon2 would stall the runtime.
    async fn verify(account: &Account, password: &str) -> Result<bool, AuthError> {
        let account = account.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || account.check_password(&password))
            .await
            .context("Password verification task panicked")?;

        Ok(is_valid)
    }

    async fn rehash(&self, account: &Account, password: &str) -> Result<Account, AuthError> {
        let mut account = account.clone();
        let hasher = self.hasher.clone();
        let password = password.to_string();

        let account = task::spawn_blocking(move || {
            account.set_password_with(&hasher, &password)?;
            Ok::<Account, crate::models::AccountError>(account)
        })
        .await
        .context("Password hashing task panicked")??;

        Ok(account)
    }

    async fn migrate_hash(&self, row: &AccountRow, password: &str) {
        let username = row.account.username();

        let account = match self.rehash(&row.account, password).await {
            Ok(account) => account,
            Err(e) => {
                warn!(username, error = %e, "Failed to re-hash credential");
                return;
            }
        };

        match self.store.save(&account).await {
            Ok(()) => info!(username, "Migrated credential hash to current Argon2 params"),
            Err(e) => warn!(username, error = %e, "Failed to store migrated credential hash"),
        }
    }
}

#[async_trait]
impl AuthService for StoreAuthService {
    async fn register(&self, username: &str, password: &str) -> Result<AccountInfo, AuthError> {
        self.check_policy(password)?;

        if self.store.find_by_username(username).await?.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        let hasher = self.hasher.clone();
        let owned_username = username.to_string();
        let owned_password = password.to_string();
        let account = task::spawn_blocking(move || {
            Account::create_with(&hasher, &owned_username, &owned_password)
        })
        .await
        .context("Password hashing task panicked")??;

        if !self.store.insert(&account).await? {
            return Err(AuthError::AlreadyExists);
        }

        info!(username, "Registered account");

        let row = self
            .store
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::Internal("Account vanished after insert".to_string()))?;

        Ok(AccountInfo::from(row))
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccountInfo, AuthError> {
        let Some(row) = self.store.find_by_username(username).await? else {
            debug!(username, "Login attempt for unknown account");
            Self::verify(&self.decoy, password).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !Self::verify(&row.account, password).await? {
            warn!(username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        if self.auto_migrate && row.account.needs_rehash(&self.hasher) {
            self.migrate_hash(&row, password).await;
        }

        Ok(AccountInfo::from(row))
    }

    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.check_policy(new_password)?;

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let row = self.store.find_by_username(username).await?;
        let is_valid = match &row {
            Some(row) => Self::verify(&row.account, current_password).await?,
            None => {
                Self::verify(&self.decoy, current_password).await?;
                false
            }
        };

        let Some(row) = row.filter(|_| is_valid) else {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        };

        let account = self.rehash(&row.account, new_password).await?;
        self.store.save(&account).await?;

        info!(username, "Password changed");
        Ok(())
    }

    async fn get_account_info(&self, username: &str) -> Result<AccountInfo, AuthError> {
        let row = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        Ok(AccountInfo::from(row))
    }

    async fn remove_account(&self, username: &str) -> Result<(), AuthError> {
        if !self.store.delete(username).await? {
            return Err(AuthError::AccountNotFound);
        }

        info!(username, "Removed account");
        Ok(())
    }

    async fn list_accounts(&self) -> Result<Vec<AccountInfo>, AuthError> {
        let rows = self.store.list().await?;
        Ok(rows.into_iter().map(AccountInfo::from).collect())
    }
}
