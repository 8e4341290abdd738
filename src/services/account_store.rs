//! Persistence contract for accounts.
//!
//! The credential record itself does no I/O; whoever creates or verifies
//! accounts gets one of these injected. [`crate::db::Store`] is the SQLite
//! implementation, [`MemoryAccountStore`] keeps everything in process.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::Account;

/// An account together with its bookkeeping timestamps (RFC 3339).
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub account: Account,
    pub created_at: String,
    pub updated_at: String,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRow>>;

    /// Insert a new account. Returns `false` if the username is already taken.
    async fn insert(&self, account: &Account) -> Result<bool>;

    /// Insert or overwrite the stored credential hash.
    async fn save(&self, account: &Account) -> Result<()>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, username: &str) -> Result<bool>;

    /// All accounts, ordered by username.
    async fn list(&self) -> Result<Vec<AccountRow>>;
}

#[derive(Default)]
pub struct MemoryAccountStore {
    rows: RwLock<BTreeMap<String, AccountRow>>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        Ok(self.rows.read().await.get(username).cloned())
    }

    async fn insert(&self, account: &Account) -> Result<bool> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(account.username()) {
            return Ok(false);
        }

        let now = chrono::Utc::now().to_rfc3339();
        rows.insert(
            account.username().to_string(),
            AccountRow {
                account: account.clone(),
                created_at: now.clone(),
                updated_at: now,
            },
        );
        Ok(true)
    }

    async fn save(&self, account: &Account) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let mut rows = self.rows.write().await;

        rows.entry(account.username().to_string())
            .and_modify(|row| {
                row.account = account.clone();
                row.updated_at = now.clone();
            })
            .or_insert_with(|| AccountRow {
                account: account.clone(),
                created_at: now.clone(),
                updated_at: now.clone(),
            });
        Ok(())
    }

    async fn delete(&self, username: &str) -> Result<bool> {
        Ok(self.rows.write().await.remove(username).is_some())
    }

    async fn list(&self) -> Result<Vec<AccountRow>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CredentialHasher;

    fn account(username: &str, password: &str) -> Account {
        let hasher = CredentialHasher::new(1024, 1, 1).unwrap();
        Account::create_with(&hasher, username, password).unwrap()
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate() {
        let store = MemoryAccountStore::new();
        assert!(store.insert(&account("alice", "pw")).await.unwrap());
        assert!(!store.insert(&account("alice", "other")).await.unwrap());

        let row = store.find_by_username("alice").await.unwrap().unwrap();
        assert!(row.account.check_password("pw"));
    }

    #[tokio::test]
    async fn test_save_upserts() {
        let store = MemoryAccountStore::new();
        let mut acct = account("alice", "pw");
        store.save(&acct).await.unwrap();

        let created_at = store
            .find_by_username("alice")
            .await
            .unwrap()
            .unwrap()
            .created_at;

        acct.set_password_with(&CredentialHasher::new(1024, 1, 1).unwrap(), "pw2")
            .unwrap();
        store.save(&acct).await.unwrap();

        let row = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(row.created_at, created_at);
        assert!(row.account.check_password("pw2"));
        assert!(!row.account.check_password("pw"));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let store = MemoryAccountStore::new();
        store.insert(&account("carol", "pw")).await.unwrap();
        store.insert(&account("alice", "pw")).await.unwrap();

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.account.username().to_string())
            .collect();
        assert_eq!(names, vec!["alice", "carol"]);

        assert!(store.delete("alice").await.unwrap());
        assert!(!store.delete("alice").await.unwrap());
        assert!(store.find_by_username("alice").await.unwrap().is_none());
    }
}
