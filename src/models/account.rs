use thiserror::Error;
use tracing::warn;

use crate::models::hasher::CredentialHasher;

/// Errors raised while building or mutating an [`Account`].
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Hashing failed: {0}")]
    Hashing(String),
}

/// A username bound to a salted, one-way credential hash.
///
/// The hash is always produced by [`CredentialHasher`]; there is no public
/// constructor that accepts a hash or a plaintext to store as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    username: String,
    credential_hash: String,
}

impl Account {
    /// Register a new account using the default Argon2id parameters.
    ///
    /// # Errors
    ///
    /// [`AccountError::InvalidInput`] for an empty username or password.
    pub fn create(username: &str, password: &str) -> Result<Self, AccountError> {
        Self::create_with(&CredentialHasher::default(), username, password)
    }

    pub fn create_with(
        hasher: &CredentialHasher,
        username: &str,
        password: &str,
    ) -> Result<Self, AccountError> {
        if username.trim().is_empty() {
            return Err(AccountError::InvalidInput(
                "Username must not be empty".to_string(),
            ));
        }
        if username.trim() != username {
            return Err(AccountError::InvalidInput(
                "Username must not start or end with whitespace".to_string(),
            ));
        }
        validate_password(password)?;

        Ok(Self {
            username: username.to_string(),
            credential_hash: hasher.hash(password)?,
        })
    }

    /// Rebuild an account from a persisted row. The hash is taken on trust;
    /// a corrupt value only ever makes [`Account::check_password`] fail.
    pub(crate) fn from_stored(username: String, credential_hash: String) -> Self {
        Self {
            username,
            credential_hash,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn credential_hash(&self) -> &str {
        &self.credential_hash
    }

    /// Replace the credential with a fresh hash of `new_password`.
    pub fn set_password(&mut self, new_password: &str) -> Result<(), AccountError> {
        self.set_password_with(&CredentialHasher::default(), new_password)
    }

    pub fn set_password_with(
        &mut self,
        hasher: &CredentialHasher,
        new_password: &str,
    ) -> Result<(), AccountError> {
        validate_password(new_password)?;
        self.credential_hash = hasher.hash(new_password)?;
        Ok(())
    }

    /// Constant-time check of `candidate` against the stored hash.
    #[must_use]
    pub fn check_password(&self, candidate: &str) -> bool {
        if !CredentialHasher::is_verifiable(&self.credential_hash) {
            warn!(username = %self.username, "Stored credential hash is malformed or over cost limits");
            return false;
        }

        CredentialHasher::verify(&self.credential_hash, candidate)
    }

    #[must_use]
    pub fn needs_rehash(&self, hasher: &CredentialHasher) -> bool {
        hasher.needs_rehash(&self.credential_hash)
    }
}

fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.is_empty() {
        return Err(AccountError::InvalidInput(
            "Password must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_password_lifecycle() {
        let h = hasher();
        let mut acct = Account::create_with(&h, "alice", "s3cret").unwrap();
        assert_eq!(acct.username(), "alice");
        assert!(acct.check_password("s3cret"));
        assert!(!acct.check_password("wrong"));

        acct.set_password_with(&h, "newpass").unwrap();
        assert!(!acct.check_password("s3cret"));
        assert!(acct.check_password("newpass"));
    }

    #[test]
    fn test_default_hasher_round_trip() {
        let acct = Account::create("bob", "correct horse").unwrap();
        assert!(acct.check_password("correct horse"));
        assert!(!acct.check_password("correct horse "));
        assert!(!acct.check_password(""));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let acct = Account::create_with(&hasher(), "alice", "plaintext-marker").unwrap();
        assert!(!acct.credential_hash().contains("plaintext-marker"));
        assert_ne!(acct.credential_hash(), "plaintext-marker");
    }

    #[test]
    fn test_fresh_salt_per_create() {
        let h = hasher();
        let a = Account::create_with(&h, "alice", "same").unwrap();
        let b = Account::create_with(&h, "alice", "same").unwrap();
        assert_ne!(a.credential_hash(), b.credential_hash());
        assert!(a.check_password("same"));
        assert!(b.check_password("same"));
    }

    #[test]
    fn test_set_password_changes_hash_even_when_unchanged() {
        let h = hasher();
        let mut acct = Account::create_with(&h, "alice", "same").unwrap();
        let before = acct.credential_hash().to_string();
        acct.set_password_with(&h, "same").unwrap();
        assert_ne!(acct.credential_hash(), before);
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(
            Account::create("alice", ""),
            Err(AccountError::InvalidInput(_))
        ));
        assert!(matches!(
            Account::create("", "pw"),
            Err(AccountError::InvalidInput(_))
        ));
        assert!(matches!(
            Account::create("   ", "pw"),
            Err(AccountError::InvalidInput(_))
        ));

        let mut acct = Account::create_with(&hasher(), "alice", "pw").unwrap();
        let before = acct.credential_hash().to_string();
        assert!(matches!(
            acct.set_password(""),
            Err(AccountError::InvalidInput(_))
        ));
        assert_eq!(acct.credential_hash(), before);
        assert!(acct.check_password("pw"));
    }

    #[test]
    fn test_malformed_stored_hash_fails_closed() {
        for bad in ["", "s3cret", "$argon2id$", "$argon2id$v=19$m=1024,t=1,p=1$bad"] {
            let acct = Account::from_stored("alice".to_string(), bad.to_string());
            assert!(!acct.check_password("s3cret"));
            assert!(!acct.check_password(bad));
        }
    }

    #[test]
    fn test_oversized_stored_costs_fail_closed() {
        let valid = Account::create_with(&hasher(), "alice", "s3cret").unwrap();

        for costs in ["m=4294967295,t=1,p=1", "m=1024,t=4294967295,p=1", "m=1024,t=1,p=16777215"] {
            let hash = valid.credential_hash().replace("m=1024,t=1,p=1", costs);
            let acct = Account::from_stored("alice".to_string(), hash);
            assert!(!acct.check_password("s3cret"));
        }
    }

    #[test]
    fn test_username_surrounding_whitespace_rejected() {
        for name in ["alice ", " alice", "alice\n", "\talice"] {
            assert!(matches!(
                Account::create_with(&hasher(), name, "pw"),
                Err(AccountError::InvalidInput(_))
            ));
        }
        assert!(Account::create_with(&hasher(), "alice smith", "pw").is_ok());
    }

    #[test]
    fn test_needs_rehash() {
        let weak = hasher();
        let acct = Account::create_with(&weak, "alice", "pw").unwrap();
        assert!(!acct.needs_rehash(&weak));
        assert!(acct.needs_rehash(&CredentialHasher::default()));
    }
}
