//! Argon2id password hashing in PHC string format.
//!
//! Hashes carry their algorithm, version and cost parameters, so verification
//! never depends on the currently configured parameters. That is what lets
//! [`CredentialHasher::needs_rehash`] drive transparent upgrades.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::SecurityConfig;
use crate::models::account::AccountError;

/// Cost ceilings for stored hashes. Verifying a hash allocates `m_cost` KiB,
/// so anything above these is refused rather than run.
pub const MAX_MEMORY_COST_KIB: u32 = 1024 * 1024;
pub const MAX_TIME_COST: u32 = 16;
pub const MAX_PARALLELISM: u32 = 64;

fn within_limits(params: &Params) -> bool {
    params.m_cost() <= MAX_MEMORY_COST_KIB
        && params.t_cost() <= MAX_TIME_COST
        && params.p_cost() <= MAX_PARALLELISM
}

#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    params: Params,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        let params = Params::default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone()),
            params,
        }
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}

impl CredentialHasher {
    /// Argon2id with explicit costs.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Hashing`] if the argon2 crate rejects the params.
    pub fn new(memory_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self, AccountError> {
        let params = Params::new(memory_cost_kib, time_cost, parallelism, None)
            .map_err(|e| AccountError::Hashing(format!("Invalid Argon2 params: {e}")))?;

        if !within_limits(&params) {
            return Err(AccountError::Hashing(format!(
                "Argon2 params exceed limits (m <= {MAX_MEMORY_COST_KIB} KiB, t <= {MAX_TIME_COST}, p <= {MAX_PARALLELISM})"
            )));
        }

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone()),
            params,
        })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, AccountError> {
        Self::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
        )
    }

    /// Hash a password with a freshly generated salt.
    pub fn hash(&self, password: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AccountError::Hashing(format!("Failed to hash password: {e}")))?;

        Ok(hash.to_string())
    }

    /// Whether `hash` parses as a PHC string whose costs are within the
    /// ceilings, i.e. whether [`CredentialHasher::verify`] will actually run it.
    #[must_use]
    pub fn is_verifiable(hash: &str) -> bool {
        PasswordHash::new(hash).is_ok_and(|parsed| Self::params_in_range(&parsed))
    }

    fn params_in_range(parsed: &PasswordHash<'_>) -> bool {
        Params::try_from(parsed).is_ok_and(|params| within_limits(&params))
    }

    /// Verify `password` against a stored PHC string.
    ///
    /// The algorithm and costs come from the hash itself. Anything that fails to
    /// parse, names an unsupported algorithm or asks for costs above the
    /// ceilings yields `false`.
    #[must_use]
    pub fn verify(hash: &str, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        if !Self::params_in_range(&parsed) {
            return false;
        }

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Whether `hash` was produced with anything other than this hasher's
    /// algorithm, version and costs.
    #[must_use]
    pub fn needs_rehash(&self, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return true;
        };

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }

        if parsed.version != Some(Version::V0x13.into()) {
            return true;
        }

        match Params::try_from(&parsed) {
            Ok(stored) => {
                stored.m_cost() != self.params.m_cost()
                    || stored.t_cost() != self.params.t_cost()
                    || stored.p_cost() != self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}
