pub mod account;
pub mod hasher;

pub use account::{Account, AccountError};
pub use hasher::CredentialHasher;
