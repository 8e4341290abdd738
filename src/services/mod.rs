pub mod account_store;
pub use account_store::{AccountRow, AccountStore, MemoryAccountStore};

pub mod auth_service;
pub use auth_service::{AccountInfo, AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::StoreAuthService;
