//! Add account command handler

use crate::config::Config;
use crate::services::{AuthError, AuthService};

use super::{open_service, read_secret};

pub async fn cmd_add_account(config: &Config, username: &str) -> anyhow::Result<()> {
    let service = open_service(config).await?;
    let password = read_secret("Password", true)?;

    match service.register(username, &password).await {
        Ok(info) => {
            println!("✓ Created account: {}", info.username);
            Ok(())
        }
        Err(AuthError::AlreadyExists) => {
            anyhow::bail!("Account '{username}' already exists")
        }
        Err(e) => Err(e.into()),
    }
}
