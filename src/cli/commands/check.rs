//! Check password command handler

use crate::config::Config;
use crate::services::AuthService;

use super::{open_service, read_secret};

pub async fn cmd_check_password(config: &Config, username: &str) -> anyhow::Result<()> {
    let service = open_service(config).await?;
    let password = read_secret("Password", false)?;

    service.authenticate(username, &password).await?;
    println!("✓ Credentials valid for {username}");

    Ok(())
}
