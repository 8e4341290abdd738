//! Change password command handler

use crate::config::Config;
use crate::services::AuthService;

use super::{open_service, read_secret};

pub async fn cmd_change_password(config: &Config, username: &str) -> anyhow::Result<()> {
    let service = open_service(config).await?;
    let current = read_secret("Current password", false)?;
    let new = read_secret("New password", true)?;

    service.change_password(username, &current, &new).await?;
    println!("✓ Password changed for {username}");

    Ok(())
}
