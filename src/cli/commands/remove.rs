use crate::config::Config;
use crate::services::{AuthError, AuthService};

use super::open_service;

pub async fn cmd_remove_account(config: &Config, username: &str, yes: bool) -> anyhow::Result<()> {
    let service = open_service(config).await?;

    if !yes {
        println!("Remove account '{username}'?");
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match service.remove_account(username).await {
        Ok(()) => println!("✓ Removed: {username}"),
        Err(AuthError::AccountNotFound) => println!("Account '{username}' not found."),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
