//! List accounts command handler

use crate::config::Config;
use crate::services::AuthService;

use super::open_service;

pub async fn cmd_list_accounts(config: &Config, json: bool) -> anyhow::Result<()> {
    let service = open_service(config).await?;
    let accounts = service.list_accounts().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts registered.");
        println!();
        println!("Add one with: kagi add <username>");
        return Ok(());
    }

    println!("Accounts ({} total)", accounts.len());
    println!("{:-<70}", "");

    for account in accounts {
        println!("• {}", account.username);
        println!(
            "  Created: {} | Updated: {}",
            account.created_at, account.updated_at
        );
    }

    Ok(())
}
