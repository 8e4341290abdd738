mod add;
mod check;
mod init;
mod list;
mod passwd;
mod remove;

pub use add::cmd_add_account;
pub use check::cmd_check_password;
pub use init::cmd_init;
pub use list::cmd_list_accounts;
pub use passwd::cmd_change_password;
pub use remove::cmd_remove_account;

use std::io::{BufRead, IsTerminal};
use std::sync::Arc;

use dialoguer::Password;
use tracing::debug;

use crate::config::Config;
use crate::db::Store;
use crate::services::StoreAuthService;

async fn open_service(config: &Config) -> anyhow::Result<StoreAuthService> {
    config.validate()?;
    debug!(database = %config.general.database_path, "Opening account store");

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(StoreAuthService::new(Arc::new(store), &config.security)?)
}

/// Read a password: a hidden prompt on a terminal, otherwise the next stdin line.
///
/// With `confirm`, the terminal prompt asks twice and requires both to match.
fn read_secret(prompt: &str, confirm: bool) -> anyhow::Result<String> {
    if std::io::stdin().is_terminal() {
        let mut input = Password::new().with_prompt(prompt);
        if confirm {
            input = input.with_confirmation("Repeat password", "Passwords do not match");
        }
        return Ok(input.interact()?);
    }

    read_secret_line(&mut std::io::stdin().lock())
}

/// Read one line without its line terminator.
fn read_secret_line(reader: &mut impl BufRead) -> anyhow::Result<String> {
    let mut input = String::new();
    let read = reader.read_line(&mut input)?;
    if read == 0 {
        anyhow::bail!("Expected a password on stdin");
    }

    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
