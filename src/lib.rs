pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;

use cli::{
    Cli, Commands, cmd_add_account, cmd_change_password, cmd_check_password, cmd_init,
    cmd_list_accounts, cmd_remove_account,
};
pub use config::Config;
use config::GeneralConfig;
pub use models::{Account, AccountError, CredentialHasher};
use tracing_subscriber::EnvFilter;

/// Load the config named on the command line, or search the default paths.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) if matches!(cli.command, Commands::Init) && !path.exists() => {
            Ok(Config::default())
        }
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn init_tracing(general: &GeneralConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if general.log_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config.general);

    match cli.command {
        Commands::Init => {
            let path = cli.config.unwrap_or_else(Config::default_config_path);
            cmd_init(&path)
        }
        Commands::Add { username } => cmd_add_account(&config, &username).await,
        Commands::Check { username } => cmd_check_password(&config, &username).await,
        Commands::Passwd { username } => cmd_change_password(&config, &username).await,
        Commands::Remove { username, yes } => cmd_remove_account(&config, &username, yes).await,
        Commands::List { json } => cmd_list_accounts(&config, json).await,
    }
}
