//! CLI module - Command-line interface for Kagi
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kagi - local account and credential store
#[derive(Parser)]
#[command(name = "kagi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Register a new account (password read from stdin)
    #[command(alias = "a")]
    Add {
        username: String,
    },

    /// Verify a password (read from stdin) against an account
    #[command(alias = "c")]
    Check {
        username: String,
    },

    /// Change a password; reads the current then the new password from stdin
    Passwd {
        username: String,
    },

    /// Delete an account
    #[command(alias = "rm", alias = "r")]
    Remove {
        username: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// List all accounts
    #[command(alias = "ls", alias = "l")]
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub use commands::*;
