// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trident - multi-tenant gateway for mock AI services.
//!
//! This is the binary entry point: `serve` runs the gateway, the remaining
//! subcommands administer tokens and operator accounts in the database.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trident_config::TridentConfig;
use trident_core::Service;

/// Trident - multi-tenant gateway for mock AI services.
#[derive(Parser, Debug)]
#[command(name = "trident", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the XDG lookup.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway and background job scheduler.
    Serve,
    /// Manage API access tokens.
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },
    /// Manage operator accounts.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommands {
    /// Issue a new token and print it.
    Issue {
        /// Label shown in `token list`.
        #[arg(long)]
        name: String,
        /// Workspace that owns records created with the token.
        #[arg(long)]
        workspace: i64,
        /// Restrict the token to one service (chatterblast, dreamweaver, mindreader).
        #[arg(long)]
        service: Option<Service>,
    },
    /// Revoke a token by value.
    Revoke { token: String },
    /// List issued tokens.
    List,
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Create an operator account; the password is read from the terminal.
    Add { username: String },
}

fn load_config(path: Option<&PathBuf>) -> TridentConfig {
    let loaded = match path {
        Some(path) => trident_config::load_and_validate_path(path),
        None => trident_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            trident_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Token { action }) => match action {
            TokenCommands::Issue {
                name,
                workspace,
                service,
            } => admin::run_token_issue(&config, &name, workspace, service).await,
            TokenCommands::Revoke { token } => admin::run_token_revoke(&config, &token).await,
            TokenCommands::List => admin::run_token_list(&config).await,
        },
        Some(Commands::User { action }) => match action {
            UserCommands::Add { username } => admin::run_user_add(&config, &username).await,
        },
        None => {
            println!("trident: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn token_issue_parses_service_scope() {
        let cli = Cli::try_parse_from([
            "trident",
            "token",
            "issue",
            "--name",
            "ci",
            "--workspace",
            "4",
            "--service",
            "dreamweaver",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Token {
                action:
                    TokenCommands::Issue {
                        name,
                        workspace,
                        service,
                    },
            }) => {
                assert_eq!(name, "ci");
                assert_eq!(workspace, 4);
                assert_eq!(service, Some(Service::DreamWeaver));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn unknown_service_is_rejected() {
        let parsed = Cli::try_parse_from([
            "trident", "token", "issue", "--name", "x", "--workspace", "1", "--service", "oracle",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["trident", "token", "list", "--config", "/tmp/t.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/t.toml")));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = trident_config::load_and_validate_str("").expect("default config is valid");
        assert_eq!(config.server.port, 5000);
    }
}
