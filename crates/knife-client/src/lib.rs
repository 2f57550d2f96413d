pub mod actions;
pub mod api;
pub mod bookmarks;
pub mod cli;
pub mod commands;
pub mod config;
pub mod drafts;
pub mod error;
pub mod events;
pub mod feed;
pub mod gate;
pub mod memory;
pub mod pages;
pub mod profile;
pub mod render;
pub mod session;
pub mod state;
pub mod view;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::{Cli, OutputFormat};
use crate::config::ClientConfig;
use crate::state::AppState;

/// Entry point of the `knife` binary. Returns whether the command's action
/// succeeded; start-up problems are errors.
pub fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("knife_client_lib=info,knife_shared=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::info!("Starting knife v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::from_env().with_overrides(
        cli.server.as_deref(),
        cli.token.as_deref(),
        cli.yes,
    );
    tracing::debug!(
        server = %config.server_url,
        authenticated = config.auth_token.is_some(),
        assume_yes = config.assume_yes,
        "Loaded configuration"
    );

    let state = if cli.offline {
        AppState::offline(config)
    } else {
        AppState::connect(config)?
    };

    // One user, one action at a time: a single-threaded runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let rendered = runtime.block_on(cli::execute(&state, cli.command));

    match cli.format {
        OutputFormat::Html => println!("{}", rendered.html),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rendered)?),
    }
    Ok(rendered.succeeded())
}
