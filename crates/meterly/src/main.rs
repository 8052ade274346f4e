mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use meterly_core::Portal;

use crate::cli::{Cli, Command, MetersArgs};
use crate::commands::PortalCommand;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Log to stderr; stdout carries only the rendered document.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let directive = format!(
        "warn,meterly={level},meterly_api={level},meterly_core={level},meterly_config={level}"
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let cmd = match cli.command {
        Some(Command::Completions(args)) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "meterly", &mut std::io::stdout());
            return Ok(());
        }
        Some(Command::Meters(args)) => PortalCommand::Meters(args),
        Some(Command::Account) => PortalCommand::Account,
        // A bare invocation lists meters.
        None => PortalCommand::Meters(MetersArgs::default()),
    };

    let portal = Portal::new(config::build_portal_config(&cli.global)?);
    tracing::debug!(command = ?cmd, "dispatching command");
    commands::dispatch(cmd, &portal, &cli.global).await
}
