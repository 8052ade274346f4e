//! Clap derive structures for the `meterly` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// meterly -- list the AMI meters on a utility account
#[derive(Debug, Parser)]
#[command(
    name = "meterly",
    version,
    about = "List the AMI utility meters attached to a utility account",
    long_about = "Logs in to the municipal utility billing portal, trades the portal \
        session for an analytics token, and lists every water, electric and gas \
        meter on the account.\n\n\
        Credentials come from UTILITY_USERNAME, UTILITY_PASSWORD and \
        ACCOUNT_NUMBER (environment, .env, or the config file).",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Defaults to `meters`
    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'o', default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Account number (overrides ACCOUNT_NUMBER)
    #[arg(long, short = 'a', global = true)]
    pub account: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Config file path
    #[arg(long, env = "METERLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact single-line JSON (default)
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Pretty table
    Table,
    /// YAML
    Yaml,
    /// One meter id per line
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List meters on the account
    #[command(alias = "m")]
    Meters(MetersArgs),

    /// Print the raw account details document
    Account,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Default, Args)]
pub struct MetersArgs {
    /// Only list meters of this type
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub meter_type: Option<MeterKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MeterKind {
    Water,
    Electric,
    Gas,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
