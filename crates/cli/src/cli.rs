//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// munki-dispatch: decide between a single-device and a fleet-wide Munki
/// manifest run and invoke the manifest generator.
#[derive(Parser, Debug)]
#[command(
    name = "munki-dispatch",
    version,
    about = "Webhook/schedule dispatcher for Munki manifest generation",
    long_about = "Runs inside an automation job. With a webhook argument it generates the \n\
                  manifest of one device; without one it generates manifests for the whole \n\
                  fleet. Credentials are resolved from the automation variable store and \n\
                  handed to the manifest generator together with the group table."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "json",
        global = true,
        env = "MUNKI_DISPATCH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// OTLP endpoint for trace export (disabled when unset)
    #[arg(long, global = true, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otel_endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve credentials and invoke the manifest generator
    Run(RunArgs),

    /// Parse the trigger and group table without touching secrets or the generator
    Validate(ValidateArgs),
}

/// Options shared by every command that needs the group table.
#[derive(Args, Debug, Clone)]
pub struct GroupArgs {
    /// JSON group table file (defaults to the built-in reference table)
    #[arg(long, env = "MUNKI_DISPATCH_GROUPS")]
    pub groups: Option<PathBuf>,
}

/// Arguments for the `run` command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Webhook envelope (`<field>,RequestBody:<json>`); omit for a fleet-wide run
    pub trigger: Option<String>,

    #[command(flatten)]
    pub group_args: GroupArgs,

    /// JSON file of automation variables; the environment is used when unset
    #[arg(long, env = "MUNKI_DISPATCH_SECRETS_FILE")]
    pub secrets_file: Option<PathBuf>,

    /// Prefix of environment variables holding automation variables
    #[arg(
        long,
        default_value = "",
        env = "MUNKI_DISPATCH_SECRET_PREFIX",
        conflicts_with = "secrets_file"
    )]
    pub secret_env_prefix: String,

    /// Manifest generator program
    #[arg(long, env = "MUNKI_DISPATCH_GENERATOR", required_unless_present = "dry_run")]
    pub generator: Option<PathBuf>,

    /// Extra argument passed to the generator before any serial number (repeatable)
    #[arg(long = "generator-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub generator_args: Vec<String>,

    /// Print the generation plan instead of invoking the generator
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Webhook envelope to validate; omit to validate a fleet-wide run
    pub trigger: Option<String>,

    #[command(flatten)]
    pub group_args: GroupArgs,

    /// Output the validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}
