//! `run`: resolve credentials and invoke the manifest generator.

use std::sync::Arc;

use anyhow::{Context, Result};
use dispatch::{DispatchError, Dispatcher, ExecutionMode, ManifestGenerator, SecretStore};
use generator::{CommandManifestGenerator, DryRunManifestGenerator};
use secrets::{EnvironmentSecretStore, JsonFileSecretStore};
use tracing::info;

use crate::cli::RunArgs;
use crate::config::load_group_table;

/// Outcome of a `run` invocation.
#[derive(Debug)]
pub enum RunOutcome {
    /// The generator reported success.
    Completed,
    /// The dispatch failed; the process exits with `error.exit_code()`.
    Failed {
        /// Why the run stopped.
        error: DispatchError,
    },
}

/// Wires adapters from `args` and performs one dispatch.
///
/// The trigger is parsed first, so a malformed trigger fails before any
/// file or secret is read. Configuration problems (unreadable group table or
/// secrets file) are returned as `Err`; dispatch failures are reported through
/// [`RunOutcome`] so the caller can preserve the generator's exit status.
pub async fn run_dispatch(args: &RunArgs) -> Result<RunOutcome> {
    let mode = match ExecutionMode::from_invocation_argument(args.trigger.as_deref()) {
        Ok(mode) => mode,
        Err(e) => {
            return Ok(RunOutcome::Failed {
                error: DispatchError::MalformedTrigger(e),
            })
        }
    };

    let group_list = load_group_table(&args.group_args)?;
    let secret_store = build_secret_store(args).await?;
    let generator = build_generator(args)?;

    let dispatcher = Dispatcher::new(secret_store, generator, group_list);
    info!(run_id = %dispatcher.run_id(), dry_run = args.dry_run, "starting dispatch");

    match dispatcher.dispatch(mode).await {
        Ok(()) => Ok(RunOutcome::Completed),
        Err(error) => Ok(RunOutcome::Failed { error }),
    }
}

async fn build_secret_store(args: &RunArgs) -> Result<Arc<dyn SecretStore>> {
    match &args.secrets_file {
        Some(path) => {
            let store = JsonFileSecretStore::load(path).await?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(EnvironmentSecretStore::new(
            args.secret_env_prefix.clone(),
        ))),
    }
}

fn build_generator(args: &RunArgs) -> Result<Arc<dyn ManifestGenerator>> {
    if args.dry_run {
        return Ok(Arc::new(DryRunManifestGenerator));
    }

    let program = args
        .generator
        .clone()
        .context("--generator is required unless --dry-run is set")?;
    Ok(Arc::new(CommandManifestGenerator::new(
        program,
        args.generator_args.clone(),
    )))
}
