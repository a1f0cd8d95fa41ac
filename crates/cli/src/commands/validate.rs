//! `validate`: check the trigger and group table without side effects.

use anyhow::{Context, Result};
use dispatch::{ExecutionMode, GroupTable};
use serde::Serialize;

use crate::cli::ValidateArgs;
use crate::config::load_group_table;

/// What a `run` with the same inputs would dispatch.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// Resolved execution mode (and serial, for single-device runs).
    pub execution: ExecutionMode,
    /// Group table that would be handed to the generator.
    pub group_list: GroupTable,
}

/// Parses the trigger and group table and prints the report.
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let report = build_report(args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn build_report(args: &ValidateArgs) -> Result<ValidationReport> {
    let execution = ExecutionMode::from_invocation_argument(args.trigger.as_deref())
        .context("invalid trigger")?;
    let group_list = load_group_table(&args.group_args)?;
    Ok(ValidationReport {
        execution,
        group_list,
    })
}

fn render_text(report: &ValidationReport) -> String {
    let mut out = match report.execution.serial_number() {
        Some(serial) => format!("mode: single device (serial {serial})\n"),
        None => "mode: fleet wide\n".to_string(),
    };
    out.push_str(&format!("groups: {}\n", report.group_list.len()));
    for (index, group) in report.group_list.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} -> manifest '{}' (catalog '{}', type '{}')\n",
            index + 1,
            group.group_id,
            group.manifest_name,
            group.catalog,
            group.group_type
        ));
    }
    out
}
