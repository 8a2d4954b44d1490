use clap::Args;
use serde::Serialize;

use requalify::codemod::{self, RunOptions, RunReport};
use requalify::defaults;

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Root directories to walk (default: roots from the config)
    roots: Vec<String>,

    /// Compute changes without writing them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Root directories to walk (default: roots from the config)
    roots: Vec<String>,
}

#[derive(Serialize)]
pub struct CodemodOutput {
    pub command: &'static str,
    #[serde(flatten)]
    pub report: RunReport,
}

pub fn run(args: RunArgs, global: &super::GlobalArgs) -> CmdResult<CodemodOutput> {
    let config = defaults::resolve_config(global.config.as_deref())?;
    let report = codemod::run_codemod(
        &config,
        &args.roots,
        RunOptions {
            dry_run: args.dry_run,
        },
    )?;

    requalify::log_status!(
        "requalify",
        "{} of {} files changed ({} replacements)",
        report.files_changed(),
        report.files_scanned,
        report.total_replacements
    );

    Ok((
        CodemodOutput {
            command: "run",
            report,
        },
        0,
    ))
}

/// Dry run that exits 1 when any file would change.
pub fn check(args: CheckArgs, global: &super::GlobalArgs) -> CmdResult<CodemodOutput> {
    let config = defaults::resolve_config(global.config.as_deref())?;
    let report = codemod::run_codemod(&config, &args.roots, RunOptions { dry_run: true })?;

    let exit_code = if report.files_changed() > 0 { 1 } else { 0 };

    Ok((
        CodemodOutput {
            command: "check",
            report,
        },
        exit_code,
    ))
}
