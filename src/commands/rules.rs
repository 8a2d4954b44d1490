use clap::Args;
use serde::Serialize;

use requalify::codemod::{RenameRule, RenameTable};
use requalify::defaults::{self, MissingImportSite, SharedModule};

use super::CmdResult;

#[derive(Args)]
pub struct RulesArgs {}

#[derive(Serialize)]
pub struct RulesOutput {
    pub command: &'static str,
    pub shared_module: SharedModule,
    pub roots: Vec<String>,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub missing_import_site: MissingImportSite,
    pub total_rules: usize,
    pub rules: Vec<RenameRule>,
}

pub fn run(_args: RulesArgs, global: &super::GlobalArgs) -> CmdResult<RulesOutput> {
    let config = defaults::resolve_config(global.config.as_deref())?;
    let table = RenameTable::from_config(&config)?;

    Ok((
        RulesOutput {
            command: "rules",
            shared_module: config.shared_module,
            roots: config.roots,
            extensions: config.extensions,
            exclude: config.exclude,
            missing_import_site: config.missing_import_site,
            total_rules: table.len(),
            rules: table.rules().to_vec(),
        },
        0,
    ))
}
