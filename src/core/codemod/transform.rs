//! Per-file orchestration: guard, decide, inject, rewrite, persist.

use crate::defaults::{CodemodConfig, MissingImportSite, SharedModule};
use crate::error::Result;
use crate::utils::io;
use serde::Serialize;
use std::collections::BTreeMap;

use super::guard::{has_import, is_self_reference};
use super::imports::{inject_import, ImportAction};
use super::rewrite::rewrite_symbols;
use super::table::RenameTable;
use super::walker::Candidate;

/// Immutable inputs shared by every file in a run.
#[derive(Debug, Clone)]
pub struct CodemodContext {
    pub table: RenameTable,
    pub shared_module: SharedModule,
    pub missing_import_site: MissingImportSite,
}

impl CodemodContext {
    pub fn from_config(config: &CodemodConfig) -> Result<Self> {
        Ok(Self {
            table: RenameTable::from_config(config)?,
            shared_module: config.shared_module.clone(),
            missing_import_site: config.missing_import_site,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SelfReference,
    NoApplicableRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedSource {
    pub text: String,
    pub import: ImportAction,
    pub counts: BTreeMap<String, usize>,
}

impl ChangedSource {
    pub fn replacements(&self) -> usize {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformation {
    Unchanged(SkipReason),
    Changed(ChangedSource),
}

/// Transform one file's text. Pure: no I/O.
///
/// The self-reference guard runs first and short-circuits everything else.
/// The import is only considered once at least one rule is known to apply,
/// so a file that ends up unchanged never gains an import.
pub fn transform_source(text: &str, context: &CodemodContext) -> Transformation {
    if is_self_reference(text, &context.shared_module.name) {
        return Transformation::Unchanged(SkipReason::SelfReference);
    }

    if !context.table.applies_to(text) {
        return Transformation::Unchanged(SkipReason::NoApplicableRule);
    }

    let (with_import, import) = if has_import(text, &context.shared_module.import_path) {
        (text.to_string(), ImportAction::AlreadyPresent)
    } else {
        inject_import(
            text,
            &context.shared_module.import_path,
            context.missing_import_site,
        )
    };

    let rewrite = rewrite_symbols(&with_import, &context.table);
    if rewrite.text == text {
        return Transformation::Unchanged(SkipReason::NoApplicableRule);
    }

    Transformation::Changed(ChangedSource {
        text: rewrite.text,
        import,
        counts: rewrite.counts,
    })
}

/// Why a file could not be processed. Never aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ReadFailure,
    WriteFailure,
    WalkFailure,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    NoApplicableImportSite,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileWarning {
    pub file: String,
    pub kind: WarningKind,
    pub message: String,
}

/// Confirmation record for a changed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileEdit {
    pub file: String,
    pub replacements: usize,
    pub import: ImportAction,
    pub rules: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
pub enum FileOutcome {
    Unchanged(SkipReason),
    /// Changed; written unless the run is a dry run.
    Changed(FileEdit),
    Failed(FileFailure),
}

/// Read, transform and (unless `dry_run`) write back one candidate.
pub fn process_file(candidate: &Candidate, context: &CodemodContext, dry_run: bool) -> FileOutcome {
    let file = candidate.display();

    let original = match io::read_file(&candidate.path, &format!("read {}", file)) {
        Ok(text) => text,
        Err(err) => {
            return FileOutcome::Failed(FileFailure {
                file,
                kind: FailureKind::ReadFailure,
                message: io::error_message(&err),
            })
        }
    };

    let changed = match transform_source(&original, context) {
        Transformation::Unchanged(reason) => return FileOutcome::Unchanged(reason),
        Transformation::Changed(changed) => changed,
    };

    if !dry_run {
        if let Err(err) =
            io::write_file_atomic(&candidate.path, &changed.text, &format!("write {}", file))
        {
            return FileOutcome::Failed(FileFailure {
                file,
                kind: FailureKind::WriteFailure,
                message: io::error_message(&err),
            });
        }
    }

    FileOutcome::Changed(FileEdit {
        file,
        replacements: changed.replacements(),
        import: changed.import,
        rules: changed.counts,
    })
}
