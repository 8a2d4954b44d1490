//! Symbol relocation codemod.
//!
//! Walks source files, qualifies every bare reference to a relocated
//! identifier with the shared module's name (`Foo` -> `forumcommon.Foo`), and
//! makes sure each rewritten file imports the shared module exactly once.
//! Files that belong to the shared module itself are never touched.

mod guard;
mod imports;
mod lexer;
mod rewrite;
mod table;
mod transform;
mod walker;

pub use guard::{declared_package, has_import, is_self_reference};
pub use imports::{find_import_site, inject_import, ImportAction, ImportSite};
pub use lexer::{tokenize, Token, TokenKind};
pub use rewrite::{rewrite_symbols, Rewrite};
pub use table::{RenameRule, RenameTable, RuleSource};
pub use transform::{
    process_file, transform_source, ChangedSource, CodemodContext, FailureKind, FileEdit,
    FileFailure, FileOutcome, FileWarning, SkipReason, Transformation, WarningKind,
};
pub use walker::{Candidate, Candidates, FileWalker, WalkFailure};

use crate::defaults::CodemodConfig;
use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute edits without writing them.
    pub dry_run: bool,
}

/// The full result of a codemod run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub roots: Vec<String>,
    pub dry_run: bool,
    pub files_scanned: usize,
    pub files_unchanged: usize,
    /// One confirmation record per changed file.
    pub edits: Vec<FileEdit>,
    /// Files skipped because they belong to the shared module.
    pub self_references: Vec<String>,
    pub warnings: Vec<FileWarning>,
    pub failures: Vec<FileFailure>,
    pub total_replacements: usize,
    /// Whether edits were written to disk.
    pub applied: bool,
}

impl RunReport {
    fn new(walker: &FileWalker, options: RunOptions) -> Self {
        Self {
            roots: walker
                .roots()
                .iter()
                .map(|r| r.display().to_string())
                .collect(),
            dry_run: options.dry_run,
            files_scanned: 0,
            files_unchanged: 0,
            edits: Vec::new(),
            self_references: Vec::new(),
            warnings: Vec::new(),
            failures: Vec::new(),
            total_replacements: 0,
            applied: false,
        }
    }

    pub fn files_changed(&self) -> usize {
        self.edits.len()
    }
}

/// Process every candidate from `walker`. Per-file failures are recorded in
/// the report and never stop the walk.
pub fn run(context: &CodemodContext, walker: &FileWalker, options: RunOptions) -> RunReport {
    let mut report = RunReport::new(walker, options);

    for item in walker.candidates() {
        let candidate = match item {
            Ok(candidate) => candidate,
            Err(failure) => {
                crate::log_status!("requalify", "Cannot read {}: {}", failure.path, failure.message);
                report.failures.push(FileFailure {
                    file: failure.path,
                    kind: FailureKind::WalkFailure,
                    message: failure.message,
                });
                continue;
            }
        };

        report.files_scanned += 1;

        match process_file(&candidate, context, options.dry_run) {
            FileOutcome::Unchanged(SkipReason::SelfReference) => {
                report.files_unchanged += 1;
                report.self_references.push(candidate.display());
            }
            FileOutcome::Unchanged(SkipReason::NoApplicableRule) => {
                report.files_unchanged += 1;
            }
            FileOutcome::Changed(edit) => {
                if edit.import == ImportAction::None {
                    report.warnings.push(FileWarning {
                        file: edit.file.clone(),
                        kind: WarningKind::NoApplicableImportSite,
                        message: format!(
                            "No import declaration found; add \"{}\" manually",
                            context.shared_module.import_path
                        ),
                    });
                }
                if options.dry_run {
                    crate::log_status!("requalify", "Would update {}", edit.file);
                } else {
                    crate::log_status!("requalify", "Updated {}", edit.file);
                }
                report.total_replacements += edit.replacements;
                report.edits.push(edit);
            }
            FileOutcome::Failed(failure) => {
                crate::log_status!("requalify", "Failed {}: {}", failure.file, failure.message);
                report.failures.push(failure);
            }
        }
    }

    report.applied = !options.dry_run && !report.edits.is_empty();
    report
}

/// Build the context and walker from config, then run. `roots` overrides
/// the configured roots when non-empty.
///
/// Only invalid configuration or an unusable root returns `Err`.
pub fn run_codemod(
    config: &CodemodConfig,
    roots: &[String],
    options: RunOptions,
) -> Result<RunReport> {
    let context = CodemodContext::from_config(config)?;
    let roots = if roots.is_empty() {
        config.roots.as_slice()
    } else {
        roots
    };
    let walker = FileWalker::new(roots, config)?;

    Ok(run(&context, &walker, options))
}
