//! Rename table: bare identifier -> module-qualified replacement.

use crate::defaults::CodemodConfig;
use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::lexer::{is_selector, tokenize, TokenKind};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*$").unwrap());

static QUALIFIED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*\.[\p{L}_][\p{L}\p{N}_]*$").unwrap()
});

/// Where a rule came from in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    Symbol,
    TaskConstant,
    Explicit,
}

impl RuleSource {
    fn config_key(self) -> &'static str {
        match self {
            RuleSource::Symbol => "symbols",
            RuleSource::TaskConstant => "task_constants",
            RuleSource::Explicit => "renames",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRule {
    pub pattern: String,
    pub replacement: String,
    pub source: RuleSource,
}

/// Immutable, validated set of rules. Patterns are unique.
#[derive(Debug, Clone)]
pub struct RenameTable {
    rules: Vec<RenameRule>,
    index: HashMap<String, usize>,
}

impl RenameTable {
    /// Build the table from config, qualifying `symbols`, `task_constants`
    /// and bare `renames` targets with the shared module name. An explicit
    /// rename may spell out the qualifier, but only as the shared module.
    pub fn from_config(config: &CodemodConfig) -> Result<Self> {
        let module = &config.shared_module.name;
        if !IDENTIFIER.is_match(module) {
            return Err(Error::config_invalid_value(
                "shared_module.name",
                Some(module.clone()),
                "must be a bare identifier",
            ));
        }
        if config.shared_module.import_path.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "shared_module.import_path",
                None,
                "must not be empty",
            ));
        }

        let mut entries = Vec::new();
        for ident in &config.symbols {
            entries.push((ident.clone(), format!("{}.{}", module, ident), RuleSource::Symbol));
        }
        for ident in &config.task_constants {
            entries.push((
                ident.clone(),
                format!("{}.{}", module, ident),
                RuleSource::TaskConstant,
            ));
        }
        for (ident, target) in &config.renames {
            let replacement = match target.split_once('.') {
                Some((qualifier, _)) if qualifier != module => {
                    return Err(Error::config_invalid_value(
                        "renames",
                        Some(target.clone()),
                        format!("replacement must be qualified with {}", module),
                    ));
                }
                Some(_) => target.clone(),
                None => format!("{}.{}", module, target),
            };
            entries.push((ident.clone(), replacement, RuleSource::Explicit));
        }

        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<(String, String, RuleSource)>) -> Result<Self> {
        let mut rules: Vec<RenameRule> = Vec::with_capacity(entries.len());
        let mut index = HashMap::new();

        for (pattern, replacement, source) in entries {
            if !IDENTIFIER.is_match(&pattern) {
                return Err(Error::config_invalid_value(
                    source.config_key(),
                    Some(pattern),
                    "pattern must be a bare identifier",
                ));
            }
            if !QUALIFIED.is_match(&replacement) {
                return Err(Error::config_invalid_value(
                    source.config_key(),
                    Some(replacement),
                    "replacement must look like module.Identifier",
                ));
            }
            if let Some(&existing) = index.get(&pattern) {
                let first: &RenameRule = &rules[existing];
                return Err(Error::config_duplicate_pattern(
                    pattern,
                    first.source.config_key(),
                    source.config_key(),
                ));
            }

            index.insert(pattern.clone(), rules.len());
            rules.push(RenameRule {
                pattern,
                replacement,
                source,
            });
        }

        Ok(Self { rules, index })
    }

    pub fn rules(&self) -> &[RenameRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn lookup(&self, identifier: &str) -> Option<&RenameRule> {
        self.index.get(identifier).map(|&i| &self.rules[i])
    }

    /// True when any rule matches a bare (unqualified) identifier in `text`.
    pub fn applies_to(&self, text: &str) -> bool {
        let tokens = tokenize(text);
        tokens.iter().enumerate().any(|(i, token)| {
            token.kind == TokenKind::Identifier
                && self.lookup(token.text(text)).is_some()
                && !is_selector(&tokens, i, text)
        })
    }
}
