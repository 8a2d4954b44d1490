//! Whole-token symbol substitution.

use std::collections::BTreeMap;

use super::lexer::{is_selector, tokenize, TokenKind};
use super::table::RenameTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Replacements made, keyed by pattern.
    pub counts: BTreeMap<String, usize>,
}

impl Rewrite {
    pub fn replacements(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Replace every bare identifier that has a rule with its qualified form.
///
/// Only identifier tokens are considered, so comments and literals are left
/// alone, and identifiers already behind a `.` (including previously
/// qualified ones) are skipped. A second pass over the output is a no-op.
pub fn rewrite_symbols(text: &str, table: &RenameTable) -> Rewrite {
    let tokens = tokenize(text);
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut counts = BTreeMap::new();

    for (i, token) in tokens.iter().enumerate() {
        let piece = token.text(text);
        let rule = match token.kind {
            TokenKind::Identifier => table.lookup(piece),
            _ => None,
        };

        match rule {
            Some(rule) if !is_selector(&tokens, i, text) => {
                out.push_str(&rule.replacement);
                *counts.entry(rule.pattern.clone()).or_insert(0) += 1;
            }
            _ => out.push_str(piece),
        }
    }

    Rewrite { text: out, counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::builtin_config;

    fn table() -> RenameTable {
        let mut config = builtin_config();
        config.symbols = vec!["RequireThreadAndTopic".to_string()];
        config.task_constants = vec![
            "TaskReply".to_string(),
            "TaskEditReply".to_string(),
            "TaskCancel".to_string(),
        ];
        RenameTable::from_config(&config).unwrap()
    }

    #[test]
    fn rewrites_every_occurrence() {
        let text = "h := RequireThreadAndTopic(x)\nif t == TaskReply || u == TaskReply {}\n";
        let rewrite = rewrite_symbols(text, &table());
        assert_eq!(
            rewrite.text,
            "h := forumcommon.RequireThreadAndTopic(x)\nif t == forumcommon.TaskReply || u == forumcommon.TaskReply {}\n"
        );
        assert_eq!(rewrite.counts["TaskReply"], 2);
        assert_eq!(rewrite.replacements(), 3);
    }

    #[test]
    fn no_partial_word_collisions() {
        let text = "a := TaskEditReply\nb := TaskReplyLater\nc := MyTaskReply\n";
        let rewrite = rewrite_symbols(text, &table());
        assert_eq!(
            rewrite.text,
            "a := forumcommon.TaskEditReply\nb := TaskReplyLater\nc := MyTaskReply\n"
        );
        assert_eq!(rewrite.counts.get("TaskReply"), None);
    }

    #[test]
    fn leaves_literals_comments_and_selectors() {
        let text = "// TaskCancel here\ns := \"TaskCancel\"\nv := other.TaskCancel\nw := forumcommon.TaskCancel\n";
        let rewrite = rewrite_symbols(text, &table());
        assert_eq!(rewrite.text, text);
        assert_eq!(rewrite.replacements(), 0);
    }

    #[test]
    fn second_pass_is_noop() {
        let once = rewrite_symbols("x(TaskCancel, TaskReply)\n", &table());
        let twice = rewrite_symbols(&once.text, &table());
        assert_eq!(twice.text, once.text);
        assert_eq!(twice.replacements(), 0);
    }

    #[test]
    fn explicit_rename_uses_its_own_target() {
        let rewrite = rewrite_symbols("CustomForumIndex(cd, r)\n", &table());
        assert_eq!(rewrite.text, "forumcommon.CustomIndex(cd, r)\n");
    }
}
