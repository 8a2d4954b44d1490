//! Import declaration discovery and injection.

use crate::defaults::MissingImportSite;
use serde::Serialize;

use super::lexer::{next_significant, tokenize, Token, TokenKind};

/// What happened to the shared import in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportAction {
    AlreadyPresent,
    /// Added as the first entry of an `import ( ... )` block.
    Block,
    /// Added as its own `import "..."` line after the first single-line import.
    SingleLine,
    /// Added after the package clause because the file had no imports.
    Synthesized,
    /// No import site and synthesis disabled; symbols rewritten only.
    None,
}

/// Where an import can be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSite {
    /// Byte offset just past the block's `(`.
    Block { open_paren: usize },
    /// Byte offset just past the declaration: the end of its line, or the
    /// end of the path literal when more code shares that line.
    SingleLine { insert_at: usize },
    None,
}

/// First block-form import if any, otherwise the first single-line import.
pub fn find_import_site(text: &str) -> ImportSite {
    let tokens = tokenize(text);
    let mut first_single = None;

    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Identifier || token.text(text) != "import" {
            continue;
        }
        let Some(next) = next_significant(&tokens, i, text) else {
            continue;
        };
        let next_token = &tokens[next];

        if let Some(offset) = open_paren_offset(next_token, text) {
            return ImportSite::Block {
                open_paren: offset + 1,
            };
        }

        if first_single.is_none() {
            if let Some(path) = single_import_path(&tokens, next, text) {
                first_single = Some(single_line_insert_at(&tokens, path, text));
            }
        }
    }

    match first_single {
        Some(insert_at) => ImportSite::SingleLine { insert_at },
        None => ImportSite::None,
    }
}

fn open_paren_offset(token: &Token, text: &str) -> Option<usize> {
    if token.kind != TokenKind::Other {
        return None;
    }
    let raw = token.text(text);
    let leading = raw.len() - raw.trim_start().len();
    raw[leading..].starts_with('(').then_some(token.start + leading)
}

/// The path literal of `import "p"`, `import name "p"`, `import _ "p"` or
/// `import . "p"`, starting at the token after the keyword.
fn single_import_path(tokens: &[Token], index: usize, text: &str) -> Option<usize> {
    let token = &tokens[index];
    let path = match token.kind {
        TokenKind::String => index,
        TokenKind::Identifier => next_significant(tokens, index, text)?,
        TokenKind::Other if token.text(text).trim() == "." => {
            next_significant(tokens, index, text)?
        }
        _ => return None,
    };
    (tokens[path].kind == TokenKind::String).then_some(path)
}

/// `import "fmt"; var x = 1` keeps the new import ahead of the `var`.
fn single_line_insert_at(tokens: &[Token], path: usize, text: &str) -> usize {
    let path_end = tokens[path].end;
    let eol = line_end(text, path_end);

    for token in tokens[path + 1..].iter().take_while(|t| t.start < eol) {
        let spills = token.kind == TokenKind::Comment && token.end > eol;
        if spills || !token.is_trivia(text) {
            return path_end;
        }
    }
    eol
}

fn line_end(text: &str, from: usize) -> usize {
    text[from..].find('\n').map(|p| from + p).unwrap_or(text.len())
}

/// End of the `package name` line, used when synthesizing an import.
fn package_clause_end(text: &str) -> Option<usize> {
    let tokens = tokenize(text);
    let first = tokens.iter().position(|t| !t.is_trivia(text))?;
    if tokens[first].text(text) != "package" {
        return None;
    }
    let name = &tokens[next_significant(&tokens, first, text)?];
    Some(line_end(text, name.end))
}

/// Insert an import of `import_path`. The caller has already established
/// that the file lacks it.
pub fn inject_import(
    text: &str,
    import_path: &str,
    missing: MissingImportSite,
) -> (String, ImportAction) {
    let quoted = format!("\"{}\"", import_path);

    match find_import_site(text) {
        ImportSite::Block { open_paren } => {
            let rest_of_line = &text[open_paren..line_end(text, open_paren)];
            let entry = if rest_of_line.trim().is_empty() {
                format!("\n\t{}", quoted)
            } else {
                // Single-line block such as `import ("fmt")`.
                format!("\n\t{}\n\t", quoted)
            };
            (splice(text, open_paren, &entry), ImportAction::Block)
        }
        ImportSite::SingleLine { insert_at } => (
            splice(text, insert_at, &format!("\nimport {}", quoted)),
            ImportAction::SingleLine,
        ),
        ImportSite::None => match (missing, package_clause_end(text)) {
            (MissingImportSite::Synthesize, Some(end)) => (
                splice(text, end, &format!("\n\nimport {}", quoted)),
                ImportAction::Synthesized,
            ),
            _ => (text.to_string(), ImportAction::None),
        },
    }
}

fn splice(text: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..at]);
    out.push_str(insert);
    out.push_str(&text[at..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "example.com/app/forumcommon";

    fn inject(text: &str) -> (String, ImportAction) {
        inject_import(text, PATH, MissingImportSite::Skip)
    }

    #[test]
    fn block_gets_first_entry() {
        let (out, action) = inject("package forum\n\nimport (\n\t\"fmt\"\n)\n");
        assert_eq!(action, ImportAction::Block);
        assert_eq!(
            out,
            "package forum\n\nimport (\n\t\"example.com/app/forumcommon\"\n\t\"fmt\"\n)\n"
        );
    }

    #[test]
    fn block_preferred_over_earlier_single_line() {
        let text = "package forum\n\nimport \"os\"\n\nimport (\n\t\"fmt\"\n)\n";
        let (out, action) = inject(text);
        assert_eq!(action, ImportAction::Block);
        assert!(out.contains("import (\n\t\"example.com/app/forumcommon\"\n\t\"fmt\"\n)"));
        assert!(out.contains("import \"os\"\n\n"));
    }

    #[test]
    fn one_line_block_stays_valid() {
        let (out, _) = inject("package forum\n\nimport (\"fmt\")\n");
        assert_eq!(
            out,
            "package forum\n\nimport (\n\t\"example.com/app/forumcommon\"\n\t\"fmt\")\n"
        );
    }

    #[test]
    fn single_line_gets_sibling() {
        let text = "package forum\n\nimport \"fmt\"\nimport \"os\"\n\nfunc x() {}\n";
        let (out, action) = inject(text);
        assert_eq!(action, ImportAction::SingleLine);
        assert_eq!(
            out,
            "package forum\n\nimport \"fmt\"\nimport \"example.com/app/forumcommon\"\nimport \"os\"\n\nfunc x() {}\n"
        );
    }

    #[test]
    fn aliased_single_line_with_trailing_comment() {
        let text = "package forum\n\nimport f \"fmt\" // fmt\n";
        let (out, action) = inject(text);
        assert_eq!(action, ImportAction::SingleLine);
        assert_eq!(
            out,
            "package forum\n\nimport f \"fmt\" // fmt\nimport \"example.com/app/forumcommon\"\n"
        );
    }

    #[test]
    fn single_line_shared_with_code() {
        let text = "package forum\n\nimport \"fmt\"; var x = TaskReply\n";
        let (out, action) = inject(text);
        assert_eq!(action, ImportAction::SingleLine);
        assert_eq!(
            out,
            "package forum\n\nimport \"fmt\"\nimport \"example.com/app/forumcommon\"; var x = TaskReply\n"
        );
    }

    #[test]
    fn synthesizes_after_byte_order_mark() {
        let text = "\u{FEFF}package forum\n\nfunc x() {}\n";
        let (out, action) = inject_import(text, PATH, MissingImportSite::Synthesize);
        assert_eq!(action, ImportAction::Synthesized);
        assert_eq!(
            out,
            "\u{FEFF}package forum\n\nimport \"example.com/app/forumcommon\"\n\nfunc x() {}\n"
        );
    }

    #[test]
    fn commented_import_is_not_a_site() {
        let text = "package forum\n\n// import (\nfunc x() {}\n";
        assert_eq!(find_import_site(text), ImportSite::None);
    }

    #[test]
    fn missing_site_skips_by_default() {
        let text = "package forum\n\nfunc x() {}\n";
        let (out, action) = inject(text);
        assert_eq!(action, ImportAction::None);
        assert_eq!(out, text);
    }

    #[test]
    fn missing_site_synthesizes_when_asked() {
        let text = "package forum\n\nfunc x() {}\n";
        let (out, action) = inject_import(text, PATH, MissingImportSite::Synthesize);
        assert_eq!(action, ImportAction::Synthesized);
        assert_eq!(
            out,
            "package forum\n\nimport \"example.com/app/forumcommon\"\n\nfunc x() {}\n"
        );
    }
}
