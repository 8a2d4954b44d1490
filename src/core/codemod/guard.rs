//! Checks that decide whether a file may be touched at all.

use super::lexer::{next_significant, tokenize, TokenKind};

/// Name from the file's `package` clause, if it has one before any code.
pub fn declared_package(text: &str) -> Option<&str> {
    let tokens = tokenize(text);
    let first = tokens.iter().position(|t| !t.is_trivia(text))?;

    let keyword = &tokens[first];
    if keyword.kind != TokenKind::Identifier || keyword.text(text) != "package" {
        return None;
    }

    let name = &tokens[next_significant(&tokens, first, text)?];
    (name.kind == TokenKind::Identifier).then(|| name.text(text))
}

/// True when the file belongs to the shared module itself. Such files are
/// never rewritten.
pub fn is_self_reference(text: &str, module_name: &str) -> bool {
    declared_package(text) == Some(module_name)
}

/// True when `import_path` already appears as an import path literal.
///
/// Plain containment, not declaration parsing: quoted import paths are unique
/// enough not to show up elsewhere.
pub fn has_import(text: &str, import_path: &str) -> bool {
    text.contains(&format!("\"{}\"", import_path)) || text.contains(&format!("`{}`", import_path))
}
