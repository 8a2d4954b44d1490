//! Lightweight Go-lexical scanner.
//!
//! Splits source text into identifier, comment, string and "other" spans with
//! exact byte offsets. It understands just enough of the lexical grammar to
//! keep symbol matching out of comments and literals; it is not a parser.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    /// `// ...` or `/* ... */`
    Comment,
    /// Interpreted, raw or rune literal.
    String,
    /// Punctuation, whitespace, numbers.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Comments and blank text. A byte order mark counts as blank, since Go
    /// accepts one at the start of a file.
    pub fn is_trivia(&self, source: &str) -> bool {
        self.kind == TokenKind::Comment
            || (self.kind == TokenKind::Other
                && self
                    .text(source)
                    .trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
                    .is_empty())
    }
}

const BYTE_ORDER_MARK: char = '\u{FEFF}';

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Tokenize `text`. Spans are contiguous and cover the whole input.
pub fn tokenize(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pending_other: Option<usize> = None;
    let mut i = 0;

    while i < text.len() {
        let Some(c) = text[i..].chars().next() else {
            break;
        };
        let next = bytes.get(i + 1).copied();

        let (kind, end) = match c {
            '/' if next == Some(b'/') => (TokenKind::Comment, line_end(bytes, i)),
            '/' if next == Some(b'*') => (TokenKind::Comment, block_comment_end(text, i)),
            '"' | '\'' => (TokenKind::String, quoted_end(bytes, i, c as u8)),
            '`' => (TokenKind::String, raw_string_end(text, i)),
            c if is_ident_start(c) => (TokenKind::Identifier, word_end(text, i)),
            // Number literals swallow trailing letters (0x1F, 1e9) so they
            // never leak identifier-looking fragments.
            c if c.is_ascii_digit() => (TokenKind::Other, word_end(text, i)),
            _ => {
                pending_other.get_or_insert(i);
                i += c.len_utf8();
                continue;
            }
        };

        if let Some(start) = pending_other.take() {
            tokens.push(Token {
                kind: TokenKind::Other,
                start,
                end: i,
            });
        }
        tokens.push(Token { kind, start: i, end });
        i = end;
    }

    if let Some(start) = pending_other {
        tokens.push(Token {
            kind: TokenKind::Other,
            start,
            end: text.len(),
        });
    }

    tokens
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|p| from + p)
        .unwrap_or(bytes.len())
}

fn block_comment_end(text: &str, from: usize) -> usize {
    text[from + 2..]
        .find("*/")
        .map(|p| from + 2 + p + 2)
        .unwrap_or(text.len())
}

fn raw_string_end(text: &str, from: usize) -> usize {
    text[from + 1..]
        .find('`')
        .map(|p| from + 1 + p + 1)
        .unwrap_or(text.len())
}

/// End of an interpreted string or rune. Unterminated literals stop at the
/// newline.
fn quoted_end(bytes: &[u8], from: usize, quote: u8) -> usize {
    let mut j = from + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

fn word_end(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|&(_, c)| !is_ident_continue(c))
        .map(|(p, _)| from + p)
        .unwrap_or(text.len())
}

/// True when the nearest non-trivia text before `token` is a `.`,
/// i.e. the identifier is a selector (`pkg.Name`, `pkg. /* c */ Name`).
pub fn is_selector(tokens: &[Token], index: usize, source: &str) -> bool {
    for token in tokens[..index].iter().rev() {
        let text = token.text(source);
        if token.kind == TokenKind::Comment {
            continue;
        }
        if token.kind != TokenKind::Other {
            return false;
        }
        let trimmed = text.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        return trimmed.ends_with('.');
    }
    false
}

/// Index of the next non-trivia token after `index`.
pub fn next_significant(tokens: &[Token], index: usize, source: &str) -> Option<usize> {
    (index + 1..tokens.len()).find(|&i| !tokens[i].is_trivia(source))
}
