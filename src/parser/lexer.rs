//! Lexer (tokenizer) for preprocessed C declaration text
//!
//! Converts preprocessed text into a flat [`Token`] sequence consumed by the
//! parser. Ignorable qualifiers (`const`, `static`, `volatile`, `extern`,
//! `inline`, `register`) are dropped during lexing and emit no token.

use std::fmt;

/// Single-character punctuation recognised as reserved tokens.
const RESERVED_CHARS: &str = "*();{},[]";

/// The fixed type-name vocabulary.
const TYPENAMES: &[&str] = &[
    "bool", "char", "double", "float", "int", "int16_t", "int32_t", "int64_t",
    "int8_t", "long", "short", "signed", "size_t", "ssize_t", "uint16_t",
    "uint32_t", "uint64_t", "uint8_t", "unsigned", "void",
];

/// Qualifiers that carry no type information here and are discarded.
const IGNORED_QUALIFIERS: &[&str] = &[
    "const", "extern", "inline", "register", "static", "volatile",
];

const KEYWORDS: &[&str] = &["typedef"];

/// Classification of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Reserved,
    Ident,
    TypeName,
    Keyword,
}

/// A single token.
///
/// `line` and `offset` locate the token in the preprocessed text and exist
/// for diagnostics only; they are never used to re-lex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub offset: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Reserved => write!(f, "'{}'", self.text),
            TokenKind::Ident => write!(f, "identifier '{}'", self.text),
            TokenKind::TypeName => write!(f, "type name '{}'", self.text),
            TokenKind::Keyword => write!(f, "keyword '{}'", self.text),
        }
    }
}

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub offset: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lex error at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for LexError {}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lexer for preprocessed declaration text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given text.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                if c == '\n' {
                    self.line += 1;
                }
                self.position += 1;
                continue;
            }

            if RESERVED_CHARS.contains(c) {
                tokens.push(Token {
                    kind: TokenKind::Reserved,
                    text: c.to_string(),
                    line: self.line,
                    offset: self.position,
                });
                self.position += 1;
                continue;
            }

            if is_ident_char(c) {
                if let Some(token) = self.word() {
                    tokens.push(token);
                }
                continue;
            }

            return Err(LexError {
                message: "unexpected token".to_string(),
                line: self.line,
                offset: self.position,
            });
        }

        Ok(tokens)
    }

    /// Consume a maximal identifier-character run and classify it.
    ///
    /// Returns `None` for ignorable qualifiers, which emit no token.
    fn word(&mut self) -> Option<Token> {
        let start = self.position;
        let mut text = String::new();

        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            text.push(c);
            self.position += 1;
        }

        if IGNORED_QUALIFIERS.contains(&text.as_str()) {
            return None;
        }

        let kind = if KEYWORDS.contains(&text.as_str()) {
            TokenKind::Keyword
        } else if TYPENAMES.contains(&text.as_str()) {
            TokenKind::TypeName
        } else {
            TokenKind::Ident
        };

        Some(Token {
            kind,
            text,
            line: self.line,
            offset: start,
        })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }
}
