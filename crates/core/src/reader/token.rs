//! Token model for PostScript source.

use crate::codec::radix;

/// Classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `%` comment running to end of line (text keeps the `%`).
    Comment,
    /// `( ... )` string literal, parentheses included.
    String,
    /// `< ... >` hex string, angle brackets included.
    HexString,
    /// `<~ ... ~>` ASCII85 string, markers included.
    Ascii85String,
    DictionaryStart,
    DictionaryEnd,
    ArrayStart,
    ArrayEnd,
    ProcedureStart,
    ProcedureEnd,
    /// `/name` literal name (text keeps the `/`).
    LiteralName,
    /// Bare name to be executed when encountered.
    ExecutableName,
    Integer,
    Real,
    /// Opaque embedded binary span copied verbatim.
    RawData,
}

impl TokenKind {
    /// Stable lowercase identifier, used by the dump tooling.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::String => "string",
            TokenKind::HexString => "hex-string",
            TokenKind::Ascii85String => "ascii85-string",
            TokenKind::DictionaryStart => "dictionary-start",
            TokenKind::DictionaryEnd => "dictionary-end",
            TokenKind::ArrayStart => "array-start",
            TokenKind::ArrayEnd => "array-end",
            TokenKind::ProcedureStart => "procedure-start",
            TokenKind::ProcedureEnd => "procedure-end",
            TokenKind::LiteralName => "literal-name",
            TokenKind::ExecutableName => "executable-name",
            TokenKind::Integer => "integer",
            TokenKind::Real => "real",
            TokenKind::RawData => "raw-data",
        }
    }

    /// Whether a name token of this kind is executed when encountered.
    /// The structural delimiters count as executable operators.
    pub fn is_executable_name(self) -> bool {
        matches!(
            self,
            TokenKind::ExecutableName
                | TokenKind::ArrayStart
                | TokenKind::ArrayEnd
                | TokenKind::DictionaryStart
                | TokenKind::DictionaryEnd
                | TokenKind::ProcedureStart
                | TokenKind::ProcedureEnd
        )
    }
}

/// A single lexical unit with its source position.
///
/// `line` and `column` are the 1-based start position of the token.
/// `whitespace_before` holds the run of whitespace separating this token
/// from the previous one, truncated to the portion after the last embedded
/// line break; blank-line counts are carried by line-number deltas instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
    pub whitespace_before: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
            whitespace_before: String::new(),
        }
    }

    /// Line on which the token ends; differs from `line` for tokens with
    /// embedded line breaks (multi-line strings, raw data).
    pub fn end_line(&self) -> u32 {
        self.line + self.text.matches('\n').count() as u32
    }

    /// Numeric value of an Integer token, decoding `<radix>#<digits>`
    /// notation where present.
    pub fn integer_value(&self) -> Option<i64> {
        if self.kind != TokenKind::Integer {
            return None;
        }
        match self.text.split_once('#') {
            Some((base, digits)) => {
                let base: i64 = base.parse().ok()?;
                radix::decode(digits, base, false).ok()
            }
            None => self.text.parse().ok(),
        }
    }
}
