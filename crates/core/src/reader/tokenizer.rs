//! The PostScript tokenizer.
//!
//! Produces a forward-only sequence of [`Token`]s from source text. Line and
//! column counters are 1-based; CR, CRLF and form-feed all normalize to a
//! single line break. Whitespace between tokens is attached to the *next*
//! token, truncated to the portion after the last embedded line break, so
//! blank-line counts are carried by line-number deltas instead of text.

use crate::codec::radix;
use crate::error::{FormatterError, Result};
use crate::reader::token::{Token, TokenKind};

/// Comment prefix declaring verbatim raster spans embedded in the stream.
const EMBEDDED_STREAMS_MARKER: &str = "%#EmbeddedStreams:";

/// A declared raw span: start and end positions, both inclusive.
#[derive(Debug, Clone, Copy)]
struct RawSpan {
    start_line: u32,
    start_column: u32,
    end_line: u32,
    end_column: u32,
}

/// Streaming PostScript tokenizer.
pub struct PostScriptReader {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    pending_whitespace: String,
    raw_spans: Vec<RawSpan>,
    next_span: usize,
    produced: usize,
    fused: bool,
}

impl PostScriptReader {
    pub fn new(source: &str) -> Self {
        // Normalize line endings up front: CRLF and lone CR collapse to a
        // single '\n', form feed counts as a line break as well.
        let mut chars = Vec::with_capacity(source.len());
        let mut iter = source.chars().peekable();
        while let Some(c) = iter.next() {
            match c {
                '\r' => {
                    if iter.peek() == Some(&'\n') {
                        iter.next();
                    }
                    chars.push('\n');
                }
                '\x0c' => chars.push('\n'),
                _ => chars.push(c),
            }
        }

        Self {
            chars,
            pos: 0,
            line: 1,
            column: 1,
            pending_whitespace: String::new(),
            raw_spans: Vec::new(),
            next_span: 0,
            produced: 0,
            fused: false,
        }
    }

    /// Reads the next token. After the first error the reader is fused and
    /// keeps returning `None`.
    pub fn next_token(&mut self) -> Option<Result<Token>> {
        if self.fused {
            return None;
        }
        match self.next_token_inner() {
            Ok(Some(token)) => {
                self.produced += 1;
                Some(Ok(token))
            }
            Ok(None) => None,
            Err(e) => {
                self.fused = true;
                Some(Err(e))
            }
        }
    }

    /// Collects all remaining tokens, failing on the first malformed one.
    pub fn read_to_end(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token?);
        }
        Ok(tokens)
    }

    fn next_token_inner(&mut self) -> Result<Option<Token>> {
        loop {
            self.discard_stale_spans();
            if self.at_raw_span_start() {
                return self.read_raw_data().map(Some);
            }
            match self.peek() {
                None => return Ok(None),
                Some(c) if is_whitespace(c) => {
                    self.advance();
                    self.pending_whitespace.push(c);
                }
                Some(_) => break,
            }
        }

        let line = self.line;
        let column = self.column;
        let whitespace = self.take_whitespace();

        let mut token = match self.peek().expect("peeked before dispatch") {
            '%' => self.read_comment(line, column)?,
            '(' => self.read_string(line, column)?,
            ')' => {
                return Err(FormatterError::reader(
                    line,
                    column,
                    "unexpected ')' outside of string",
                ));
            }
            '<' => {
                self.advance();
                match self.peek() {
                    Some('~') => {
                        self.advance();
                        self.read_ascii85_string(line, column)?
                    }
                    Some('<') => {
                        self.advance();
                        Token::new(TokenKind::DictionaryStart, "<<", line, column)
                    }
                    _ => self.read_hex_string(line, column)?,
                }
            }
            '>' => {
                self.advance();
                if self.peek() == Some('>') {
                    self.advance();
                    Token::new(TokenKind::DictionaryEnd, ">>", line, column)
                } else {
                    return Err(FormatterError::reader(
                        line,
                        column,
                        "unexpected '>' without matching '>'",
                    ));
                }
            }
            '[' => self.single(TokenKind::ArrayStart, '[', line, column),
            ']' => self.single(TokenKind::ArrayEnd, ']', line, column),
            '{' => self.single(TokenKind::ProcedureStart, '{', line, column),
            '}' => self.single(TokenKind::ProcedureEnd, '}', line, column),
            _ => self.read_literal(line, column),
        };

        token.whitespace_before = whitespace;
        Ok(Some(token))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Pending whitespace for the upcoming token, truncated to the portion
    /// after the last embedded line break.
    fn take_whitespace(&mut self) -> String {
        let ws = std::mem::take(&mut self.pending_whitespace);
        match ws.rfind('\n') {
            Some(i) => ws[i + 1..].to_string(),
            None => ws,
        }
    }

    fn single(&mut self, kind: TokenKind, c: char, line: u32, column: u32) -> Token {
        self.advance();
        Token::new(kind, c.to_string(), line, column)
    }

    fn read_comment(&mut self, line: u32, column: u32) -> Result<Token> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
            text.push(c);
        }

        // An embedded-stream declaration is honored only while it is still
        // the leading token; the comment itself stays in the stream.
        if self.produced == 0 && text.starts_with(EMBEDDED_STREAMS_MARKER) {
            self.parse_raw_spans(&text[EMBEDDED_STREAMS_MARKER.len()..], line, column)?;
        }

        Ok(Token::new(TokenKind::Comment, text, line, column))
    }

    fn parse_raw_spans(&mut self, list: &str, line: u32, column: u32) -> Result<()> {
        let malformed =
            || FormatterError::reader(line, column, "malformed embedded stream span list");

        let mut rest = list.trim();
        let mut spans = Vec::new();
        while !rest.is_empty() {
            let Some(stripped) = rest.strip_prefix('[') else {
                return Err(malformed());
            };
            let Some(close) = stripped.find(']') else {
                return Err(malformed());
            };
            let fields: Vec<u32> = stripped[..close]
                .split(',')
                .map(|f| f.trim().parse())
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| malformed())?;
            let [start_line, start_column, end_line, end_column] = fields[..] else {
                return Err(malformed());
            };
            spans.push(RawSpan {
                start_line,
                start_column,
                end_line,
                end_column,
            });
            rest = stripped[close + 1..].trim_start_matches([' ', '\t', ',']);
        }

        spans.sort_by_key(|s| (s.start_line, s.start_column));
        self.raw_spans = spans;
        self.next_span = 0;
        Ok(())
    }

    fn discard_stale_spans(&mut self) {
        while let Some(span) = self.raw_spans.get(self.next_span) {
            if (span.start_line, span.start_column) < (self.line, self.column) {
                self.next_span += 1;
            } else {
                break;
            }
        }
    }

    fn at_raw_span_start(&self) -> bool {
        self.raw_spans
            .get(self.next_span)
            .is_some_and(|s| s.start_line == self.line && s.start_column == self.column)
    }

    /// Copies a declared span verbatim into one RawData token. Best effort:
    /// a span running past end of input stops there.
    fn read_raw_data(&mut self) -> Result<Token> {
        let span = self.raw_spans[self.next_span];
        self.next_span += 1;

        let line = self.line;
        let column = self.column;
        let whitespace = self.take_whitespace();

        let mut text = String::new();
        loop {
            let at_span_end = self.line == span.end_line && self.column == span.end_column;
            match self.advance() {
                Some(c) => {
                    text.push(c);
                    if at_span_end {
                        break;
                    }
                }
                None => break,
            }
        }

        let mut token = Token::new(TokenKind::RawData, text, line, column);
        token.whitespace_before = whitespace;
        Ok(token)
    }

    fn read_string(&mut self, line: u32, column: u32) -> Result<Token> {
        let mut text = String::new();
        text.push(self.advance().expect("string start"));

        let mut depth = 0usize;
        let mut escaped = false;
        loop {
            let Some(c) = self.advance() else {
                return Err(FormatterError::reader(
                    self.line,
                    self.column,
                    "unexpected end of stream while reading string",
                ));
            };
            text.push(c);
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '(' => depth += 1,
                ')' => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }

        Ok(Token::new(TokenKind::String, text, line, column))
    }

    fn read_hex_string(&mut self, line: u32, column: u32) -> Result<Token> {
        let mut text = String::from("<");
        loop {
            let Some(c) = self.advance() else {
                return Err(FormatterError::reader(
                    self.line,
                    self.column,
                    "unexpected end of stream while reading hex encoded string",
                ));
            };
            text.push(c);
            if c == '>' {
                break;
            }
        }
        Ok(Token::new(TokenKind::HexString, text, line, column))
    }

    fn read_ascii85_string(&mut self, line: u32, column: u32) -> Result<Token> {
        let mut text = String::from("<~");
        loop {
            let Some(c) = self.advance() else {
                return Err(FormatterError::reader(
                    self.line,
                    self.column,
                    "unexpected end of stream while reading ASCII85 encoded string",
                ));
            };
            text.push(c);
            if c != '~' {
                continue;
            }
            let Some(next) = self.advance() else {
                return Err(FormatterError::reader(
                    self.line,
                    self.column,
                    "unexpected end of stream while reading ASCII85 encoded string",
                ));
            };
            text.push(next);
            if next == '>' {
                break;
            }
            return Err(FormatterError::reader(
                self.line,
                self.column,
                format!("unexpected character sequence '~{next}' in ASCII85 encoded string"),
            ));
        }
        Ok(Token::new(TokenKind::Ascii85String, text, line, column))
    }

    fn read_literal(&mut self, line: u32, column: u32) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            match c {
                c if is_whitespace(c) => break,
                '(' | ')' | '{' | '}' | '<' | '>' | '[' | ']' | '%' => break,
                '/' if !text.is_empty() => break,
                _ => {
                    self.advance();
                    text.push(c);
                }
            }
        }
        classify(text, line, column)
    }
}

impl Iterator for PostScriptReader {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\0')
}

/// Classifies a literal run: literal name, integer, real, radix integer,
/// or executable name. The text itself is never rewritten.
fn classify(text: String, line: u32, column: u32) -> Token {
    let kind = if text.starts_with('/') {
        TokenKind::LiteralName
    } else if text.parse::<i64>().is_ok() {
        TokenKind::Integer
    } else if is_real(&text) {
        TokenKind::Real
    } else if is_radix_integer(&text) {
        TokenKind::Integer
    } else {
        TokenKind::ExecutableName
    };
    Token::new(kind, text, line, column)
}

fn is_real(text: &str) -> bool {
    // f64::from_str also accepts "inf"/"NaN" spellings; restrict to digit
    // runs with sign, point and exponent so names stay names.
    text.contains(|c: char| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && text.parse::<f64>().is_ok()
}

fn is_radix_integer(text: &str) -> bool {
    let Some((base, digits)) = text.split_once('#') else {
        return false;
    };
    let Ok(base) = base.parse::<i64>() else {
        return false;
    };
    (2..=36).contains(&base) && !digits.is_empty() && radix::decode(digits, base, false).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_attaches_to_next_token_after_last_break() {
        let mut reader = PostScriptReader::new("a \n   b");
        let a = reader.next_token().unwrap().unwrap();
        let b = reader.next_token().unwrap().unwrap();
        assert_eq!(a.whitespace_before, "");
        assert_eq!(b.whitespace_before, "   ");
        assert_eq!(b.line, 2);
        assert_eq!(b.column, 4);
    }

    #[test]
    fn crlf_and_form_feed_count_as_one_line_break() {
        let mut reader = PostScriptReader::new("a\r\nb\x0cc");
        let tokens = reader.read_to_end().unwrap();
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn reader_fuses_after_error() {
        let mut reader = PostScriptReader::new("a > b");
        assert!(reader.next_token().unwrap().is_ok());
        assert!(reader.next_token().unwrap().is_err());
        assert!(reader.next_token().is_none());
    }
}
