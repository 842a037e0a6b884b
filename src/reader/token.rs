//! Module for extracting configuration tokens from a character stream.
//!
//! The `Tokenizer` pulls one character at a time from its source and keeps a
//! single character of lookahead. Each call to [`Tokenizer::next_token`]
//! produces exactly one token; nothing is buffered beyond the lookahead.

use std::fmt;
use std::iter::Fuse;

use crate::reader::{ReadErr, ReadResult};

/// The kinds of token in a configuration document.
///
/// Whitespace and newlines are skipped and never produce tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EndOfInput,
    Comma,
    Equal,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comment,
    Text,
    QuotedText,
    DoubleQuotedText,
}

impl TokenKind {
    /// Whether tokens of this kind carry text.
    pub fn has_value(self) -> bool {
        matches!(
            self,
            TokenKind::Comment | TokenKind::Text | TokenKind::QuotedText | TokenKind::DoubleQuotedText
        )
    }
}

/// A configuration token.
///
/// Text-bearing kinds hold the raw characters of the token, without quotes
/// or the leading `#` of a comment. Structural kinds and end-of-input hold no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    value: Option<String>,
}

impl Token {
    /// A token without a value: punctuation or end-of-input.
    ///
    /// Returns None for kinds that carry text.
    pub fn new(kind: TokenKind) -> Option<Self> {
        (!kind.has_value()).then(|| Token::punct(kind))
    }

    /// A token carrying text.
    ///
    /// Returns None for punctuation and end-of-input, which carry no text.
    pub fn with_value(kind: TokenKind, value: impl Into<String>) -> Option<Self> {
        kind.has_value().then(|| Token::text(kind, value))
    }

    pub(crate) fn punct(kind: TokenKind) -> Self {
        debug_assert!(!kind.has_value(), "{:?} tokens carry a value", kind);
        Token { kind, value: None }
    }

    pub(crate) fn text(kind: TokenKind, value: impl Into<String>) -> Self {
        debug_assert!(kind.has_value(), "{:?} tokens carry no value", kind);
        Token {
            kind,
            value: Some(value.into()),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value().unwrap_or_default();
        match self.kind {
            TokenKind::EndOfInput => write!(f, "<end of input>"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Equal => write!(f, "="),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::Comment => write!(f, "#{value}"),
            TokenKind::Text => write!(f, "{value}"),
            TokenKind::QuotedText => write!(f, "'{value}'"),
            TokenKind::DoubleQuotedText => write!(f, "\"{value}\""),
        }
    }
}

/// Location of the lookahead character in the input stream.
///
/// Lines and columns are 1-indexed; the offset counts characters from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

/// Splits a stream of characters into tokens, one per call.
pub struct Tokenizer<I>
where
    I: Iterator<Item = char>,
{
    input: Fuse<I>,
    // Next unconsumed character, or None once the input is exhausted.
    next: Option<char>,
    position: Position,
    // Set on the first fatal error; the stream cannot continue past it.
    failed: Option<ReadErr>,
}

impl<I> Tokenizer<I>
where
    I: Iterator<Item = char>,
{
    pub fn new(input: impl IntoIterator<IntoIter = I>) -> Self {
        let mut input = input.into_iter().fuse();
        let next = input.next();
        Tokenizer {
            input,
            next,
            position: Position::default(),
            failed: None,
        }
    }

    /// Position of the next unconsumed character.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Produce the next token.
    ///
    /// Once the input is exhausted, this returns `EndOfInput` on every call.
    /// A fatal error is returned again on every later call.
    pub fn next_token(&mut self) -> ReadResult<Token> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let start = self.position;
        let token = self.find_token().inspect_err(|err| {
            tracing::warn!("tokenizing stopped: {}", err);
            self.failed = Some(err.clone());
        })?;
        tracing::trace!(
            "token {:?} starting near line {} column {}",
            token,
            start.line,
            start.column
        );
        Ok(token)
    }

    fn find_token(&mut self) -> ReadResult<Token> {
        loop {
            let Some(ch) = self.read_next() else {
                return Ok(Token::punct(TokenKind::EndOfInput));
            };

            let kind = match ch {
                ' ' | '\r' | '\n' => continue,
                '=' => TokenKind::Equal,
                '[' => TokenKind::LeftBracket,
                ']' => TokenKind::RightBracket,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                ',' => TokenKind::Comma,
                '\'' => return self.get_quoted(ch, TokenKind::QuotedText),
                '"' => return self.get_quoted(ch, TokenKind::DoubleQuotedText),
                '#' => return Ok(self.get_comment()),
                _ => return Ok(self.get_value(ch)),
            };
            return Ok(Token::punct(kind));
        }
    }

    /// Scan helper: the text up to the closing `quote`, which is consumed.
    /// The opening quote has already been consumed.
    fn get_quoted(&mut self, quote: char, kind: TokenKind) -> ReadResult<Token> {
        let mut string = String::new();
        loop {
            match self.next {
                Some(ch) if ch == quote => {
                    self.read_next();
                    return Ok(Token::text(kind, string));
                }
                Some('\n' | '\r') => {
                    return Err(ReadErr::UnsupportedFeature {
                        feature: "multi-line quoted text",
                        line: self.position.line,
                        column: self.position.column,
                    });
                }
                Some(ch) => {
                    string.push(ch);
                    self.read_next();
                }
                None => {
                    tracing::debug!("unterminated {:?} closed by end of input", kind);
                    return Ok(Token::text(kind, string));
                }
            }
        }
    }

    /// Scan helper: the rest of the line after `#`. The line break is left in place.
    fn get_comment(&mut self) -> Token {
        let string = self.take_until(|ch| ch == '\n' || ch == '\r', String::new());
        Token::text(TokenKind::Comment, string)
    }

    /// Scan helper: a bare value starting with `first`, up to whitespace or a comma.
    fn get_value(&mut self, first: char) -> Token {
        let string = self.take_until(
            |ch| matches!(ch, ' ' | '\n' | '\r' | ','),
            String::from(first),
        );
        Token::text(TokenKind::Text, string)
    }

    /// Append lookahead characters to `string` until one matches `terminator`
    /// or the input runs out. The terminator is not consumed.
    fn take_until(&mut self, terminator: impl Fn(char) -> bool, mut string: String) -> String {
        while let Some(ch) = self.next {
            if terminator(ch) {
                break;
            }
            string.push(ch);
            self.read_next();
        }
        string
    }

    /// Consume the lookahead character and pull the next one from the input.
    fn read_next(&mut self) -> Option<char> {
        let ch = self.next?;
        self.next = self.input.next();
        self.position.offset += 1;
        // A lone carriage return ends a line too; in "\r\n" only the newline counts.
        if ch == '\n' || (ch == '\r' && self.next != Some('\n')) {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(ch)
    }
}

impl<I> Iterator for Tokenizer<I>
where
    I: Iterator<Item = char>,
{
    type Item = ReadResult<Token>;

    /// Yields tokens up to, but not including, end-of-input.
    /// A fatal error is yielded once, and then the iterator ends.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed.is_some() {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind() == TokenKind::EndOfInput => None,
            result => Some(result),
        }
    }
}
