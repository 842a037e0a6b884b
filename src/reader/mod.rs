//! Support for reading configuration tokens from character streams.

use std::io::ErrorKind;

pub mod token;

use token::{TokenKind, Tokenizer};

pub use token::Token;

/// Error type if tokenizing cannot continue.
///
/// Malformed input (an unterminated quote, say) is not an error: the tokenizer
/// closes whatever it was scanning at end of input and carries on.
/// The only failure is input that uses a construct the format reserves but
/// this reader does not implement. Such a failure is final for the stream;
/// retrying the same tokenizer produces the same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadErr {
    #[error("unsupported feature at line {line} column {column}: {feature}")]
    UnsupportedFeature {
        feature: &'static str,
        line: usize,
        column: usize,
    },
}

/// The main result type for this module:
/// a T (token, token list, etc), or an error.
pub type ReadResult<T> = Result<T, ReadErr>;

impl From<ReadErr> for std::io::Error {
    fn from(value: ReadErr) -> Self {
        std::io::Error::new(ErrorKind::Unsupported, value)
    }
}

/// Split the input into its constituent tokens.
///
/// The trailing end-of-input token is not included.
pub fn tokenize(input: &str) -> ReadResult<Vec<Token>> {
    let mut tokenizer = Tokenizer::new(input.chars());
    let mut result = Vec::new();
    loop {
        let token = tokenizer.next_token()?;
        if token.kind() == TokenKind::EndOfInput {
            return Ok(result);
        }
        result.push(token);
    }
}
