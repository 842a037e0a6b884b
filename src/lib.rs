//! Tokenizer for the sanktuary configuration format.
//!
//! Documents are bracket- and brace-delimited, comma-separated lists of
//! bare values, quoted strings and `#` line comments. This crate only splits
//! a character stream into [`Token`]s; assembling them into a document is up
//! to the consumer.

pub mod reader;

pub use reader::token::{Position, Token, TokenKind, Tokenizer};
pub use reader::{tokenize, ReadErr, ReadResult};
