//! Lexical analysis

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};
