//! Byte stream -> token stream for WGSL source, the first stage of the
//! wgsl-minify pipeline.

pub mod lexer;
pub mod token;

pub use lexer::{LexOutput, Lexer};
pub use token::{LiteralKind, Token, TokenKind};
