pub mod lexer;
pub mod token;

pub use lexer::{tokenize, tokenize_with, Tokenizer};
pub use token::{Keyword, Token, TokenKind};
