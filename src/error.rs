/// Errors raised while turning raw input into the grouped token tree.
pub mod lex_error;

/// Errors raised while building the abstract syntax tree from tokens.
pub mod parse_error;

/// Errors raised while evaluating a finished abstract syntax tree.
pub mod eval_error;

pub use eval_error::{EvalError, EvalResult};
pub use lex_error::LexError;
pub use parse_error::ParseError;
