//! # limex
//!
//! limex parses mathematical and logical expressions written with
//! Unicode-rich notation — `z -= √(x² + y²)`, `x ∈ {1, 2, 3}`,
//! `if c then a else b` — into an abstract syntax tree that can be
//! evaluated repeatedly against numeric bindings for named scalar
//! variables and named ordered collections. Named functions and
//! aggregators are resolved through a user-extensible [`Handle`].

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed expressions.
///
/// This module declares the `Node` enum and the operator enums that
/// represent an expression as a tree. The tree is built by the parser and
/// walked by the evaluator; variables, collections and callables appear as
/// positional indices into the owning expression's name tables.
pub mod ast;
/// Provides the error types for every phase.
///
/// Declares `LexError`, `ParseError` and `EvalError`, one enum per phase,
/// with detailed variants for each failure mode. All errors are fatal at
/// the call site; the library never recovers locally.
pub mod error;
/// The expression façade.
///
/// Owns the input string, the name tables, the assignment target and the
/// root of the syntax tree, and exposes parsing, evaluation and
/// stringification.
pub mod expression;
/// The callable registry.
///
/// Binds callable names to implementations over the numeric type. Every
/// handle is seeded with the built-ins in a fixed order; users may register
/// additional callables under unique names.
pub mod handle;
/// Turns input strings into syntax trees.
///
/// Contains the lexical tables, the token data model, the hand-written
/// tokenizer, and the precedence-climbing tree builder.
pub mod parser;
/// The numeric and collection abstractions evaluation runs over.
///
/// Declares the `Numeric` trait (arithmetic, comparison and truthiness of
/// the element type) and the `Collection` trait (how named collections
/// expose their elements), plus the `f64`/`Vec<f64>` implementations.
pub mod value;

mod evaluator;

pub use ast::Node;
pub use error::{EvalError, EvalResult, LexError, ParseError};
pub use expression::Expression;
pub use handle::{Builtin, DuplicateCallable, Handle};
pub use value::{Collection, Numeric};

/// Parses and evaluates a self-contained expression over `f64` in one step.
///
/// Convenience for expressions without variables or collections; anything
/// more is better served by constructing an [`Expression`] once and
/// evaluating it repeatedly.
///
/// # Errors
/// Returns the underlying [`ParseError`] or [`EvalError`].
///
/// # Examples
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert_eq!(limex::evaluate_str("3 * 5")?, 15.0);
/// assert_eq!(limex::evaluate_str("2^3^2")?, 512.0);
/// assert_eq!(limex::evaluate_str("if true then 1 else -1")?, 1.0);
/// #
/// #     Ok(())
/// # }
/// ```
pub fn evaluate_str(input: &str) -> Result<f64, Box<dyn std::error::Error>> {
    let handle: Handle<f64> = Handle::new();
    let expression = Expression::new(input, &handle)?;
    Ok(expression.evaluate(&[], &[])?)
}
