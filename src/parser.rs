/// Static tables of the surface grammar.
///
/// Declares the keyword, ternary-word, prefix, infix, postfix and
/// symbolic-name lexemes, the mapping from lexemes to operator kinds, and
/// the precedence levels the tree builder climbs over.
pub mod tables;

/// The token tree.
///
/// Declares the token data model: a category (the position class a token
/// was accepted in), a kind, the raw lexeme, and nested children for
/// bracketed regions.
pub mod token;

/// The tokenizer.
///
/// A single hand-written pass over the input that produces the grouped
/// token tree, tracking which category of token may come next and which
/// open group the next terminator closes. The `if/then/else` and `? :`
/// surface forms are re-grouped here so the tree builder sees one uniform
/// ternary shape.
pub mod tokenizer;

/// The tree builder.
///
/// Consumes the token tree and produces the syntax tree by precedence
/// climbing, resolving callable names through the handle, interning
/// variable and collection names, and extracting assignment targets.
pub(crate) mod builder;
