/// The position class a token was read in.
///
/// The tokenizer walks the input with an expectation of what comes next and
/// stamps every token with the class it was accepted under; the tree
/// builder uses the class to tell prefix `-` from infix `-`, and to find
/// the `if`/`?` bootstrap groups.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Category {
    /// An operator in front of its operand.
    Prefix,
    /// A value-producing token.
    Operand,
    /// An operator after its operand.
    Postfix,
    /// An operator between two operands.
    Infix,
}

/// What a token is.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A numeric literal, including the canonical `1`/`0` of `true`/`false`.
    Number,
    /// A named scalar variable.
    Variable,
    /// A named collection argument (`name[]`).
    Collection,
    /// An operator lexeme.
    Operator,
    /// The argument separator `,`.
    Separator,
    /// A parenthesised block, or a ternary bootstrap group.
    Group,
    /// A braced block.
    Set,
    /// A bracketed block.
    Sequence,
    /// A named call, `name(…)`.
    FunctionCall,
    /// A named aggregation, `name{…}`.
    Aggregation,
    /// A subscripted variable, `name[…]`.
    IndexedVariable,
}

/// A token in the grouped token tree.
///
/// Tokens form a tree whose root is an implicit group: every bracketed
/// region of the input becomes a child list under the operand token that
/// opened it. Only the nesting-capable kinds (`Group`, `Set`, `Sequence`,
/// `FunctionCall`, `Aggregation`, `IndexedVariable`) carry children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The position class the token was accepted under.
    pub category: Category,
    /// What the token is.
    pub kind: TokenKind,
    /// The raw lexeme: literal text for numbers, the operator symbol for
    /// operators, the identifier for named operands, the canonical alias
    /// for symbolic names.
    pub value: String,
    /// Nested tokens of the bracketed region this token opened.
    pub children: Vec<Token>,
}

impl Token {
    /// Creates a childless token.
    #[must_use]
    pub fn new(category: Category, kind: TokenKind, value: impl Into<String>) -> Self {
        Self { category,
               kind,
               value: value.into(),
               children: Vec::new() }
    }
}
