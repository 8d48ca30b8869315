#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while tokenizing an expression.
///
/// Positions are byte offsets into the input string at which the tokenizer
/// stopped.
pub enum LexError {
    /// A group opened by `(`, `{`, `[`, `if` or `?` was never closed, or a
    /// closing bracket had no matching opener.
    UnbalancedGroups {
        /// The byte position where tokenization ended.
        pos: usize,
    },
    /// A character that fits no token in the current position.
    UnexpectedCharacter {
        /// The byte position of the offending character.
        pos: usize,
    },
    /// An operand was expected but the input provides none.
    UnexpectedOperand {
        /// The byte position where an operand was expected.
        pos: usize,
    },
    /// A prefix operator sits at the very end of the input.
    MissingOperand {
        /// The byte position after the prefix operator.
        pos: usize,
    },
    /// A symbolic name (`∑`, `√`, `∛`) was not followed immediately by `(`
    /// or `{`.
    MissingBrackets {
        /// The byte position after the symbolic name.
        pos: usize,
    },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnbalancedGroups { pos } => {
                write!(f, "Unbalanced parentheses, brackets, or braces at position {pos}.")
            },
            Self::UnexpectedCharacter { pos } => {
                write!(f, "Unexpected character at position {pos}.")
            },
            Self::UnexpectedOperand { pos } => {
                write!(f, "Unexpected operand at position {pos}.")
            },
            Self::MissingOperand { pos } => write!(f,
                                                   "Prefix operator at position {pos} must be followed by an operand."),
            Self::MissingBrackets { pos } => write!(f,
                                                    "Symbolic name at position {pos} must be followed by parentheses or braces."),
        }
    }
}

impl std::error::Error for LexError {}
