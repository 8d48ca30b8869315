use crate::ast::{BinaryOperator, UnaryOperator};

/// Keyword operands denoting boolean literals.
pub const KEYWORDS: [&str; 2] = ["false", "true"];

/// The words of the long ternary form, in surface order.
pub const TERNARY_WORDS: [&str; 3] = ["if", "then", "else"];

/// Operators recognised in prefix position.
pub const PREFIX_OPERATORS: [&str; 3] = ["!", "¬", "-"];

/// Operators recognised in postfix position.
pub const POSTFIX_OPERATORS: [&str; 2] = ["²", "³"];

/// Operators recognised in infix position.
///
/// Match order matters: within a family, longer lexemes come before their
/// prefixes (`<=` before `<`, `:=` before `:`), because the tokenizer takes
/// the first entry that matches.
pub const INFIX_OPERATORS: [&str; 33] = [",", "==", "!=", "<=", ">=", "<", ">", ":=", "≔", "+=",
                                         "-=", "*=", "/=", "+", "-", "*", "/", "&&", "^", "||",
                                         "?", ":", "and", "or", "in", "not in", "≠", "≤", "≥",
                                         "∧", "∨", "∈", "∉"];

/// Single-glyph aliases for named callables. They demand an immediately
/// following `(` (function call) or `{` (aggregation).
pub const SYMBOLIC_NAMES: [&str; 3] = ["∑", "√", "∛"];

/// Resolves a symbolic glyph to the callable name it abbreviates.
#[must_use]
pub fn symbolic_alias(glyph: &str) -> Option<&'static str> {
    match glyph {
        "∑" => Some("sum"),
        "√" => Some("sqrt"),
        "∛" => Some("cbrt"),
        _ => None,
    }
}

/// Maps a prefix-operator lexeme to the unary operator it denotes.
#[must_use]
pub fn prefix_operator(lexeme: &str) -> Option<UnaryOperator> {
    match lexeme {
        "-" => Some(UnaryOperator::Negate),
        "!" | "¬" => Some(UnaryOperator::LogicalNot),
        _ => None,
    }
}

/// Maps a postfix-operator lexeme to the unary operator it denotes.
#[must_use]
pub fn postfix_operator(lexeme: &str) -> Option<UnaryOperator> {
    match lexeme {
        "²" => Some(UnaryOperator::Square),
        "³" => Some(UnaryOperator::Cube),
        _ => None,
    }
}

/// The operator vocabulary handled by the tree builder's operator stack.
///
/// Besides the surface binary operators this includes the parse-internal
/// ternary markers `Then` and `Else` (from `? :` and `then`/`else`), which
/// never survive into a finished tree, and the assignment family, which is
/// rewritten into a target plus an [`Assign`](crate::ast::Node::Assign) or
/// compound node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InfixKind {
    /// `&&`, `∧`, `and`
    LogicalAnd,
    /// `||`, `∨`, `or`
    LogicalOr,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `^` (right-associative)
    Exponentiate,
    /// `<`
    LessThan,
    /// `<=`, `≤`
    LessOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`, `≥`
    GreaterOrEqual,
    /// `==`
    EqualTo,
    /// `!=`, `≠`
    NotEqualTo,
    /// `in`, `∈`
    ElementOf,
    /// `not in`, `∉`
    NotElementOf,
    /// Opens the middle part of a ternary (`?`, `then`). Parse-internal.
    Then,
    /// Closes a ternary (`:`, `else`). Parse-internal.
    Else,
    /// `:=`, `≔`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubtractAssign,
    /// `*=`
    MultiplyAssign,
    /// `/=`
    DivideAssign,
}

impl InfixKind {
    /// Binding strength; smaller binds tighter. Brackets, calls and
    /// indexing are tier 1, postfix operators share tier 2 with `^`, and
    /// prefix operators take tier 3; none of those pass through the
    /// operator stack.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Exponentiate => 2,
            Self::Multiply | Self::Divide | Self::LogicalAnd => 4,
            Self::Add | Self::Subtract | Self::LogicalOr => 5,
            Self::Then | Self::Else => 6,
            Self::LessThan
            | Self::LessOrEqual
            | Self::GreaterThan
            | Self::GreaterOrEqual
            | Self::EqualTo
            | Self::NotEqualTo
            | Self::ElementOf
            | Self::NotElementOf => 7,
            Self::Assign
            | Self::AddAssign
            | Self::SubtractAssign
            | Self::MultiplyAssign
            | Self::DivideAssign => 8,
        }
    }

    /// Whether this operator belongs to the assignment family.
    #[must_use]
    pub const fn is_assignment(self) -> bool {
        matches!(self,
                 Self::Assign
                 | Self::AddAssign
                 | Self::SubtractAssign
                 | Self::MultiplyAssign
                 | Self::DivideAssign)
    }

    /// The AST operator this kind reduces to, if it reduces to one.
    ///
    /// `Then`, `Else` and plain `Assign` build dedicated node shapes and
    /// return `None`.
    #[must_use]
    pub const fn binary_operator(self) -> Option<BinaryOperator> {
        match self {
            Self::LogicalAnd => Some(BinaryOperator::LogicalAnd),
            Self::LogicalOr => Some(BinaryOperator::LogicalOr),
            Self::Add => Some(BinaryOperator::Add),
            Self::Subtract => Some(BinaryOperator::Subtract),
            Self::Multiply => Some(BinaryOperator::Multiply),
            Self::Divide => Some(BinaryOperator::Divide),
            Self::Exponentiate => Some(BinaryOperator::Exponentiate),
            Self::LessThan => Some(BinaryOperator::LessThan),
            Self::LessOrEqual => Some(BinaryOperator::LessOrEqual),
            Self::GreaterThan => Some(BinaryOperator::GreaterThan),
            Self::GreaterOrEqual => Some(BinaryOperator::GreaterOrEqual),
            Self::EqualTo => Some(BinaryOperator::EqualTo),
            Self::NotEqualTo => Some(BinaryOperator::NotEqualTo),
            Self::ElementOf => Some(BinaryOperator::ElementOf),
            Self::NotElementOf => Some(BinaryOperator::NotElementOf),
            Self::AddAssign => Some(BinaryOperator::AddAssign),
            Self::SubtractAssign => Some(BinaryOperator::SubtractAssign),
            Self::MultiplyAssign => Some(BinaryOperator::MultiplyAssign),
            Self::DivideAssign => Some(BinaryOperator::DivideAssign),
            Self::Then | Self::Else | Self::Assign => None,
        }
    }
}

/// Maps an infix lexeme to its operator kind.
///
/// Covers the ternary words as well: `?` and `then` open the middle part,
/// `:` and `else` close it. The separator `,` is not an operator and has no
/// mapping.
#[must_use]
pub fn infix_kind(lexeme: &str) -> Option<InfixKind> {
    match lexeme {
        "&&" | "∧" | "and" => Some(InfixKind::LogicalAnd),
        "||" | "∨" | "or" => Some(InfixKind::LogicalOr),
        "+" => Some(InfixKind::Add),
        "-" => Some(InfixKind::Subtract),
        "*" => Some(InfixKind::Multiply),
        "/" => Some(InfixKind::Divide),
        "^" => Some(InfixKind::Exponentiate),
        "<" => Some(InfixKind::LessThan),
        "<=" | "≤" => Some(InfixKind::LessOrEqual),
        ">" => Some(InfixKind::GreaterThan),
        ">=" | "≥" => Some(InfixKind::GreaterOrEqual),
        "==" => Some(InfixKind::EqualTo),
        "!=" | "≠" => Some(InfixKind::NotEqualTo),
        "in" | "∈" => Some(InfixKind::ElementOf),
        "not in" | "∉" => Some(InfixKind::NotElementOf),
        "?" | "then" => Some(InfixKind::Then),
        ":" | "else" => Some(InfixKind::Else),
        ":=" | "≔" => Some(InfixKind::Assign),
        "+=" => Some(InfixKind::AddAssign),
        "-=" => Some(InfixKind::SubtractAssign),
        "*=" => Some(InfixKind::MultiplyAssign),
        "/=" => Some(InfixKind::DivideAssign),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_lexemes_precede_their_prefixes() {
        let position = |lexeme| {
            INFIX_OPERATORS.iter()
                           .position(|op| *op == lexeme)
                           .unwrap_or(usize::MAX)
        };
        assert!(position("<=") < position("<"));
        assert!(position(">=") < position(">"));
        assert!(position(":=") < position(":"));
        assert!(position("+=") < position("+"));
        assert!(position("&&") < position("^"));
    }

    #[test]
    fn every_infix_operator_is_mapped() {
        for lexeme in INFIX_OPERATORS {
            if lexeme == "," {
                continue; // the separator is its own token kind
            }
            assert!(infix_kind(lexeme).is_some(), "unmapped operator '{lexeme}'");
        }
    }

    #[test]
    fn assignment_family_has_lowest_binding() {
        for kind in [InfixKind::Assign,
                     InfixKind::AddAssign,
                     InfixKind::SubtractAssign,
                     InfixKind::MultiplyAssign,
                     InfixKind::DivideAssign]
        {
            assert!(kind.is_assignment());
            assert_eq!(kind.precedence(), 8);
        }
    }
}
