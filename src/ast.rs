/// A unary operator applied to a single operand.
///
/// `Negate` and `LogicalNot` come from prefix position, `Square` and `Cube`
/// from postfix position. The tree builder applies them directly around the
/// operand they belong to, so they never travel through the operator stack.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`!x`, `¬x`).
    LogicalNot,
    /// Self-multiplication (`x²`). Never dispatched through `pow`.
    Square,
    /// Twofold self-multiplication (`x³`). Never dispatched through `pow`.
    Cube,
}

/// A binary operator combining two operands.
///
/// The compound assignment operators are included here because they evaluate
/// exactly like their arithmetic counterparts; the store they imply is the
/// caller's responsibility (see [`Expression::target`](crate::Expression::target)).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`), guarded against zero divisors
    Divide,
    /// Exponentiation (`^`), dispatched through the `pow` built-in
    Exponentiate,
    /// Logical and (`&&`, `∧`, `and`)
    LogicalAnd,
    /// Logical or (`||`, `∨`, `or`)
    LogicalOr,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`, `≤`)
    LessOrEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`, `≥`)
    GreaterOrEqual,
    /// Equal to (`==`)
    EqualTo,
    /// Not equal to (`!=`, `≠`)
    NotEqualTo,
    /// Set membership (`in`, `∈`); the right operand is a set or sequence
    ElementOf,
    /// Negated set membership (`not in`, `∉`)
    NotElementOf,
    /// Compound addition (`+=`)
    AddAssign,
    /// Compound subtraction (`-=`)
    SubtractAssign,
    /// Compound multiplication (`*=`)
    MultiplyAssign,
    /// Compound division (`/=`)
    DivideAssign,
}

impl UnaryOperator {
    /// The node-kind name used by [`Node::stringify`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Negate => "negate",
            Self::LogicalNot => "logical_not",
            Self::Square => "square",
            Self::Cube => "cube",
        }
    }
}

impl BinaryOperator {
    /// The node-kind name used by [`Node::stringify`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Exponentiate => "exponentiate",
            Self::LogicalAnd => "logical_and",
            Self::LogicalOr => "logical_or",
            Self::LessThan => "less_than",
            Self::LessOrEqual => "less_or_equal",
            Self::GreaterThan => "greater_than",
            Self::GreaterOrEqual => "greater_or_equal",
            Self::EqualTo => "equal_to",
            Self::NotEqualTo => "not_equal_to",
            Self::ElementOf => "element_of",
            Self::NotElementOf => "not_element_of",
            Self::AddAssign => "add_assign",
            Self::SubtractAssign => "subtract_assign",
            Self::MultiplyAssign => "multiply_assign",
            Self::DivideAssign => "divide_assign",
        }
    }
}

/// A node in the abstract syntax tree of a parsed expression.
///
/// Each variant either carries its payload inline (a literal value, an index
/// into one of the expression's name tables, an index into the handle's
/// callable table) or owns its child subtrees. Variables, collections and
/// callables are referenced positionally; the owning
/// [`Expression`](crate::Expression) holds the name tables that resolve them
/// back to names during [`stringify`](Node::stringify).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal number. Keywords `true`/`false` parse to `1`/`0`.
    Literal {
        /// The constant value.
        value: f64,
    },
    /// A named scalar variable, referenced by position.
    Variable {
        /// Index into the expression's variable-name table.
        index: usize,
    },
    /// A named collection, referenced by position.
    ///
    /// Only legal as an argument to a function call or aggregation; a bare
    /// collection has no value of its own.
    Collection {
        /// Index into the expression's collection-name table.
        index: usize,
    },
    /// A block written in parentheses. Evaluates to its first member.
    Group {
        /// The comma-separated member subtrees.
        members: Vec<Node>,
    },
    /// A block written in braces. Only legal on the right of `in`/`not in`.
    Set {
        /// The comma-separated member subtrees.
        members: Vec<Node>,
    },
    /// A block written in brackets. Only legal on the right of `in`/`not in`.
    Sequence {
        /// The comma-separated member subtrees.
        members: Vec<Node>,
    },
    /// A call of the form `name(…)`.
    FunctionCall {
        /// Index into the handle's callable table.
        callable: usize,
        /// The argument subtrees.
        arguments: Vec<Node>,
    },
    /// An aggregation of the form `name{…}`.
    Aggregation {
        /// Index into the handle's callable table.
        callable: usize,
        /// The argument subtrees.
        arguments: Vec<Node>,
    },
    /// A 1-based collection lookup of the form `name[…]`.
    Index {
        /// Index into the expression's collection-name table.
        collection: usize,
        /// The subtree producing the position.
        subscript: Box<Node>,
    },
    /// A unary operation.
    UnaryOp {
        /// The operator to apply.
        op: UnaryOperator,
        /// The operand subtree.
        operand: Box<Node>,
    },
    /// A binary operation.
    BinaryOp {
        /// The operator to apply.
        op: BinaryOperator,
        /// Left operand.
        left: Box<Node>,
        /// Right operand.
        right: Box<Node>,
    },
    /// A ternary conditional, from either `c ? a : b` or
    /// `if c then a else b`. All three operands are evaluated eagerly.
    IfThenElse {
        /// The condition subtree.
        condition: Box<Node>,
        /// Result when the condition is truthy.
        then_result: Box<Node>,
        /// Result when the condition is falsy.
        else_result: Box<Node>,
    },
    /// A plain assignment (`:=`, `≔`). Holds only the right-hand side; the
    /// target variable is carried out of band by the expression.
    Assign {
        /// The right-hand side subtree.
        value: Box<Node>,
    },
}

impl Node {
    /// The kind name of this node, as used in the stringified form.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::Variable { .. } => "variable",
            Self::Collection { .. } => "collection",
            Self::Group { .. } => "group",
            Self::Set { .. } => "set",
            Self::Sequence { .. } => "sequence",
            Self::FunctionCall { .. } => "function_call",
            Self::Aggregation { .. } => "aggregation",
            Self::Index { .. } => "index",
            Self::UnaryOp { op, .. } => op.name(),
            Self::BinaryOp { op, .. } => op.name(),
            Self::IfThenElse { .. } => "if_then_else",
            Self::Assign { .. } => "assign",
        }
    }

    /// Renders the subtree in prefix notation: `kind(operand, operand, …)`.
    ///
    /// Literal values are stringified; variable, collection and callable
    /// indices are replaced by the names in the given tables.
    #[must_use]
    pub fn stringify(&self,
                     variables: &[String],
                     collections: &[String],
                     callables: &[String])
                     -> String {
        let operands: Vec<String> = match self {
            Self::Literal { value } => vec![value.to_string()],
            Self::Variable { index } => vec![resolve(variables, *index)],
            Self::Collection { index } => vec![resolve(collections, *index)],
            Self::Group { members } | Self::Set { members } | Self::Sequence { members } => {
                members.iter()
                       .map(|member| member.stringify(variables, collections, callables))
                       .collect()
            },
            Self::FunctionCall { callable, arguments }
            | Self::Aggregation { callable, arguments } => {
                let mut operands = vec![resolve(callables, *callable)];
                operands.extend(arguments.iter().map(|argument| {
                                   argument.stringify(variables, collections, callables)
                               }));
                operands
            },
            Self::Index { collection, subscript } => {
                vec![resolve(collections, *collection),
                     subscript.stringify(variables, collections, callables)]
            },
            Self::UnaryOp { operand, .. } => {
                vec![operand.stringify(variables, collections, callables)]
            },
            Self::BinaryOp { left, right, .. } => {
                vec![left.stringify(variables, collections, callables),
                     right.stringify(variables, collections, callables)]
            },
            Self::IfThenElse { condition,
                               then_result,
                               else_result, } => {
                vec![condition.stringify(variables, collections, callables),
                     then_result.stringify(variables, collections, callables),
                     else_result.stringify(variables, collections, callables)]
            },
            Self::Assign { value } => vec![value.stringify(variables, collections, callables)],
        };

        format!("{}({})", self.kind_name(), operands.join(", "))
    }
}

fn resolve(names: &[String], index: usize) -> String {
    names.get(index)
         .map_or_else(|| format!("#{index}"), Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringify_resolves_names() {
        let node = Node::BinaryOp { op:    BinaryOperator::Multiply,
                                    left:  Box::new(Node::Literal { value: 3.0 }),
                                    right: Box::new(Node::Variable { index: 0 }), };
        let rendered = node.stringify(&["x".to_string()], &[], &[]);
        assert_eq!(rendered, "multiply(literal(3), variable(x))");
    }

    #[test]
    fn kind_names_match_operators() {
        let node = Node::UnaryOp { op:      UnaryOperator::Square,
                                   operand: Box::new(Node::Literal { value: 2.0 }), };
        assert_eq!(node.kind_name(), "square");
    }
}
