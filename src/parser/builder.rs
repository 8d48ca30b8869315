use crate::{
    ast::Node,
    error::ParseError,
    handle::Handle,
    parser::{
        tables::{self, InfixKind},
        token::{Category, Token, TokenKind},
    },
    value::{Collection, Numeric},
};

/// Result type used by the tree builder.
pub type ParseResult<T> = Result<T, ParseError>;

/// The node shape a token sequence is being reduced into.
///
/// The call, aggregation and index targets carry the already-resolved
/// callable or collection index that becomes the node's leading payload.
/// The two bootstrap targets reduce the condition part of `if … then` and
/// the middle part of a ternary; both come out as plain groups.
#[derive(Debug, Copy, Clone)]
pub(crate) enum Target {
    Group,
    Set,
    Sequence,
    FunctionCall(usize),
    Aggregation(usize),
    Index(usize),
    IfBootstrap,
    ThenBootstrap,
}

/// Builds the syntax tree from a grouped token tree, interning variable and
/// collection names along the way.
///
/// After a successful build the builder holds the expression's name tables
/// (first-seen order) and the assignment target, if the expression has one.
pub(crate) struct Builder<'h, T: Numeric, C: Collection<T>> {
    handle: &'h Handle<T, C>,
    pub(crate) variables: Vec<String>,
    pub(crate) collections: Vec<String>,
    pub(crate) target: Option<String>,
}

impl<'h, T: Numeric, C: Collection<T>> Builder<'h, T, C> {
    pub(crate) fn new(handle: &'h Handle<T, C>) -> Self {
        Self { handle,
               variables: Vec::new(),
               collections: Vec::new(),
               target: None }
    }

    /// Reduces one token sequence — the children of a group — to a single
    /// node of the given target shape.
    ///
    /// Precedence climbing over two stacks: operands (subtrees) and pending
    /// infix operators. A separator flushes the stacks into one finished
    /// segment. The parse-internal `Then` never leaves the operator stack
    /// through precedence, which is what makes the ternary right-associative.
    pub(crate) fn build(&mut self, target: Target, tokens: &[Token]) -> ParseResult<Node> {
        let mut segments: Vec<Node> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();
        let mut operators: Vec<InfixKind> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            match (token.category, token.kind) {
                (Category::Prefix, TokenKind::Group) => {
                    // the "if" bootstrap: condition group, no operator
                    let node = self.build(Target::IfBootstrap, &token.children)?;
                    nodes.push(node);
                },
                (Category::Infix, TokenKind::Group) => {
                    // the "?"/"then" bootstrap: middle part plus barrier
                    let node = self.build(Target::ThenBootstrap, &token.children)?;
                    nodes.push(node);
                    operators.push(InfixKind::Then);
                },
                (Category::Operand, _) => {
                    let mut node = self.operand(token)?;
                    if let Some(next) = tokens.get(i + 1)
                       && next.category == Category::Postfix
                       && let Some(op) = tables::postfix_operator(&next.value)
                    {
                        node = Node::UnaryOp { op,
                                               operand: Box::new(node) };
                    }
                    if i > 0
                       && tokens[i - 1].category == Category::Prefix
                       && let Some(op) = tables::prefix_operator(&tokens[i - 1].value)
                    {
                        node = Node::UnaryOp { op,
                                               operand: Box::new(node) };
                    }
                    nodes.push(node);
                },
                (_, TokenKind::Separator) => {
                    while let Some(op) = operators.pop() {
                        apply(op, &mut nodes, &mut operators)?;
                    }
                    if nodes.len() != 1 {
                        return Err(ParseError::UnmatchedOperands);
                    }
                    if let Some(node) = nodes.pop() {
                        segments.push(node);
                    }
                },
                (Category::Infix, TokenKind::Operator) => {
                    let Some(kind) = tables::infix_kind(&token.value) else {
                        return Err(ParseError::UnknownOperator { lexeme: token.value.clone() });
                    };
                    if kind.is_assignment() {
                        if i != 1 {
                            return Err(ParseError::MisplacedAssignment);
                        }
                        if kind == InfixKind::Assign {
                            // the target of a plain assignment is not a read
                            self.variables.clear();
                        }
                        self.target = Some(tokens[0].value.clone());
                    }
                    while let Some(&top) = operators.last() {
                        if top == InfixKind::Then
                           || top.precedence() > kind.precedence()
                           || (kind == InfixKind::Exponentiate && top == InfixKind::Exponentiate)
                        {
                            break;
                        }
                        operators.pop();
                        apply(top, &mut nodes, &mut operators)?;
                    }
                    operators.push(kind);
                },
                // prefix and postfix operators are folded into their operand
                _ => {},
            }
        }

        while let Some(op) = operators.pop() {
            apply(op, &mut nodes, &mut operators)?;
        }
        if nodes.len() != 1 {
            return Err(ParseError::UnmatchedOperands);
        }
        if let Some(node) = nodes.pop() {
            segments.push(node);
        }

        assemble(target, segments)
    }

    /// Turns a single operand token into a node, recursing into nested
    /// groups.
    fn operand(&mut self, token: &Token) -> ParseResult<Node> {
        match token.kind {
            TokenKind::Number => {
                let value = token.value
                                 .parse()
                                 .map_err(|_| ParseError::InvalidNumber { literal:
                                                                              token.value.clone() })?;
                Ok(Node::Literal { value })
            },
            TokenKind::Variable => {
                Ok(Node::Variable { index: register(&mut self.variables, &token.value) })
            },
            TokenKind::Collection => {
                Ok(Node::Collection { index: register(&mut self.collections, &token.value) })
            },
            TokenKind::Group => self.build(Target::Group, &token.children),
            TokenKind::Set => self.build(Target::Set, &token.children),
            TokenKind::Sequence => self.build(Target::Sequence, &token.children),
            TokenKind::FunctionCall => {
                let callable = self.callable(&token.value)?;
                self.build(Target::FunctionCall(callable), &token.children)
            },
            TokenKind::Aggregation => {
                let callable = self.callable(&token.value)?;
                self.build(Target::Aggregation(callable), &token.children)
            },
            TokenKind::IndexedVariable => {
                if C::ELEMENTWISE {
                    let collection = register(&mut self.collections, &token.value);
                    self.build(Target::Index(collection), &token.children)
                } else {
                    // opaque element types index through the reserved `at`
                    // callable: at(collection, subscript)
                    let callable = self.callable("at")?;
                    let mut children = vec![Token::new(Category::Operand,
                                                       TokenKind::Collection,
                                                       token.value.clone()),
                                            Token::new(Category::Infix, TokenKind::Separator, ",")];
                    children.extend(token.children.iter().cloned());
                    self.build(Target::FunctionCall(callable), &children)
                }
            },
            TokenKind::Operator | TokenKind::Separator => {
                Err(ParseError::UnknownOperator { lexeme: token.value.clone() })
            },
        }
    }

    fn callable(&self, name: &str) -> ParseResult<usize> {
        self.handle
            .get_index(name)
            .ok_or_else(|| ParseError::UnknownCallable { name: name.to_string() })
    }
}

/// Pops the operands an operator needs, reduces them, and pushes the result.
fn apply(op: InfixKind, nodes: &mut Vec<Node>, operators: &mut Vec<InfixKind>) -> ParseResult<()> {
    if op == InfixKind::Else {
        match operators.pop() {
            Some(InfixKind::Then) => {},
            _ => return Err(ParseError::MalformedTernary),
        }
        let (Some(else_result), Some(then_result), Some(condition)) =
            (nodes.pop(), nodes.pop(), nodes.pop())
        else {
            return Err(ParseError::MalformedTernary);
        };
        nodes.push(Node::IfThenElse { condition:   Box::new(condition),
                                      then_result: Box::new(then_result),
                                      else_result: Box::new(else_result), });
        return Ok(());
    }
    if op == InfixKind::Then {
        return Err(ParseError::MalformedTernary);
    }

    let (Some(right), Some(left)) = (nodes.pop(), nodes.pop()) else {
        return Err(ParseError::MissingOperands);
    };

    if op.is_assignment() {
        if !matches!(left, Node::Variable { .. }) {
            return Err(ParseError::InvalidAssignmentTarget);
        }
        if op == InfixKind::Assign {
            // a plain assignment keeps only its right-hand side; the target
            // travels out of band
            nodes.push(Node::Assign { value: Box::new(right) });
            return Ok(());
        }
    }

    let Some(operator) = op.binary_operator() else {
        return Err(ParseError::MissingOperands);
    };
    nodes.push(Node::BinaryOp { op:    operator,
                                left:  Box::new(left),
                                right: Box::new(right), });
    Ok(())
}

/// Wraps finished segments into the requested node shape.
fn assemble(target: Target, mut segments: Vec<Node>) -> ParseResult<Node> {
    Ok(match target {
        Target::Group | Target::IfBootstrap | Target::ThenBootstrap => {
            Node::Group { members: segments }
        },
        Target::Set => Node::Set { members: segments },
        Target::Sequence => Node::Sequence { members: segments },
        Target::FunctionCall(callable) => Node::FunctionCall { callable,
                                                               arguments: segments, },
        Target::Aggregation(callable) => Node::Aggregation { callable,
                                                             arguments: segments, },
        Target::Index(collection) => {
            if segments.len() != 1 {
                return Err(ParseError::InvalidSubscript);
            }
            let Some(subscript) = segments.pop() else {
                return Err(ParseError::InvalidSubscript);
            };
            Node::Index { collection,
                          subscript: Box::new(subscript) }
        },
    })
}

/// Interns a name, returning its first-seen position.
fn register(names: &mut Vec<String>, name: &str) -> usize {
    names.iter().position(|known| known == name).unwrap_or_else(|| {
                                                    names.push(name.to_string());
                                                    names.len() - 1
                                                })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tokenizer::tokenize;

    fn build(input: &str) -> (Node, Builder<'static, f64, Vec<f64>>) {
        // leaking the handle keeps the test helper free of lifetime noise
        let handle: &'static Handle<f64> = Box::leak(Box::new(Handle::new()));
        let tree = tokenize(input).unwrap_or_else(|e| panic!("tokenizing '{input}' failed: {e}"));
        let mut builder = Builder::new(handle);
        let root = builder.build(Target::Group, &tree.children)
                          .unwrap_or_else(|e| panic!("building '{input}' failed: {e}"));
        (root, builder)
    }

    fn build_err(input: &str) -> ParseError {
        let handle = Handle::<f64>::new();
        let tree = tokenize(input).unwrap_or_else(|e| panic!("tokenizing '{input}' failed: {e}"));
        let mut builder = Builder::new(&handle);
        match builder.build(Target::Group, &tree.children) {
            Ok(_) => panic!("building '{input}' unexpectedly succeeded"),
            Err(e) => e,
        }
    }

    #[test]
    fn variables_are_interned_in_first_seen_order() {
        let (_, builder) = build("x - y + z + x");
        assert_eq!(builder.variables, ["x", "y", "z"]);
    }

    #[test]
    fn plain_assignment_extracts_the_target() {
        let (root, builder) = build("v := 3 + 4");
        assert_eq!(builder.target.as_deref(), Some("v"));
        assert!(builder.variables.is_empty());
        let Node::Group { members } = root else {
            panic!("root is not a group");
        };
        assert!(matches!(members.first(), Some(Node::Assign { .. })));
    }

    #[test]
    fn compound_assignment_keeps_the_target_as_a_read() {
        let (_, builder) = build("v += 3");
        assert_eq!(builder.target.as_deref(), Some("v"));
        assert_eq!(builder.variables, ["v"]);
    }

    #[test]
    fn assignment_must_lead_the_expression() {
        assert_eq!(build_err("1 + v := 3"), ParseError::MisplacedAssignment);
        assert_eq!(build_err("3 := 4"), ParseError::InvalidAssignmentTarget);
    }

    #[test]
    fn unknown_callables_are_rejected_at_build_time() {
        assert_eq!(build_err("frobnicate(1)"),
                   ParseError::UnknownCallable { name: "frobnicate".to_string() });
    }

    #[test]
    fn exponentiation_nests_to_the_right() {
        let (root, _) = build("2^3^2");
        let Node::Group { members } = root else {
            panic!("root is not a group");
        };
        let Some(Node::BinaryOp { right, .. }) = members.first() else {
            panic!("root member is not a binary operation");
        };
        assert!(matches!(**right, Node::BinaryOp { .. }),
                "the right operand should hold the nested exponentiation");
    }

    #[test]
    fn stray_ternary_parts_are_malformed() {
        assert_eq!(build_err("1 : 2"), ParseError::MalformedTernary);
    }
}
