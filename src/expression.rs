use crate::{
    ast::Node,
    error::{eval_error::EvalResult, ParseError},
    evaluator::Evaluator,
    handle::Handle,
    parser::{
        builder::{Builder, Target},
        tokenizer,
    },
    value::{Collection, Numeric},
};

/// A parsed expression, ready to be evaluated repeatedly against different
/// bindings.
///
/// Construction tokenizes and parses the input once; the expression then
/// owns its syntax tree, the ordered tables of variable and collection
/// names it references, and the optional assignment target. It borrows the
/// [`Handle`] that resolves its callables, so the handle must outlive the
/// expression, and an expression is immutable after construction.
///
/// Values are bound positionally: [`evaluate`](Expression::evaluate) takes
/// one value per entry of [`variables`](Expression::variables) and one
/// collection per entry of [`collections`](Expression::collections), in
/// table order.
///
/// ## Example
/// ```
/// use limex::{Expression, Handle};
///
/// let handle = Handle::<f64>::new();
/// let expression = Expression::new("y + x[5 - 2]", &handle).unwrap();
///
/// assert_eq!(expression.variables(), ["y"]);
/// assert_eq!(expression.collections(), ["x"]);
///
/// let value = expression.evaluate(&[5.0], &[vec![2.0, 5.0, 3.0]]).unwrap();
/// assert_eq!(value, 8.0);
/// ```
pub struct Expression<'h, T: Numeric, C: Collection<T> = Vec<T>> {
    input: String,
    variables: Vec<String>,
    collections: Vec<String>,
    target: Option<String>,
    root: Node,
    handle: &'h Handle<T, C>,
}

impl<'h, T: Numeric, C: Collection<T>> Expression<'h, T, C> {
    /// Parses an expression and binds it to a handle.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when the input does not tokenize (wrapped
    /// [`LexError`](crate::error::LexError)) or does not reduce to a single
    /// well-formed tree: malformed ternaries, misplaced assignments,
    /// unknown callable names, invalid numeric literals.
    pub fn new(input: &str, handle: &'h Handle<T, C>) -> Result<Self, ParseError> {
        let tree = tokenizer::tokenize(input)?;
        let mut builder = Builder::new(handle);
        let root = builder.build(Target::Group, &tree.children)?;
        Ok(Self { input: input.to_string(),
                  variables: builder.variables,
                  collections: builder.collections,
                  target: builder.target,
                  root,
                  handle })
    }

    /// The original input string.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Names of the scalar variables the expression reads, in first-seen
    /// order. The target of a plain `:=` assignment is not a read and does
    /// not appear unless the right-hand side also references it.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Names of the collections the expression references, in first-seen
    /// order.
    #[must_use]
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    /// The left-hand side of the outermost assignment, if the expression is
    /// one. The evaluator only computes the value; storing it back under
    /// this name is the caller's business.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// The root of the syntax tree.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Evaluates the expression against positional bindings.
    ///
    /// `variable_values` and `collection_values` correspond entry by entry
    /// to [`variables`](Expression::variables) and
    /// [`collections`](Expression::collections).
    ///
    /// Ternaries dispatch through the `if_then_else` callable, so both
    /// branches are evaluated before one is selected: `x != 0 ? 1/x : 0`
    /// fails on the zero branch even though it reads like a guard.
    ///
    /// # Errors
    /// Returns an [`EvalError`](crate::error::EvalError) for division by
    /// zero, out-of-range collection lookups, missing bindings, a set or
    /// bare collection in value position, and any error a callable raises.
    pub fn evaluate(&self, variable_values: &[T], collection_values: &[C]) -> EvalResult<T> {
        Evaluator { variable_values,
                    collection_values,
                    handle: self.handle }.evaluate(&self.root)
    }

    /// Renders the syntax tree in prefix notation, with variable,
    /// collection and callable indices resolved back to their names.
    #[must_use]
    pub fn stringify(&self) -> String {
        self.root
            .stringify(&self.variables, &self.collections, self.handle.names())
    }
}
