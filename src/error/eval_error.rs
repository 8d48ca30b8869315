/// Result type used by the evaluator and by callable implementations.
pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while evaluating an expression.
pub enum EvalError {
    /// Attempted division by zero.
    DivisionByZero,
    /// A set, sequence or bare collection stood where a value was required.
    NotEvaluable {
        /// The kind of node that has no value.
        kind: &'static str,
    },
    /// The right-hand side of `in`/`not in` is not a set or sequence.
    SetExpected {
        /// The kind of node found instead.
        kind: &'static str,
    },
    /// Fewer variable values were supplied than the expression references.
    InsufficientVariables {
        /// Number of values the expression needs.
        required: usize,
        /// Number of values actually provided.
        provided: usize,
    },
    /// Fewer collections were supplied than the expression references.
    InsufficientCollections {
        /// Number of collections the expression needs.
        required: usize,
        /// Number of collections actually provided.
        provided: usize,
    },
    /// A collection lookup fell outside the 1-based range of the collection.
    IndexOutOfRange {
        /// Number of elements in the collection.
        size: usize,
    },
    /// A node references a callable slot the handle does not have.
    CallableOutOfRange {
        /// The offending callable index.
        index: usize,
    },
    /// A callable rejected its arguments or failed while computing.
    Callable {
        /// Name of the callable.
        name: String,
        /// What went wrong.
        details: String,
    },
    /// An internal consistency violation. Reaching this indicates a bug in
    /// the library, not in the evaluated expression.
    Internal {
        /// What invariant was broken.
        details: &'static str,
    },
}

impl EvalError {
    /// Shorthand for a [`Callable`](EvalError::Callable) error.
    #[must_use]
    pub fn callable(name: &str, details: &str) -> Self {
        Self::Callable { name:    name.to_string(),
                         details: details.to_string(), }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "Division by zero."),
            Self::NotEvaluable { kind } => {
                write!(f, "A {kind} cannot be evaluated to a value.")
            },
            Self::SetExpected { kind } => write!(f,
                                                 "The right-hand side of a membership test must be a set or sequence, found a {kind}."),
            Self::InsufficientVariables { required, provided } => write!(f,
                                                                         "Insufficient variable values provided: need {required}, got {provided}."),
            Self::InsufficientCollections { required, provided } => write!(f,
                                                                           "Insufficient collections provided: need {required}, got {provided}."),
            Self::IndexOutOfRange { size } => write!(f,
                                                     "Illegal index for collection of {size} element(s)."),
            Self::CallableOutOfRange { index } => {
                write!(f, "Callable index {index} out of range.")
            },
            Self::Callable { name, details } => write!(f, "{name}: {details}."),
            Self::Internal { details } => write!(f, "Internal error: {details}."),
        }
    }
}

impl std::error::Error for EvalError {}
