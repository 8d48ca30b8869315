use crate::{
    error::{eval_error::EvalResult, EvalError},
    value::{Collection, Numeric},
};

type Implementation<T> = Box<dyn Fn(&[T]) -> EvalResult<T> + Send + Sync>;
type Indexer<T, C> = Box<dyn Fn(&C, &T) -> EvalResult<T> + Send + Sync>;
type Aggregator<T, C> = Box<dyn Fn(&str, &C) -> EvalResult<T> + Send + Sync>;

/// The built-in callables every handle is seeded with, in table order.
///
/// The evaluator addresses these slots by index — `exponentiate` dispatches
/// through [`Pow`](Builtin::Pow), membership through
/// [`ElementOf`](Builtin::ElementOf)/[`NotElementOf`](Builtin::NotElementOf),
/// and so on — so the seeding order is fixed and user callables always come
/// after them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Builtin {
    /// `if_then_else(c, a, b)`: `a` if `c` is truthy, else `b`.
    IfThenElse,
    /// `n_ary_if(c1, v1, …, default)`: the first `vi` with truthy `ci`.
    NAryIf,
    /// `abs(x)`
    Abs,
    /// `pow(x, y)`
    Pow,
    /// `sqrt(x)`
    Sqrt,
    /// `cbrt(x)`
    Cbrt,
    /// `sum{…}`: zero when empty.
    Sum,
    /// `avg{…}`: errors when empty.
    Avg,
    /// `count{…}`
    Count,
    /// `min{…}`: errors when empty.
    Min,
    /// `max{…}`: errors when empty.
    Max,
    /// `element_of(p, e1, …)`: equality scan.
    ElementOf,
    /// `not_element_of(p, e1, …)`: negated equality scan.
    NotElementOf,
    /// `at(collection, subscript)`: reserved for indexed lookup over opaque
    /// collection types; errors for collections of plain values.
    At,
}

impl Builtin {
    /// Position of this built-in in every handle's callable table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Error returned when registering a callable under a name already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCallable {
    /// The name that is already registered.
    pub name: String,
}

impl std::fmt::Display for DuplicateCallable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "A callable with name '{}' already exists.", self.name)
    }
}

impl std::error::Error for DuplicateCallable {}

/// The registry binding callable names to implementations for a numeric
/// type.
///
/// A handle is created once, optionally extended with user callables, and
/// then shared immutably by any number of expressions; it must outlive all
/// of them. Sharing a handle across threads is sound exactly when every
/// registered callable is itself safe to call concurrently — the
/// implementations are `Send + Sync` bounded and the handle takes no locks.
///
/// ## Example
/// ```
/// use limex::{EvalError, Expression, Handle};
///
/// let mut handle = Handle::<f64>::new();
/// handle.add("double", |args| {
///           if args.len() != 1 {
///               return Err(EvalError::callable("double", "requires exactly one argument"));
///           }
///           Ok(args[0] * 2.0)
///       })
///       .unwrap();
///
/// let expression = Expression::new("double(21)", &handle).unwrap();
/// assert_eq!(expression.evaluate(&[], &[]), Ok(42.0));
/// ```
pub struct Handle<T: Numeric, C: Collection<T> = Vec<T>> {
    names: Vec<String>,
    implementations: Vec<Implementation<T>>,
    indexer: Option<Indexer<T, C>>,
    aggregator: Option<Aggregator<T, C>>,
}

impl<T: Numeric, C: Collection<T>> Handle<T, C> {
    /// Creates a handle seeded with the built-in callables.
    #[must_use]
    pub fn new() -> Self {
        let mut handle = Self { names: Vec::new(),
                                implementations: Vec::new(),
                                indexer: None,
                                aggregator: None };
        handle.install_builtins();
        handle
    }

    /// Registers a callable under a unique name and returns its index.
    ///
    /// # Errors
    /// Returns [`DuplicateCallable`] when the name is already taken, built-in
    /// names included.
    pub fn add(&mut self,
               name: &str,
               implementation: impl Fn(&[T]) -> EvalResult<T> + Send + Sync + 'static)
               -> Result<usize, DuplicateCallable> {
        if self.names.iter().any(|known| known == name) {
            return Err(DuplicateCallable { name: name.to_string() });
        }
        self.install(name, implementation);
        Ok(self.names.len() - 1)
    }

    /// Looks up a callable by name.
    #[must_use]
    pub fn get_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|known| known == name)
    }

    /// The registered callable names, built-ins first.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Registers the indexed-lookup hook used by the reserved `at` callable
    /// when the collection type is opaque.
    pub fn set_indexer(&mut self, indexer: impl Fn(&C, &T) -> EvalResult<T> + Send + Sync + 'static) {
        self.indexer = Some(Box::new(indexer));
    }

    /// Registers the aggregation hook used when an opaque collection is the
    /// sole argument of a callable.
    pub fn set_aggregator(&mut self,
                          aggregator: impl Fn(&str, &C) -> EvalResult<T> + Send + Sync + 'static) {
        self.aggregator = Some(Box::new(aggregator));
    }

    pub(crate) fn implementation(&self, index: usize) -> Option<&Implementation<T>> {
        self.implementations.get(index)
    }

    pub(crate) fn indexed_evaluation(&self, collection: &C, index: &T) -> EvalResult<T> {
        match &self.indexer {
            Some(indexer) => indexer(collection, index),
            None => Err(EvalError::callable("at", "no indexer registered for this collection type")),
        }
    }

    pub(crate) fn aggregate_evaluation(&self, name: &str, collection: &C) -> EvalResult<T> {
        match &self.aggregator {
            Some(aggregator) => aggregator(name, collection),
            None => {
                Err(EvalError::callable(name, "no aggregator registered for this collection type"))
            },
        }
    }

    fn install(&mut self,
               name: &str,
               implementation: impl Fn(&[T]) -> EvalResult<T> + Send + Sync + 'static) {
        self.names.push(name.to_string());
        self.implementations.push(Box::new(implementation));
    }

    // Seeded in `Builtin` order so the evaluator can address slots by index.
    fn install_builtins(&mut self) {
        self.install("if_then_else", |args| {
                if args.len() != 3 {
                    return Err(EvalError::callable("if_then_else",
                                                   "requires exactly three arguments"));
                }
                Ok(if args[0].is_truthy() { args[1].clone() } else { args[2].clone() })
            });

        self.install("n_ary_if", |args| {
                if args.is_empty() || args.len() % 2 != 1 {
                    return Err(EvalError::callable("n_ary_if",
                                                   "requires condition/value pairs followed by a default"));
                }
                for pair in args.chunks_exact(2) {
                    if pair[0].is_truthy() {
                        return Ok(pair[1].clone());
                    }
                }
                Ok(args[args.len() - 1].clone())
            });

        self.install("abs", |args| {
                if args.len() != 1 {
                    return Err(EvalError::callable("abs", "requires exactly one argument"));
                }
                Ok(if args[0] >= T::from(0.0) { args[0].clone() } else { -args[0].clone() })
            });

        self.install("pow", |args| {
                if args.len() != 2 {
                    return Err(EvalError::callable("pow", "requires exactly two arguments"));
                }
                Ok(args[0].pow(&args[1]))
            });

        self.install("sqrt", |args| {
                if args.len() != 1 {
                    return Err(EvalError::callable("sqrt", "requires exactly one argument"));
                }
                Ok(args[0].sqrt())
            });

        self.install("cbrt", |args| {
                if args.len() != 1 {
                    return Err(EvalError::callable("cbrt", "requires exactly one argument"));
                }
                Ok(args[0].cbrt())
            });

        self.install("sum", |args| {
                let mut result = T::from(0.0);
                for value in args {
                    result = result + value.clone();
                }
                Ok(result)
            });

        self.install("avg", |args| {
                if args.is_empty() {
                    return Err(EvalError::callable("avg", "requires at least one argument"));
                }
                let mut result = T::from(0.0);
                for value in args {
                    result = result + value.clone();
                }
                Ok(result / length(args.len()))
            });

        self.install("count", |args| Ok(length(args.len())));

        self.install("min", |args| {
                let Some(first) = args.first() else {
                    return Err(EvalError::callable("min", "requires at least one argument"));
                };
                let mut result = first.clone();
                for value in &args[1..] {
                    if *value < result {
                        result = value.clone();
                    }
                }
                Ok(result)
            });

        self.install("max", |args| {
                let Some(first) = args.first() else {
                    return Err(EvalError::callable("max", "requires at least one argument"));
                };
                let mut result = first.clone();
                for value in &args[1..] {
                    if *value > result {
                        result = value.clone();
                    }
                }
                Ok(result)
            });

        self.install("element_of", |args| {
                let Some(probe) = args.first() else {
                    return Err(EvalError::callable("element_of", "requires at least one argument"));
                };
                Ok(T::from_bool(args[1..].contains(probe)))
            });

        self.install("not_element_of", |args| {
                let Some(probe) = args.first() else {
                    return Err(EvalError::callable("not_element_of",
                                                   "requires at least one argument"));
                };
                Ok(T::from_bool(!args[1..].contains(probe)))
            });

        self.install("at", |_args| {
                Err(EvalError::callable("at", "not available for collections of plain values"))
            });
    }
}

impl<T: Numeric, C: Collection<T>> Default for Handle<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A collection size as a numeric value.
#[allow(clippy::cast_precision_loss)]
fn length<T: Numeric>(count: usize) -> T {
    T::from(count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoke(handle: &Handle<f64>, builtin: Builtin, args: &[f64]) -> EvalResult<f64> {
        match handle.implementation(builtin.index()) {
            Some(implementation) => implementation(args),
            None => panic!("missing builtin {builtin:?}"),
        }
    }

    #[test]
    fn builtins_sit_at_their_enum_positions() {
        let handle = Handle::<f64>::new();
        assert_eq!(handle.get_index("if_then_else"), Some(Builtin::IfThenElse.index()));
        assert_eq!(handle.get_index("pow"), Some(Builtin::Pow.index()));
        assert_eq!(handle.get_index("count"), Some(Builtin::Count.index()));
        assert_eq!(handle.get_index("at"), Some(Builtin::At.index()));
        assert_eq!(handle.names().len(), 14);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut handle = Handle::<f64>::new();
        assert!(handle.add("sum", |_| Ok(0.0)).is_err());
        assert!(handle.add("total", |_| Ok(0.0)).is_ok());
        assert!(handle.add("total", |_| Ok(1.0)).is_err());
    }

    #[test]
    fn n_ary_if_picks_the_first_truthy_condition() {
        let handle = Handle::<f64>::new();
        assert_eq!(invoke(&handle, Builtin::NAryIf, &[0.0, 3.0, 1.0, 6.0, 7.0]), Ok(6.0));
        assert_eq!(invoke(&handle, Builtin::NAryIf, &[0.0, 3.0, 0.0, 6.0, 7.0]), Ok(7.0));
        assert!(invoke(&handle, Builtin::NAryIf, &[1.0, 2.0]).is_err());
        assert!(invoke(&handle, Builtin::NAryIf, &[]).is_err());
    }

    #[test]
    fn aggregators_enforce_their_arity_contracts() {
        let handle = Handle::<f64>::new();
        assert_eq!(invoke(&handle, Builtin::Sum, &[]), Ok(0.0));
        assert_eq!(invoke(&handle, Builtin::Count, &[]), Ok(0.0));
        assert!(invoke(&handle, Builtin::Avg, &[]).is_err());
        assert!(invoke(&handle, Builtin::Min, &[]).is_err());
        assert!(invoke(&handle, Builtin::Max, &[]).is_err());
        assert_eq!(invoke(&handle, Builtin::Avg, &[1.0, 2.0, 3.0]), Ok(2.0));
        assert_eq!(invoke(&handle, Builtin::Min, &[3.0, 1.0, 2.0]), Ok(1.0));
        assert_eq!(invoke(&handle, Builtin::Max, &[3.0, 1.0, 2.0]), Ok(3.0));
    }

    #[test]
    fn membership_scans_for_equality() {
        let handle = Handle::<f64>::new();
        assert_eq!(invoke(&handle, Builtin::ElementOf, &[2.0, 1.0, 2.0, 3.0]), Ok(1.0));
        assert_eq!(invoke(&handle, Builtin::ElementOf, &[4.0, 1.0, 2.0, 3.0]), Ok(0.0));
        assert_eq!(invoke(&handle, Builtin::NotElementOf, &[4.0, 1.0, 2.0, 3.0]), Ok(1.0));
        assert!(invoke(&handle, Builtin::ElementOf, &[]).is_err());
    }

    #[test]
    fn at_rejects_collections_of_plain_values() {
        let handle = Handle::<f64>::new();
        assert!(invoke(&handle, Builtin::At, &[1.0, 2.0]).is_err());
    }
}
