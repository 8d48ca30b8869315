use crate::{
    ast::{BinaryOperator, Node, UnaryOperator},
    error::{eval_error::EvalResult, EvalError},
    handle::{Builtin, Handle},
    value::{Collection, Numeric},
};

/// Evaluates a syntax tree bottom-up against positional variable and
/// collection values, dispatching named callables through the handle.
///
/// Evaluation is pure with respect to the tree and the handle; the only
/// side effects are whatever user-registered callables perform.
pub(crate) struct Evaluator<'a, T: Numeric, C: Collection<T>> {
    pub(crate) variable_values: &'a [T],
    pub(crate) collection_values: &'a [C],
    pub(crate) handle: &'a Handle<T, C>,
}

impl<'a, T: Numeric, C: Collection<T>> Evaluator<'a, T, C> {
    pub(crate) fn evaluate(&self, node: &Node) -> EvalResult<T> {
        match node {
            Node::Literal { value } => Ok(T::from(*value)),
            Node::Variable { index } => {
                self.variable_values
                    .get(*index)
                    .cloned()
                    .ok_or(EvalError::InsufficientVariables { required: *index + 1,
                                                              provided:
                                                                  self.variable_values.len(), })
            },
            Node::Collection { .. } => Err(EvalError::NotEvaluable { kind: "collection" }),
            Node::Group { members } => match members.first() {
                Some(member) => self.evaluate(member),
                None => Err(EvalError::Internal { details: "empty group" }),
            },
            Node::Set { .. } => Err(EvalError::NotEvaluable { kind: "set" }),
            Node::Sequence { .. } => Err(EvalError::NotEvaluable { kind: "sequence" }),
            Node::UnaryOp { op, operand } => self.unary(*op, operand),
            Node::BinaryOp { op, left, right } => self.binary(*op, left, right),
            Node::FunctionCall { callable, arguments }
            | Node::Aggregation { callable, arguments } => self.call(*callable, arguments),
            Node::Index { collection, subscript } => self.index(*collection, subscript),
            Node::IfThenElse { condition,
                               then_result,
                               else_result, } => {
                // all three operands are evaluated before selection; the
                // callable interface is uniform
                let arguments = [self.evaluate(condition)?,
                                 self.evaluate(then_result)?,
                                 self.evaluate(else_result)?];
                self.invoke(Builtin::IfThenElse.index(), &arguments)
            },
            Node::Assign { value } => self.evaluate(value),
        }
    }

    fn unary(&self, op: UnaryOperator, operand: &Node) -> EvalResult<T> {
        let value = self.evaluate(operand)?;
        Ok(match op {
            UnaryOperator::Negate => -value,
            UnaryOperator::LogicalNot => T::from_bool(!value.is_truthy()),
            UnaryOperator::Square => value.clone() * value,
            UnaryOperator::Cube => value.clone() * value.clone() * value,
        })
    }

    fn binary(&self, op: BinaryOperator, left: &Node, right: &Node) -> EvalResult<T> {
        if matches!(op, BinaryOperator::ElementOf | BinaryOperator::NotElementOf) {
            return self.membership(op, left, right);
        }
        if op == BinaryOperator::Exponentiate {
            let arguments = [self.evaluate(left)?, self.evaluate(right)?];
            return self.invoke(Builtin::Pow.index(), &arguments);
        }

        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        Ok(match op {
            BinaryOperator::Add | BinaryOperator::AddAssign => left + right,
            BinaryOperator::Subtract | BinaryOperator::SubtractAssign => left - right,
            BinaryOperator::Multiply | BinaryOperator::MultiplyAssign => left * right,
            BinaryOperator::Divide => {
                if right.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                left / right
            },
            // compound division is not zero-guarded
            BinaryOperator::DivideAssign => left / right,
            BinaryOperator::LogicalAnd => T::from_bool(left.is_truthy() && right.is_truthy()),
            BinaryOperator::LogicalOr => T::from_bool(left.is_truthy() || right.is_truthy()),
            BinaryOperator::LessThan => T::from_bool(left < right),
            BinaryOperator::LessOrEqual => T::from_bool(left <= right),
            BinaryOperator::GreaterThan => T::from_bool(left > right),
            BinaryOperator::GreaterOrEqual => T::from_bool(left >= right),
            BinaryOperator::EqualTo => T::from_bool(left == right),
            BinaryOperator::NotEqualTo => T::from_bool(left != right),
            BinaryOperator::Exponentiate
            | BinaryOperator::ElementOf
            | BinaryOperator::NotElementOf => {
                return Err(EvalError::Internal { details: "operator dispatched twice" });
            },
        })
    }

    /// `in` and `not in`: the probe and every member of the right-hand set
    /// go to the matching built-in as one argument list.
    fn membership(&self, op: BinaryOperator, probe: &Node, set: &Node) -> EvalResult<T> {
        let members = match set {
            Node::Set { members } | Node::Sequence { members } | Node::Group { members } => {
                members
            },
            other => return Err(EvalError::SetExpected { kind: other.kind_name() }),
        };
        let mut arguments = Vec::with_capacity(members.len() + 1);
        arguments.push(self.evaluate(probe)?);
        for member in members {
            arguments.push(self.evaluate(member)?);
        }
        let builtin = if op == BinaryOperator::ElementOf {
            Builtin::ElementOf
        } else {
            Builtin::NotElementOf
        };
        self.invoke(builtin.index(), &arguments)
    }

    fn call(&self, callable: usize, arguments: &[Node]) -> EvalResult<T> {
        let name = self.handle
                       .names()
                       .get(callable)
                       .ok_or(EvalError::CallableOutOfRange { index: callable })?;

        if callable == Builtin::At.index() {
            return self.call_at(arguments);
        }

        // a single bare collection argument passes its stored values along
        if let [Node::Collection { index }] = arguments {
            let collection = self.collection(*index)?;
            return match collection.elements() {
                Some(elements) => self.invoke(callable, elements),
                None => self.handle.aggregate_evaluation(name, collection),
            };
        }

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate(argument)?);
        }
        self.invoke(callable, &values)
    }

    /// The reserved `at` built-in: indexed lookup over an opaque collection,
    /// routed through the handle's registered indexer.
    fn call_at(&self, arguments: &[Node]) -> EvalResult<T> {
        if C::ELEMENTWISE {
            return Err(EvalError::callable("at", "not available for collections of plain values"));
        }
        let [Node::Collection { index }, subscript] = arguments else {
            return Err(EvalError::Internal { details: "malformed 'at' call" });
        };
        let position = self.evaluate(subscript)?;
        self.handle
            .indexed_evaluation(self.collection(*index)?, &position)
    }

    /// 1-based lookup of `collection[subscript]`.
    #[allow(clippy::cast_precision_loss)]
    fn index(&self, collection: usize, subscript: &Node) -> EvalResult<T> {
        let collection = self.collection(collection)?;
        let Some(elements) = collection.elements() else {
            return Err(EvalError::Internal { details: "index node over an opaque collection" });
        };

        if let Node::Literal { value } = subscript {
            return literal_position(*value, elements.len())
                .and_then(|position| {
                    elements.get(position)
                            .cloned()
                            .ok_or(EvalError::IndexOutOfRange { size: elements.len() })
                });
        }

        let value = self.evaluate(subscript)?;
        if T::CASTABLE {
            let position = value.to_position()
                                .and_then(|raw| raw.checked_sub(1))
                                .filter(|position| *position < elements.len())
                                .ok_or(EvalError::IndexOutOfRange { size: elements.len() })?;
            elements.get(position)
                    .cloned()
                    .ok_or(EvalError::IndexOutOfRange { size: elements.len() })
        } else {
            // the type cannot be cast to a position: select the element
            // through an n-ary if so the lookup runs on the type's own
            // equality semantics
            let mut arguments = Vec::with_capacity(2 * elements.len() + 1);
            for (i, element) in elements.iter().enumerate() {
                arguments.push(T::from_bool(value == T::from((i + 1) as f64)));
                arguments.push(element.clone());
            }
            arguments.push(T::from_bool(false)); // unreachable default
            self.invoke(Builtin::NAryIf.index(), &arguments)
        }
    }

    fn collection(&self, index: usize) -> EvalResult<&'a C> {
        self.collection_values
            .get(index)
            .ok_or(EvalError::InsufficientCollections { required: index + 1,
                                                        provided: self.collection_values.len(), })
    }

    fn invoke(&self, callable: usize, arguments: &[T]) -> EvalResult<T> {
        match self.handle.implementation(callable) {
            Some(implementation) => implementation(arguments),
            None => Err(EvalError::CallableOutOfRange { index: callable }),
        }
    }
}

/// Maps a literal subscript to a 0-based element position.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn literal_position(value: f64, size: usize) -> EvalResult<usize> {
    if value >= 1.0 && value as usize <= size {
        Ok(value as usize - 1)
    } else {
        Err(EvalError::IndexOutOfRange { size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_positions_are_one_based_and_truncating() {
        assert_eq!(literal_position(1.0, 3), Ok(0));
        assert_eq!(literal_position(3.9, 3), Ok(2));
        assert_eq!(literal_position(0.0, 3), Err(EvalError::IndexOutOfRange { size: 3 }));
        assert_eq!(literal_position(4.0, 3), Err(EvalError::IndexOutOfRange { size: 3 }));
        assert_eq!(literal_position(-2.0, 3), Err(EvalError::IndexOutOfRange { size: 3 }));
    }

    #[test]
    fn bare_sets_and_collections_have_no_value() {
        let handle = Handle::<f64>::new();
        let evaluator = Evaluator { variable_values:   &[],
                                    collection_values: &[],
                                    handle:            &handle, };
        assert_eq!(evaluator.evaluate(&Node::Set { members: vec![] }),
                   Err(EvalError::NotEvaluable { kind: "set" }));
        assert_eq!(evaluator.evaluate(&Node::Collection { index: 0 }),
                   Err(EvalError::NotEvaluable { kind: "collection" }));
    }
}
