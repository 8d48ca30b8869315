use std::ops::{Add, Div, Mul, Neg, Sub};

/// The numeric element type an expression is evaluated over.
///
/// The evaluator performs arithmetic, comparisons and truth tests through
/// this trait, so any type implementing it can be plugged into an
/// [`Expression`](crate::Expression) — plain `f64`, a fixed-point type, an
/// interval, a symbolic value, and so on. Literals are always stored as
/// `f64` and enter the computation through `From<f64>`.
///
/// Comparisons return `1`/`0` through [`from_bool`](Numeric::from_bool), and
/// conditions are tested with [`is_truthy`](Numeric::is_truthy), mirroring
/// how a plain arithmetic type converts to and from `bool`.
///
/// ## Example
/// ```
/// use limex::Numeric;
///
/// assert!(2.0.is_truthy());
/// assert!(!0.0.is_truthy());
/// assert_eq!(f64::from_bool(true), 1.0);
/// assert_eq!(3.9.to_position(), Some(3));
/// ```
pub trait Numeric:
    Clone
    + PartialEq
    + PartialOrd
    + From<f64>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Whether values of this type can be cast to a collection position.
    ///
    /// When `false`, the evaluator resolves `collection[index]` through an
    /// n-ary `if` over the collection's elements instead of a host cast, so
    /// the lookup is driven by the type's own equality semantics.
    const CASTABLE: bool;

    /// Tests a value as a condition.
    fn is_truthy(&self) -> bool;

    /// Converts a host boolean into the canonical `1`/`0` of this type.
    fn from_bool(value: bool) -> Self {
        Self::from(if value { 1.0 } else { 0.0 })
    }

    /// Truncating conversion to a collection position.
    ///
    /// Returns `None` for values that cannot denote a position (negative,
    /// non-finite). Only consulted when [`CASTABLE`](Numeric::CASTABLE) is
    /// `true`.
    fn to_position(&self) -> Option<usize>;

    /// Whether this value is a zero divisor.
    ///
    /// Used by the division guard. Types without a meaningful comparison to
    /// zero should override this to return `false`, which disables the
    /// guard and delegates entirely to the type's own division.
    fn is_zero(&self) -> bool {
        *self == Self::from(0.0)
    }

    /// Raises the value to the given power.
    fn pow(&self, exponent: &Self) -> Self;

    /// Square root. Defaults to `pow(0.5)`.
    fn sqrt(&self) -> Self {
        self.pow(&Self::from(0.5))
    }

    /// Cube root. Defaults to `pow(1/3)`.
    fn cbrt(&self) -> Self {
        self.pow(&Self::from(1.0 / 3.0))
    }
}

impl Numeric for f64 {
    const CASTABLE: bool = true;

    fn is_truthy(&self) -> bool {
        *self != 0.0
    }

    fn to_position(&self) -> Option<usize> {
        if self.is_finite() && *self >= 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(*self as usize)
        } else {
            None
        }
    }

    fn pow(&self, exponent: &Self) -> Self {
        f64::powf(*self, *exponent)
    }

    fn sqrt(&self) -> Self {
        f64::sqrt(*self)
    }

    fn cbrt(&self) -> Self {
        f64::cbrt(*self)
    }
}

/// Storage backing a named collection during evaluation.
///
/// The default `Vec<T>` implementation covers the common case where a
/// collection is an ordered sequence of plain values: callables receive the
/// elements directly and `collection[index]` reads them in place. An opaque
/// collection type (one whose elements are not host values) implements this
/// trait with [`ELEMENTWISE`](Collection::ELEMENTWISE) set to `false`, and
/// routes indexing and aggregation through the hooks registered on the
/// [`Handle`](crate::Handle).
pub trait Collection<T>: 'static {
    /// Whether the elements are directly addressable values of type `T`.
    const ELEMENTWISE: bool;

    /// Borrows the elements when the collection is elementwise.
    fn elements(&self) -> Option<&[T]>;
}

impl<T: 'static> Collection<T> for Vec<T> {
    const ELEMENTWISE: bool = true;

    fn elements(&self) -> Option<&[T]> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_zero() {
        assert!(1.0.is_truthy());
        assert!((-0.5).is_truthy());
        assert!(!0.0.is_truthy());
    }

    #[test]
    fn positions_truncate() {
        assert_eq!(2.7.to_position(), Some(2));
        assert_eq!(0.0.to_position(), Some(0));
        assert_eq!((-1.0).to_position(), None);
        assert_eq!(f64::NAN.to_position(), None);
    }

    #[test]
    fn roots_match_std() {
        assert_eq!(Numeric::sqrt(&9.0), 3.0);
        assert_eq!(Numeric::cbrt(&8.0), 2.0);
    }
}
