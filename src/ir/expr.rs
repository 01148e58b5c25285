//! Arithmetic expressions over 64-bit words.
//!
//! All arithmetic wraps modulo `2^64`, matching `uint64_t` in the generated C++ and the
//! `wrapping_*` methods used by the generated Rust.

use super::Slot;
use core::ops::{Add, BitAnd, BitOr, Mul, Not, Shl, Shr, Sub};

/// Word-sized expression tree.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Expr {
    /// Literal.
    Const(u64),
    /// Value of a slot.
    Slot(Slot),
    /// Wrapping sum.
    Add(Box<Expr>, Box<Expr>),
    /// Wrapping difference.
    Sub(Box<Expr>, Box<Expr>),
    /// Wrapping product.
    Mul(Box<Expr>, Box<Expr>),
    /// Left shift by a constant; bits above 64 are dropped.
    Shl(Box<Expr>, u32),
    /// Logical right shift by a constant.
    Shr(Box<Expr>, u32),
    /// Bitwise and.
    And(Box<Expr>, Box<Expr>),
    /// Bitwise or.
    Or(Box<Expr>, Box<Expr>),
    /// Bitwise complement.
    Not(Box<Expr>),
}

/// Binding strength of an operator, shared by the C-family printers.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Precedence {
    /// `|`
    Or,
    /// `&`
    And,
    /// `<<`, `>>`
    Shift,
    /// `+`, `-`
    Additive,
    /// `*`
    Multiplicative,
    /// `~`
    Unary,
    /// Literals and names.
    Atom,
}

impl Expr {
    /// Literal expression.
    pub const fn constant(value: u64) -> Self {
        Expr::Const(value)
    }

    /// Binding strength of the outermost operator.
    pub fn precedence(&self) -> Precedence {
        match self {
            Expr::Const(_) | Expr::Slot(_) => Precedence::Atom,
            Expr::Add(..) | Expr::Sub(..) => Precedence::Additive,
            Expr::Mul(..) => Precedence::Multiplicative,
            Expr::Shl(..) | Expr::Shr(..) => Precedence::Shift,
            Expr::And(..) => Precedence::And,
            Expr::Or(..) => Precedence::Or,
            Expr::Not(_) => Precedence::Unary,
        }
    }

    /// Whether this is an arithmetic operator (`+`, `-`, `*`).
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Expr::Add(..) | Expr::Sub(..) | Expr::Mul(..))
    }

    /// OR together `terms`, left to right. An empty list is the constant zero.
    pub fn or_all(terms: impl IntoIterator<Item = Expr>) -> Expr {
        terms
            .into_iter()
            .reduce(|acc, term| acc | term)
            .unwrap_or(Expr::Const(0))
    }

    /// Sum `terms`, left to right. An empty list is the constant zero.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Expr {
        terms
            .into_iter()
            .reduce(|acc, term| acc + term)
            .unwrap_or(Expr::Const(0))
    }

    /// Evaluate with `lookup` supplying slot values.
    pub fn eval<E>(&self, lookup: &mut impl FnMut(Slot) -> Result<u64, E>) -> Result<u64, E> {
        Ok(match self {
            Expr::Const(value) => *value,
            Expr::Slot(slot) => lookup(*slot)?,
            Expr::Add(a, b) => a.eval(lookup)?.wrapping_add(b.eval(lookup)?),
            Expr::Sub(a, b) => a.eval(lookup)?.wrapping_sub(b.eval(lookup)?),
            Expr::Mul(a, b) => a.eval(lookup)?.wrapping_mul(b.eval(lookup)?),
            Expr::Shl(a, shift) => a.eval(lookup)?.wrapping_shl(*shift),
            Expr::Shr(a, shift) => a.eval(lookup)?.wrapping_shr(*shift),
            Expr::And(a, b) => a.eval(lookup)? & b.eval(lookup)?,
            Expr::Or(a, b) => a.eval(lookup)? | b.eval(lookup)?,
            Expr::Not(a) => !a.eval(lookup)?,
        })
    }

    /// Visit every slot read by this expression.
    pub fn for_each_slot(&self, f: &mut impl FnMut(Slot)) {
        match self {
            Expr::Const(_) => {}
            Expr::Slot(slot) => f(*slot),
            Expr::Shl(a, _) | Expr::Shr(a, _) | Expr::Not(a) => a.for_each_slot(f),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::And(a, b)
            | Expr::Or(a, b) => {
                a.for_each_slot(f);
                b.for_each_slot(f);
            }
        }
    }
}

impl From<Slot> for Expr {
    fn from(slot: Slot) -> Self {
        Expr::Slot(slot)
    }
}

impl From<u64> for Expr {
    fn from(value: u64) -> Self {
        Expr::Const(value)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl<T: Into<Expr>> $trait<T> for Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                Expr::$variant(Box::new(self), Box::new(rhs.into()))
            }
        }

        impl<T: Into<Expr>> $trait<T> for Slot {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                Expr::$variant(Box::new(self.into()), Box::new(rhs.into()))
            }
        }
    };
}

impl_binary_op!(Add, add, Add);
impl_binary_op!(Sub, sub, Sub);
impl_binary_op!(Mul, mul, Mul);
impl_binary_op!(BitAnd, bitand, And);
impl_binary_op!(BitOr, bitor, Or);

macro_rules! impl_shift_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl $trait<u32> for Expr {
            type Output = Expr;

            fn $method(self, shift: u32) -> Expr {
                debug_assert!(shift < 64, "shift by {shift} out of range");
                Expr::$variant(Box::new(self), shift)
            }
        }

        impl $trait<u32> for Slot {
            type Output = Expr;

            fn $method(self, shift: u32) -> Expr {
                Expr::from(self).$method(shift)
            }
        }
    };
}

impl_shift_op!(Shl, shl, Shl);
impl_shift_op!(Shr, shr, Shr);

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::{Expr, Precedence};
    use crate::ir::{Operand, Slot};
    use core::convert::Infallible;

    fn eval(expr: &Expr) -> u64 {
        expr.eval(&mut |slot: Slot| -> Result<u64, Infallible> { Ok(slot.index as u64 + 10) })
            .unwrap()
    }

    #[test]
    fn wrapping_semantics() {
        let a = Slot::limb(Operand::Left, 0);
        assert_eq!(eval(&(Expr::from(3u64) - a)), 3u64.wrapping_sub(10));
        assert_eq!(eval(&(Expr::from(u64::MAX) * 2u64)), u64::MAX - 1);
        assert_eq!(eval(&(Expr::from(u64::MAX) << 4)), u64::MAX << 4);
        assert_eq!(eval(&!Expr::from(0u64)), u64::MAX);
    }

    #[test]
    fn inverse_of_three_divides_exactly() {
        let x = Expr::from(3u64 * 123_456_789) * 0xaaaaaaaaaaaaaaabu64;
        assert_eq!(eval(&x), 123_456_789);
        // Also for values which have wrapped.
        let y = Expr::from(0u64) - Expr::from(3u64 * 7);
        assert_eq!(eval(&(y * 0xaaaaaaaaaaaaaaabu64)), 0u64.wrapping_sub(7));
    }

    #[test]
    fn folds() {
        assert_eq!(Expr::or_all([]), Expr::Const(0));
        assert_eq!(eval(&Expr::sum([1u64, 2, 3].map(Expr::from))), 6);
        assert_eq!(eval(&Expr::or_all([1u64, 2, 4].map(Expr::from))), 7);
    }

    #[test]
    fn precedence_order() {
        assert!(Precedence::Or < Precedence::And);
        assert!(Precedence::Shift < Precedence::Additive);
        assert_eq!((Expr::from(1u64) << 2).precedence(), Precedence::Shift);
    }
}
