//! Symbolic storage locations.
//!
//! A [`Slot`] names a value of the generated program without committing to a spelling; printers
//! resolve slots to identifiers at render time. The [`Display`](fmt::Display) spelling is the
//! C++ one and is also used in error messages.

use core::fmt;

/// One of the three multi-limb values flowing through the pipeline.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Operand {
    /// Left multiplicand (`data`).
    Left,
    /// Right multiplicand (`other.data`).
    Right,
    /// The field modulus.
    Modulus,
}

impl Operand {
    /// Stable lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Operand::Left => "left",
            Operand::Right => "right",
            Operand::Modulus => "modulus",
        }
    }
}

/// Toom-Cook evaluation points other than `0` and `∞`, which are plain limbs.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Point {
    /// `x = 1`
    One,
    /// `x = -1`
    NegOne,
    /// `x = 2`
    Two,
}

/// Single-word scratch values used by the product strategies and the final subtraction.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Temp {
    /// Karatsuba low product.
    Low,
    /// Karatsuba high product.
    High,
    /// Toom-Cook pointwise product at `0`.
    AtZero,
    /// Toom-Cook pointwise product at `1`.
    AtOne,
    /// Toom-Cook pointwise product at `-1`.
    AtNegOne,
    /// Toom-Cook pointwise product at `2`.
    AtTwo,
    /// Toom-Cook pointwise product at `∞`.
    AtInfinity,
    /// `c1 + c2 + 3 c3 + 5 c4`, the exact third of `p(2) - p(-1)`.
    Third,
    /// `c1 + c3`, half of `p(1) - p(-1)`.
    OddSum,
    /// Interpolated Toom-Cook coefficient `c1`, `c2` or `c3`.
    Coeff(u8),
    /// All-ones when the relaxed result is already below the modulus.
    Keep,
    /// Complement of [`Temp::Keep`] restricted to the limb mask.
    Take,
}

/// What a slot stores.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum SlotKind {
    /// Element of an operand in the original basis. Program input.
    Source(Operand),
    /// `-N^-1 mod 2^64` supplied by the consumer. Program input.
    NegInverse,
    /// Element of an operand repacked into the working basis.
    Limb(Operand),
    /// Accumulator limb.
    Acc,
    /// Per-limb Montgomery quotient.
    Quotient,
    /// Running sum of squaring cross terms.
    Cross,
    /// Working limb mask.
    Mask,
    /// `r_inv` masked to the working limb width.
    RInv,
    /// Karatsuba pair sum of an operand.
    PairSum(Operand),
    /// Toom-Cook evaluation of an operand's limb triple.
    Eval(Operand, Point),
    /// Trial subtraction limb of the canonical final reduction.
    Difference,
    /// Single-word scratch value.
    Temp(Temp),
}

impl Point {
    const fn suffix(self) -> &'static str {
        match self {
            Point::One => "one",
            Point::NegOne => "neg",
            Point::Two => "two",
        }
    }
}

impl Temp {
    fn name(self) -> String {
        match self {
            Temp::Low => "low".into(),
            Temp::High => "high".into(),
            Temp::AtZero => "p_0".into(),
            Temp::AtOne => "p_1".into(),
            Temp::AtNegOne => "p_neg".into(),
            Temp::AtTwo => "p_2".into(),
            Temp::AtInfinity => "p_inf".into(),
            Temp::Third => "third".into(),
            Temp::OddSum => "odd".into(),
            Temp::Coeff(n) => format!("c_{n}"),
            Temp::Keep => "new_mask".into(),
            Temp::Take => "inverse_mask".into(),
        }
    }
}

impl SlotKind {
    /// Identifier of the kind: the array name, the prefix of indexed scalars, or the scalar
    /// name itself.
    pub fn name(self) -> String {
        match self {
            SlotKind::Source(Operand::Left) => "data".into(),
            SlotKind::Source(Operand::Right) => "other.data".into(),
            SlotKind::Source(Operand::Modulus) => "modulus.data".into(),
            SlotKind::NegInverse => "T::r_inv".into(),
            SlotKind::Limb(Operand::Modulus) => "modulus_limbs".into(),
            SlotKind::Limb(operand) => operand.name().into(),
            SlotKind::Acc => "temp".into(),
            SlotKind::Quotient => "k".into(),
            SlotKind::Cross => "cross".into(),
            SlotKind::Mask => "mask".into(),
            SlotKind::RInv => "r_inv".into(),
            SlotKind::PairSum(operand) => format!("{}_sum", operand.name()),
            SlotKind::Eval(operand, point) => format!("{}_{}", operand.name(), point.suffix()),
            SlotKind::Difference => "r_temp".into(),
            SlotKind::Temp(temp) => temp.name(),
        }
    }

    /// Whether slots of this kind are elements of an array.
    pub const fn is_array(self) -> bool {
        matches!(
            self,
            SlotKind::Source(_) | SlotKind::Limb(_) | SlotKind::PairSum(_) | SlotKind::Eval(..)
        )
    }

    /// Whether slots of this kind are read-only program inputs.
    pub const fn is_input(self) -> bool {
        matches!(self, SlotKind::Source(_) | SlotKind::NegInverse)
    }

    /// Whether the value only depends on the modulus, so may be computed at compile time.
    pub const fn is_constant(self) -> bool {
        matches!(
            self,
            SlotKind::Limb(Operand::Modulus) | SlotKind::Mask | SlotKind::RInv
        )
    }

    /// Whether slots of this kind carry a numeric suffix in scalar form (`acc_3`).
    pub const fn is_indexed(self) -> bool {
        matches!(self, SlotKind::Acc | SlotKind::Difference)
    }
}

/// A symbolic storage location: a kind plus an index within that kind.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Slot {
    /// What is stored.
    pub kind: SlotKind,
    /// Position within the kind; zero for single-word kinds.
    pub index: usize,
}

impl Slot {
    /// Create a slot.
    pub const fn new(kind: SlotKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Accumulator limb `i`.
    pub const fn acc(i: usize) -> Self {
        Self::new(SlotKind::Acc, i)
    }

    /// Working-basis limb `i` of `operand`.
    pub const fn limb(operand: Operand, i: usize) -> Self {
        Self::new(SlotKind::Limb(operand), i)
    }

    /// Original-basis limb `i` of `operand`.
    pub const fn source(operand: Operand, i: usize) -> Self {
        Self::new(SlotKind::Source(operand), i)
    }

    /// Single-word scratch value.
    pub const fn temp(temp: Temp) -> Self {
        Self::new(SlotKind::Temp(temp), 0)
    }

    /// Single-word slot of `kind`.
    pub const fn scalar(kind: SlotKind) -> Self {
        Self::new(kind, 0)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind.name();
        if self.kind.is_array() {
            write!(f, "{name}[{}]", self.index)
        } else if self.kind.is_indexed() {
            write!(f, "{name}_{}", self.index)
        } else {
            f.write_str(&name)
        }
    }
}
