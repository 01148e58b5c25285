//! Error types.

use crate::product::Strategy;
use thiserror::Error;

/// Result type with the `monty-codegen` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Generation-time errors.
///
/// Every error is raised before any statement is emitted: a generator either produces a
/// complete program or nothing at all.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The strategy needs the working limb count to be a multiple of `multiple`.
    #[error("{strategy} multiplication requires a limb count divisible by {multiple}, got {limbs}")]
    LimbCount {
        /// Offending strategy.
        strategy: Strategy,
        /// Working limb count.
        limbs: usize,
        /// Required divisor.
        multiple: usize,
    },

    /// Operation name not recognised.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Output language not recognised.
    #[error("unknown output language: {0}")]
    UnknownLanguage(String),

    /// Limb width outside of the supported range.
    #[error("limb width of {bits} bits is outside of 1..={max}")]
    InvalidLimbBits {
        /// Requested width.
        bits: u32,
        /// Largest supported width.
        max: u32,
    },

    /// A basis with zero limbs.
    #[error("a limb basis needs at least one limb")]
    EmptyBasis,

    /// A basis whose total width does not fit a `u32`.
    #[error("{num_limbs} limbs of {limb_bits} bits exceed the largest supported width")]
    BasisTooLarge {
        /// Requested width.
        limb_bits: u32,
        /// Requested limb count.
        num_limbs: usize,
    },

    /// The working basis cannot hold every bit of the original basis.
    #[error("{limbs} limbs of {limb_bits} bits cannot cover {required} bits")]
    InsufficientCoverage {
        /// Working limb count.
        limbs: usize,
        /// Working limb width.
        limb_bits: u32,
        /// Bits of the original basis.
        required: u32,
    },

    /// Accumulated terms could overflow a 64-bit word.
    #[error(
        "{strategy} accumulation over {limbs} limbs of {limb_bits} bits overflows a 64-bit word"
    )]
    InsufficientHeadroom {
        /// Strategy whose intermediate values were checked.
        strategy: Strategy,
        /// Working limb count.
        limbs: usize,
        /// Working limb width.
        limb_bits: u32,
    },

    /// The modulus is zero.
    #[error("modulus must be non-zero")]
    ZeroModulus,

    /// The modulus is even, so no Montgomery reduction exists.
    #[error("modulus must be odd")]
    EvenModulus,

    /// The modulus does not fit the original basis.
    #[error("modulus of {bits} bits does not fit in {capacity} bits")]
    ModulusTooLarge {
        /// Bit length of the modulus.
        bits: u64,
        /// Capacity of the basis.
        capacity: u32,
    },

    /// The modulus string could not be parsed.
    #[error("invalid modulus literal: {0}")]
    InvalidModulus(String),

    /// A value was used with a basis it was not built for.
    #[error("modulus basis does not match the generator's original basis")]
    BasisMismatch,

    /// The evaluator was not given a value for an input.
    #[error("no value bound for input `{name}`")]
    UnboundInput {
        /// Rendered slot name.
        name: String,
    },

    /// A slot was accessed before its declaration, or read before it held a value.
    #[error("`{name}` read before it was declared and initialized")]
    Undeclared {
        /// Rendered slot name.
        name: String,
    },

    /// An input array of the wrong length was bound.
    #[error("input `{name}` expects {expected} limbs, got {actual}")]
    InputLength {
        /// Input name.
        name: &'static str,
        /// Limb count of the original basis.
        expected: usize,
        /// Limb count provided.
        actual: usize,
    },

    /// A generated program disagreed with the reference arithmetic.
    #[error("{operation} disagrees with the reference for x = {x}, y = {y}: expected {expected}, got {actual}")]
    Mismatch {
        /// Operation under test.
        operation: String,
        /// Left operand.
        x: String,
        /// Right operand.
        y: String,
        /// Reference residue.
        expected: String,
        /// Residue computed by the program.
        actual: String,
    },
}
