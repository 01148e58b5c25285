//! Generator of straight-line Montgomery multiplication routines over arbitrary limb bases.
//!
//! # About
//! Field elements are stored as a few wide limbs (e.g. 4 × 64 bits). Platforms without a fast
//! 64 × 64 → 128-bit multiplier (WebAssembly in particular) are better served by narrower limbs
//! whose products fit a single 64-bit word with room to accumulate, such as 9 × 29 bits.
//!
//! This crate emits the branch-free statement sequence which:
//!
//! 1. repacks the operands and the modulus into the working basis,
//! 2. forms the double-width product with a schoolbook, Karatsuba or Toom-Cook-3 strategy (or
//!    a dedicated squaring),
//! 3. performs limb-wise Montgomery reduction,
//! 4. propagates carries and optionally subtracts the modulus once,
//! 5. packs the result back into the original basis.
//!
//! Programs are represented as [`ir::Program`] values which can be rendered as C++ or Rust with
//! a [`Printer`], or executed directly with [`eval::Evaluator`].
//!
//! # Usage
//! ```
//! use monty_codegen::{Generator, GeneratorConfig, Language, Operation};
//!
//! let config = GeneratorConfig::new(64, 4, 29)?;
//! let program = Generator::new(config).generate(Operation::Mul)?;
//! let cpp = Language::Cpp.render(&program);
//! assert!(cpp.starts_with("constexpr uint64_t mask = 0x1fffffff;"));
//! # Ok::<(), monty_codegen::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![warn(
    clippy::cast_lossless,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::panic,
    clippy::panic_in_result_fn,
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]

pub mod basis;
pub mod eval;
pub mod ir;
pub mod modulus;
pub mod normalize;
pub mod printer;
pub mod product;
pub mod reduction;
pub mod repack;
#[cfg(feature = "rand")]
pub mod verify;

mod error;
mod generator;

pub use crate::{
    basis::LimbBasis,
    error::{Error, Result},
    eval::{Evaluator, Inputs, evaluate},
    generator::{Generator, GeneratorConfig, Operation},
    ir::Program,
    modulus::Modulus,
    printer::{CppPrinter, Language, Printer, RustPrinter},
    product::Strategy,
};

#[cfg(feature = "rand")]
pub use rand_core;
