//! Common functionality shared between tests.

// Different tests may use only a subset of the available functionality
#![allow(dead_code)]

use monty_codegen::{
    Generator, GeneratorConfig, Inputs, LimbBasis, Modulus, Operation, Program, evaluate,
};
use num_bigint::BigUint;
use num_modular::ModularUnaryOps;
use proptest::prelude::*;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Generator for `original_bits`-wide original limbs and `limb_bits`-wide working limbs.
pub fn generator(original_bits: u32, original_limbs: usize, limb_bits: u32) -> Generator {
    Generator::new(GeneratorConfig::new(original_bits, original_limbs, limb_bits).unwrap())
}

/// The 4 × 64 to 9 × 29 configuration used for BN254 on WebAssembly.
pub fn bn254(canonical: bool) -> Generator {
    Generator::new(
        GeneratorConfig::new(64, 4, 29)
            .unwrap()
            .canonical(canonical),
    )
}

/// Run a full Montgomery program on integer operands and recompose its result.
pub fn run(program: &Program, modulus: &Modulus, x: &BigUint, y: &BigUint) -> BigUint {
    let original = program.original();
    let inputs =
        Inputs::operands(original.to_limbs(x), original.to_limbs(y)).with_modulus(modulus);
    original.from_limbs(&evaluate(program, &inputs).unwrap())
}

/// Run a product-only program and return its accumulator limbs.
pub fn accumulate(program: &Program, left: &[u64], right: &[u64]) -> Vec<u64> {
    evaluate(program, &Inputs::operands(left.to_vec(), right.to_vec())).unwrap()
}

/// `x * y * R^-1 mod n`, computed with `num-modular`.
pub fn montgomery_reference(x: &BigUint, y: &BigUint, n: &BigUint, working: LimbBasis) -> BigUint {
    let r_inv = working
        .radix()
        .invm(n)
        .expect("the radix is invertible modulo an odd modulus");
    x * y * r_inv % n
}

/// `x * R mod n`.
pub fn to_montgomery(x: u64, n: &BigUint, working: LimbBasis) -> BigUint {
    BigUint::from(x) * working.radix() % n
}

prop_compose! {
    /// Original-basis limbs of an arbitrary 256-bit value.
    pub fn limbs256()(limbs in any::<[u64; 4]>()) -> Vec<u64> {
        limbs.to_vec()
    }
}

prop_compose! {
    /// Element of the BN254 scalar field, as an integer.
    pub fn bn254_element()(bytes in any::<[u8; 32]>()) -> BigUint {
        BigUint::from_bytes_le(&bytes) % Modulus::bn254_scalar().value()
    }
}

pub const OPERATIONS: [Operation; 4] = Operation::ALL;
