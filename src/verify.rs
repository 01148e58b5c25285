//! Randomized self-check of generated programs against `num-bigint` arithmetic.

use crate::{
    Error, Modulus, Operation, Result,
    eval::{Inputs, evaluate},
    ir::Program,
};
use core::fmt;
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::RngCore;

/// Outcome of a successful [`check`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Report {
    /// Operation checked.
    pub operation: Operation,
    /// Number of fixed operand pairs built from `0, 1, 2, N - 2, N - 1`.
    pub edge_cases: usize,
    /// Number of random operand pairs evaluated.
    pub samples: usize,
    /// Statements in the program.
    pub statements: usize,
    /// Non-constant multiplications in the program.
    pub multiplications: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} edge cases and {} samples ok ({} statements, {} multiplications)",
            self.operation, self.edge_cases, self.samples, self.statements, self.multiplications
        )
    }
}

/// Uniform sample from `[0, modulus)` by rejection.
///
/// Draws the top word masked to the bit length of the modulus' top word first and only fills the
/// rest once it is in range.
pub fn random_below<R: RngCore + ?Sized>(rng: &mut R, modulus: &BigUint) -> BigUint {
    let digits: Vec<u64> = modulus.iter_u64_digits().collect();
    let Some(&hi_modulus) = digits.last() else {
        return BigUint::zero();
    };
    let mask = u64::MAX >> hi_modulus.leading_zeros();

    loop {
        let mut hi = rng.next_u64() & mask;
        while hi > hi_modulus {
            hi = rng.next_u64() & mask;
        }
        let mut words = vec![0u64; digits.len()];
        words[digits.len() - 1] = hi;
        for word in &mut words[..digits.len() - 1] {
            *word = rng.next_u64();
        }
        let n = words
            .iter()
            .rev()
            .fold(BigUint::zero(), |acc, &word| (acc << 64u32) | BigUint::from(word));
        if &n < modulus {
            return n;
        }
    }
}

/// Distinct elements among `0, 1, 2, N - 2, N - 1`.
pub fn edge_elements(modulus: &BigUint) -> Vec<BigUint> {
    let mut edges: Vec<BigUint> = [0u8, 1, 2]
        .into_iter()
        .map(BigUint::from)
        .chain(
            [1u8, 2]
                .into_iter()
                .filter(|&d| *modulus >= BigUint::from(d))
                .map(|d| modulus - d),
        )
        .filter(|x| x < modulus)
        .collect();
    edges.sort();
    edges.dedup();
    edges
}

/// Evaluate `program` on edge elements and on `samples` random elements below `modulus`, and
/// compare every result with `x * y * R^-1 mod N`.
///
/// Every pair of edge elements is tried first (each edge element alone for squaring). The
/// result must be congruent to the reference and fit the original basis. A canonical program
/// must return it exactly; a relaxed one must stay below `2N`.
pub fn check<R: RngCore + ?Sized>(
    program: &Program,
    modulus: &Modulus,
    samples: usize,
    rng: &mut R,
) -> Result<Report> {
    let operation = program.operation();
    if modulus.basis() != program.original() {
        return Err(Error::BasisMismatch);
    }
    if modulus.bits() > program.modulus_bits() {
        return Err(Error::ModulusTooLarge {
            bits: u64::from(modulus.bits()),
            capacity: program.modulus_bits(),
        });
    }
    let n = modulus.value();

    let edges = edge_elements(n);
    let edge_pairs: Vec<(&BigUint, &BigUint)> = if operation.is_square() {
        edges.iter().map(|x| (x, x)).collect()
    } else {
        edges
            .iter()
            .flat_map(|x| edges.iter().map(move |y| (x, y)))
            .collect()
    };
    for &(x, y) in &edge_pairs {
        compare(program, modulus, x, y)?;
    }

    for sample in 0..samples {
        let x = random_below(rng, n);
        let y = if operation.is_square() {
            x.clone()
        } else {
            random_below(rng, n)
        };
        compare(program, modulus, &x, &y).inspect_err(|_| {
            log::debug!("{operation} failed on sample {sample}");
        })?;
    }

    let report = Report {
        operation,
        edge_cases: edge_pairs.len(),
        samples,
        statements: program.len(),
        multiplications: program.multiplications(),
    };
    log::debug!("{report}");
    Ok(report)
}

fn compare(program: &Program, modulus: &Modulus, x: &BigUint, y: &BigUint) -> Result<()> {
    let original = program.original();
    let n = modulus.value();
    let inputs =
        Inputs::operands(original.to_limbs(x), original.to_limbs(y)).with_modulus(modulus);
    let actual = original.from_limbs(&evaluate(program, &inputs)?);
    let expected = modulus.montgomery_product(x, y, program.working());

    let ok = if program.is_canonical() {
        actual == expected
    } else {
        modulus.reduce(&actual) == expected && actual < n << 1u32
    };
    if ok {
        return Ok(());
    }
    Err(Error::Mismatch {
        operation: program.operation().to_string(),
        x: format!("{x:#x}"),
        y: format!("{y:#x}"),
        expected: format!("{expected:#x}"),
        actual: format!("{actual:#x}"),
    })
}
