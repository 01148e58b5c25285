//! Validated moduli and the Montgomery constants derived from them.

use crate::{Error, LimbBasis, Result, basis::low_mask};
use core::{fmt, str::FromStr};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{Num, Zero};

/// Scalar field modulus of the BN254 curve.
pub const BN254_SCALAR: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Base field modulus of the BN254 curve.
pub const BN254_BASE: &str =
    "21888242871839275222246405745257275088696311157297823662689037894645226208583";

/// Base field modulus of the secp256k1 curve, a full 256-bit value.
pub const SECP256K1_BASE: &str =
    "0xfffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";

/// An odd, non-zero modulus which fits in an original limb basis.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Modulus {
    value: BigUint,
    basis: LimbBasis,
}

impl Modulus {
    /// Validate `value` as a modulus for elements stored in `basis`.
    pub fn new(value: BigUint, basis: LimbBasis) -> Result<Self> {
        if value.is_zero() {
            return Err(Error::ZeroModulus);
        }
        if value.is_even() {
            return Err(Error::EvenModulus);
        }
        if value.bits() > u64::from(basis.bits()) {
            return Err(Error::ModulusTooLarge {
                bits: value.bits(),
                capacity: basis.bits(),
            });
        }
        Ok(Self { value, basis })
    }

    /// Parse a decimal or `0x`-prefixed hexadecimal literal.
    pub fn parse(literal: &str, basis: LimbBasis) -> Result<Self> {
        let literal = literal.trim();
        let parsed = match literal.strip_prefix("0x") {
            Some(hex) => BigUint::from_str_radix(hex, 16),
            None => BigUint::from_str(literal),
        };
        let value = parsed.map_err(|_| Error::InvalidModulus(literal.to_owned()))?;
        Self::new(value, basis)
    }

    /// The BN254 scalar field modulus in a 4×64-bit basis.
    pub fn bn254_scalar() -> Self {
        let basis = LimbBasis::new(64, 4).expect("4 x 64 is a valid basis");
        Self::parse(BN254_SCALAR, basis).expect("BN254 scalar modulus is odd and fits 256 bits")
    }

    /// The modulus as an integer.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u32 {
        // bounded by the basis capacity, itself a `u32`
        u32::try_from(self.value.bits()).unwrap_or(u32::MAX)
    }

    /// The basis the modulus is stored in.
    pub fn basis(&self) -> LimbBasis {
        self.basis
    }

    /// The modulus split into limbs of its basis.
    pub fn limbs(&self) -> Vec<u64> {
        self.basis.to_limbs(&self.value)
    }

    /// `-N^-1 mod 2^64`.
    ///
    /// Consumers expose this constant as `T::r_inv`; generated code masks it down to the working
    /// limb width.
    pub fn neg_inverse(&self) -> u64 {
        let low = self.value.iter_u64_digits().next().unwrap_or(1);
        inverse_mod_2_64(low).wrapping_neg()
    }

    /// `-N^-1 mod 2^limb_bits`, the per-limb quotient multiplier of Montgomery reduction.
    pub fn r_inv(&self, limb_bits: u32) -> u64 {
        self.neg_inverse() & low_mask(limb_bits)
    }

    /// `x * R mod N` where `R = 2^working.bits()`.
    pub fn to_montgomery(&self, x: &BigUint, working: LimbBasis) -> BigUint {
        (x * working.radix()) % &self.value
    }

    /// Reduce `x` modulo `N`.
    pub fn reduce(&self, x: &BigUint) -> BigUint {
        x % &self.value
    }

    /// `x * y * R^-1 mod N` where `R = 2^working.bits()`: the value a Montgomery multiplication
    /// in `working` must be congruent to.
    pub fn montgomery_product(&self, x: &BigUint, y: &BigUint, working: LimbBasis) -> BigUint {
        // N is odd, so R is always invertible.
        let r_inv = working
            .radix()
            .modinv(&self.value)
            .unwrap_or_else(BigUint::zero);
        (x * y % &self.value) * r_inv % &self.value
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Inverse of an odd word modulo `2^64` by Newton iteration.
///
/// `n * n ≡ 1 (mod 8)` for odd `n`, and every step doubles the number of correct low bits.
pub(crate) const fn inverse_mod_2_64(n: u64) -> u64 {
    let mut inv = n;
    let mut i = 0;
    while i < 5 {
        inv = inv.wrapping_mul(2u64.wrapping_sub(n.wrapping_mul(inv)));
        i += 1;
    }
    inv
}

#[cfg(test)]
mod tests {
    use super::{BN254_SCALAR, Modulus, SECP256K1_BASE, inverse_mod_2_64};
    use crate::{Error, LimbBasis};
    use num_bigint::BigUint;

    fn basis() -> LimbBasis {
        LimbBasis::new(64, 4).unwrap()
    }

    #[test]
    fn inverse_of_three() {
        assert_eq!(inverse_mod_2_64(3), 0xaaaaaaaaaaaaaaab);
        for n in [1u64, 3, 5, 0xffff_ffff_ffff_ffff, 0x1234_5678_9abc_def1] {
            assert_eq!(n.wrapping_mul(inverse_mod_2_64(n)), 1);
        }
    }

    #[test]
    fn bn254_constants() {
        let modulus = Modulus::bn254_scalar();
        assert_eq!(modulus.to_string(), BN254_SCALAR);
        assert_eq!(modulus.bits(), 254);
        assert_eq!(
            modulus.limbs(),
            [
                0x43e1f593f0000001,
                0x2833e84879b97091,
                0xb85045b68181585d,
                0x30644e72e131a029
            ]
        );
        // The well-known `r_inv` of the BN254 scalar field.
        assert_eq!(modulus.neg_inverse(), 0xc2e1f593efffffff);
        let limbs = modulus.limbs();
        assert_eq!(limbs[0].wrapping_mul(modulus.neg_inverse()), u64::MAX);
        assert_eq!(modulus.r_inv(29), 0xc2e1f593efffffff & 0x1fffffff);
    }

    #[test]
    fn full_width_modulus() {
        let secp = Modulus::parse(SECP256K1_BASE, basis()).unwrap();
        assert_eq!(secp.bits(), 256);
        assert_eq!(secp.limbs()[0], 0xfffffffefffffc2f);
        assert_eq!(secp.limbs()[0].wrapping_mul(secp.neg_inverse()), u64::MAX);
    }

    #[test]
    fn validation() {
        assert_eq!(
            Modulus::new(BigUint::from(0u8), basis()),
            Err(Error::ZeroModulus)
        );
        assert_eq!(
            Modulus::new(BigUint::from(10u8), basis()),
            Err(Error::EvenModulus)
        );
        let tiny = LimbBasis::new(8, 1).unwrap();
        assert_eq!(
            Modulus::new(BigUint::from(257u32), tiny),
            Err(Error::ModulusTooLarge {
                bits: 9,
                capacity: 8
            })
        );
        assert!(matches!(
            Modulus::parse("12z", basis()),
            Err(Error::InvalidModulus(_))
        ));
    }

    #[test]
    fn montgomery_product_undoes_the_radix() {
        let modulus = Modulus::bn254_scalar();
        let working = LimbBasis::new(29, 9).unwrap();
        let two = modulus.to_montgomery(&BigUint::from(2u8), working);
        let three = modulus.to_montgomery(&BigUint::from(3u8), working);
        assert_eq!(
            modulus.montgomery_product(&two, &three, working),
            modulus.to_montgomery(&BigUint::from(6u8), working)
        );
    }

    #[test]
    fn parse_hex() {
        let modulus = Modulus::parse("0xffffffffffffffc5", LimbBasis::new(64, 1).unwrap()).unwrap();
        assert_eq!(modulus.limbs(), [0xffffffffffffffc5]);
    }
}
