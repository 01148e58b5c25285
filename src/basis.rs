//! Limb bases: how a multi-word integer is split into fixed-width limbs.

use crate::{Error, Result};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Largest limb width, in bits, of any basis.
pub const MAX_LIMB_BITS: u32 = 64;

/// A decomposition of an integer into `num_limbs` limbs of `limb_bits` bits each, least
/// significant limb first.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LimbBasis {
    limb_bits: u32,
    num_limbs: usize,
}

impl LimbBasis {
    /// Create a new basis.
    pub fn new(limb_bits: u32, num_limbs: usize) -> Result<Self> {
        if limb_bits == 0 || limb_bits > MAX_LIMB_BITS {
            return Err(Error::InvalidLimbBits {
                bits: limb_bits,
                max: MAX_LIMB_BITS,
            });
        }
        if num_limbs == 0 {
            return Err(Error::EmptyBasis);
        }
        if u32::try_from(num_limbs)
            .ok()
            .and_then(|n| limb_bits.checked_mul(n))
            .is_none()
        {
            return Err(Error::BasisTooLarge {
                limb_bits,
                num_limbs,
            });
        }
        Ok(Self {
            limb_bits,
            num_limbs,
        })
    }

    /// Smallest basis of `limb_bits`-wide limbs able to hold `bits` bits.
    pub fn covering(bits: u32, limb_bits: u32) -> Result<Self> {
        if limb_bits == 0 || limb_bits > MAX_LIMB_BITS {
            return Err(Error::InvalidLimbBits {
                bits: limb_bits,
                max: MAX_LIMB_BITS,
            });
        }
        Self::new(limb_bits, bits.div_ceil(limb_bits) as usize)
    }

    /// Width of each limb.
    pub const fn limb_bits(&self) -> u32 {
        self.limb_bits
    }

    /// Number of limbs.
    pub const fn num_limbs(&self) -> usize {
        self.num_limbs
    }

    /// Total number of bits represented; fits a `u32` for every valid basis.
    pub const fn bits(&self) -> u32 {
        self.limb_bits * self.num_limbs as u32
    }

    /// Mask selecting the low `limb_bits` bits of a word.
    pub const fn mask(&self) -> u64 {
        low_mask(self.limb_bits)
    }

    /// Decompose `value` into limbs, discarding any bits above [`LimbBasis::bits`].
    pub fn to_limbs(&self, value: &BigUint) -> Vec<u64> {
        let mask = BigUint::from(self.mask());
        (0..self.num_limbs)
            .map(|i| {
                let limb = (value >> (i * self.limb_bits as usize)) & &mask;
                limb.iter_u64_digits().next().unwrap_or(0)
            })
            .collect()
    }

    /// Recompose an integer from limbs.
    ///
    /// Limbs may be relaxed, i.e. exceed `limb_bits` bits; each is weighted by
    /// `2^(i * limb_bits)` and summed.
    pub fn from_limbs(&self, limbs: &[u64]) -> BigUint {
        limbs
            .iter()
            .enumerate()
            .fold(BigUint::zero(), |acc, (i, &limb)| {
                acc + (BigUint::from(limb) << (i * self.limb_bits as usize))
            })
    }

    /// `2^bits()`, the Montgomery radix when this is the working basis.
    pub fn radix(&self) -> BigUint {
        BigUint::one() << self.bits() as usize
    }
}

/// Mask selecting the low `bits` bits of a word.
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1 << bits) - 1 }
}

#[cfg(test)]
mod tests {
    use super::{LimbBasis, low_mask};
    use crate::Error;
    use num_bigint::BigUint;

    #[test]
    fn covering_rounds_up() {
        let basis = LimbBasis::covering(256, 29).unwrap();
        assert_eq!(basis.num_limbs(), 9);
        assert_eq!(basis.bits(), 261);

        let basis = LimbBasis::covering(256, 32).unwrap();
        assert_eq!(basis.num_limbs(), 8);
    }

    #[test]
    fn rejects_bad_widths() {
        assert_eq!(
            LimbBasis::new(0, 4),
            Err(Error::InvalidLimbBits { bits: 0, max: 64 })
        );
        assert_eq!(
            LimbBasis::new(65, 4),
            Err(Error::InvalidLimbBits { bits: 65, max: 64 })
        );
        assert_eq!(LimbBasis::new(29, 0), Err(Error::EmptyBasis));
    }

    #[test]
    fn rejects_oversized_bases() {
        assert_eq!(
            LimbBasis::new(64, 70_000_000),
            Err(Error::BasisTooLarge {
                limb_bits: 64,
                num_limbs: 70_000_000
            })
        );
        assert_eq!(
            LimbBasis::new(2, usize::MAX),
            Err(Error::BasisTooLarge {
                limb_bits: 2,
                num_limbs: usize::MAX
            })
        );
        let largest = LimbBasis::new(64, (u32::MAX / 64) as usize).unwrap();
        assert_eq!(largest.bits(), u32::MAX / 64 * 64);
    }

    #[test]
    fn masks() {
        assert_eq!(low_mask(29), 0x1fffffff);
        assert_eq!(low_mask(64), u64::MAX);
        assert_eq!(LimbBasis::new(6, 1).unwrap().mask(), 0x3f);
    }

    #[test]
    fn limbs_roundtrip() {
        let basis = LimbBasis::new(29, 9).unwrap();
        let value = BigUint::parse_bytes(b"deadbeefcafebabe0123456789abcdef", 16).unwrap();
        let limbs = basis.to_limbs(&value);
        assert_eq!(limbs.len(), 9);
        assert!(limbs.iter().all(|&l| l <= basis.mask()));
        assert_eq!(basis.from_limbs(&limbs), value);
    }

    #[test]
    fn relaxed_limbs_are_summed() {
        let basis = LimbBasis::new(4, 2).unwrap();
        // 0x1f + (0x1 << 4)
        assert_eq!(basis.from_limbs(&[0x1f, 0x1]), BigUint::from(0x2fu32));
    }
}
