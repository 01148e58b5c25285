//! Double-width product generation.
//!
//! Every strategy accumulates the unreduced product of the working-basis `left` and `right`
//! limbs into accumulator slots `acc_0 .. acc_{2k-2}`, where slot `r` holds the sum of all
//! `left[i] * right[j]` with `i + j == r`. The strategies differ only in how many
//! multiplications they spend getting there.

mod karatsuba;
mod schoolbook;
mod square;
mod toom3;

pub use self::square::emit as emit_square;

use crate::{Error, LimbBasis, Result, ir::ProgramBuilder};
use core::fmt;

/// Multiplication strategy.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Strategy {
    /// Grade-school `O(k^2)` multiply-accumulate.
    Schoolbook,
    /// One level of Karatsuba over limb pairs.
    Karatsuba,
    /// One level of Toom-Cook-3 over limb triples.
    ToomCook3,
}

impl Strategy {
    /// Limb counts must be a multiple of this.
    pub const fn block(self) -> usize {
        match self {
            Strategy::Schoolbook => 1,
            Strategy::Karatsuba => 2,
            Strategy::ToomCook3 => 3,
        }
    }

    /// Largest intermediate value of the strategy, as a multiple of `(2^v - 1)^2` where `v` is
    /// the working limb width.
    ///
    /// Every strategy shares the accumulator bound: `k` product terms, `k` reduction terms and a
    /// carry per slot. Karatsuba additionally forms pair-sum products (`4x`); Toom-Cook-3 forms
    /// the product at `x = 2` of evaluations bounded by `7 (2^v - 1)` (`49x`).
    pub const fn growth(self, limbs: usize) -> usize {
        let accumulator = 2 * limbs + 2;
        let local = match self {
            Strategy::Schoolbook => 1,
            Strategy::Karatsuba => 4,
            Strategy::ToomCook3 => 49,
        };
        if accumulator > local { accumulator } else { local }
    }

    /// Check that `limbs` splits into whole blocks.
    pub fn check_limbs(self, limbs: usize) -> Result<()> {
        let multiple = self.block();
        if limbs % multiple != 0 {
            return Err(Error::LimbCount {
                strategy: self,
                limbs,
                multiple,
            });
        }
        Ok(())
    }

    /// Check that no intermediate value of this strategy can exceed a 64-bit word in `working`.
    pub fn check_headroom(self, working: LimbBasis) -> Result<()> {
        let limb_bits = working.limb_bits();
        let limbs = working.num_limbs();
        let fits = limb_bits < 32 && {
            let bound = (self.growth(limbs) as u128) << (2 * limb_bits);
            bound <= 1u128 << 64
        };
        if !fits {
            return Err(Error::InsufficientHeadroom {
                strategy: self,
                limbs,
                limb_bits,
            });
        }
        Ok(())
    }

    /// Emit the product of `left` and `right` into the accumulator.
    ///
    /// The working limbs and accumulator must already be declared, and
    /// [`Strategy::check_limbs`] must hold.
    pub fn emit(self, builder: &mut ProgramBuilder) {
        let limbs = builder.working().num_limbs();
        debug_assert!(self.check_limbs(limbs).is_ok());
        log::trace!("emitting {self} product over {limbs} limbs");
        match self {
            Strategy::Schoolbook => schoolbook::emit(builder),
            Strategy::Karatsuba => karatsuba::emit(builder),
            Strategy::ToomCook3 => toom3::emit(builder),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Schoolbook => "schoolbook",
            Strategy::Karatsuba => "karatsuba",
            Strategy::ToomCook3 => "toom-cook-3",
        })
    }
}
