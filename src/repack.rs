//! Conversion between the original and working limb bases.
//!
//! [`split`] re-expresses an original-basis value as working limbs and [`join`] reassembles
//! working limbs into original limbs. Both are exact: every bit of the value lands in exactly one
//! limb of the destination basis.

use crate::{
    LimbBasis,
    basis::low_mask,
    ir::{Expr, Operand, ProgramBuilder, Slot, SlotKind},
};

/// Expression for working limb `index` of `operand`, read from its original-basis limbs.
///
/// The limb covers bits `[index * v, (index + 1) * v)` of the value clipped to the original
/// basis length. Each source limb it overlaps contributes a shifted and masked piece; the pieces
/// are OR-ed together.
pub fn split_limb(original: LimbBasis, working: LimbBasis, operand: Operand, index: usize) -> Expr {
    let width = original.limb_bits() as usize;
    let total = original.bits() as usize;
    let lo = index * working.limb_bits() as usize;
    let hi = (lo + working.limb_bits() as usize).min(total);

    let mut pieces = Vec::new();
    let mut bit = lo;
    while bit < hi {
        let j = bit / width;
        let offset = bit % width;
        let take = (width - offset).min(hi - bit);

        let mut piece = Expr::from(Slot::source(operand, j));
        if offset > 0 {
            piece = piece >> offset as u32;
        }
        if take < 64 {
            piece = piece & low_mask(take as u32);
        }
        if bit > lo {
            piece = piece << (bit - lo) as u32;
        }
        pieces.push(piece);
        bit += take;
    }

    Expr::or_all(pieces)
}

/// Declare the working-basis array of `operand`.
pub fn split(builder: &mut ProgramBuilder, operand: Operand) {
    let (original, working) = (builder.original(), builder.working());
    let values = (0..working.num_limbs())
        .map(|i| split_limb(original, working, operand, i))
        .collect();
    builder.declare_array(SlotKind::Limb(operand), values);
}

/// Expressions for every original-basis limb of a value held in working limbs.
///
/// `limb(i)` yields working limb `i`. All limbs but the last must be bounded to the working limb
/// width; the last may hold every remaining high bit.
pub fn join(
    original: LimbBasis,
    working: LimbBasis,
    limb: impl Fn(usize) -> Expr,
) -> Vec<Expr> {
    let width = original.limb_bits() as usize;
    let v = working.limb_bits() as usize;
    let top = working.num_limbs() - 1;

    (0..original.num_limbs())
        .map(|j| {
            let start = j * width;
            let end = start + width;
            let terms = (0..working.num_limbs()).filter_map(|i| {
                let lo = i * v;
                let hi = if i == top { usize::MAX } else { lo + v };
                if hi <= start || lo >= end {
                    return None;
                }
                if lo >= start {
                    let shift = (lo - start) as u32;
                    Some(if shift == 0 { limb(i) } else { limb(i) << shift })
                } else {
                    let shift = start - lo;
                    (shift < 64).then(|| limb(i) >> shift as u32)
                }
            });
            let packed = Expr::or_all(terms);
            if width < 64 {
                packed & low_mask(width as u32)
            } else {
                packed
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{join, split_limb};
    use crate::{
        LimbBasis,
        ir::{Expr, Operand, Slot, SlotKind},
    };
    use core::convert::Infallible;

    fn bases() -> (LimbBasis, LimbBasis) {
        (LimbBasis::new(64, 4).unwrap(), LimbBasis::new(29, 9).unwrap())
    }

    fn eval(expr: &Expr, limbs: &[u64]) -> u64 {
        expr.eval(&mut |slot: Slot| -> Result<u64, Infallible> { Ok(limbs[slot.index]) })
            .unwrap()
    }

    #[test]
    fn single_source_limb() {
        let (original, working) = bases();
        let expected = (Slot::source(Operand::Left, 0) >> 29) & 0x1fffffffu64;
        assert_eq!(split_limb(original, working, Operand::Left, 1), expected);

        let first = Slot::source(Operand::Left, 0) & 0x1fffffffu64;
        assert_eq!(split_limb(original, working, Operand::Left, 0), first);
    }

    #[test]
    fn straddles_two_source_limbs() {
        let (original, working) = bases();
        // bits 58..87: six bits of limb 0 and twenty-three of limb 1
        let expected = ((Slot::source(Operand::Right, 0) >> 58) & 0x3fu64)
            | ((Slot::source(Operand::Right, 1) & 0x7fffffu64) << 6);
        assert_eq!(split_limb(original, working, Operand::Right, 2), expected);
    }

    #[test]
    fn last_limb_is_clipped() {
        let (original, working) = bases();
        // bits 232..256
        let expected = (Slot::source(Operand::Modulus, 3) >> 40) & 0xffffffu64;
        assert_eq!(split_limb(original, working, Operand::Modulus, 8), expected);
    }

    #[test]
    fn limbs_beyond_the_value_are_zero() {
        let original = LimbBasis::new(64, 1).unwrap();
        let working = LimbBasis::new(16, 6).unwrap();
        assert_eq!(split_limb(original, working, Operand::Left, 5), Expr::Const(0));
    }

    #[test]
    fn narrow_source_limbs() {
        // Each 16-bit working limb spans three 6-bit source limbs.
        let original = LimbBasis::new(6, 8).unwrap();
        let working = LimbBasis::covering(original.bits(), 16).unwrap();
        let source = [0x3f, 0x01, 0x2a, 0x15, 0x00, 0x3f, 0x10, 0x07];
        let value = original.from_limbs(&source);
        let limbs: Vec<u64> = (0..working.num_limbs())
            .map(|i| eval(&split_limb(original, working, Operand::Left, i), &source))
            .collect();
        assert_eq!(working.from_limbs(&limbs), value);
    }

    #[test]
    fn join_matches_packing_of_9x29() {
        let (original, working) = bases();
        let acc = |i: usize| Expr::from(Slot::new(SlotKind::Acc, 9 + i));
        let packed = join(original, working, acc);
        assert_eq!(packed.len(), 4);
        let expected = Expr::from(Slot::acc(9)) | (Slot::acc(10) << 29) | (Slot::acc(11) << 58);
        assert_eq!(packed[0], expected);
        let expected = (Slot::acc(11) >> 6) | (Slot::acc(12) << 23) | (Slot::acc(13) << 52);
        assert_eq!(packed[1], expected);
        let expected = (Slot::acc(15) >> 18) | (Slot::acc(16) << 11) | (Slot::acc(17) << 40);
        assert_eq!(packed[3], expected);
    }
}
