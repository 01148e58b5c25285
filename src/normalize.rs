//! Carry propagation and the optional final subtraction.

use crate::ir::{Expr, Operand, ProgramBuilder, Slot, SlotKind, Temp};

/// Propagate carries through the upper half of the accumulator.
///
/// Afterwards `acc[k .. 2k-1]` are bounded by the limb mask; `acc[2k-1]` keeps every remaining
/// high bit.
pub fn emit(builder: &mut ProgramBuilder) {
    let k = builder.working().num_limbs();
    let v = builder.working().limb_bits();
    for r in k..2 * k - 1 {
        builder.accumulate(Slot::acc(r + 1), Slot::acc(r) >> v);
        builder.mask(Slot::acc(r));
    }
}

/// Subtract the modulus once if the normalized result is at least the modulus.
///
/// Selection is branch-free: the borrow out of the trial subtraction becomes an all-ones or
/// all-zeros mask. The result is canonical whenever the input is below `2N`.
pub fn emit_canonical(builder: &mut ProgramBuilder) {
    let k = builder.working().num_limbs();
    let diff = |i: usize| Slot::new(SlotKind::Difference, i);
    let modulus = |i: usize| Slot::limb(Operand::Modulus, i);
    let keep = Slot::temp(Temp::Keep);
    let take = Slot::temp(Temp::Take);

    log::trace!("emitting final subtraction over {k} limbs");
    builder.mark_canonical();
    builder.declare(diff(0), Slot::acc(k) - modulus(0));
    for i in 1..k {
        builder.declare(diff(i), Slot::acc(k + i) - modulus(i) - (diff(i - 1) >> 63));
    }
    builder.declare(keep, Expr::from(0u64) - (diff(k - 1) >> 63));
    builder.declare(take, !Expr::from(keep) & Slot::scalar(SlotKind::Mask));
    for i in 0..k {
        builder.assign(Slot::acc(k + i), (Slot::acc(k + i) & keep) | (diff(i) & take));
    }
}
