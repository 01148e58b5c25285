//! One level of Karatsuba over limb pairs.
//!
//! Limbs `(x[2i], x[2i + 1])` form a two-limb block. For each pair of blocks the cross terms are
//! recovered from a single product of pair sums:
//!
//! ```text
//! left[2i] * right[2j + 1] + left[2i + 1] * right[2j] = left_sum[i] * right_sum[j] - low - high
//! ```
//!
//! trading one multiplication for two subtractions.

use crate::ir::{Operand, ProgramBuilder, Slot, SlotKind, Temp};

pub(super) fn emit(builder: &mut ProgramBuilder) {
    let blocks = builder.working().num_limbs() / 2;

    for operand in [Operand::Left, Operand::Right] {
        let sums = (0..blocks)
            .map(|i| Slot::limb(operand, 2 * i) + Slot::limb(operand, 2 * i + 1))
            .collect();
        builder.declare_array(SlotKind::PairSum(operand), sums);
    }

    let low = Slot::temp(Temp::Low);
    let high = Slot::temp(Temp::High);
    builder.declare_uninit(low);
    builder.declare_uninit(high);

    for i in 0..blocks {
        for j in 0..blocks {
            let base = 2 * (i + j);
            builder.assign(
                low,
                Slot::limb(Operand::Left, 2 * i) * Slot::limb(Operand::Right, 2 * j),
            );
            builder.assign(
                high,
                Slot::limb(Operand::Left, 2 * i + 1) * Slot::limb(Operand::Right, 2 * j + 1),
            );
            let middle = Slot::new(SlotKind::PairSum(Operand::Left), i)
                * Slot::new(SlotKind::PairSum(Operand::Right), j);
            builder.accumulate(Slot::acc(base), low);
            builder.accumulate(Slot::acc(base + 1), middle - low - high);
            builder.accumulate(Slot::acc(base + 2), high);
        }
    }
}
