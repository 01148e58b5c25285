//! Squaring.
//!
//! Output slot `r` of `left * left` is `sum_{i + j = r} left[i] left[j]`. Every off-diagonal
//! product appears twice, so it is computed once, summed into `cross` and added doubled; the
//! diagonal square (present for even `r`) is added directly.

use crate::ir::{Operand, ProgramBuilder, Slot, SlotKind};

/// Emit `left * left` into the accumulator. Only `left` needs to be declared.
pub fn emit(builder: &mut ProgramBuilder) {
    let k = builder.working().num_limbs();
    let left = |i: usize| Slot::limb(Operand::Left, i);
    let cross = Slot::scalar(SlotKind::Cross);
    builder.declare_uninit(cross);

    for r in 0..2 * k - 1 {
        let first = r.saturating_sub(k - 1);
        let pairs: Vec<usize> = (first..k).take_while(|&i| i < r - i).collect();

        if !pairs.is_empty() {
            builder.assign(cross, 0u64);
            for i in pairs.iter().copied() {
                builder.accumulate(cross, left(i) * left(r - i));
            }
        }
        if r % 2 == 0 {
            builder.accumulate(Slot::acc(r), left(r / 2) * left(r / 2));
        }
        if !pairs.is_empty() {
            builder.accumulate(Slot::acc(r), cross << 1);
        }
    }
}
