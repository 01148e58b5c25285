//! Grade-school multiply-accumulate.

use crate::ir::{Operand, ProgramBuilder, Slot};

/// `acc[i + j] += left[i] * right[j]` for every limb pair.
pub(super) fn emit(builder: &mut ProgramBuilder) {
    let k = builder.working().num_limbs();
    for i in 0..k {
        for j in 0..k {
            builder.accumulate(
                Slot::acc(i + j),
                Slot::limb(Operand::Left, i) * Slot::limb(Operand::Right, j),
            );
        }
    }
}
