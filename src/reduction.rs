//! Limb-wise Montgomery reduction.
//!
//! Step `i` picks `q = acc[i] * r_inv mod 2^v`, which makes `acc[i] + q * N` divisible by `2^v`,
//! adds `q * N` at offset `i` and carries the (now zero-padded) low slot into the next one. After
//! `k` steps the low `k` slots are dead and `acc[k..]` holds `acc * 2^{-vk} mod N` in relaxed
//! form.

use crate::ir::{Operand, ProgramBuilder, Slot, SlotKind};

/// Emit the reduction of `acc[0 .. 2k]`.
///
/// Expects `mask`, `r_inv` and the working modulus limbs to be declared.
pub fn emit(builder: &mut ProgramBuilder) {
    let k = builder.working().num_limbs();
    let v = builder.working().limb_bits();
    let q = Slot::scalar(SlotKind::Quotient);
    let mask = Slot::scalar(SlotKind::Mask);
    let r_inv = Slot::scalar(SlotKind::RInv);
    let modulus = |j: usize| Slot::limb(Operand::Modulus, j);

    log::trace!("emitting montgomery reduction over {k} limbs");
    builder.declare_uninit(q);
    for i in 0..k {
        builder.assign(q, (Slot::acc(i) * r_inv) & mask);
        for j in 0..k {
            let term = q * modulus(j);
            if j == 1 {
                builder.accumulate(Slot::acc(i + 1), term + (Slot::acc(i) >> v));
            } else {
                builder.accumulate(Slot::acc(i + j), term);
            }
        }
        if k == 1 {
            builder.accumulate(Slot::acc(i + 1), Slot::acc(i) >> v);
        }
    }
}
