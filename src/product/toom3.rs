//! One level of Toom-Cook-3 over limb triples.
//!
//! Each triple `(x[3g], x[3g + 1], x[3g + 2])` is read as the polynomial
//! `x0 + x1 t + x2 t^2`. A pair of triples is multiplied by evaluating both polynomials at
//! `t ∈ {0, 1, -1, 2, ∞}`, multiplying pointwise and interpolating the five coefficients
//! `c0 .. c4` of the product:
//!
//! ```text
//! c0 = p(0)
//! c4 = p(∞)
//! c2 = (p(1) + p(-1)) / 2 - c0 - c4
//! t  = (p(2) - p(-1)) / 3            = c1 + c2 + 3 c3 + 5 c4
//! o  = (p(1) - p(-1)) / 2            = c1 + c3
//! c3 = (t - c2 - o - 4 c4 - c4) / 2
//! c1 = o - c3
//! ```
//!
//! Each division is applied to a quantity whose integer value is a non-negative multiple of the
//! divisor and fits a word, so a logical shift (or the multiplication by `3^-1 mod 2^64`) is
//! exact even though `p(-1)` and the intermediate differences may have wrapped.

use crate::ir::{Operand, Point, ProgramBuilder, Slot, SlotKind, Temp};

/// `3^-1 mod 2^64`
pub(crate) const INV3: u64 = 0xaaaa_aaaa_aaaa_aaab;

fn eval(operand: Operand, point: Point, group: usize) -> Slot {
    Slot::new(SlotKind::Eval(operand, point), group)
}

pub(super) fn emit(builder: &mut ProgramBuilder) {
    let groups = builder.working().num_limbs() / 3;

    for operand in [Operand::Left, Operand::Right] {
        let x = |g: usize, m: usize| Slot::limb(operand, 3 * g + m);
        let one = (0..groups).map(|g| x(g, 0) + x(g, 1) + x(g, 2)).collect();
        let neg = (0..groups).map(|g| x(g, 0) + x(g, 2) - x(g, 1)).collect();
        let two = (0..groups)
            .map(|g| x(g, 0) + (x(g, 1) << 1) + (x(g, 2) << 2))
            .collect();
        builder.declare_array(SlotKind::Eval(operand, Point::One), one);
        builder.declare_array(SlotKind::Eval(operand, Point::NegOne), neg);
        builder.declare_array(SlotKind::Eval(operand, Point::Two), two);
    }

    let p0 = Slot::temp(Temp::AtZero);
    let p1 = Slot::temp(Temp::AtOne);
    let pm = Slot::temp(Temp::AtNegOne);
    let p2 = Slot::temp(Temp::AtTwo);
    let pinf = Slot::temp(Temp::AtInfinity);
    let third = Slot::temp(Temp::Third);
    let odd = Slot::temp(Temp::OddSum);
    let c1 = Slot::temp(Temp::Coeff(1));
    let c2 = Slot::temp(Temp::Coeff(2));
    let c3 = Slot::temp(Temp::Coeff(3));
    for slot in [p0, p1, pm, p2, pinf, third, odd, c1, c2, c3] {
        builder.declare_uninit(slot);
    }

    let left = |m: usize| Slot::limb(Operand::Left, m);
    let right = |m: usize| Slot::limb(Operand::Right, m);

    for g in 0..groups {
        for h in 0..groups {
            let base = 3 * (g + h);

            builder.assign(p0, left(3 * g) * right(3 * h));
            builder.assign(
                p1,
                eval(Operand::Left, Point::One, g) * eval(Operand::Right, Point::One, h),
            );
            builder.assign(
                pm,
                eval(Operand::Left, Point::NegOne, g) * eval(Operand::Right, Point::NegOne, h),
            );
            builder.assign(
                p2,
                eval(Operand::Left, Point::Two, g) * eval(Operand::Right, Point::Two, h),
            );
            builder.assign(pinf, left(3 * g + 2) * right(3 * h + 2));

            builder.assign(c2, ((p1 + pm) >> 1) - p0 - pinf);
            builder.assign(third, (p2 - pm) * INV3);
            builder.assign(odd, (p1 - pm) >> 1);
            builder.assign(c3, (third - c2 - odd - (pinf << 2) - pinf) >> 1);
            builder.assign(c1, odd - c3);

            builder.accumulate(Slot::acc(base), p0);
            builder.accumulate(Slot::acc(base + 1), c1);
            builder.accumulate(Slot::acc(base + 2), c2);
            builder.accumulate(Slot::acc(base + 3), c3);
            builder.accumulate(Slot::acc(base + 4), pinf);
        }
    }
}
