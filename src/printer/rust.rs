//! Rust output over `u64`.
//!
//! Arithmetic is spelled with `wrapping_*` methods so the emitted code behaves identically in
//! debug and release builds. Inputs are `self.limbs`, `other.limbs`, a `MODULUS` array and an
//! `R_INV` constant.

use super::{Arithmetic, Printer, hex, render_expr};
use crate::ir::{Expr, Operand, Program, Slot, SlotKind, Statement};
use std::collections::BTreeSet;

/// Rust printer. Knows which slots the program writes after declaring them, so that only those
/// are bound with `let mut`.
#[derive(Clone, Debug, Default)]
pub struct RustPrinter {
    mutated: BTreeSet<Slot>,
}

impl RustPrinter {
    /// Printer for `program`.
    pub fn new(program: &Program) -> Self {
        let mutated = program
            .statements()
            .iter()
            .filter_map(|statement| match statement {
                Statement::Assign { slot, .. }
                | Statement::Accumulate { slot, .. }
                | Statement::Mask { slot, .. } => Some(*slot),
                _ => None,
            })
            .collect();
        Self { mutated }
    }

    fn expr(&self, expr: &Expr) -> String {
        render_expr(self, expr, Arithmetic::Wrapping)
    }

    fn list(&self, values: &[Expr]) -> String {
        let mut out = String::from("[\n");
        for value in values {
            out.push_str("    ");
            out.push_str(&self.expr(value));
            out.push_str(",\n");
        }
        out.push(']');
        out
    }
}

impl Printer for RustPrinter {
    fn slot(&self, slot: Slot) -> String {
        match slot.kind {
            SlotKind::Source(Operand::Left) => format!("self.limbs[{}]", slot.index),
            SlotKind::Source(Operand::Right) => format!("other.limbs[{}]", slot.index),
            SlotKind::Source(Operand::Modulus) => format!("MODULUS[{}]", slot.index),
            SlotKind::NegInverse => "R_INV".into(),
            _ => slot.to_string(),
        }
    }

    fn literal(&self, value: u64) -> String {
        format!("{}_u64", hex(value))
    }

    fn statement(&self, statement: &Statement) -> String {
        match statement {
            Statement::DeclareArray { kind, values } => {
                format!(
                    "let {}: [u64; {}] = {};",
                    kind.name(),
                    values.len(),
                    self.list(values)
                )
            }
            Statement::Declare { slot, value } => {
                let name = self.slot(*slot);
                match value {
                    Some(value) if self.mutated.contains(slot) => {
                        format!("let mut {name}: u64 = {};", self.expr(value))
                    }
                    Some(value) => format!("let {name}: u64 = {};", self.expr(value)),
                    None => format!("let mut {name}: u64;"),
                }
            }
            Statement::Assign { slot, value } => {
                format!("{} = {};", self.slot(*slot), self.expr(value))
            }
            Statement::Accumulate { slot, value } => {
                let name = self.slot(*slot);
                format!("{name} = {name}.wrapping_add({});", self.expr(value))
            }
            Statement::Mask { slot, mask } => {
                format!("{} &= {};", self.slot(*slot), self.expr(mask))
            }
            Statement::Return(values) => self.list(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Generator, GeneratorConfig, Operation, printer::Language};

    fn bn254(operation: Operation) -> String {
        let config = GeneratorConfig::new(64, 4, 29).unwrap().canonical(true);
        Language::Rust.render(&Generator::new(config).generate(operation).unwrap())
    }

    #[test]
    fn inputs_and_bindings() {
        let out = bn254(Operation::Mul);
        assert!(out.starts_with("let mask: u64 = 0x1fffffff_u64;\nlet r_inv: u64 = R_INV & mask;\n"));
        assert!(out.contains("    (self.limbs[0] >> 29) & 0x1fffffff_u64,\n"));
        assert!(out.contains("    (other.limbs[3] >> 40) & 0xffffff_u64,\n"));
        assert!(out.contains("let mut temp_0: u64 = 0_u64;"));
        assert!(out.contains("let mut k: u64;"));
        assert!(out.contains("let r_temp_0: u64 = temp_9.wrapping_sub(modulus_limbs[0]);"));
    }

    #[test]
    fn wrapping_arithmetic() {
        let out = bn254(Operation::Mul);
        assert!(out.contains("temp_0 = temp_0.wrapping_add(left[0].wrapping_mul(right[0]));"));
        assert!(out.contains("k = temp_0.wrapping_mul(r_inv) & mask;"));
        assert!(out.contains(
            "temp_1 = temp_1.wrapping_add(k.wrapping_mul(modulus_limbs[1]).wrapping_add(temp_0 >> 29));"
        ));
        assert!(out.contains("let new_mask: u64 = 0_u64.wrapping_sub(r_temp_8 >> 63);"));
        assert!(out.contains("let inverse_mask: u64 = (!new_mask) & mask;"));
        assert!(out.ends_with("    (temp_15 >> 18) | (temp_16 << 11) | (temp_17 << 40),\n]\n"));
    }

    #[test]
    fn karatsuba_middle_term() {
        let config = GeneratorConfig::new(64, 4, 22).unwrap();
        let out = Language::Rust.render(
            &Generator::new(config)
                .generate(Operation::KaratsubaMul)
                .unwrap(),
        );
        assert!(out.contains(
            "temp_1 = temp_1.wrapping_add(left_sum[0].wrapping_mul(right_sum[0]).wrapping_sub(low).wrapping_sub(high));"
        ));
    }
}
