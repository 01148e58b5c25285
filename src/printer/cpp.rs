//! C++ output over `uint64_t`, in the shape of a `field<T>` member function body.

use super::{Arithmetic, Printer, hex, render_expr};
use crate::ir::{Expr, Slot, Statement};

/// Renders statements for a `field<T>` member taking `other` and reading `modulus` and
/// `T::r_inv`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CppPrinter;

impl CppPrinter {
    fn expr(&self, expr: &Expr) -> String {
        render_expr(self, expr, Arithmetic::Infix)
    }

    /// `{ a,\n<indent>b }` with continuation lines aligned after the opening brace.
    fn braced(&self, values: &[Expr], indent: usize) -> String {
        let separator = format!(",\n{}", " ".repeat(indent + 2));
        let items: Vec<String> = values.iter().map(|value| self.expr(value)).collect();
        format!("{{ {} }}", items.join(&separator))
    }
}

impl Printer for CppPrinter {
    fn slot(&self, slot: Slot) -> String {
        slot.to_string()
    }

    fn literal(&self, value: u64) -> String {
        if value > u64::from(u32::MAX) {
            format!("{}ULL", hex(value))
        } else {
            hex(value)
        }
    }

    fn statement(&self, statement: &Statement) -> String {
        match statement {
            Statement::DeclareArray { kind, values } => {
                let qualifier = if kind.is_constant() { "constexpr " } else { "" };
                let head = format!("{qualifier}uint64_t {}[{}] = ", kind.name(), values.len());
                let body = self.braced(values, head.len());
                format!("{head}{body};")
            }
            Statement::Declare { slot, value } => {
                let qualifier = if slot.kind.is_constant() { "constexpr " } else { "" };
                match value {
                    Some(value) => format!("{qualifier}uint64_t {slot} = {};", self.expr(value)),
                    None => format!("uint64_t {slot};"),
                }
            }
            Statement::Assign { slot, value } => format!("{slot} = {};", self.expr(value)),
            Statement::Accumulate { slot, value } => format!("{slot} += {};", self.expr(value)),
            Statement::Mask { slot, mask } => format!("{slot} &= {};", self.expr(mask)),
            Statement::Return(values) => format!("return {};", self.braced(values, 7)),
        }
    }
}
