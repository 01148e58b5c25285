//! Rendering of programs as source text.

mod cpp;
mod rust;

pub use self::{cpp::CppPrinter, rust::RustPrinter};

use crate::{
    Error, Result,
    ir::{Expr, Precedence, Program, Slot, Statement},
};
use core::{fmt, str::FromStr};

/// Renders a [`Program`] in some target language.
pub trait Printer {
    /// Spelling of a single-word slot.
    fn slot(&self, slot: Slot) -> String;

    /// Spelling of a literal.
    fn literal(&self, value: u64) -> String;

    /// Render one statement. Multi-line statements use `\n` separators without a trailing one.
    fn statement(&self, statement: &Statement) -> String;

    /// Render a whole program, one statement per line.
    fn render(&self, program: &Program) -> String {
        let mut out = String::new();
        for statement in program.statements() {
            out.push_str(&self.statement(statement));
            out.push('\n');
        }
        out
    }
}

/// Output language.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Language {
    /// C++ over `uint64_t`.
    #[default]
    Cpp,
    /// Rust over `u64` with explicit wrapping arithmetic.
    Rust,
}

impl Language {
    /// Render `program` in this language.
    pub fn render(self, program: &Program) -> String {
        match self {
            Language::Cpp => CppPrinter.render(program),
            Language::Rust => RustPrinter::new(program).render(program),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Cpp => "cpp",
            Language::Rust => "rust",
        })
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cpp" | "c++" => Ok(Language::Cpp),
            "rust" | "rs" => Ok(Language::Rust),
            _ => Err(Error::UnknownLanguage(s.to_owned())),
        }
    }
}

/// How `+`, `-` and `*` are spelled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Arithmetic {
    /// Infix operators on a type which wraps natively.
    Infix,
    /// `a.wrapping_add(b)` method calls.
    Wrapping,
}

/// Infix rendering shared by the C-family printers.
///
/// Operands of bitwise operators and shifts are always parenthesized unless they are atoms or a
/// left-hand chain of the same operator, so the output never relies on the precedence of `&`
/// and `|` relative to arithmetic.
fn render_expr(printer: &impl Printer, expr: &Expr, arithmetic: Arithmetic) -> String {
    render(printer, expr, arithmetic).0
}

fn render(printer: &impl Printer, expr: &Expr, arithmetic: Arithmetic) -> (String, Precedence) {
    let binary = |a: &Expr, b: &Expr, op: &str, prec: Precedence| {
        let lhs = operand(printer, a, arithmetic, prec, Side::Left);
        let rhs = operand(printer, b, arithmetic, prec, Side::Right);
        (format!("{lhs} {op} {rhs}"), prec)
    };
    let method = |a: &Expr, b: &Expr, name: &str| {
        let receiver = operand(printer, a, arithmetic, Precedence::Atom, Side::Left);
        let argument = render(printer, b, arithmetic).0;
        (format!("{receiver}.{name}({argument})"), Precedence::Atom)
    };

    match (expr, arithmetic) {
        (Expr::Const(value), _) => (printer.literal(*value), Precedence::Atom),
        (Expr::Slot(slot), _) => (printer.slot(*slot), Precedence::Atom),
        (Expr::Add(a, b), Arithmetic::Infix) => binary(a, b, "+", Precedence::Additive),
        (Expr::Sub(a, b), Arithmetic::Infix) => binary(a, b, "-", Precedence::Additive),
        (Expr::Mul(a, b), Arithmetic::Infix) => binary(a, b, "*", Precedence::Multiplicative),
        (Expr::Add(a, b), Arithmetic::Wrapping) => method(a, b, "wrapping_add"),
        (Expr::Sub(a, b), Arithmetic::Wrapping) => method(a, b, "wrapping_sub"),
        (Expr::Mul(a, b), Arithmetic::Wrapping) => method(a, b, "wrapping_mul"),
        (Expr::And(a, b), _) => binary(a, b, "&", Precedence::And),
        (Expr::Or(a, b), _) => binary(a, b, "|", Precedence::Or),
        (Expr::Shl(a, shift), _) => {
            let lhs = operand(printer, a, arithmetic, Precedence::Shift, Side::Left);
            (format!("{lhs} << {shift}"), Precedence::Shift)
        }
        (Expr::Shr(a, shift), _) => {
            let lhs = operand(printer, a, arithmetic, Precedence::Shift, Side::Left);
            (format!("{lhs} >> {shift}"), Precedence::Shift)
        }
        (Expr::Not(a), _) => {
            let complement = match arithmetic {
                Arithmetic::Infix => '~',
                Arithmetic::Wrapping => '!',
            };
            let inner = operand(printer, a, arithmetic, Precedence::Unary, Side::Right);
            (format!("{complement}{inner}"), Precedence::Unary)
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Side {
    Left,
    Right,
}

fn operand(
    printer: &impl Printer,
    expr: &Expr,
    arithmetic: Arithmetic,
    parent: Precedence,
    side: Side,
) -> String {
    let (text, prec) = render(printer, expr, arithmetic);
    let bitwise = matches!(parent, Precedence::Or | Precedence::And | Precedence::Shift);
    let chain = prec == parent && side == Side::Left && parent != Precedence::Shift;
    let parens = if prec == Precedence::Atom || chain {
        false
    } else {
        bitwise || prec < parent || (prec == parent && side == Side::Right) || parent == Precedence::Unary
    };
    if parens { format!("({text})") } else { text }
}

/// Lowercase hexadecimal for anything that is not a small count.
fn hex(value: u64) -> String {
    if value < 10 {
        value.to_string()
    } else {
        format!("{value:#x}")
    }
}

#[cfg(test)]
mod tests {
    use super::Language;
    use crate::Error;

    #[test]
    fn parse_language() {
        assert_eq!("cpp".parse::<Language>(), Ok(Language::Cpp));
        assert_eq!("rust".parse::<Language>(), Ok(Language::Rust));
        assert_eq!(
            "go".parse::<Language>(),
            Err(Error::UnknownLanguage("go".into()))
        );
        assert_eq!(Language::default().to_string(), "cpp");
    }
}
