//! Straight-line intermediate representation of generated routines.
//!
//! A [`Program`] is an ordered list of [`Statement`]s over symbolic [`Slot`]s. It has no
//! control flow: every statement executes exactly once, in order.

mod expr;
mod slot;

pub use self::{
    expr::{Expr, Precedence},
    slot::{Operand, Point, Slot, SlotKind, Temp},
};

use crate::{LimbBasis, Operation};

/// A single straight-line statement.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Statement {
    /// Declare the array `kind` with one initializer per element.
    DeclareArray {
        /// Array being declared; element `i` is `Slot::new(kind, i)`.
        kind: SlotKind,
        /// Element initializers.
        values: Vec<Expr>,
    },
    /// Declare a single-word slot, optionally initialized.
    Declare {
        /// Slot being declared.
        slot: Slot,
        /// Initial value.
        value: Option<Expr>,
    },
    /// `slot = value`
    Assign {
        /// Destination.
        slot: Slot,
        /// New value.
        value: Expr,
    },
    /// `slot += value` (multiply-accumulate when `value` is a product).
    Accumulate {
        /// Destination.
        slot: Slot,
        /// Addend.
        value: Expr,
    },
    /// `slot &= mask`
    Mask {
        /// Destination.
        slot: Slot,
        /// Mask operand.
        mask: Expr,
    },
    /// Return the original-basis limbs of the result.
    Return(Vec<Expr>),
}

/// A complete generated routine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Program {
    operation: Operation,
    original: LimbBasis,
    working: LimbBasis,
    modulus_bits: u32,
    canonical: bool,
    statements: Vec<Statement>,
}

impl Program {
    /// Operation this program implements.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Basis of the inputs and of the returned limbs.
    pub fn original(&self) -> LimbBasis {
        self.original
    }

    /// Basis the arithmetic is carried out in.
    pub fn working(&self) -> LimbBasis {
        self.working
    }

    /// Largest bit length of a modulus this program may be run with.
    pub fn modulus_bits(&self) -> u32 {
        self.modulus_bits
    }

    /// Whether the result is fully reduced below the modulus.
    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// Statements in execution order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Number of statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether the program has no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Count of wrapping multiplications performed, excluding multiplications by constants.
    pub fn multiplications(&self) -> usize {
        fn count(expr: &Expr) -> usize {
            match expr {
                Expr::Const(_) | Expr::Slot(_) => 0,
                Expr::Mul(a, b) => {
                    let own = usize::from(
                        !matches!(**a, Expr::Const(_)) && !matches!(**b, Expr::Const(_)),
                    );
                    own + count(a) + count(b)
                }
                Expr::Add(a, b) | Expr::Sub(a, b) | Expr::And(a, b) | Expr::Or(a, b) => {
                    count(a) + count(b)
                }
                Expr::Shl(a, _) | Expr::Shr(a, _) | Expr::Not(a) => count(a),
            }
        }

        self.statements
            .iter()
            .map(|statement| match statement {
                Statement::DeclareArray { values, .. } | Statement::Return(values) => {
                    values.iter().map(count).sum()
                }
                Statement::Declare { value, .. } => value.as_ref().map_or(0, count),
                Statement::Assign { value, .. }
                | Statement::Accumulate { value, .. }
                | Statement::Mask { mask: value, .. } => count(value),
            })
            .sum()
    }
}

/// Accumulates statements for a [`Program`].
#[derive(Debug)]
pub struct ProgramBuilder {
    operation: Operation,
    original: LimbBasis,
    working: LimbBasis,
    modulus_bits: u32,
    canonical: bool,
    statements: Vec<Statement>,
}

impl ProgramBuilder {
    /// Start an empty program, valid for any modulus fitting `original`.
    pub fn new(operation: Operation, original: LimbBasis, working: LimbBasis) -> Self {
        Self {
            operation,
            original,
            working,
            modulus_bits: original.bits(),
            canonical: false,
            statements: Vec::new(),
        }
    }

    /// Only allow moduli of at most `bits` bits.
    pub fn limit_modulus_bits(&mut self, bits: u32) {
        self.modulus_bits = self.modulus_bits.min(bits);
    }

    /// Record that the emitted statements fully reduce the result.
    pub fn mark_canonical(&mut self) {
        self.canonical = true;
    }

    /// Basis of the inputs.
    pub fn original(&self) -> LimbBasis {
        self.original
    }

    /// Working basis.
    pub fn working(&self) -> LimbBasis {
        self.working
    }

    /// Declare an array.
    pub fn declare_array(&mut self, kind: SlotKind, values: Vec<Expr>) {
        debug_assert!(kind.is_array() && !kind.is_input());
        self.statements
            .push(Statement::DeclareArray { kind, values });
    }

    /// Declare and initialize a word.
    pub fn declare(&mut self, slot: Slot, value: impl Into<Expr>) {
        self.statements.push(Statement::Declare {
            slot,
            value: Some(value.into()),
        });
    }

    /// Declare a word without initializing it.
    pub fn declare_uninit(&mut self, slot: Slot) {
        self.statements
            .push(Statement::Declare { slot, value: None });
    }

    /// `slot = value`
    pub fn assign(&mut self, slot: Slot, value: impl Into<Expr>) {
        self.statements.push(Statement::Assign {
            slot,
            value: value.into(),
        });
    }

    /// `slot += value`
    pub fn accumulate(&mut self, slot: Slot, value: impl Into<Expr>) {
        self.statements.push(Statement::Accumulate {
            slot,
            value: value.into(),
        });
    }

    /// `slot &= mask`, using the declared working mask.
    pub fn mask(&mut self, slot: Slot) {
        self.statements.push(Statement::Mask {
            slot,
            mask: Slot::scalar(SlotKind::Mask).into(),
        });
    }

    /// Terminate the program with its result limbs.
    pub fn ret(&mut self, values: Vec<Expr>) {
        self.statements.push(Statement::Return(values));
    }

    /// Number of statements emitted so far.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether no statement has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Finish the program.
    pub fn build(self) -> Program {
        Program {
            operation: self.operation,
            original: self.original,
            working: self.working,
            modulus_bits: self.modulus_bits,
            canonical: self.canonical,
            statements: self.statements,
        }
    }
}
