//! Direct execution of generated programs over wrapping `u64` arithmetic.
//!
//! Evaluation follows the semantics of the emitted C++ exactly, so a program that evaluates
//! correctly here compiles to a correct routine.

use crate::{
    Error, LimbBasis, Modulus, Result,
    ir::{Expr, Operand, Program, Slot, SlotKind, Statement},
};
use std::collections::HashMap;

/// Values bound to the inputs of a program, in the original basis.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Inputs {
    left: Option<Vec<u64>>,
    right: Option<Vec<u64>>,
    modulus: Option<Vec<u64>>,
    neg_inverse: Option<u64>,
    basis: Option<LimbBasis>,
    modulus_bits: Option<u32>,
}

impl Inputs {
    /// Inputs with only the operands bound, enough for product-only programs.
    pub fn operands(left: Vec<u64>, right: Vec<u64>) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            ..Self::default()
        }
    }

    /// Bind the modulus limbs and `T::r_inv`.
    pub fn with_modulus(self, modulus: &Modulus) -> Self {
        Self {
            modulus: Some(modulus.limbs()),
            neg_inverse: Some(modulus.neg_inverse()),
            basis: Some(modulus.basis()),
            modulus_bits: Some(modulus.bits()),
            ..self
        }
    }

    fn limbs(&self, operand: Operand) -> Option<&[u64]> {
        match operand {
            Operand::Left => self.left.as_deref(),
            Operand::Right => self.right.as_deref(),
            Operand::Modulus => self.modulus.as_deref(),
        }
    }

    fn check(&self, program: &Program) -> Result<()> {
        let original = program.original();
        if self.basis.is_some_and(|basis| basis != original) {
            return Err(Error::BasisMismatch);
        }
        if let Some(bits) = self.modulus_bits {
            if bits > program.modulus_bits() {
                return Err(Error::ModulusTooLarge {
                    bits: u64::from(bits),
                    capacity: program.modulus_bits(),
                });
            }
        }
        for operand in [Operand::Left, Operand::Right, Operand::Modulus] {
            if let Some(limbs) = self.limbs(operand) {
                if limbs.len() != original.num_limbs() {
                    return Err(Error::InputLength {
                        name: operand.name(),
                        expected: original.num_limbs(),
                        actual: limbs.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Executes one [`Program`].
#[derive(Debug)]
pub struct Evaluator<'a> {
    program: &'a Program,
    /// Declared slots, `None` until first written.
    values: HashMap<Slot, Option<u64>>,
}

impl<'a> Evaluator<'a> {
    /// Prepare to run `program`.
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            values: HashMap::new(),
        }
    }

    /// Run the program on `inputs` and return the limbs of its `Return` statement.
    ///
    /// A program without a `Return` yields no limbs.
    pub fn run(mut self, inputs: &Inputs) -> Result<Vec<u64>> {
        let program = self.program;
        inputs.check(program)?;

        for statement in program.statements() {
            match statement {
                Statement::DeclareArray { kind, values } => {
                    for (i, value) in values.iter().enumerate() {
                        let value = self.eval(value, inputs)?;
                        self.values.insert(Slot::new(*kind, i), Some(value));
                    }
                }
                Statement::Declare { slot, value } => {
                    let value = match value {
                        Some(value) => Some(self.eval(value, inputs)?),
                        None => None,
                    };
                    self.values.insert(*slot, value);
                }
                Statement::Assign { slot, value } => {
                    let value = self.eval(value, inputs)?;
                    self.write(*slot, value)?;
                }
                Statement::Accumulate { slot, value } => {
                    let addend = self.eval(value, inputs)?;
                    let current = self.read(*slot)?;
                    self.write(*slot, current.wrapping_add(addend))?;
                }
                Statement::Mask { slot, mask } => {
                    let mask = self.eval(mask, inputs)?;
                    let current = self.read(*slot)?;
                    self.write(*slot, current & mask)?;
                }
                Statement::Return(values) => {
                    log::trace!("{} returned {} limbs", program.operation(), values.len());
                    return values.iter().map(|value| self.eval(value, inputs)).collect();
                }
            }
        }
        Ok(Vec::new())
    }

    fn eval(&self, expr: &Expr, inputs: &Inputs) -> Result<u64> {
        expr.eval(&mut |slot: Slot| match slot.kind {
            SlotKind::Source(operand) => inputs
                .limbs(operand)
                .and_then(|limbs| limbs.get(slot.index).copied())
                .ok_or_else(|| Error::UnboundInput {
                    name: slot.to_string(),
                }),
            SlotKind::NegInverse => inputs.neg_inverse.ok_or_else(|| Error::UnboundInput {
                name: slot.to_string(),
            }),
            _ => self.read(slot),
        })
    }

    fn read(&self, slot: Slot) -> Result<u64> {
        self.values
            .get(&slot)
            .copied()
            .flatten()
            .ok_or_else(|| Error::Undeclared {
                name: slot.to_string(),
            })
    }

    fn write(&mut self, slot: Slot, value: u64) -> Result<()> {
        match self.values.get_mut(&slot) {
            Some(current) => {
                *current = Some(value);
                Ok(())
            }
            None => Err(Error::Undeclared {
                name: slot.to_string(),
            }),
        }
    }
}

/// Run `program` on `inputs`.
pub fn evaluate(program: &Program, inputs: &Inputs) -> Result<Vec<u64>> {
    Evaluator::new(program).run(inputs)
}

#[cfg(test)]
mod tests {
    use super::{Inputs, evaluate};
    use crate::{
        Error, Generator, GeneratorConfig, LimbBasis, Modulus, Operation,
        ir::{ProgramBuilder, Slot},
        modulus::SECP256K1_BASE,
    };
    use num_bigint::BigUint;

    fn bn254() -> Generator {
        Generator::new(GeneratorConfig::new(64, 4, 29).unwrap())
    }

    #[test]
    fn product_of_small_values() {
        let program = bn254().generate_product(Operation::Mul).unwrap();
        let inputs = Inputs::operands(vec![7, 0, 0, 0], vec![6, 0, 0, 0]);
        let acc = evaluate(&program, &inputs).unwrap();
        assert_eq!(acc.len(), 18);
        assert_eq!(acc[0], 42);
        assert!(acc[1..].iter().all(|&limb| limb == 0));
    }

    #[test]
    fn montgomery_of_one_is_r_inverse() {
        // mont(R) * 1 = R * R^-1 = 1
        let modulus = Modulus::bn254_scalar();
        let working = bn254().config().working();
        let r = modulus.to_montgomery(&BigUint::from(1u8), working);
        let program = bn254().generate(Operation::Mul).unwrap();
        let inputs = Inputs::operands(modulus.basis().to_limbs(&r), vec![1, 0, 0, 0])
            .with_modulus(&modulus);
        let out = evaluate(&program, &inputs).unwrap();
        let value = modulus.basis().from_limbs(&out);
        assert_eq!(modulus.reduce(&value), BigUint::from(1u8));
    }

    #[test]
    fn unbound_inputs() {
        let program = bn254().generate(Operation::Mul).unwrap();
        let err = evaluate(&program, &Inputs::operands(vec![0; 4], vec![0; 4])).unwrap_err();
        assert_eq!(
            err,
            Error::UnboundInput {
                name: "T::r_inv".into()
            }
        );
    }

    #[test]
    fn input_lengths() {
        let program = bn254().generate_product(Operation::Mul).unwrap();
        let err = evaluate(&program, &Inputs::operands(vec![0; 3], vec![0; 4])).unwrap_err();
        assert_eq!(
            err,
            Error::InputLength {
                name: "left",
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn basis_mismatch() {
        let program = bn254().generate(Operation::Mul).unwrap();
        let small = Modulus::new(BigUint::from(97u8), LimbBasis::new(64, 1).unwrap()).unwrap();
        let inputs = Inputs::operands(vec![0; 4], vec![0; 4]).with_modulus(&small);
        assert_eq!(evaluate(&program, &inputs), Err(Error::BasisMismatch));
    }

    #[test]
    fn moduli_above_the_bound() {
        let program = bn254().generate(Operation::Mul).unwrap();
        let secp = Modulus::parse(SECP256K1_BASE, LimbBasis::new(64, 4).unwrap()).unwrap();
        let inputs = Inputs::operands(vec![1, 0, 0, 0], vec![1, 0, 0, 0]).with_modulus(&secp);
        assert_eq!(
            evaluate(&program, &inputs),
            Err(Error::ModulusTooLarge {
                bits: 256,
                capacity: 254
            })
        );

        let config = GeneratorConfig::new(64, 4, 29)
            .unwrap()
            .for_modulus(&secp)
            .unwrap();
        let program = Generator::new(config).generate(Operation::Mul).unwrap();
        assert!(evaluate(&program, &inputs).is_ok());
    }

    #[test]
    fn reads_before_declaration() {
        let basis = LimbBasis::new(64, 1).unwrap();
        let mut builder = ProgramBuilder::new(Operation::Mul, basis, basis);
        builder.declare_uninit(Slot::acc(0));
        builder.accumulate(Slot::acc(0), 1u64);
        let err = evaluate(&builder.build(), &Inputs::default()).unwrap_err();
        assert_eq!(
            err,
            Error::Undeclared {
                name: "temp_0".into()
            }
        );
    }
}
