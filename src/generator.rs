//! Pipeline driver: from a configuration and an [`Operation`] to a complete [`Program`].

use crate::{
    Error, LimbBasis, Modulus, Result,
    ir::{Expr, Operand, Program, ProgramBuilder, Slot, SlotKind},
    normalize,
    product::{self, Strategy},
    reduction, repack,
};
use core::{fmt, str::FromStr};

/// Routine to generate.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Operation {
    /// Schoolbook Montgomery multiplication.
    Mul,
    /// Montgomery squaring.
    Sqr,
    /// Montgomery multiplication with a Karatsuba product.
    KaratsubaMul,
    /// Montgomery multiplication with a Toom-Cook-3 product.
    CookMul,
}

impl Operation {
    /// Every operation, in command-line order.
    pub const ALL: [Operation; 4] = [
        Operation::Mul,
        Operation::Sqr,
        Operation::KaratsubaMul,
        Operation::CookMul,
    ];

    /// Name used on the command line, without the leading dashes.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::Mul => "mult",
            Operation::Sqr => "sqr",
            Operation::KaratsubaMul => "karatsuba-mult",
            Operation::CookMul => "cook-mult",
        }
    }

    /// Product strategy used by this operation.
    pub const fn strategy(self) -> Strategy {
        match self {
            Operation::Mul | Operation::Sqr => Strategy::Schoolbook,
            Operation::KaratsubaMul => Strategy::Karatsuba,
            Operation::CookMul => Strategy::ToomCook3,
        }
    }

    /// Whether both operands are the same value.
    pub const fn is_square(self) -> bool {
        matches!(self, Operation::Sqr)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    /// Accepts the bare name (`mult`) or the flag spelling (`--mult`).
    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_prefix("--").unwrap_or(s);
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| Error::UnknownOperation(s.to_owned()))
    }
}

/// Generator parameters.
///
/// Besides the two bases, a configuration carries the largest bit length of the moduli the
/// generated code is meant for. It defaults to two bits below the original basis, leaving room
/// for relaxed results below `2N` and for feeding them back in as operands. When the bound is
/// raised past that, the final subtraction is emitted regardless of [`GeneratorConfig::canonical`]
/// since a relaxed result could no longer be packed into the original basis.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GeneratorConfig {
    original: LimbBasis,
    working: LimbBasis,
    modulus_bits: u32,
    canonical: bool,
}

impl GeneratorConfig {
    /// Elements stored as `original_limbs` limbs of `original_bits` bits, computed on in limbs
    /// of `limb_bits` bits.
    ///
    /// The working limb count is the smallest one covering the original basis.
    pub fn new(original_bits: u32, original_limbs: usize, limb_bits: u32) -> Result<Self> {
        let original = LimbBasis::new(original_bits, original_limbs)?;
        let working = LimbBasis::covering(original.bits(), limb_bits)?;
        Ok(Self {
            original,
            working,
            modulus_bits: original.bits().saturating_sub(2).max(1),
            canonical: false,
        })
    }

    /// Use exactly `limbs` working limbs.
    ///
    /// Fails if they cannot hold every bit of the original basis. Extra limbs are allowed and
    /// enlarge the Montgomery radix.
    pub fn with_limbs(self, limbs: usize) -> Result<Self> {
        let working = LimbBasis::new(self.working.limb_bits(), limbs)?;
        if working.bits() < self.original.bits() {
            return Err(Error::InsufficientCoverage {
                limbs,
                limb_bits: working.limb_bits(),
                required: self.original.bits(),
            });
        }
        Ok(Self { working, ..self })
    }

    /// Generate for moduli of up to `bits` bits.
    pub fn with_modulus_bits(self, bits: u32) -> Result<Self> {
        if bits == 0 {
            return Err(Error::ZeroModulus);
        }
        if bits > self.original.bits() {
            return Err(Error::ModulusTooLarge {
                bits: u64::from(bits),
                capacity: self.original.bits(),
            });
        }
        Ok(Self {
            modulus_bits: bits,
            ..self
        })
    }

    /// Generate for `modulus` and every modulus of at most the same bit length.
    pub fn for_modulus(self, modulus: &Modulus) -> Result<Self> {
        if modulus.basis() != self.original {
            return Err(Error::BasisMismatch);
        }
        self.with_modulus_bits(modulus.bits())
    }

    /// Finish with a branch-free conditional subtraction, making the result canonical.
    pub fn canonical(self, canonical: bool) -> Self {
        Self { canonical, ..self }
    }

    /// Basis of inputs and outputs.
    pub fn original(&self) -> LimbBasis {
        self.original
    }

    /// Basis the arithmetic is carried out in.
    pub fn working(&self) -> LimbBasis {
        self.working
    }

    /// Largest bit length of the moduli generated code accepts.
    pub fn modulus_bits(&self) -> u32 {
        self.modulus_bits
    }

    /// Whether the final subtraction is emitted, either on request or because `2N` may not fit
    /// the original basis.
    pub fn is_canonical(&self) -> bool {
        self.canonical || self.modulus_bits.saturating_add(2) > self.original.bits()
    }
}

/// Emits programs for a fixed configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the full Montgomery routine for `operation`.
    ///
    /// The returned program reads the original-basis limbs of the operands and the modulus plus
    /// `T::r_inv`, and returns `x * y * R^-1 mod N` in the original basis, where
    /// `R = 2^(v * k)`, for any modulus of at most [`GeneratorConfig::modulus_bits`] bits.
    /// Unless [`GeneratorConfig::is_canonical`] holds, the result is only congruent and below
    /// `2N`, which the bit bound guarantees to fit the original basis.
    pub fn generate(&self, operation: Operation) -> Result<Program> {
        self.check(operation)?;
        let working = self.config.working;
        let k = working.num_limbs();

        let mut builder = ProgramBuilder::new(operation, self.config.original, working);
        builder.limit_modulus_bits(self.config.modulus_bits);
        builder.declare(Slot::scalar(SlotKind::Mask), working.mask());
        builder.declare(
            Slot::scalar(SlotKind::RInv),
            Slot::scalar(SlotKind::NegInverse) & Slot::scalar(SlotKind::Mask),
        );
        repack::split(&mut builder, Operand::Modulus);
        self.emit_product(&mut builder, operation);
        let before_reduction = builder.len();

        reduction::emit(&mut builder);
        normalize::emit(&mut builder);
        if self.config.is_canonical() {
            normalize::emit_canonical(&mut builder);
        }
        let result = repack::join(self.config.original, working, |i| Slot::acc(k + i).into());
        builder.ret(result);

        let program = builder.build();
        log::debug!(
            "generated {operation}: {} statements ({} before reduction), {} multiplications",
            program.len(),
            before_reduction,
            program.multiplications(),
        );
        Ok(program)
    }

    /// Generate only the double-width product of `operation`.
    ///
    /// The program returns the `2k` accumulator slots before reduction; slot `2k - 1` is always
    /// zero.
    pub fn generate_product(&self, operation: Operation) -> Result<Program> {
        self.check(operation)?;
        let working = self.config.working;
        let mut builder = ProgramBuilder::new(operation, self.config.original, working);
        self.emit_product(&mut builder, operation);
        builder.ret((0..2 * working.num_limbs()).map(|i| Slot::acc(i).into()).collect());

        let program = builder.build();
        log::debug!(
            "generated {operation} product: {} statements, {} multiplications",
            program.len(),
            program.multiplications(),
        );
        Ok(program)
    }

    /// Preconditions of `operation` under this configuration.
    fn check(&self, operation: Operation) -> Result<()> {
        let strategy = operation.strategy();
        strategy.check_limbs(self.config.working.num_limbs())?;
        strategy.check_headroom(self.config.working)
    }

    /// Operands, accumulator and product.
    fn emit_product(&self, builder: &mut ProgramBuilder, operation: Operation) {
        repack::split(builder, Operand::Left);
        if !operation.is_square() {
            repack::split(builder, Operand::Right);
        }
        for i in 0..2 * builder.working().num_limbs() {
            builder.declare(Slot::acc(i), Expr::Const(0));
        }
        if operation.is_square() {
            product::emit_square(builder);
        } else {
            operation.strategy().emit(builder);
        }
    }
}
