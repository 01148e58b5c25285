//! Command-line front end: prints a generated routine to stdout.

use anyhow::{Context, bail};
use monty_codegen::{Generator, GeneratorConfig, Language, Modulus, Operation};

const USAGE: &str = "\
Usage: monty-codegen (--mult | --sqr | --karatsuba-mult | --cook-mult) [options]

Options:
  --original-bits <n>   width of the stored limbs (default 64)
  --original-limbs <n>  number of stored limbs (default 4)
  --limb-bits <n>       width of the working limbs (default 29)
  --limbs <n>           number of working limbs (default: just enough to cover)
  --lang <cpp|rust>     output language (default cpp)
  --canonical           subtract the modulus once at the end
  --modulus <n>         generate for moduli up to the size of n, decimal or 0x hex
                        (default: two bits below the stored width; BN254 scalar field for --check)
  --check <samples>     evaluate on edge cases and random elements before printing
  --seed <n>            seed for --check (default 0)";

#[derive(Debug)]
struct Args {
    operation: Operation,
    original_bits: u32,
    original_limbs: usize,
    limb_bits: u32,
    limbs: Option<usize>,
    language: Language,
    canonical: bool,
    check: Option<usize>,
    modulus: Option<String>,
    seed: u64,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut operation = None;
        let mut parsed = Args {
            operation: Operation::Mul,
            original_bits: 64,
            original_limbs: 4,
            limb_bits: 29,
            limbs: None,
            language: Language::Cpp,
            canonical: false,
            check: None,
            modulus: None,
            seed: 0,
        };

        while let Some(arg) = args.next() {
            let mut value = || {
                args.next()
                    .with_context(|| format!("{arg} expects a value"))
            };
            match arg.as_str() {
                "--mult" | "--sqr" | "--karatsuba-mult" | "--cook-mult" => {
                    if operation.is_some() {
                        bail!("only one operation may be given");
                    }
                    operation = Some(arg.parse::<Operation>()?);
                }
                "--original-bits" => parsed.original_bits = number(&arg, value()?)?,
                "--original-limbs" => parsed.original_limbs = number(&arg, value()?)?,
                "--limb-bits" => parsed.limb_bits = number(&arg, value()?)?,
                "--limbs" => parsed.limbs = Some(number(&arg, value()?)?),
                "--lang" => parsed.language = value()?.parse()?,
                "--canonical" => parsed.canonical = true,
                "--check" => parsed.check = Some(number(&arg, value()?)?),
                "--modulus" => parsed.modulus = Some(value()?),
                "--seed" => parsed.seed = number(&arg, value()?)?,
                "-h" | "--help" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                _ => bail!("unrecognised argument `{arg}`\n\n{USAGE}"),
            }
        }

        parsed.operation = operation.with_context(|| format!("no operation given\n\n{USAGE}"))?;
        Ok(parsed)
    }

    fn config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config =
            GeneratorConfig::new(self.original_bits, self.original_limbs, self.limb_bits)
                .context("invalid limb bases")?;
        if let Some(limbs) = self.limbs {
            config = config.with_limbs(limbs).context("invalid working limb count")?;
        }
        if let Some(literal) = &self.modulus {
            let modulus = Modulus::parse(literal, config.original())
                .with_context(|| format!("invalid modulus `{literal}`"))?;
            config = config.for_modulus(&modulus)?;
        }
        Ok(config.canonical(self.canonical))
    }
}

fn number<T: core::str::FromStr>(flag: &str, value: String) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("{flag}: invalid number `{value}`"))
}

#[cfg(feature = "rand")]
fn check(args: &Args, program: &monty_codegen::Program, samples: usize) -> anyhow::Result<()> {
    use monty_codegen::verify;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    let modulus = match &args.modulus {
        Some(literal) => Modulus::parse(literal, program.original())?,
        None => Modulus::parse(monty_codegen::modulus::BN254_SCALAR, program.original())?,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let report = verify::check(program, &modulus, samples, &mut rng)
        .with_context(|| format!("self-check modulo {modulus} failed"))?;
    eprintln!("{report}");
    Ok(())
}

#[cfg(not(feature = "rand"))]
fn check(_: &Args, _: &monty_codegen::Program, _: usize) -> anyhow::Result<()> {
    bail!("--check requires the `rand` feature")
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse(std::env::args().skip(1))?;
    log::debug!("{args:?}");

    let program = Generator::new(args.config()?)
        .generate(args.operation)
        .with_context(|| format!("cannot generate {}", args.operation))?;

    if let Some(samples) = args.check {
        check(&args, &program, samples)?;
    }

    if program.is_canonical() && !args.canonical {
        log::info!("final subtraction emitted for moduli of {} bits", program.modulus_bits());
    }
    print!("{}", args.language.render(&program));
    Ok(())
}
