use criterion::{
    BatchSize, BenchmarkGroup, Criterion, criterion_group, criterion_main, measurement::Measurement,
};
use monty_codegen::{Generator, GeneratorConfig, Inputs, Language, Modulus, Operation, evaluate};
use num_bigint::BigUint;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use std::hint::black_box;

fn generator(limb_bits: u32) -> Generator {
    Generator::new(GeneratorConfig::new(64, 4, limb_bits).unwrap())
}

fn bench_generation<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    // 9 limbs of 29 bits and 12 limbs of 22 bits
    for (limb_bits, operations) in [
        (29, &[Operation::Mul, Operation::Sqr, Operation::CookMul][..]),
        (22, &[Operation::KaratsubaMul, Operation::CookMul][..]),
    ] {
        let generator = generator(limb_bits);
        for &operation in operations {
            group.bench_function(format!("generate {operation}, {limb_bits}-bit limbs"), |b| {
                b.iter(|| black_box(generator.generate(operation).unwrap()))
            });
        }
    }

    let program = generator(29).generate(Operation::Mul).unwrap();
    for language in [Language::Cpp, Language::Rust] {
        group.bench_function(format!("render {language}"), |b| {
            b.iter(|| black_box(language.render(&program)))
        });
    }
}

fn bench_evaluation<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let modulus = Modulus::bn254_scalar();
    let program = generator(29).generate(Operation::CookMul).unwrap();

    group.bench_function("evaluate cook-mult", |b| {
        b.iter_batched(
            || {
                let mut limbs = || {
                    let x = BigUint::from(rng.next_u64()) % modulus.value();
                    modulus.basis().to_limbs(&x)
                };
                Inputs::operands(limbs(), limbs()).with_modulus(&modulus)
            },
            |inputs| black_box(evaluate(&program, &inputs).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_codegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("Montgomery code generation");
    bench_generation(&mut group);
    bench_evaluation(&mut group);
    group.finish();
}

criterion_group!(benches, bench_codegen);

criterion_main!(benches);
