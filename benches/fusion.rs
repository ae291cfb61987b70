//! Fusion Benchmarks
//!
//! Compares a fused, JIT-compiled kernel chain against a hand-written Rust
//! loop over the same data. The JIT compilation cost is paid once during
//! setup; the measured region is kernel dispatch plus execution, which is
//! where fusion pays off: one pass over memory instead of one per
//! operation.
//!
//! The benchmark needs a C compiler on PATH; without one only the baseline
//! is measured.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::process::{Command, Stdio};
use tempfile::TempDir;
use vecfuse::prelude::*;

fn have_cc() -> bool {
    Command::new("cc")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// t = b + c; a = t * d, as the engine sees it.
fn chain_batch(n: usize, ids: &[BaseId; 5]) -> Vec<Instruction> {
    let [b, c, d, t, a] = *ids;
    vec![
        Instruction::zip(
            Operator::Add,
            View::full(t, n),
            View::full(b, n),
            View::full(c, n),
        ),
        Instruction::zip(
            Operator::Mul,
            View::full(a, n),
            View::full(t, n),
            View::full(d, n),
        ),
    ]
}

fn benchmark_fused_chain(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("zip_chain");
    for n in [1_000usize, 100_000] {
        let mut bs = vec![0.0f64; n];
        let mut cs = vec![0.0f64; n];
        let mut ds = vec![0.0f64; n];
        for i in 0..n {
            bs[i] = i as f64 * 0.5;
            cs[i] = 1.0 + i as f64;
            ds[i] = (i % 13) as f64;
        }

        group.bench_with_input(BenchmarkId::new("direct", n), &n, |bench, &n| {
            let mut t = vec![0.0f64; n];
            let mut a = vec![0.0f64; n];
            bench.iter(|| {
                for i in 0..n {
                    t[i] = bs[i] + cs[i];
                    a[i] = t[i] * ds[i];
                }
                std::hint::black_box(a[n - 1])
            });
        });

        if !have_cc() {
            continue;
        }

        let dir = TempDir::new().unwrap();
        let config = Config {
            object_directory: dir.path().join("objects"),
            kernel_directory: dir.path().join("kernels"),
            ..Config::default()
        };
        let mut engine = Engine::new(config).unwrap();
        let mut pool = BasePool::new();
        let ids = [
            pool.create(ElemType::F64, n),
            pool.create(ElemType::F64, n),
            pool.create(ElemType::F64, n),
            pool.create(ElemType::F64, n),
            pool.create(ElemType::F64, n),
        ];
        for (src, base) in [(&bs, ids[0]), (&cs, ids[1]), (&ds, ids[2])] {
            pool[base].allocate().unwrap();
            pool[base].as_mut_slice::<f64>().unwrap().copy_from_slice(src);
        }
        let batch = chain_batch(n, &ids);
        // Warm the kernel store so the loop below measures dispatch only.
        engine.execute(&mut pool, &batch).unwrap();

        group.bench_with_input(BenchmarkId::new("fused_jit", n), &n, |bench, _| {
            bench.iter(|| {
                engine.execute(&mut pool, &batch).unwrap();
                std::hint::black_box(pool[ids[4]].as_slice::<f64>().unwrap()[n - 1])
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_fused_chain);
criterion_main!(benches);
