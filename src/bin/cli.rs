use clap::Parser;
use std::process;
use vecfuse::array::IdMap;
use vecfuse::prelude::*;
use vecfuse::{codegen, fuser};

#[derive(Parser)]
#[command(name = "vecfuse")]
#[command(about = "Run a demo instruction batch through the vector engine")]
#[command(version)]
struct Args {
    /// Number of elements per array
    #[arg(long, default_value_t = 1000)]
    size: usize,

    /// Print the generated C source for the batch instead of executing it
    #[arg(long)]
    dump_source: bool,

    /// Print the engine environment and exit
    #[arg(long)]
    env: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Builds `b = range(n); t = b + 1; s = sum(t); free t` and either dumps the
/// fused kernel source or executes the batch.
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    if args.env {
        let engine = Engine::new(config)?;
        println!("{}", engine.text());
        return Ok(());
    }

    let n = args.size;
    let mut pool = BasePool::new();
    let b = pool.create(ElemType::F64, n);
    let t = pool.create(ElemType::F64, n);
    let s = pool.create(ElemType::F64, 1);

    let batch = vec![
        Instruction::generate(Operator::Range, View::full(b, n), None),
        Instruction::zip(
            Operator::Add,
            View::full(t, n),
            View::full(b, n),
            Constant::F64(1.0),
        ),
        Instruction::reduce(Operator::Add, View::full(s, 1), View::full(t, n), 0),
        Instruction::free(View::full(t, n)),
    ];

    if args.dump_source {
        let mut arena = batch;
        let mut ids = IdMap::new();
        for instr in &arena {
            for base in instr.bases() {
                ids.insert(base);
            }
        }
        let news: std::collections::HashSet<usize> = (0..arena.len()).collect();
        let blocks = fuser::fuse(&mut arena, &news, true);
        let source = codegen::emit_source(&arena, &blocks, &ids, &pool)?;
        println!("{source}");
        return Ok(());
    }

    let mut engine = Engine::new(config)?;
    engine.execute(&mut pool, &batch)?;

    let sum = pool[s].as_slice::<f64>().expect("sum is an f64 scalar")[0];
    let expected = (0..n).map(|i| i as f64 + 1.0).sum::<f64>();
    println!("sum(range({n}) + 1) = {sum} (expected {expected})");
    println!(
        "kernels compiled: {}, cache hits: {}",
        engine.kernels_compiled(),
        engine.cache_hits()
    );
    Ok(())
}
