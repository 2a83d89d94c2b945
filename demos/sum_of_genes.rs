//! Sum of Genes Minimization
//!
//! This example evolves three integer genes in [0, 10] until their sum reaches
//! zero, printing timestamped progress for every phase of the run.
//!
//! Set `RUST_LOG=evo_min=debug` to also see the structured tracing events.

use evo_min::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Sum of Genes ===\n");

    // Create a seeded RNG for reproducibility
    let mut rng = StdRng::seed_from_u64(42);

    let mut engine = Engine::builder()
        .bounds_table(&[[0.0, 10.0], [0.0, 10.0], [0.0, 10.0]], "int64")
        .fitness(SumOfGenes)
        .stop_fitness(0.0)
        .population_size(10)
        .max_iterations(50)
        .verbose(true)
        .build()?;

    let summary = engine.run_with_rng(&mut rng)?;

    println!("\nOptimization complete!");
    println!("  Best:        {}", summary.best);
    println!("  Iterations:  {}", summary.iterations);
    println!("  Evaluations: {}", summary.evaluations);
    println!("  Stopped:     {}", summary.termination);

    println!("\nBest fitness per generation:");
    for (i, fitness) in engine.history().best_fitness_history().iter().enumerate() {
        println!("  {:>3}: {}", i + 1, fitness);
    }

    Ok(())
}
