//! Custom Operators
//!
//! This example replaces the default selection and mutation with operators
//! that read the generation context: a tournament that keeps the configured
//! population size stable, and a Gaussian mutation whose step shrinks as the
//! run progresses.

use evo_min::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Binary tournament, drawing half the configured population size
struct Tournament;

impl SelectionOperator<f64> for Tournament {
    fn select<R: Rng>(
        &self,
        ctx: &GenerationContext<'_, f64>,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, OperatorError> {
        let fitness = |c: &Chromosome| ctx.fitness_of(c).copied().unwrap_or(f64::INFINITY);

        (0..ctx.population_size / 2)
            .map(|_| {
                let a = ctx.population.choose(rng);
                let b = ctx.population.choose(rng);
                match (a, b) {
                    (Some(a), Some(b)) if fitness(b).is_better_than(&fitness(a)) => Ok(b.clone()),
                    (Some(a), _) => Ok(a.clone()),
                    _ => Err(OperatorError::SelectionFailed("empty population".into())),
                }
            })
            .collect()
    }
}

/// Gaussian jitter clamped to the gene bounds, annealed over the run
struct AnnealedGaussian {
    initial_sigma: f64,
}

impl MutationOperator<f64> for AnnealedGaussian {
    fn mutate<R: Rng>(
        &self,
        ctx: &GenerationContext<'_, f64>,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, OperatorError> {
        let progress = ctx.iteration as f64 / ctx.max_iterations.max(1) as f64;
        let sigma = self.initial_sigma * (1.0 - progress).max(0.05);
        let noise =
            Normal::new(0.0, sigma).map_err(|e| OperatorError::MutationFailed(e.to_string()))?;

        ctx.offspring
            .iter()
            .map(|child| {
                let genes = child
                    .as_floats()
                    .ok_or_else(|| OperatorError::MutationFailed("float genes only".into()))?;
                let mutated = genes
                    .iter()
                    .zip(ctx.gene_space.bounds())
                    .map(|(g, b)| (g + noise.sample(rng)).clamp(b.low, b.high))
                    .collect();
                Ok(Chromosome::from_floats(mutated))
            })
            .collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Custom Operators ===\n");

    let mut rng = StdRng::seed_from_u64(7);

    const DIM: usize = 5;
    let space = GeneSpace::uniform(-5.12, 5.12, DIM, ElementKind::Float)?;

    let mut engine = Engine::builder()
        .gene_space(space)
        .fitness(Sphere)
        .selection(Tournament)
        .mutation(AnnealedGaussian { initial_sigma: 1.0 })
        .population_size(40)
        .max_iterations(150)
        .build()?;

    let summary = engine.run_with_rng(&mut rng)?;

    println!("Optimization complete!");
    println!("  Best fitness: {:.6}", summary.best.fitness);
    println!("  Iterations:   {}", summary.iterations);
    println!("  Evaluations:  {}", summary.evaluations);
    println!("  Population:   {}", engine.population().len());
    println!("\nBest solution:");
    for (i, val) in summary.best.chromosome.to_f64_vec().iter().enumerate() {
        println!("  x[{}] = {:.6}", i, val);
    }

    Ok(())
}
