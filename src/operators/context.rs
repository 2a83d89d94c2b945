//! Generation context
//!
//! The single structured value every operator receives. It is an immutable
//! snapshot of the engine state for the current phase of a generation, so a
//! custom operator can read anything it needs without being able to modify
//! the engine.

use std::fmt;

use crate::fitness::cache::FitnessCache;
use crate::fitness::traits::FitnessValue;
use crate::genome::bounds::{ElementKind, GeneSpace};
use crate::genome::chromosome::Chromosome;

/// Read-only view of the run state passed to operators
pub struct GenerationContext<'a, F: FitnessValue> {
    /// Current population
    pub population: &'a [Chromosome],
    /// Fitness of every chromosome evaluated so far in this run
    pub fitness: &'a FitnessCache<F>,
    /// Bounds and element kind
    pub gene_space: &'a GeneSpace,
    /// Proportion of each parent taken as head in crossover
    pub crossover_proportion: f64,
    /// Base per-gene mutation probability
    pub mutation_probability: f64,
    /// Generations completed before the current one
    pub iteration: usize,
    /// Configured generation budget
    pub max_iterations: usize,
    /// Configured population size
    pub population_size: usize,
    /// Survivors of the selection phase (empty before selection)
    pub selection: &'a [Chromosome],
    /// Children of the crossover phase (empty before crossover)
    pub offspring: &'a [Chromosome],
}

impl<'a, F: FitnessValue> GenerationContext<'a, F> {
    /// Context for the selection phase
    pub fn new(
        population: &'a [Chromosome],
        fitness: &'a FitnessCache<F>,
        gene_space: &'a GeneSpace,
    ) -> Self {
        Self {
            population,
            fitness,
            gene_space,
            crossover_proportion: 0.5,
            mutation_probability: 0.5,
            iteration: 0,
            max_iterations: 0,
            population_size: population.len(),
            selection: &[],
            offspring: &[],
        }
    }

    /// Same context with the selection survivors attached
    pub fn with_selection(self, selection: &'a [Chromosome]) -> Self {
        Self { selection, ..self }
    }

    /// Same context with the crossover children attached
    pub fn with_offspring(self, offspring: &'a [Chromosome]) -> Self {
        Self { offspring, ..self }
    }

    pub fn kind(&self) -> ElementKind {
        self.gene_space.kind()
    }

    pub fn is_float(&self) -> bool {
        self.kind().is_float()
    }

    pub fn is_integer(&self) -> bool {
        self.kind().is_integer()
    }

    pub fn is_boolean(&self) -> bool {
        self.kind().is_boolean()
    }

    /// Cached fitness of a chromosome
    pub fn fitness_of(&self, chromosome: &Chromosome) -> Option<&'a F> {
        self.fitness.get(chromosome)
    }

    /// Per-gene mutation probability for this generation:
    /// `mutation_probability * iteration / max_iterations`
    pub fn mutation_pressure(&self) -> f64 {
        if self.max_iterations == 0 {
            return 0.0;
        }
        self.mutation_probability * (self.iteration as f64 / self.max_iterations as f64)
    }
}

impl<F: FitnessValue> Clone for GenerationContext<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: FitnessValue> Copy for GenerationContext<'_, F> {}

impl<F: FitnessValue> fmt::Debug for GenerationContext<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationContext")
            .field("population", &self.population.len())
            .field("cached", &self.fitness.len())
            .field("genes", &self.gene_space.len())
            .field("kind", &self.kind())
            .field("iteration", &self.iteration)
            .field("max_iterations", &self.max_iterations)
            .field("population_size", &self.population_size)
            .field("selection", &self.selection.len())
            .field("offspring", &self.offspring.len())
            .finish()
    }
}
