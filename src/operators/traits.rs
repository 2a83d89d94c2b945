//! Operator traits
//!
//! Selection, crossover and mutation all receive the whole
//! [`GenerationContext`] and return freshly owned chromosomes. Operators never
//! alias the population: anything they return is a copy.

use rand::Rng;

use crate::error::OperatorError;
use crate::fitness::traits::FitnessValue;
use crate::genome::chromosome::Chromosome;
use crate::operators::context::GenerationContext;

/// Selection operator trait
///
/// Chooses the survivors of the current population.
pub trait SelectionOperator<F: FitnessValue> {
    fn select<R: Rng>(
        &self,
        ctx: &GenerationContext<'_, F>,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, OperatorError>;
}

/// Crossover operator trait
///
/// Recombines `ctx.selection` into children.
pub trait CrossoverOperator<F: FitnessValue> {
    fn crossover<R: Rng>(
        &self,
        ctx: &GenerationContext<'_, F>,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, OperatorError>;
}

/// Mutation operator trait
///
/// Returns mutated copies of `ctx.offspring`.
pub trait MutationOperator<F: FitnessValue> {
    fn mutate<R: Rng>(
        &self,
        ctx: &GenerationContext<'_, F>,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, OperatorError>;
}
