//! Selection operators
//!
//! This module provides the default truncation selection.

use rand::Rng;

use crate::error::OperatorError;
use crate::fitness::traits::FitnessValue;
use crate::genome::chromosome::Chromosome;
use crate::operators::context::GenerationContext;
use crate::operators::traits::SelectionOperator;

/// Truncation selection
///
/// Sorts the population by ascending fitness, keeps the best half of the
/// configured population size, then drops the weakest `discard` of those
/// (two by default). With unique fitness values every survivor is at least as
/// good as every excluded individual.
#[derive(Clone, Debug)]
pub struct TruncationSelection {
    /// Number of weakest individuals removed from the kept half
    pub discard: usize,
}

impl TruncationSelection {
    pub fn new() -> Self {
        Self { discard: 2 }
    }

    /// Change how many of the kept half are dropped
    pub fn with_discard(mut self, discard: usize) -> Self {
        self.discard = discard;
        self
    }

    /// Number of survivors for a given configured population size
    pub fn survivors(&self, population_size: usize) -> usize {
        (population_size / 2).saturating_sub(self.discard)
    }
}

impl Default for TruncationSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FitnessValue> SelectionOperator<F> for TruncationSelection {
    fn select<R: Rng>(
        &self,
        ctx: &GenerationContext<'_, F>,
        _rng: &mut R,
    ) -> Result<Vec<Chromosome>, OperatorError> {
        let mut ranked: Vec<(&Chromosome, &F)> = ctx
            .population
            .iter()
            .enumerate()
            .map(|(i, c)| {
                ctx.fitness_of(c).map(|f| (c, f)).ok_or_else(|| {
                    OperatorError::SelectionFailed(format!(
                        "individual {i} has no cached fitness"
                    ))
                })
            })
            .collect::<Result<_, _>>()?;

        // Stable: equal fitness keeps population order
        ranked.sort_by(|a, b| a.1.cmp_fitness(b.1));

        let kept = (ctx.population_size / 2).min(ranked.len());
        ranked.truncate(kept.saturating_sub(self.discard));

        Ok(ranked.into_iter().map(|(c, _)| c.clone()).collect())
    }
}
