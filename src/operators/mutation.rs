//! Mutation operators
//!
//! This module provides the default probability-decaying mutation.

use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::error::OperatorError;
use crate::fitness::traits::FitnessValue;
use crate::genome::chromosome::{Chromosome, Genes};
use crate::operators::context::GenerationContext;
use crate::operators::traits::MutationOperator;

/// Multiplicative jitter whose pressure rises over the run
///
/// Each gene of each child mutates independently with probability
/// `mutation_probability * iteration / max_iterations`. A mutated gene is
/// multiplied by a factor drawn from `[low, low + 1)`, `low` being the gene's
/// lower bound: uniform for float genes, discrete (so exactly `low`) for
/// integer genes. Boolean genes are switched off when the factor is zero.
///
/// The jitter does not resample within bounds, so mutated genes may leave the
/// gene space, and a gene at zero can never move.
#[derive(Clone, Debug, Default)]
pub struct DecayingMutation;

impl DecayingMutation {
    pub fn new() -> Self {
        Self
    }

    fn mutate_one<R: Rng>(
        chromosome: &mut Chromosome,
        ctx: &GenerationContext<'_, impl FitnessValue>,
        trigger: &Bernoulli,
        rng: &mut R,
    ) -> Result<(), OperatorError> {
        let lower_bound = |j: usize| {
            ctx.gene_space.get(j).map(|b| b.low).ok_or_else(|| {
                OperatorError::MutationFailed(format!(
                    "gene {j} has no bounds; gene space declares {} genes",
                    ctx.gene_space.len()
                ))
            })
        };

        match chromosome.genes_mut() {
            Genes::Float(genes) => {
                for (j, gene) in genes.iter_mut().enumerate() {
                    if trigger.sample(rng) {
                        let low = lower_bound(j)?;
                        // Past 2^53 the interval [low, low + 1) holds no float but low
                        let factor = if low < low + 1.0 {
                            rng.gen_range(low..low + 1.0)
                        } else {
                            low
                        };
                        *gene *= factor;
                    }
                }
            }
            Genes::Integer(genes) => {
                for (j, gene) in genes.iter_mut().enumerate() {
                    if trigger.sample(rng) {
                        let low = lower_bound(j)? as i64;
                        // The only integer in [low, low + 1)
                        *gene = gene.saturating_mul(rng.gen_range(low..=low));
                    }
                }
            }
            Genes::Boolean(genes) => {
                for (j, gene) in genes.iter_mut().enumerate() {
                    if trigger.sample(rng) {
                        let low = lower_bound(j)? as u8;
                        *gene = *gene && rng.gen_range(low..=low) != 0;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<F: FitnessValue> MutationOperator<F> for DecayingMutation {
    fn mutate<R: Rng>(
        &self,
        ctx: &GenerationContext<'_, F>,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, OperatorError> {
        let trigger = Bernoulli::new(ctx.mutation_pressure())
            .map_err(|e| OperatorError::MutationFailed(e.to_string()))?;

        let mut mutated = ctx.offspring.to_vec();
        for chromosome in &mut mutated {
            Self::mutate_one(chromosome, ctx, &trigger, rng)?;
        }
        Ok(mutated)
    }
}
