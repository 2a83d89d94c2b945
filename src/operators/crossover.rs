//! Crossover operators
//!
//! This module provides the default single-point proportional crossover.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{GenomeError, OperatorError};
use crate::fitness::traits::FitnessValue;
use crate::genome::chromosome::Chromosome;
use crate::operators::context::GenerationContext;
use crate::operators::traits::CrossoverOperator;

/// Single-point crossover at a fixed proportion of the chromosome length
///
/// Survivors are shuffled and paired `(0, 1), (2, 3), ...`; with an odd count
/// the last survivor pairs with the first. Each pair is cut at
/// `floor(proportion * length)` and yields two children that swap tails.
#[derive(Clone, Debug, Default)]
pub struct ProportionalCrossover {
    /// Overrides `ctx.crossover_proportion` when set
    pub proportion: Option<f64>,
}

impl ProportionalCrossover {
    /// Cut at the engine's configured proportion
    pub fn new() -> Self {
        Self::default()
    }

    /// Cut at a fixed proportion regardless of engine configuration
    pub fn with_proportion(proportion: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&proportion),
            "Proportion must be in [0, 1]"
        );
        Self {
            proportion: Some(proportion),
        }
    }

    /// Cut point for a chromosome of `len` genes
    pub fn cut_point(proportion: f64, len: usize) -> usize {
        ((proportion * len as f64).floor() as usize).min(len)
    }

    /// Recombine two parents: `(head1 + tail2, head2 + tail1)`
    pub fn cross_pair(
        first: &Chromosome,
        second: &Chromosome,
        proportion: f64,
    ) -> Result<(Chromosome, Chromosome), GenomeError> {
        let cut = Self::cut_point(proportion, first.len());
        let child1 = Chromosome::splice(first, second, cut)?;
        let child2 = Chromosome::splice(second, first, cut)?;
        Ok((child1, child2))
    }
}

impl<F: FitnessValue> CrossoverOperator<F> for ProportionalCrossover {
    fn crossover<R: Rng>(
        &self,
        ctx: &GenerationContext<'_, F>,
        rng: &mut R,
    ) -> Result<Vec<Chromosome>, OperatorError> {
        let proportion = self.proportion.unwrap_or(ctx.crossover_proportion);

        let mut parents: Vec<&Chromosome> = ctx.selection.iter().collect();
        parents.shuffle(rng);

        let n = parents.len();
        let mut children = Vec::with_capacity(n + n % 2);
        for i in (0..n).step_by(2) {
            let (first, second) = (parents[i], parents[(i + 1) % n]);
            let (child1, child2) = Self::cross_pair(first, second, proportion)
                .map_err(|e| OperatorError::CrossoverFailed(e.to_string()))?;
            children.push(child1);
            children.push(child2);
        }
        Ok(children)
    }
}
