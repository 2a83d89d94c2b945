//! Benchmark fitness functions
//!
//! Simple minimization problems used by the demos and tests.

use crate::fitness::traits::Fitness;
use crate::genome::chromosome::{Chromosome, Genes};

/// Sum of all genes; minimum at the lower bounds
#[derive(Clone, Copy, Debug, Default)]
pub struct SumOfGenes;

impl Fitness for SumOfGenes {
    type Value = f64;

    fn evaluate(&self, chromosome: &Chromosome) -> Result<f64, String> {
        Ok(chromosome.to_f64_vec().iter().sum())
    }
}

/// Sphere function: f(x) = Σxᵢ², minimum 0 at the origin
#[derive(Clone, Copy, Debug, Default)]
pub struct Sphere;

impl Fitness for Sphere {
    type Value = f64;

    fn evaluate(&self, chromosome: &Chromosome) -> Result<f64, String> {
        Ok(chromosome.to_f64_vec().iter().map(|x| x * x).sum())
    }
}

/// Number of set bits in a boolean chromosome; minimum 0 when every bit is off
#[derive(Clone, Copy, Debug, Default)]
pub struct CountOnes;

impl Fitness for CountOnes {
    type Value = usize;

    fn evaluate(&self, chromosome: &Chromosome) -> Result<usize, String> {
        match chromosome.genes() {
            Genes::Boolean(bits) => Ok(bits.iter().filter(|&&b| b).count()),
            _ => Err(format!(
                "CountOnes expects boolean genes, got {}",
                chromosome.kind()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_genes() {
        let c = Chromosome::from_ints(vec![1, 2, 3]);
        assert_eq!(SumOfGenes.evaluate(&c), Ok(6.0));
    }

    #[test]
    fn test_sphere() {
        let c = Chromosome::from_floats(vec![1.0, -2.0]);
        assert_eq!(Sphere.evaluate(&c), Ok(5.0));
        assert_eq!(Sphere.evaluate(&Chromosome::from_floats(vec![0.0; 4])), Ok(0.0));
    }

    #[test]
    fn test_count_ones() {
        let c = Chromosome::from_bools(vec![true, false, true]);
        assert_eq!(CountOnes.evaluate(&c), Ok(2));
        assert!(CountOnes.evaluate(&Chromosome::from_ints(vec![1])).is_err());
    }
}
