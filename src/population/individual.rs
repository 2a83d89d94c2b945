//! Evaluated individual
//!
//! Pairs a chromosome with its fitness value.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fitness::traits::FitnessValue;
use crate::genome::chromosome::Chromosome;

/// A chromosome together with its fitness
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Individual<F: FitnessValue = f64> {
    pub chromosome: Chromosome,
    pub fitness: F,
}

/// Minimum-fitness member of the current population
pub type BestIndividual<F = f64> = Individual<F>;

impl<F: FitnessValue> Individual<F> {
    pub fn new(chromosome: Chromosome, fitness: F) -> Self {
        Self {
            chromosome,
            fitness,
        }
    }

    /// Check if this individual is better (lower fitness) than another
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.fitness.is_better_than(&other.fitness)
    }

    pub fn into_parts(self) -> (Chromosome, F) {
        (self.chromosome, self.fitness)
    }
}

impl<F: FitnessValue> PartialOrd for Individual<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.fitness.partial_cmp(&other.fitness)
    }
}

impl<F: FitnessValue> fmt::Display for Individual<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.chromosome, self.fitness)
    }
}
