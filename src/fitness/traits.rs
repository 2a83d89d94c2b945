//! Fitness traits
//!
//! This module defines the fitness value and fitness function traits.
//! Lower fitness is better: the engine minimizes.

use std::cmp::Ordering;
use std::fmt::{Debug, Display};

use serde::{de::DeserializeOwned, Serialize};

use crate::genome::chromosome::Chromosome;

/// Trait bound for fitness values
///
/// Fitness values must be comparable (the ordering decides who survives),
/// convertible to f64 for reporting, and serializable for history export.
pub trait FitnessValue:
    PartialOrd + PartialEq + Clone + Send + Sync + Debug + Serialize + DeserializeOwned + 'static
{
    /// Convert fitness to f64 for logging and summaries
    fn to_f64(&self) -> f64;

    /// Check if this fitness is better (strictly lower) than another
    ///
    /// A well-formed value is better than one that is not.
    fn is_better_than(&self, other: &Self) -> bool {
        self.cmp_fitness(other) == Ordering::Less
    }

    /// Check if this fitness is worse than another
    fn is_worse_than(&self, other: &Self) -> bool {
        other.is_better_than(self)
    }

    /// Whether the value can take part in comparisons (no NaN components)
    fn is_well_formed(&self) -> bool {
        true
    }

    /// Total order used for sorting
    ///
    /// Values that are not well formed rank after every well-formed value
    /// and equal to each other.
    fn cmp_fitness(&self, other: &Self) -> Ordering {
        match (self.is_well_formed(), other.is_well_formed()) {
            (true, true) => self.partial_cmp(other).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    }
}

impl FitnessValue for f64 {
    fn to_f64(&self) -> f64 {
        *self
    }

    fn is_well_formed(&self) -> bool {
        !self.is_nan()
    }
}

impl FitnessValue for f32 {
    fn to_f64(&self) -> f64 {
        *self as f64
    }

    fn is_well_formed(&self) -> bool {
        !self.is_nan()
    }
}

impl FitnessValue for i64 {
    fn to_f64(&self) -> f64 {
        *self as f64
    }
}

impl FitnessValue for i32 {
    fn to_f64(&self) -> f64 {
        *self as f64
    }
}

impl FitnessValue for usize {
    fn to_f64(&self) -> f64 {
        *self as f64
    }
}

/// Fixed-shape fitness, ordered lexicographically
impl<const N: usize> FitnessValue for [f64; N]
where
    [f64; N]: Serialize + DeserializeOwned,
{
    /// First component, used for reporting only
    fn to_f64(&self) -> f64 {
        self.first().copied().unwrap_or(0.0)
    }

    fn is_well_formed(&self) -> bool {
        self.iter().all(|v| !v.is_nan())
    }
}

/// Fitness evaluation trait
///
/// A fitness function must be pure: the same chromosome always yields the
/// same value. Any closure `Fn(&Chromosome) -> V` is a fitness function.
pub trait Fitness {
    /// The fitness value type
    type Value: FitnessValue;

    /// Evaluate fitness (lower = better)
    fn evaluate(&self, chromosome: &Chromosome) -> Result<Self::Value, String>;
}

impl<Func, V> Fitness for Func
where
    Func: Fn(&Chromosome) -> V,
    V: FitnessValue,
{
    type Value = V;

    fn evaluate(&self, chromosome: &Chromosome) -> Result<V, String> {
        Ok(self(chromosome))
    }
}

/// Adapter for fitness functions that can fail
///
/// A failure aborts the run; the engine never retries.
pub struct FallibleFitness<Func> {
    inner: Func,
}

impl<Func> FallibleFitness<Func> {
    pub fn new(inner: Func) -> Self {
        Self { inner }
    }
}

impl<Func, V, E> Fitness for FallibleFitness<Func>
where
    Func: Fn(&Chromosome) -> Result<V, E>,
    V: FitnessValue,
    E: Display,
{
    type Value = V;

    fn evaluate(&self, chromosome: &Chromosome) -> Result<V, String> {
        (self.inner)(chromosome).map_err(|e| e.to_string())
    }
}
