//! Fitness cache
//!
//! Maps a chromosome's canonical encoding to its fitness so that a genome
//! recurring within a run is evaluated only once. Entries are written once
//! and never evicted; the number of distinct genomes is bounded by the
//! cumulative population size.

use std::collections::hash_map::{Entry, HashMap};

use crate::fitness::traits::{Fitness, FitnessValue};
use crate::genome::chromosome::{Chromosome, GenomeKey};

/// Write-once map from genome identity to fitness
#[derive(Clone, Debug)]
pub struct FitnessCache<F: FitnessValue> {
    entries: HashMap<GenomeKey, F>,
    evaluations: usize,
}

impl<F: FitnessValue> FitnessCache<F> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            evaluations: 0,
        }
    }

    /// Cached fitness of a chromosome
    pub fn get(&self, chromosome: &Chromosome) -> Option<&F> {
        self.entries.get(&chromosome.key())
    }

    /// Cached fitness by key
    pub fn get_by_key(&self, key: &GenomeKey) -> Option<&F> {
        self.entries.get(key)
    }

    pub fn contains(&self, chromosome: &Chromosome) -> bool {
        self.entries.contains_key(&chromosome.key())
    }

    /// Number of distinct genomes cached
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times the fitness function has been called
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GenomeKey, &F)> {
        self.entries.iter()
    }

    /// Store a value unless the key is already present; the first writer wins.
    ///
    /// Returns `true` if the value was inserted.
    pub fn insert(&mut self, chromosome: &Chromosome, fitness: F) -> bool {
        match self.entries.entry(chromosome.key()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(fitness);
                true
            }
        }
    }

    /// Fitness of a chromosome, calling the fitness function only on a miss
    pub fn evaluate<Fit>(&mut self, chromosome: &Chromosome, fitness: &Fit) -> Result<&F, String>
    where
        Fit: Fitness<Value = F> + ?Sized,
    {
        match self.entries.entry(chromosome.key()) {
            Entry::Occupied(slot) => Ok(slot.into_mut()),
            Entry::Vacant(slot) => {
                let value = fitness.evaluate(chromosome)?;
                self.evaluations += 1;
                Ok(slot.insert(value))
            }
        }
    }

    /// Evaluate every chromosome not yet cached
    ///
    /// Returns the newly inserted `(chromosome, fitness)` pairs in population order.
    pub fn evaluate_all<'c, Fit, I>(
        &mut self,
        population: I,
        fitness: &Fit,
    ) -> Result<Vec<(Chromosome, F)>, String>
    where
        Fit: Fitness<Value = F> + ?Sized,
        I: IntoIterator<Item = &'c Chromosome>,
    {
        let mut inserted = Vec::new();
        for chromosome in population {
            if let Entry::Vacant(slot) = self.entries.entry(chromosome.key()) {
                let value = fitness.evaluate(chromosome)?;
                self.evaluations += 1;
                slot.insert(value.clone());
                inserted.push((chromosome.clone(), value));
            }
        }
        Ok(inserted)
    }

    /// Drop all entries and reset the evaluation counter
    pub fn clear(&mut self) {
        self.entries.clear();
        self.evaluations = 0;
    }
}

impl<F: FitnessValue> Default for FitnessCache<F> {
    fn default() -> Self {
        Self::new()
    }
}
