//! Population type
//!
//! An ordered collection of chromosomes. The engine replaces it wholesale
//! every generation; fitness lives in the [`FitnessCache`], not here.

use rand::Rng;

use crate::error::GenomeError;
use crate::fitness::cache::FitnessCache;
use crate::fitness::traits::FitnessValue;
use crate::genome::bounds::{GeneSpace, SeedingBounds};
use crate::genome::chromosome::Chromosome;
use crate::population::individual::{BestIndividual, Individual};

/// A population of chromosomes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chromosomes(chromosomes: Vec<Chromosome>) -> Self {
        Self { chromosomes }
    }

    /// Create a random population drawn from the gene space
    pub fn random<R: Rng>(
        size: usize,
        space: &GeneSpace,
        seeding: SeedingBounds,
        rng: &mut R,
    ) -> Result<Self, GenomeError> {
        let chromosomes = (0..size)
            .map(|_| Chromosome::generate(rng, space, seeding))
            .collect::<Result<_, _>>()?;
        Ok(Self { chromosomes })
    }

    /// Survivors followed by offspring
    pub fn recombine(survivors: Vec<Chromosome>, offspring: Vec<Chromosome>) -> Self {
        let mut chromosomes = survivors;
        chromosomes.extend(offspring);
        Self { chromosomes }
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Chromosome> {
        self.chromosomes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chromosome> {
        self.chromosomes.iter()
    }

    pub fn as_slice(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn into_chromosomes(self) -> Vec<Chromosome> {
        self.chromosomes
    }

    /// Pair every chromosome with its cached fitness, skipping uncached ones
    pub fn with_fitness<F: FitnessValue>(&self, cache: &FitnessCache<F>) -> Vec<Individual<F>> {
        self.chromosomes
            .iter()
            .filter_map(|c| cache.get(c).map(|f| Individual::new(c.clone(), f.clone())))
            .collect()
    }

    /// Minimum-fitness chromosome; ties keep the earliest member
    pub fn best<F: FitnessValue>(&self, cache: &FitnessCache<F>) -> Option<BestIndividual<F>> {
        self.chromosomes
            .iter()
            .filter_map(|c| cache.get(c).map(|f| (c, f)))
            .fold(None, |best: Option<(&Chromosome, &F)>, (c, f)| match best {
                Some((_, bf)) if !f.is_better_than(bf) => best,
                _ => Some((c, f)),
            })
            .map(|(c, f)| Individual::new(c.clone(), f.clone()))
    }
}

impl std::ops::Index<usize> for Population {
    type Output = Chromosome;

    fn index(&self, index: usize) -> &Self::Output {
        &self.chromosomes[index]
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Chromosome;
    type IntoIter = std::slice::Iter<'a, Chromosome>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.iter()
    }
}

impl IntoIterator for Population {
    type Item = Chromosome;
    type IntoIter = std::vec::IntoIter<Chromosome>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.into_iter()
    }
}

impl FromIterator<Chromosome> for Population {
    fn from_iter<I: IntoIterator<Item = Chromosome>>(iter: I) -> Self {
        Self::from_chromosomes(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::genome::bounds::ElementKind;

    fn sum(c: &Chromosome) -> i64 {
        c.as_ints().unwrap().iter().sum()
    }

    #[test]
    fn test_random_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let space = GeneSpace::uniform(0.0, 10.0, 3, ElementKind::Integer).unwrap();
        let pop = Population::random(10, &space, SeedingBounds::PerGene, &mut rng).unwrap();

        assert_eq!(pop.len(), 10);
        assert!(pop.iter().all(|c| c.check_fits(&space).is_ok()));
    }

    #[test]
    fn test_random_population_checks_seeding_mode() {
        let mut rng = StdRng::seed_from_u64(2);
        let space = GeneSpace::new(vec![(0.0, 3.0), (5.0, 9.0)], ElementKind::Integer).unwrap();

        let result = Population::random(10, &space, SeedingBounds::FirstGeneUpper, &mut rng);
        assert!(matches!(result, Err(GenomeError::InvalidStructure(_))));
    }

    #[test]
    fn test_best_is_minimum() {
        let pop: Population = vec![
            Chromosome::from_ints(vec![3, 3]),
            Chromosome::from_ints(vec![0, 1]),
            Chromosome::from_ints(vec![2, 0]),
        ]
        .into_iter()
        .collect();

        let mut cache = FitnessCache::new();
        cache.evaluate_all(&pop, &sum).unwrap();

        let best = pop.best(&cache).unwrap();
        assert_eq!(best.fitness, 1);
        assert_eq!(best.chromosome, Chromosome::from_ints(vec![0, 1]));
    }

    #[test]
    fn test_best_tie_keeps_first() {
        let pop = Population::from_chromosomes(vec![
            Chromosome::from_ints(vec![1, 0]),
            Chromosome::from_ints(vec![0, 1]),
        ]);
        let mut cache = FitnessCache::new();
        cache.evaluate_all(&pop, &sum).unwrap();

        assert_eq!(pop.best(&cache).unwrap().chromosome, pop[0]);
    }

    #[test]
    fn test_best_skips_nan_leader() {
        let pop = Population::from_chromosomes(vec![
            Chromosome::from_ints(vec![-1]),
            Chromosome::from_ints(vec![4]),
            Chromosome::from_ints(vec![2]),
        ]);
        let mut cache = FitnessCache::new();
        cache
            .evaluate_all(&pop, &|c: &Chromosome| {
                let g = c.as_ints().unwrap()[0];
                if g < 0 { f64::NAN } else { g as f64 }
            })
            .unwrap();

        let best = pop.best(&cache).unwrap();
        assert_eq!(best.fitness, 2.0);
        assert_eq!(best.chromosome, pop[2]);
    }

    #[test]
    fn test_best_of_empty_population() {
        let cache: FitnessCache<i64> = FitnessCache::new();
        assert!(Population::new().best(&cache).is_none());
    }

    #[test]
    fn test_recombine() {
        let pop = Population::recombine(
            vec![Chromosome::from_ints(vec![1])],
            vec![Chromosome::from_ints(vec![2]), Chromosome::from_ints(vec![3])],
        );
        assert_eq!(pop.len(), 3);
        assert_eq!(pop[2], Chromosome::from_ints(vec![3]));
    }

    #[test]
    fn test_with_fitness_skips_uncached() {
        let pop = Population::from_chromosomes(vec![
            Chromosome::from_ints(vec![1]),
            Chromosome::from_ints(vec![2]),
        ]);
        let mut cache = FitnessCache::new();
        cache.evaluate(&pop[0], &sum).unwrap();

        let pairs = pop.with_fitness(&cache);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].fitness, 1);
    }
}
