//! Per-generation recording
//!
//! The engine hands a [`GenerationSnapshot`] to every registered
//! [`HistoryRecorder`] once per completed generation. [`History`] is the
//! in-memory recorder every engine carries; [`JsonLinesRecorder`] streams
//! snapshots to a writer as they happen.

use std::collections::HashMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::fitness::traits::FitnessValue;
use crate::genome::chromosome::{Chromosome, GenomeKey};
use crate::population::individual::{BestIndividual, Individual};

/// State of the run at the end of one generation
#[derive(Debug, Serialize)]
#[serde(bound = "")]
pub struct GenerationSnapshot<'a, F: FitnessValue> {
    /// 1-based generation number
    pub iteration: usize,
    /// Population after recombination
    pub population: &'a [Chromosome],
    /// Cache entries added since the previous snapshot
    pub fitness_delta: &'a [(Chromosome, F)],
    /// Best member of `population`
    pub best: &'a BestIndividual<F>,
}

/// Receives one snapshot per completed generation
pub trait HistoryRecorder<F: FitnessValue> {
    fn record(&mut self, snapshot: &GenerationSnapshot<'_, F>) -> Result<(), HistoryError>;
}

impl<F: FitnessValue, T: HistoryRecorder<F> + ?Sized> HistoryRecorder<F> for Box<T> {
    fn record(&mut self, snapshot: &GenerationSnapshot<'_, F>) -> Result<(), HistoryError> {
        (**self).record(snapshot)
    }
}

impl<F: FitnessValue, T: HistoryRecorder<F> + ?Sized> HistoryRecorder<F> for &mut T {
    fn record(&mut self, snapshot: &GenerationSnapshot<'_, F>) -> Result<(), HistoryError> {
        (**self).record(snapshot)
    }
}

/// Full record of a run: every population, every fitness and the best
/// individual of each generation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "", from = "HistoryData<F>", into = "HistoryData<F>")]
pub struct History<F: FitnessValue> {
    populations: Vec<Vec<Chromosome>>,
    fitness: Vec<(Chromosome, F)>,
    best: Vec<BestIndividual<F>>,
    index: HashMap<GenomeKey, usize>,
}

/// Serialized form of [`History`]; the lookup index is rebuilt on load
#[derive(Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub(crate) struct HistoryData<F: FitnessValue> {
    populations: Vec<Vec<Chromosome>>,
    fitness: Vec<(Chromosome, F)>,
    best: Vec<BestIndividual<F>>,
}

impl<F: FitnessValue> From<HistoryData<F>> for History<F> {
    fn from(data: HistoryData<F>) -> Self {
        let mut history = Self {
            populations: data.populations,
            fitness: Vec::with_capacity(data.fitness.len()),
            best: data.best,
            index: HashMap::new(),
        };
        history.merge_fitness(data.fitness);
        history
    }
}

impl<F: FitnessValue> From<History<F>> for HistoryData<F> {
    fn from(history: History<F>) -> Self {
        Self {
            populations: history.populations,
            fitness: history.fitness,
            best: history.best,
        }
    }
}

impl<F: FitnessValue> History<F> {
    pub fn new() -> Self {
        Self {
            populations: Vec::new(),
            fitness: Vec::new(),
            best: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of recorded generations
    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    /// Population at the end of generation `iteration` (0-based)
    pub fn population_at(&self, iteration: usize) -> Option<&[Chromosome]> {
        self.populations.get(iteration).map(Vec::as_slice)
    }

    pub fn populations(&self) -> &[Vec<Chromosome>] {
        &self.populations
    }

    /// Best individual of generation `iteration` (0-based)
    pub fn best_at(&self, iteration: usize) -> Option<&BestIndividual<F>> {
        self.best.get(iteration)
    }

    pub fn best(&self) -> &[BestIndividual<F>] {
        &self.best
    }

    /// Best fitness per generation
    pub fn best_fitness_history(&self) -> Vec<F> {
        self.best.iter().map(|b| b.fitness.clone()).collect()
    }

    /// Recorded fitness of any chromosome seen during the run
    pub fn fitness_of(&self, chromosome: &Chromosome) -> Option<&F> {
        self.index
            .get(&chromosome.key())
            .map(|&i| &self.fitness[i].1)
    }

    /// Every evaluated chromosome in evaluation order
    pub fn fitness_entries(&self) -> &[(Chromosome, F)] {
        &self.fitness
    }

    /// Generation populations paired with their fitness
    pub fn generations(
        &self,
    ) -> impl Iterator<Item = (Vec<Individual<F>>, &BestIndividual<F>)> + '_ {
        self.populations
            .iter()
            .zip(&self.best)
            .map(move |(population, best)| {
                let evaluated = population
                    .iter()
                    .filter_map(|c| {
                        self.fitness_of(c)
                            .map(|f| Individual::new(c.clone(), f.clone()))
                    })
                    .collect();
                (evaluated, best)
            })
    }

    pub fn clear(&mut self) {
        self.populations.clear();
        self.fitness.clear();
        self.best.clear();
        self.index.clear();
    }

    fn merge_fitness(&mut self, entries: impl IntoIterator<Item = (Chromosome, F)>) {
        for (chromosome, fitness) in entries {
            let key = chromosome.key();
            if self.index.contains_key(&key) {
                continue;
            }
            self.index.insert(key, self.fitness.len());
            self.fitness.push((chromosome, fitness));
        }
    }
}

impl<F: FitnessValue> Default for History<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FitnessValue> HistoryRecorder<F> for History<F> {
    fn record(&mut self, snapshot: &GenerationSnapshot<'_, F>) -> Result<(), HistoryError> {
        self.populations.push(snapshot.population.to_vec());
        self.merge_fitness(snapshot.fitness_delta.iter().cloned());
        self.best.push(snapshot.best.clone());
        Ok(())
    }
}

/// Streams each snapshot as one JSON line
#[derive(Debug)]
pub struct JsonLinesRecorder<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<F: FitnessValue, W: Write> HistoryRecorder<F> for JsonLinesRecorder<W> {
    fn record(&mut self, snapshot: &GenerationSnapshot<'_, F>) -> Result<(), HistoryError> {
        serde_json::to_writer(&mut self.writer, snapshot)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Parts = (Vec<Chromosome>, Vec<(Chromosome, i64)>, BestIndividual<i64>);

    fn snapshot_parts(values: &[i64]) -> Parts {
        let population: Vec<Chromosome> = values
            .iter()
            .map(|&v| Chromosome::from_ints(vec![v]))
            .collect();
        let delta: Vec<(Chromosome, i64)> = population
            .iter()
            .map(|c| (c.clone(), c.as_ints().unwrap()[0]))
            .collect();
        let best = delta
            .iter()
            .min_by_key(|(_, f)| *f)
            .map(|(c, f)| Individual::new(c.clone(), *f))
            .unwrap();
        (population, delta, best)
    }

    #[test]
    fn test_history_records_generations() {
        let mut history = History::new();

        for (i, values) in [[5, 3, 4], [3, 2, 1]].iter().enumerate() {
            let (population, delta, best) = snapshot_parts(values);
            history
                .record(&GenerationSnapshot {
                    iteration: i + 1,
                    population: &population,
                    fitness_delta: &delta,
                    best: &best,
                })
                .unwrap();
        }

        assert_eq!(history.len(), 2);
        assert_eq!(history.best_fitness_history(), vec![3, 1]);
        // Chromosome [3] appears in both deltas but is stored once
        assert_eq!(history.fitness_entries().len(), 5);
        assert_eq!(history.fitness_of(&Chromosome::from_ints(vec![2])), Some(&2));
        assert_eq!(history.population_at(1).unwrap().len(), 3);
        assert!(history.population_at(2).is_none());
    }

    #[test]
    fn test_generations_pair_fitness() {
        let mut history = History::new();
        let (population, delta, best) = snapshot_parts(&[7, 6]);
        history
            .record(&GenerationSnapshot {
                iteration: 1,
                population: &population,
                fitness_delta: &delta,
                best: &best,
            })
            .unwrap();

        let (evaluated, best) = history.generations().next().unwrap();
        assert_eq!(evaluated.len(), 2);
        assert_eq!(evaluated[0].fitness, 7);
        assert_eq!(best.fitness, 6);
    }

    #[test]
    fn test_json_lines_recorder() {
        let mut recorder = JsonLinesRecorder::new(Vec::new());
        let (population, delta, best) = snapshot_parts(&[1, 0]);
        let snapshot = GenerationSnapshot {
            iteration: 1,
            population: &population,
            fitness_delta: &delta,
            best: &best,
        };
        recorder.record(&snapshot).unwrap();
        recorder.record(&snapshot).unwrap();

        let out = String::from_utf8(recorder.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["iteration"], 1);
        assert_eq!(value["best"]["fitness"], 0);
    }
}
