//! Evolution engine
//!
//! This module implements the generational minimizer: seed a random
//! population, then repeat select, cross, mutate, recombine, evaluate and
//! track-best until the stopping fitness is hit or the generation budget is
//! spent.

use std::fmt;
use std::io::Write;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::config::EngineConfig;
use crate::error::{EvolutionError, EvoResult, OperatorError};
use crate::fitness::cache::FitnessCache;
use crate::fitness::traits::{Fitness, FitnessValue};
use crate::genome::bounds::{ElementKind, GeneSpace, SeedingBounds};
use crate::genome::chromosome::Chromosome;
use crate::history::recorder::{GenerationSnapshot, History, HistoryRecorder};
use crate::logging::ProgressLog;
use crate::operators::context::GenerationContext;
use crate::operators::crossover::ProportionalCrossover;
use crate::operators::mutation::DecayingMutation;
use crate::operators::selection::TruncationSelection;
use crate::operators::traits::{CrossoverOperator, MutationOperator, SelectionOperator};
use crate::population::individual::BestIndividual;
use crate::population::population::Population;
use crate::termination::{StopCondition, TerminationReason};

/// Lifecycle phase of the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Initialized,
    Seeding,
    Evaluating,
    Iterating,
    Terminated(TerminationReason),
    /// The last run failed; state from it is partial
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialized => f.write_str("initialized"),
            Self::Seeding => f.write_str("seeding"),
            Self::Evaluating => f.write_str("evaluating"),
            Self::Iterating => f.write_str("iterating"),
            Self::Terminated(reason) => write!(f, "terminated ({reason})"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

/// Outcome of a completed run
#[derive(Clone, Debug, Serialize)]
#[serde(bound = "")]
pub struct RunSummary<F: FitnessValue> {
    /// Best member of the final population
    pub best: BestIndividual<F>,
    /// Generations completed, including the one that hit the stopping fitness
    pub iterations: usize,
    /// Fitness function calls made during the run
    pub evaluations: usize,
    pub termination: TerminationReason,
}

/// Builder for [`Engine`]
///
/// Selection, crossover and mutation start as the default operators and can
/// be replaced individually.
pub struct EngineBuilder<F, Fit, S, C, M>
where
    F: FitnessValue,
{
    config: EngineConfig,
    gene_space: Option<GeneSpace>,
    fitness: Option<Fit>,
    selection: S,
    crossover: C,
    mutation: M,
    stop_fitness: Option<F>,
    recorders: Vec<Box<dyn HistoryRecorder<F>>>,
    progress: Option<ProgressLog>,
    deferred_error: Option<EvolutionError>,
}

impl<F> EngineBuilder<F, (), TruncationSelection, ProportionalCrossover, DecayingMutation>
where
    F: FitnessValue,
{
    /// Create a new builder with default configuration and operators
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            gene_space: None,
            fitness: None,
            selection: TruncationSelection::new(),
            crossover: ProportionalCrossover::new(),
            mutation: DecayingMutation::new(),
            stop_fitness: None,
            recorders: Vec::new(),
            progress: None,
            deferred_error: None,
        }
    }
}

impl<F> Default for EngineBuilder<F, (), TruncationSelection, ProportionalCrossover, DecayingMutation>
where
    F: FitnessValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<F, Fit, S, C, M> EngineBuilder<F, Fit, S, C, M>
where
    F: FitnessValue,
{
    /// Replace the whole run configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the search space
    pub fn gene_space(mut self, gene_space: GeneSpace) -> Self {
        self.gene_space = Some(gene_space);
        self
    }

    /// Set the search space from a `[low, high]` table and a chromosome type name
    ///
    /// Errors are reported by [`build`](Self::build).
    pub fn bounds_table<R: AsRef<[f64]>>(mut self, rows: &[R], chromosome_type: &str) -> Self {
        let parsed = chromosome_type
            .parse::<ElementKind>()
            .and_then(|kind| GeneSpace::from_rows(rows, kind));
        match parsed {
            Ok(space) => self.gene_space = Some(space),
            Err(e) if self.deferred_error.is_none() => self.deferred_error = Some(e),
            Err(_) => {}
        }
        self
    }

    /// Stop as soon as a generation's best fitness equals `target`
    pub fn stop_fitness(mut self, target: F) -> Self {
        self.stop_fitness = Some(target);
        self
    }

    pub fn crossover_proportion(mut self, proportion: f64) -> Self {
        self.config.crossover_proportion = proportion;
        self
    }

    pub fn mutation_probability(mut self, probability: f64) -> Self {
        self.config.mutation_probability = probability;
        self
    }

    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Print timestamped progress lines
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn seeding(mut self, seeding: SeedingBounds) -> Self {
        self.config.seeding = seeding;
        self
    }

    /// Send verbose progress lines to `writer` instead of stdout
    pub fn progress_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.progress = Some(ProgressLog::to_writer(self.config.verbose, writer));
        self
    }

    /// Add a recorder that receives every generation snapshot
    pub fn recorder<Rec>(mut self, recorder: Rec) -> Self
    where
        Rec: HistoryRecorder<F> + 'static,
    {
        self.recorders.push(Box::new(recorder));
        self
    }

    /// Set the fitness function
    pub fn fitness<NewFit>(self, fitness: NewFit) -> EngineBuilder<F, NewFit, S, C, M>
    where
        NewFit: Fitness<Value = F>,
    {
        EngineBuilder {
            config: self.config,
            gene_space: self.gene_space,
            fitness: Some(fitness),
            selection: self.selection,
            crossover: self.crossover,
            mutation: self.mutation,
            stop_fitness: self.stop_fitness,
            recorders: self.recorders,
            progress: self.progress,
            deferred_error: self.deferred_error,
        }
    }

    /// Set the selection operator
    pub fn selection<NewS>(self, selection: NewS) -> EngineBuilder<F, Fit, NewS, C, M>
    where
        NewS: SelectionOperator<F>,
    {
        EngineBuilder {
            config: self.config,
            gene_space: self.gene_space,
            fitness: self.fitness,
            selection,
            crossover: self.crossover,
            mutation: self.mutation,
            stop_fitness: self.stop_fitness,
            recorders: self.recorders,
            progress: self.progress,
            deferred_error: self.deferred_error,
        }
    }

    /// Set the crossover operator
    pub fn crossover<NewC>(self, crossover: NewC) -> EngineBuilder<F, Fit, S, NewC, M>
    where
        NewC: CrossoverOperator<F>,
    {
        EngineBuilder {
            config: self.config,
            gene_space: self.gene_space,
            fitness: self.fitness,
            selection: self.selection,
            crossover,
            mutation: self.mutation,
            stop_fitness: self.stop_fitness,
            recorders: self.recorders,
            progress: self.progress,
            deferred_error: self.deferred_error,
        }
    }

    /// Set the mutation operator
    pub fn mutation<NewM>(self, mutation: NewM) -> EngineBuilder<F, Fit, S, C, NewM>
    where
        NewM: MutationOperator<F>,
    {
        EngineBuilder {
            config: self.config,
            gene_space: self.gene_space,
            fitness: self.fitness,
            selection: self.selection,
            crossover: self.crossover,
            mutation,
            stop_fitness: self.stop_fitness,
            recorders: self.recorders,
            progress: self.progress,
            deferred_error: self.deferred_error,
        }
    }
}

impl<F, Fit, S, C, M> EngineBuilder<F, Fit, S, C, M>
where
    F: FitnessValue,
    Fit: Fitness<Value = F>,
    S: SelectionOperator<F>,
    C: CrossoverOperator<F>,
    M: MutationOperator<F>,
{
    /// Validate every parameter and build the engine
    pub fn build(self) -> EvoResult<Engine<F, Fit, S, C, M>> {
        if let Some(e) = self.deferred_error {
            return Err(e);
        }

        let gene_space = self
            .gene_space
            .ok_or_else(|| EvolutionError::config("gene space must be specified"))?;

        let fitness = self
            .fitness
            .ok_or_else(|| EvolutionError::config("fitness function must be specified"))?;

        self.config.validate()?;

        if let Some(target) = &self.stop_fitness {
            if !target.is_well_formed() {
                return Err(EvolutionError::config(format!(
                    "stop fitness {target:?} is not a well-formed fitness value"
                )));
            }
        }

        gene_space.validate_seeding(self.config.seeding)?;

        let mut progress = self
            .progress
            .unwrap_or_else(|| ProgressLog::stdout(self.config.verbose));
        progress.set_verbose(self.config.verbose);

        Ok(Engine {
            stop: StopCondition::new(self.stop_fitness, self.config.max_iterations),
            config: self.config,
            gene_space,
            fitness,
            selection: self.selection,
            crossover: self.crossover,
            mutation: self.mutation,
            recorders: self.recorders,
            progress,
            state: RunState::Initialized,
            population: Population::new(),
            cache: FitnessCache::new(),
            best: None,
            history: History::new(),
            iterations: 0,
        })
    }
}

/// Generational minimizer over a bounded gene space
///
/// Construction parameters are fixed once built. Every call to
/// [`run`](Self::run) starts from a fresh random population; afterwards the
/// final population, fitness cache, best individual and history stay
/// queryable.
pub struct Engine<
    F,
    Fit,
    S = TruncationSelection,
    C = ProportionalCrossover,
    M = DecayingMutation,
> where
    F: FitnessValue,
{
    config: EngineConfig,
    gene_space: GeneSpace,
    fitness: Fit,
    selection: S,
    crossover: C,
    mutation: M,
    stop: StopCondition<F>,
    recorders: Vec<Box<dyn HistoryRecorder<F>>>,
    progress: ProgressLog,

    state: RunState,
    population: Population,
    cache: FitnessCache<F>,
    best: Option<BestIndividual<F>>,
    history: History<F>,
    iterations: usize,
}

impl<F: FitnessValue> Engine<F, ()> {
    /// Create a builder for an engine
    pub fn builder(
    ) -> EngineBuilder<F, (), TruncationSelection, ProportionalCrossover, DecayingMutation> {
        EngineBuilder::new()
    }
}

impl<F, Fit, S, C, M> Engine<F, Fit, S, C, M>
where
    F: FitnessValue,
    Fit: Fitness<Value = F>,
    S: SelectionOperator<F>,
    C: CrossoverOperator<F>,
    M: MutationOperator<F>,
{
    /// Run with the thread-local RNG
    pub fn run(&mut self) -> EvoResult<RunSummary<F>> {
        self.run_with_rng(&mut rand::thread_rng())
    }

    /// Run with a caller-supplied RNG, reproducible when it is seeded
    pub fn run_with_rng<R: Rng>(&mut self, rng: &mut R) -> EvoResult<RunSummary<F>> {
        self.reset();
        match self.execute(rng) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                warn!(error = %e, phase = %self.state, "run aborted");
                self.state = RunState::Aborted;
                Err(e)
            }
        }
    }

    fn reset(&mut self) {
        self.state = RunState::Initialized;
        self.population = Population::new();
        self.cache.clear();
        self.best = None;
        self.history.clear();
        self.iterations = 0;
    }

    fn execute<R: Rng>(&mut self, rng: &mut R) -> EvoResult<RunSummary<F>> {
        let max_iterations = self.config.max_iterations;
        info!(
            population_size = self.config.population_size,
            max_iterations,
            genes = self.gene_space.len(),
            kind = %self.gene_space.kind(),
            "starting run"
        );

        self.state = RunState::Seeding;
        self.progress.log("Generating random population");
        self.population = Population::random(
            self.config.population_size,
            &self.gene_space,
            self.config.seeding,
            rng,
        )?;

        self.state = RunState::Evaluating;
        self.progress.log("Evaluating initial population");
        // Seeding evaluations travel with the first snapshot
        let mut delta = self
            .cache
            .evaluate_all(&self.population, &self.fitness)
            .map_err(|message| EvolutionError::FitnessEvaluation {
                iteration: 0,
                message,
            })?;
        self.best = Some(
            self.population
                .best(&self.cache)
                .ok_or(EvolutionError::EmptyPopulation)?,
        );

        self.state = RunState::Iterating;
        self.progress.log("Running iterations");
        let mut termination = TerminationReason::MaxIterationsReached;

        for iteration in 0..max_iterations {
            self.progress
                .log(format!("Iteration {} of {}", iteration + 1, max_iterations));

            self.progress.log("\tSelecting population");
            let selection = self.selection.select(&self.context(iteration), rng)?;
            self.check_output("selection", &selection)?;

            self.progress.log("\tCrossing chromosomes");
            let offspring = self
                .crossover
                .crossover(&self.context(iteration).with_selection(&selection), rng)?;
            self.check_output("crossover", &offspring)?;

            self.progress.log("\tMutating new individuals");
            let mutated = self.mutation.mutate(
                &self
                    .context(iteration)
                    .with_selection(&selection)
                    .with_offspring(&offspring),
                rng,
            )?;
            self.check_output("mutation", &mutated)?;

            self.progress.log("\tConforming new population");
            let next = Population::recombine(selection, mutated);

            self.progress.log("\tEvaluating new population");
            let evaluated = self
                .cache
                .evaluate_all(&next, &self.fitness)
                .map_err(|message| EvolutionError::FitnessEvaluation {
                    iteration: iteration + 1,
                    message,
                })?;
            delta.extend(evaluated);
            self.population = next;

            self.progress.log("Selecting best individual");
            let best = self
                .population
                .best(&self.cache)
                .ok_or(EvolutionError::EmptyPopulation)?;
            self.progress.log(format!("Current best individual: {best}"));
            debug!(
                iteration = iteration + 1,
                population = self.population.len(),
                best_fitness = best.fitness.to_f64(),
                evaluations = self.cache.evaluations(),
                "generation complete"
            );

            let snapshot = GenerationSnapshot {
                iteration: iteration + 1,
                population: self.population.as_slice(),
                fitness_delta: &delta,
                best: &best,
            };
            self.history.record(&snapshot)?;
            for recorder in &mut self.recorders {
                recorder.record(&snapshot)?;
            }
            delta.clear();

            self.iterations = iteration + 1;
            let outcome = self.stop.check(self.iterations, &best.fitness);
            self.best = Some(best);

            if let Some(reason) = outcome {
                if reason == TerminationReason::StopFitnessReached {
                    self.progress.log("Stopping fitness value has been reached");
                }
                termination = reason;
                break;
            }
        }

        self.state = RunState::Terminated(termination);
        let best = self.best.clone().ok_or(EvolutionError::EmptyPopulation)?;
        info!(
            iterations = self.iterations,
            evaluations = self.cache.evaluations(),
            best_fitness = best.fitness.to_f64(),
            reason = %termination,
            "run finished"
        );

        Ok(RunSummary {
            best,
            iterations: self.iterations,
            evaluations: self.cache.evaluations(),
            termination,
        })
    }

    /// Context handed to the operators of generation `iteration` (0-based)
    fn context(&self, iteration: usize) -> GenerationContext<'_, F> {
        GenerationContext {
            population: self.population.as_slice(),
            fitness: &self.cache,
            gene_space: &self.gene_space,
            crossover_proportion: self.config.crossover_proportion,
            mutation_probability: self.config.mutation_probability,
            iteration,
            max_iterations: self.config.max_iterations,
            population_size: self.config.population_size,
            selection: &[],
            offspring: &[],
        }
    }

    /// Reject operator output whose chromosomes do not fit the gene space
    fn check_output(
        &self,
        operator: &'static str,
        chromosomes: &[Chromosome],
    ) -> Result<(), OperatorError> {
        for (index, chromosome) in chromosomes.iter().enumerate() {
            chromosome
                .check_fits(&self.gene_space)
                .map_err(|source| OperatorError::ContractViolation {
                    operator,
                    index,
                    source,
                })?;
        }
        Ok(())
    }
}

impl<F, Fit, S, C, M> Engine<F, Fit, S, C, M>
where
    F: FitnessValue,
{
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gene_space(&self) -> &GeneSpace {
        &self.gene_space
    }

    pub fn stop_fitness(&self) -> Option<&F> {
        self.stop.stop_fitness.as_ref()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Population at the end of the last run
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Every fitness evaluated during the last run
    pub fn fitness_cache(&self) -> &FitnessCache<F> {
        &self.cache
    }

    /// Best member of the current population
    pub fn best(&self) -> Option<&BestIndividual<F>> {
        self.best.as_ref()
    }

    /// Generations completed in the last run
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn history(&self) -> &History<F> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::GenomeError;
    use crate::fitness::benchmarks::SumOfGenes;
    use crate::fitness::traits::FallibleFitness;
    use crate::history::recorder::JsonLinesRecorder;
    use crate::logging::tests::SharedBuffer;

    fn int_space() -> GeneSpace {
        GeneSpace::uniform(0.0, 10.0, 3, ElementKind::Integer).unwrap()
    }

    fn assert_invalid<T>(result: EvoResult<T>) {
        assert!(matches!(
            result,
            Err(EvolutionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_build_with_defaults() {
        let engine = Engine::builder()
            .gene_space(int_space())
            .fitness(SumOfGenes)
            .build()
            .unwrap();

        assert_eq!(engine.config(), &EngineConfig::default());
        assert_eq!(engine.state(), RunState::Initialized);
        assert!(engine.best().is_none());
        assert!(engine.stop_fitness().is_none());
    }

    #[test]
    fn test_build_rejects_invalid_parameters() {
        assert_invalid(
            Engine::builder()
                .gene_space(int_space())
                .fitness(SumOfGenes)
                .population_size(7)
                .build(),
        );
        assert_invalid(
            Engine::builder()
                .gene_space(int_space())
                .fitness(SumOfGenes)
                .crossover_proportion(1.5)
                .build(),
        );
        assert_invalid(
            Engine::builder()
                .gene_space(int_space())
                .fitness(SumOfGenes)
                .mutation_probability(f64::NAN)
                .build(),
        );
        assert_invalid(
            Engine::builder()
                .gene_space(int_space())
                .fitness(SumOfGenes)
                .stop_fitness(f64::NAN)
                .build(),
        );
        assert_invalid(Engine::builder().fitness(SumOfGenes).build());
    }

    #[test]
    fn test_bounds_table_errors_surface_at_build() {
        assert_invalid(
            Engine::builder()
                .bounds_table(&[[0.0, 10.0]], "str")
                .fitness(SumOfGenes)
                .build(),
        );
        assert_invalid(
            Engine::builder()
                .bounds_table(&[vec![0.0, 1.0, 2.0]], "int64")
                .fitness(SumOfGenes)
                .build(),
        );
        assert_invalid(
            Engine::builder()
                .bounds_table(&[[0.0, 2.0]], "bool")
                .fitness(SumOfGenes)
                .build(),
        );
    }

    #[test]
    fn test_seeding_mode_validated() {
        let space = GeneSpace::new(vec![(0.0, 1.0), (5.0, 6.0)], ElementKind::Float).unwrap();
        assert_invalid(
            Engine::builder()
                .gene_space(space)
                .fitness(SumOfGenes)
                .seeding(SeedingBounds::FirstGeneUpper)
                .build(),
        );
    }

    #[test]
    fn test_zero_iterations() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(SumOfGenes)
            .max_iterations(0)
            .build()
            .unwrap();

        let summary = engine.run_with_rng(&mut rng).unwrap();
        assert_eq!(summary.iterations, 0);
        assert_eq!(summary.termination, TerminationReason::MaxIterationsReached);
        assert!(engine.history().is_empty());
        assert_eq!(engine.population().len(), 10);
        assert_eq!(summary.evaluations, engine.fitness_cache().len());
    }

    #[test]
    fn test_one_snapshot_per_generation() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut engine = Engine::builder()
            .gene_space(GeneSpace::uniform(-5.0, 5.0, 4, ElementKind::Float).unwrap())
            .fitness(|c: &Chromosome| c.to_f64_vec().iter().map(|g| g * g).sum::<f64>())
            .max_iterations(6)
            .build()
            .unwrap();

        let summary = engine.run_with_rng(&mut rng).unwrap();
        assert_eq!(summary.iterations, 6);
        assert_eq!(engine.iterations(), 6);
        assert_eq!(engine.history().len(), 6);
        assert_eq!(
            engine.state(),
            RunState::Terminated(TerminationReason::MaxIterationsReached)
        );
        // The merged deltas cover every evaluation
        assert_eq!(
            engine.history().fitness_entries().len(),
            engine.fitness_cache().len()
        );
    }

    #[test]
    fn test_best_tracks_current_population() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(SumOfGenes)
            .population_size(12)
            .max_iterations(8)
            .build()
            .unwrap();
        engine.run_with_rng(&mut rng).unwrap();

        let history = engine.history();
        for (evaluated, best) in history.generations() {
            let min = evaluated
                .iter()
                .map(|i| i.fitness)
                .fold(f64::INFINITY, f64::min);
            assert_eq!(best.fitness, min);
        }
        let last = engine.population().best(engine.fitness_cache()).unwrap();
        assert_eq!(engine.best(), Some(&last));
    }

    #[test]
    fn test_stop_fitness_ends_run() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(|_: &Chromosome| 0_i64)
            .stop_fitness(0)
            .max_iterations(10)
            .build()
            .unwrap();

        let summary = engine.run_with_rng(&mut rng).unwrap();
        assert_eq!(summary.termination, TerminationReason::StopFitnessReached);
        assert_eq!(summary.iterations, 1);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_fitness_called_once_per_genome() {
        let mut rng = StdRng::seed_from_u64(5);
        let calls = AtomicUsize::new(0);
        let mut engine = Engine::builder()
            .gene_space(GeneSpace::uniform(0.0, 1.0, 2, ElementKind::Integer).unwrap())
            .fitness(|c: &Chromosome| {
                calls.fetch_add(1, Ordering::Relaxed);
                c.as_ints().unwrap().iter().sum::<i64>()
            })
            .max_iterations(5)
            .build()
            .unwrap();

        let summary = engine.run_with_rng(&mut rng).unwrap();
        // Only four distinct genomes exist
        assert!(engine.fitness_cache().len() <= 4);
        assert_eq!(calls.load(Ordering::Relaxed), engine.fitness_cache().len());
        assert_eq!(summary.evaluations, engine.fitness_cache().len());
    }

    #[test]
    fn test_fitness_failure_aborts() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(FallibleFitness::new(|_: &Chromosome| {
                Err::<f64, _>("simulator offline")
            }))
            .build()
            .unwrap();

        let err = engine.run_with_rng(&mut rng).unwrap_err();
        match err {
            EvolutionError::FitnessEvaluation { iteration, message } => {
                assert_eq!(iteration, 0);
                assert_eq!(message, "simulator offline");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(engine.state(), RunState::Aborted);
    }

    #[test]
    fn test_tiny_population_empties_and_aborts() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(SumOfGenes)
            .population_size(4)
            .max_iterations(5)
            .build()
            .unwrap();

        let err = engine.run_with_rng(&mut rng).unwrap_err();
        assert!(matches!(err, EvolutionError::EmptyPopulation));
        assert_eq!(engine.state(), RunState::Aborted);
    }

    #[test]
    fn test_nan_fitness_does_not_break_selection() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut engine = Engine::builder()
            .gene_space(GeneSpace::uniform(-5.0, 5.0, 3, ElementKind::Float).unwrap())
            .fitness(|c: &Chromosome| {
                let genes = c.to_f64_vec();
                if genes[0] < 0.0 {
                    f64::NAN
                } else {
                    genes.iter().map(|g| g * g).sum::<f64>()
                }
            })
            .population_size(200)
            .max_iterations(5)
            .build()
            .unwrap();

        let summary = engine.run_with_rng(&mut rng).unwrap();
        assert_eq!(summary.iterations, 5);
        assert!(!summary.best.fitness.is_nan());
        assert_eq!(
            engine.state(),
            RunState::Terminated(TerminationReason::MaxIterationsReached)
        );
    }

    struct ShortChildren;

    impl MutationOperator<f64> for ShortChildren {
        fn mutate<R: Rng>(
            &self,
            ctx: &GenerationContext<'_, f64>,
            _rng: &mut R,
        ) -> Result<Vec<Chromosome>, OperatorError> {
            Ok(ctx.offspring.iter().map(|_| Chromosome::from_ints(vec![1])).collect())
        }
    }

    #[test]
    fn test_malformed_operator_output_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(SumOfGenes)
            .mutation(ShortChildren)
            .build()
            .unwrap();

        let err = engine.run_with_rng(&mut rng).unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Operator(OperatorError::ContractViolation {
                operator: "mutation",
                index: 0,
                source: GenomeError::DimensionMismatch {
                    expected: 3,
                    actual: 1
                },
            })
        ));
    }

    #[test]
    fn test_verbose_progress_lines() {
        let mut rng = StdRng::seed_from_u64(8);
        let buffer = SharedBuffer::default();
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(SumOfGenes)
            .max_iterations(2)
            .verbose(true)
            .progress_writer(buffer.clone())
            .build()
            .unwrap();
        engine.run_with_rng(&mut rng).unwrap();

        let messages: Vec<String> = buffer
            .contents()
            .lines()
            .map(|line| line.split_once(" - ").unwrap().1.to_string())
            .collect();
        assert_eq!(messages[0], "Generating random population");
        assert_eq!(messages[1], "Evaluating initial population");
        assert_eq!(messages[2], "Running iterations");
        assert_eq!(messages[3], "Iteration 1 of 2");
        assert_eq!(messages[4], "\tSelecting population");
        assert!(messages.iter().any(|m| m == "Iteration 2 of 2"));
        assert!(messages
            .last()
            .unwrap()
            .starts_with("Current best individual: ["));
    }

    #[test]
    fn test_quiet_engine_prints_nothing() {
        let buffer = SharedBuffer::default();
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(SumOfGenes)
            .progress_writer(buffer.clone())
            .build()
            .unwrap();
        engine.run().unwrap();
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn test_external_recorder_receives_snapshots() {
        let mut rng = StdRng::seed_from_u64(9);
        let buffer = SharedBuffer::default();
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(SumOfGenes)
            .max_iterations(3)
            .recorder(JsonLinesRecorder::new(buffer.clone()))
            .build()
            .unwrap();
        engine.run_with_rng(&mut rng).unwrap();

        let lines: Vec<serde_json::Value> = buffer
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2]["iteration"], 3);
        // First snapshot carries the seeding evaluations
        assert!(lines[0]["fitness_delta"].as_array().unwrap().len() >= 1);
    }

    #[test]
    fn test_rerun_starts_fresh() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut engine = Engine::builder()
            .gene_space(int_space())
            .fitness(SumOfGenes)
            .max_iterations(4)
            .build()
            .unwrap();

        engine.run_with_rng(&mut rng).unwrap();
        let summary = engine.run_with_rng(&mut rng).unwrap();
        assert_eq!(engine.history().len(), summary.iterations);
        assert_eq!(summary.evaluations, engine.fitness_cache().len());
    }

    #[test]
    fn test_reproducible_with_seed() {
        let run = |seed| {
            let mut engine = Engine::builder()
                .gene_space(GeneSpace::uniform(1.0, 4.0, 5, ElementKind::Float).unwrap())
                .fitness(SumOfGenes)
                .build()
                .unwrap();
            engine
                .run_with_rng(&mut StdRng::seed_from_u64(seed))
                .unwrap()
                .best
        };
        assert_eq!(run(42), run(42));
    }
}
