//! Termination criteria
//!
//! A run ends either when the generation budget is spent or as soon as the
//! best fitness of a generation equals the configured stopping fitness.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fitness::traits::FitnessValue;

/// Why a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// A generation's best fitness equalled the stopping fitness
    StopFitnessReached,
    /// Every configured generation ran
    MaxIterationsReached,
}

impl TerminationReason {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::StopFitnessReached => "Stopping fitness value has been reached",
            Self::MaxIterationsReached => "Maximum iterations reached",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Combined stop test evaluated after every generation
#[derive(Clone, Debug)]
pub struct StopCondition<F: FitnessValue> {
    /// Exact fitness that ends the run early
    pub stop_fitness: Option<F>,
    /// Generation budget
    pub max_iterations: usize,
}

impl<F: FitnessValue> StopCondition<F> {
    pub fn new(stop_fitness: Option<F>, max_iterations: usize) -> Self {
        Self {
            stop_fitness,
            max_iterations,
        }
    }

    /// Check whether a best fitness ends the run
    ///
    /// Only exact equality counts; a fitness better than the target does not
    /// stop the run.
    pub fn reached(&self, best: &F) -> bool {
        self.stop_fitness.as_ref().is_some_and(|target| best == target)
    }

    /// Check the state after `completed` generations
    pub fn check(&self, completed: usize, best: &F) -> Option<TerminationReason> {
        if self.reached(best) {
            Some(TerminationReason::StopFitnessReached)
        } else if completed >= self.max_iterations {
            Some(TerminationReason::MaxIterationsReached)
        } else {
            None
        }
    }
}
