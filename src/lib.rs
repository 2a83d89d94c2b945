//! # evo-min
//!
//! A small generational genetic algorithm that minimizes a fitness function
//! over a bounded gene space.
//!
//! ## Core Concepts
//!
//! - **Gene Space**: per-gene `[low, high]` bounds plus one element kind (boolean, integer or float)
//! - **Pluggable Operators**: selection, crossover and mutation all receive one read-only
//!   [`GenerationContext`](operators::context::GenerationContext)
//! - **Fitness Cache**: every distinct chromosome is evaluated once per run
//! - **History**: each generation is recorded and can be exported as JSON, binary or text
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use evo_min::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let mut engine = Engine::builder()
//!     .bounds_table(&[[0.0, 10.0]; 3], "int64")
//!     .fitness(SumOfGenes)
//!     .stop_fitness(0.0)
//!     .max_iterations(50)
//!     .build()?;
//!
//! let summary = engine.run_with_rng(&mut rng)?;
//! println!("{}", summary.best);
//! ```

pub mod algorithms;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod history;
pub mod logging;
pub mod operators;
pub mod population;
pub mod termination;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::history::prelude::*;
    pub use crate::logging::ProgressLog;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::termination::*;
}
