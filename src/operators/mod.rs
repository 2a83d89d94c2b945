//! Genetic operators
//!
//! This module provides the operator protocol (a read-only
//! [`GenerationContext`](context::GenerationContext) handed to every
//! operator) and the default selection, crossover and mutation operators.

pub mod context;
pub mod crossover;
pub mod mutation;
pub mod selection;
pub mod traits;

pub mod prelude {
    pub use super::context::*;
    pub use super::crossover::*;
    pub use super::mutation::*;
    pub use super::selection::*;
    pub use super::traits::*;
}
