//! Fitness evaluation
//!
//! This module provides fitness traits, the per-run fitness cache and a few
//! benchmark functions.

pub mod benchmarks;
pub mod cache;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::*;
    pub use super::cache::*;
    pub use super::traits::*;
}
