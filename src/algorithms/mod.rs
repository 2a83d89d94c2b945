//! Evolutionary algorithms
//!
//! This module provides the generational evolution engine and its
//! configuration.

pub mod config;
pub mod engine;

pub mod prelude {
    pub use super::config::*;
    pub use super::engine::*;
}
