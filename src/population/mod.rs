//! Population management
//!
//! This module provides the population container and the evaluated
//! individual type.

pub mod individual;
#[allow(clippy::module_inception)]
pub mod population;

pub mod prelude {
    pub use super::individual::*;
    pub use super::population::*;
}
