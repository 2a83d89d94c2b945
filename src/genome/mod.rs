//! Gene space and chromosome types
//!
//! This module provides the search-space description (per-gene bounds and
//! element kind) and the chromosome representation evolved by the engine.

pub mod bounds;
pub mod chromosome;

pub mod prelude {
    pub use super::bounds::*;
    pub use super::chromosome::*;
}
