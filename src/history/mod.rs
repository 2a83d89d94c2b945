//! Run history
//!
//! This module provides the per-generation recorder interface, the
//! in-memory [`History`](recorder::History) and its import/export formats.

pub mod export;
pub mod recorder;

pub mod prelude {
    pub use super::export::*;
    pub use super::recorder::*;
}
