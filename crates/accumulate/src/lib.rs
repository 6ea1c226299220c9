//! # piena-accumulate
//!
//! Combines hourly precipitation frames into fixed-duration cumulative
//! grids. All configured durations share the tail of the same timeline, so
//! each hour is read exactly once and the running sum of the shorter
//! durations is reused as a prefix for the longer ones.

mod cumulative;
mod error;
mod window;

pub use cumulative::{CumulativeGrid, FrameProblem};
pub use error::AccumulateError;
pub use window::accumulate;
