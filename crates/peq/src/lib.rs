//! # piena-peq
//!
//! Converts cumulated precipitation into equivalent precipitation with the
//! SCS curve number method, using the initial abstraction ratio form. The
//! transform collapses the soil retention term so zones with permeable
//! soils report lower equivalent depths than the raw cumulate.

mod error;
mod transform;

pub use error::PeqError;
pub use transform::{peq0, transform_row};
