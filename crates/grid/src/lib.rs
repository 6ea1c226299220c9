//! # piena-grid
//!
//! Reads hourly precipitation grids from the MCM archive and static rasters
//! from disk, bridging external raster formats into piena's internal
//! `Vec<f64>` row-major arrays. Absent or unreadable frames are reported as
//! typed outcomes, never as escaping errors.

mod ascii;
mod error;
mod frame;
mod grid_ref;
mod store;

pub use ascii::{AsciiGrid, read_esri_ascii};
pub use error::GridError;
pub use frame::{Frame, FrameOutcome, FrameSource};
pub use grid_ref::GridRef;
pub use store::{GridStore, frame_file_name, parse_frame_time};
