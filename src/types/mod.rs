//! Shared data structures for well workflow steps
//!
//! This module defines the domain objects the worksteps read and update:
//! - Wells: trajectory, kelly bushing, presentation, attribute values, history
//! - Well collections: the recursive folder tree wells are organised in
//! - Horizons and markers (well tops)
//! - Surfaces: regular grids in a vertical domain

mod well;
mod horizon;
mod surface;
mod history;

pub use well::*;
pub use horizon::*;
pub use surface::*;
pub use history::*;
