//! Built-in default constants.
//!
//! Every value here can be overridden in `worksteps.toml`.

// ============================================================================
// KB Shift
// ============================================================================

/// Flat target plane used when no surface is given (elevation, m).
pub const DEFAULT_ZFLAT: f64 = 0.0;

/// Half-length of the vertical line intersected with the reference surface.
///
/// Large enough to cross any surface in either depth convention.
pub const INTERSECTION_HALF_LENGTH: f64 = 1e10;

// ============================================================================
// Interwell Distance
// ============================================================================

/// Default distance threshold between well bottoms (project units).
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 50.0;

/// Decimals printed for reported distances.
pub const DISTANCE_DECIMALS: usize = 1;

/// Decimals printed for KB shifts.
pub const SHIFT_DECIMALS: usize = 2;

// ============================================================================
// Presentation
// ============================================================================

pub const DEFAULT_SET_COLOR: bool = true;
pub const DEFAULT_SET_SYMBOL: bool = true;

// ============================================================================
// Logging
// ============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";
