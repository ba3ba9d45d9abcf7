//! Host Services
//!
//! The worksteps never own wells, surfaces or dialogs; they consume them from
//! a host. This module defines the collaborator seams and ships one host:
//! an in-memory [`Project`] loaded from a JSON project file.
//!
//! ## Seams
//!
//! - [`CoordinateTransform`]: measured depth to positions, z between domains
//! - [`SurfaceIntersector`]: vertical line against a surface
//! - [`UserPrompt`]: modal confirmation / error / warning boxes
//!
//! Writes go through a [`Transaction`] which must lock an entity before it
//! accepts a write to it, and applies everything at once on commit.

mod project;
mod prompt;
mod transaction;
mod transform;

pub use project::{HostValueError, Project, ProjectError};
pub use prompt::{ConsolePrompt, PromptKind, RecordingPrompt};
pub use transaction::{LockTarget, Transaction, TransactionError};

use crate::types::{Point3, Surface, VerticalDomain, WellId};
use thiserror::Error;

/// Failure reported by a host service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("unknown well {0}")]
    UnknownWell(WellId),

    #[error("measured depth {md:.2} is outside the trajectory (0 - {bottom:.2})")]
    OutsideTrajectory { md: f64, bottom: f64 },

    #[error("cannot convert z from {from} to {to}")]
    UnsupportedConversion {
        from: VerticalDomain,
        to: VerticalDomain,
    },

    #[error("surface '{0}' has an inconsistent grid")]
    MalformedSurface(String),
}

/// Converts well positions between vertical domains.
pub trait CoordinateTransform {
    /// Position along the well at a measured depth, z in `domain`.
    fn point_at_md(&self, well: WellId, md: f64, domain: VerticalDomain) -> Result<Point3, HostError>;

    /// Re-express a z value of this well from one domain in another.
    fn convert_z(
        &self,
        well: WellId,
        z: f64,
        from: VerticalDomain,
        to: VerticalDomain,
    ) -> Result<f64, HostError>;
}

/// Intersects geometry with surfaces.
pub trait SurfaceIntersector {
    /// Intersections of the vertical segment `(x, y, z_min..=z_max)` with the surface,
    /// z in the surface's domain. Empty when the line misses the surface.
    fn intersect_vertical(
        &self,
        surface: &Surface,
        x: f64,
        y: f64,
        z_min: f64,
        z_max: f64,
    ) -> Result<Vec<Point3>, HostError>;
}

/// Blocking user-facing messages.
pub trait UserPrompt {
    /// Yes/No question; `true` continues.
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    fn error(&mut self, title: &str, message: &str);

    fn warning(&mut self, title: &str, message: &str);
}
