//! Well Worksteps: batch operations over a well project
//!
//! ## Architecture
//!
//! - **Types** (`types`, `attributes`): wells, collections, horizons, surfaces,
//!   history and typed attribute values
//! - **Host** (`host`): the in-memory project, its transactions and the
//!   coordinate/surface/prompt services the worksteps consume
//! - **Workflow** (`workflow`): collection flattening, well filter, nearest
//!   marker, the `Workstep` trait and the shared runner
//! - **Worksteps** (`worksteps`): KB shift, close wells, copy attributes,
//!   user history, set color
//! - **Config** (`config`): TOML defaults for workstep arguments

pub mod attributes;
pub mod config;
pub mod host;
pub mod types;
pub mod workflow;
pub mod worksteps;

// Re-export configuration
pub use config::WorkstepConfig;

// Re-export commonly used types
pub use attributes::{AttributeDescriptor, AttributeKind, AttributeValue};
pub use host::{Project, ProjectError};
pub use types::{Well, WellCollection, WellId};
pub use workflow::{execute, Outcome, Workstep, WorkstepContext, WorkstepError, WorkstepReport};
