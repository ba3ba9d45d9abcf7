//! Workstep Framework
//!
//! Every workstep follows the same shape: validate arguments, flatten the
//! well collection, walk the wells, write through transactions and log.
//! This module holds the shared pieces.
//!
//! ## Error tiers
//!
//! - **Configuration** ([`ArgumentError`], [`WorkstepError::NoWells`]): found
//!   before any write, shown to the user, nothing changes.
//! - **Per well** ([`WellError`]): folded into an [`Outcome`]; the batch continues.
//! - **Unexpected** (host or transaction failure outside a well): logged with
//!   "Execution failed", remaining wells are not processed.
//!
//! ## Usage
//!
//! ```ignore
//! let step = KbShift::new(KbShiftArgs { horizon: Some("Top Brent".into()), ..Default::default() });
//! let mut ctx = WorkstepContext::new(&mut project, &mut prompt);
//! let report = workflow::execute(&step, &mut ctx)?;
//! for failure in report.failures() { /* ... */ }
//! ```

pub mod filter;
pub mod flatten;
pub mod markers;

pub use filter::WellFilter;
pub use flatten::{flatten_wells, resolve_collection};
pub use markers::nearest_marker;

use crate::attributes::ConversionError;
use crate::host::{HostError, HostValueError, Project, TransactionError, UserPrompt};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};

// ============================================================================
// Descriptions
// ============================================================================

/// Static metadata shown in the host's workflow editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkstepDescription {
    pub name: &'static str,
    pub short_description: &'static str,
    pub description: &'static str,
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid or missing workstep arguments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentError {
    #[error("Well collection can't be null")]
    MissingCollection,

    #[error("Well collection '{0}' not found")]
    UnknownCollection(String),

    #[error("Horizon can't be null")]
    MissingHorizon,

    #[error("Horizon '{0}' not found")]
    UnknownHorizon(String),

    #[error("Surface '{0}' not found")]
    UnknownSurface(String),

    #[error("Well attribute can't be null")]
    MissingAttribute,

    #[error("Attribute '{0}' not found")]
    UnknownAttribute(String),

    #[error("Well attribute is invalid: '{0}' is not a well attribute")]
    InvalidWellAttribute(String),

    #[error("Filter must be discrete: '{0}' is not an integer discrete well attribute")]
    FilterNotDiscrete(String),

    #[error("Threshold must be positive, got {0}")]
    NonPositiveThreshold(f64),

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Reference well can't be null")]
    MissingReferenceWell,

    #[error("Well '{0}' not found")]
    UnknownWell(String),

    #[error("Either SetColor or SetSymbol must be set")]
    NoPresentationFlag,

    #[error("No well tops in horizon '{0}'")]
    EmptyHorizon(String),
}

/// Failure processing one well. The batch continues with the next well.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WellError {
    #[error("intersection not found")]
    NoIntersection,

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl From<HostValueError> for WellError {
    fn from(err: HostValueError) -> Self {
        match err {
            HostValueError::Host(e) => WellError::Host(e),
            HostValueError::Conversion(e) => WellError::Conversion(e),
        }
    }
}

/// Reason a whole invocation stopped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkstepError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("Wells not found")]
    NoWells,

    #[error("Cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl WorkstepError {
    /// Configuration problems are detected before anything is written.
    pub fn is_configuration(&self) -> bool {
        matches!(self, WorkstepError::Argument(_) | WorkstepError::NoWells)
    }
}

// ============================================================================
// Outcomes & Reports
// ============================================================================

/// Result of processing one well (or one well pair).
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub well: String,
    pub result: Result<T, WellError>,
}

impl<T> Outcome<T> {
    pub fn success(well: impl Into<String>, value: T) -> Self {
        Self {
            well: well.into(),
            result: Ok(value),
        }
    }

    pub fn failure(well: impl Into<String>, error: WellError) -> Self {
        Self {
            well: well.into(),
            result: Err(error),
        }
    }
}

/// Aggregated per-well outcomes of one invocation.
#[derive(Debug, Clone)]
pub struct WorkstepReport<T> {
    pub workstep: &'static str,
    pub outcomes: Vec<Outcome<T>>,
    pub elapsed: Duration,
    /// Whether any write reached the project, including writes shared by
    /// all wells such as a created marker attribute
    pub changed: bool,
}

impl<T> WorkstepReport<T> {
    /// Successful values with their well names, in processing order.
    pub fn successes(&self) -> impl Iterator<Item = (&str, &T)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|v| (o.well.as_str(), v)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &WellError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.well.as_str(), e)))
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

// ============================================================================
// Workstep Trait & Runner
// ============================================================================

/// What a workstep can touch while it runs.
pub struct WorkstepContext<'a> {
    pub project: &'a mut Project,
    pub prompt: &'a mut dyn UserPrompt,
}

impl<'a> WorkstepContext<'a> {
    pub fn new(project: &'a mut Project, prompt: &'a mut dyn UserPrompt) -> Self {
        Self { project, prompt }
    }
}

/// A host-invokable workflow step with fixed arguments.
pub trait Workstep {
    /// Value produced for each successfully processed well.
    type Output;

    fn description(&self) -> &'static WorkstepDescription;

    /// Validate arguments, then process every well.
    ///
    /// Must not write anything before returning a configuration error.
    fn invoke(&self, ctx: &mut WorkstepContext<'_>) -> Result<Vec<Outcome<Self::Output>>, WorkstepError>;
}

/// Run a workstep with the standard reporting around it.
///
/// Configuration errors are shown through the prompt; unexpected errors are
/// logged followed by "Execution failed". On success "Execution complete"
/// and the elapsed time are logged.
pub fn execute<W: Workstep>(
    step: &W,
    ctx: &mut WorkstepContext<'_>,
) -> Result<WorkstepReport<W::Output>, WorkstepError> {
    let title = step.description().name;
    let start = Instant::now();
    let revision = ctx.project.revision();
    info!(workstep = title, "Starting workstep");

    match step.invoke(ctx) {
        Ok(outcomes) => {
            let elapsed = start.elapsed();
            let report = WorkstepReport {
                workstep: title,
                outcomes,
                elapsed,
                changed: ctx.project.revision() != revision,
            };
            info!(
                workstep = title,
                succeeded = report.success_count(),
                failed = report.failure_count(),
                "Execution complete"
            );
            info!("Execution time: {:?}", elapsed);
            Ok(report)
        }
        Err(WorkstepError::NoWells) => {
            ctx.prompt.warning(title, &WorkstepError::NoWells.to_string());
            Err(WorkstepError::NoWells)
        }
        Err(WorkstepError::Argument(e)) => {
            ctx.prompt.error(title, &e.to_string());
            Err(WorkstepError::Argument(e))
        }
        Err(WorkstepError::Cancelled) => {
            info!(workstep = title, "Cancelled by user, nothing changed");
            Err(WorkstepError::Cancelled)
        }
        Err(e) => {
            error!("{}", e);
            error!("Execution failed");
            Err(e)
        }
    }
}

/// Log one well's failure in the `<well>: <reason>` form.
pub(crate) fn log_well_failure(well: &str, err: &WellError) {
    warn!(well, "{}: {}", well, err);
}
