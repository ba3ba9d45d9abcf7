//! Copy Attributes - push a well attribute down onto the well's horizon tops
//!
//! The value lands in the marker attribute of the same name. When the
//! horizon side has no such attribute yet it is created first, mirroring
//! the well attribute's kind and role. Values are converted to the marker
//! attribute's kind, so an existing marker attribute of another kind is
//! filled as far as the conversion allows.

use crate::attributes::{AttributeDescriptor, AttributeScope, AttributeValue};
use crate::host::{LockTarget, Project};
use crate::types::WellId;
use crate::workflow::{
    flatten_wells, log_well_failure, resolve_collection, ArgumentError, Outcome, WellError,
    WellFilter, Workstep, WorkstepContext, WorkstepDescription, WorkstepError,
};
use tracing::{debug, info};

pub static DESCRIPTION: WorkstepDescription = WorkstepDescription {
    name: "Copy attributes",
    short_description: "Copy a well attribute to the well tops of a horizon",
    description: "Writes the value of a well attribute to every well top of the horizon \
                  belonging to that well. The well top attribute is created when missing.",
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CopyAttributesArgs {
    pub collection: Option<String>,
    /// Well attribute to copy
    pub attribute: Option<String>,
    pub horizon: Option<String>,
    pub filter: Option<String>,
}

/// Value written to a well's tops.
#[derive(Debug, Clone, PartialEq)]
pub struct CopiedValue {
    pub value: AttributeValue,
    pub markers: usize,
}

#[derive(Debug, Clone)]
pub struct CopyAttributes {
    args: CopyAttributesArgs,
}

impl CopyAttributes {
    pub fn new(args: CopyAttributesArgs) -> Self {
        Self { args }
    }
}

impl Workstep for CopyAttributes {
    type Output = CopiedValue;

    fn description(&self) -> &'static WorkstepDescription {
        &DESCRIPTION
    }

    fn invoke(&self, ctx: &mut WorkstepContext<'_>) -> Result<Vec<Outcome<CopiedValue>>, WorkstepError> {
        let project = &*ctx.project;

        let collection = resolve_collection(project, self.args.collection.as_deref())?;
        let name = self.args.attribute.as_deref().ok_or(ArgumentError::MissingAttribute)?;
        let source = project
            .attribute(name)
            .ok_or_else(|| ArgumentError::UnknownAttribute(name.to_string()))?
            .clone();
        if source.scope != AttributeScope::Well {
            return Err(ArgumentError::InvalidWellAttribute(name.to_string()).into());
        }
        let horizon_name = self.args.horizon.as_deref().ok_or(ArgumentError::MissingHorizon)?;
        let horizon = project
            .horizon_index(horizon_name)
            .ok_or_else(|| ArgumentError::UnknownHorizon(horizon_name.to_string()))?;
        let filter = WellFilter::resolve(project, self.args.filter.as_deref())?;

        let wells = flatten_wells(collection);
        if wells.is_empty() {
            return Err(WorkstepError::NoWells);
        }
        if project.marker_count(horizon) == 0 {
            return Err(ArgumentError::EmptyHorizon(horizon_name.to_string()).into());
        }

        let target = ensure_marker_attribute(ctx.project, &source)?;

        let mut outcomes = Vec::new();
        for well in filter.apply(ctx.project, &wells) {
            let well_name = ctx.project.well_name(well).to_string();
            match copy_to_markers(ctx.project, well, horizon, &source, &target) {
                Ok(None) => {}
                Ok(Some(copied)) => {
                    debug!(well = %well_name, value = %copied.value, markers = copied.markers, "Copied");
                    outcomes.push(Outcome::success(well_name, copied));
                }
                Err(e) => {
                    log_well_failure(&well_name, &e);
                    outcomes.push(Outcome::failure(well_name, e));
                }
            }
        }
        Ok(outcomes)
    }
}

/// The marker attribute named like `source`, created when absent.
fn ensure_marker_attribute(
    project: &mut Project,
    source: &AttributeDescriptor,
) -> Result<AttributeDescriptor, WorkstepError> {
    if let Some(existing) = project.marker_attribute(&source.name) {
        return Ok(existing.clone());
    }

    let created = source.marker_counterpart();
    let mut tx = project.begin();
    tx.lock(LockTarget::MarkerAttributes)?;
    tx.create_marker_attribute(created.clone())?;
    tx.commit();
    info!(
        attribute = %created.name,
        kind = %created.kind,
        role = ?created.role,
        "Created well top attribute"
    );
    Ok(created)
}

/// Write one well's value to all of its tops. `None` when it has no tops.
fn copy_to_markers(
    project: &mut Project,
    well: WellId,
    horizon: usize,
    source: &AttributeDescriptor,
    target: &AttributeDescriptor,
) -> Result<Option<CopiedValue>, WellError> {
    let markers: Vec<_> = project
        .markers_for(horizon, well)
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    if markers.is_empty() {
        return Ok(None);
    }

    let value = project.well_value(well, source)?.convert(target.kind)?;

    let mut tx = project.begin();
    for marker in &markers {
        tx.lock(LockTarget::Marker(*marker))?;
        tx.set_marker_value(*marker, &target.name, value.clone())?;
    }
    tx.commit();

    Ok(Some(CopiedValue {
        value,
        markers: markers.len(),
    }))
}
