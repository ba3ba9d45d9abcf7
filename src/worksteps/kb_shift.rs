//! KB Shift - move each well's kelly bushing so a horizon top lands on a target
//!
//! For every well with at least one top on the horizon, the shallowest top
//! is compared with the target elevation and the whole well is shifted
//! vertically by the difference:
//!
//! ```text
//! shift = target - top_z
//! ```
//!
//! The target is either a flat plane (`zflat`, elevation) or the point where
//! a vertical line through the top meets a surface. With a surface the
//! comparison and the KB update both happen in the surface's domain.

use crate::config;
use crate::host::{CoordinateTransform, HostError, LockTarget, Project, SurfaceIntersector};
use crate::types::{MarkerId, Surface, VerticalDomain, WellId};
use crate::workflow::{
    flatten_wells, log_well_failure, nearest_marker, resolve_collection, ArgumentError, Outcome,
    WellError, WellFilter, Workstep, WorkstepContext, WorkstepDescription, WorkstepError,
};
use tracing::{debug, info};

pub static DESCRIPTION: WorkstepDescription = WorkstepDescription {
    name: "Shift well KB",
    short_description: "Shift well KB to tie horizon tops to a surface or plane",
    description: "For each well, takes the shallowest top on the horizon and shifts the \
                  well's kelly bushing so that the top lands on the surface, or on the \
                  flat plane Zflat when no surface is given.",
};

const POSITIVE_ZFLAT_QUESTION: &str = "Zflat is positive. Do you want to continue?";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KbShiftArgs {
    /// `/`-separated collection path; `""` is the root
    pub collection: Option<String>,
    pub horizon: Option<String>,
    pub surface: Option<String>,
    /// Flat target elevation; the configured default when `None`
    pub zflat: Option<f64>,
    pub filter: Option<String>,
}

/// What happened to one shifted well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KbShiftResult {
    /// Top the shift was computed from
    pub marker: MarkerId,
    pub shift: f64,
    pub old_kelly_bushing: f64,
    pub new_kelly_bushing: f64,
}

/// Vertical shift that moves `source` onto `target`.
pub fn kb_shift(target: f64, source: f64) -> f64 {
    target - source
}

/// Where the tops should end up.
#[derive(Debug, Clone)]
enum Target {
    Flat(f64),
    Surface { surface: Surface, half_length: f64 },
}

impl Target {
    /// Domain the top and the target are compared in.
    fn domain(&self) -> VerticalDomain {
        match self {
            Target::Flat(_) => VerticalDomain::Elevation,
            Target::Surface { surface, .. } => surface.domain,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KbShift {
    args: KbShiftArgs,
}

impl KbShift {
    pub fn new(args: KbShiftArgs) -> Self {
        Self { args }
    }

    pub fn args(&self) -> &KbShiftArgs {
        &self.args
    }
}

impl Workstep for KbShift {
    type Output = KbShiftResult;

    fn description(&self) -> &'static WorkstepDescription {
        &DESCRIPTION
    }

    fn invoke(&self, ctx: &mut WorkstepContext<'_>) -> Result<Vec<Outcome<KbShiftResult>>, WorkstepError> {
        let settings = &config::get().kb_shift;
        let project = &*ctx.project;

        let collection = resolve_collection(project, self.args.collection.as_deref())?;
        let horizon_name = self.args.horizon.as_deref().ok_or(ArgumentError::MissingHorizon)?;
        let horizon = project
            .horizon_index(horizon_name)
            .ok_or_else(|| ArgumentError::UnknownHorizon(horizon_name.to_string()))?;
        let surface = self
            .args
            .surface
            .as_deref()
            .map(|name| {
                project
                    .surface(name)
                    .cloned()
                    .ok_or_else(|| ArgumentError::UnknownSurface(name.to_string()))
            })
            .transpose()?;
        let filter = WellFilter::resolve(project, self.args.filter.as_deref())?;

        // zflat is only read without a surface
        let zflat = self.args.zflat.unwrap_or(settings.default_zflat);
        if surface.is_none() && !zflat.is_finite() {
            return Err(ArgumentError::NonFinite { field: "Zflat", value: zflat }.into());
        }

        let wells = flatten_wells(collection);
        if wells.is_empty() {
            return Err(WorkstepError::NoWells);
        }

        let target = match surface {
            Some(surface) => Target::Surface {
                surface,
                half_length: settings.intersection_half_length,
            },
            None => {
                if zflat > 0.0
                    && settings.confirm_positive_zflat
                    && !ctx.prompt.confirm(DESCRIPTION.name, POSITIVE_ZFLAT_QUESTION)
                {
                    return Err(WorkstepError::Cancelled);
                }
                Target::Flat(zflat)
            }
        };
        debug!(horizon = horizon_name, domain = %target.domain(), wells = wells.len(), "KB shift prepared");

        let selected = filter.apply(ctx.project, &wells);
        let mut outcomes = Vec::with_capacity(selected.len());
        for well in selected {
            let name = ctx.project.well_name(well).to_string();
            match shift_well(ctx.project, well, horizon, &target) {
                Ok(None) => {}
                Ok(Some(result)) => {
                    info!("{}: KB shift = {:.*}", name, settings.decimals, result.shift);
                    outcomes.push(Outcome::success(name, result));
                }
                Err(e) => {
                    log_well_failure(&name, &e);
                    outcomes.push(Outcome::failure(name, e));
                }
            }
        }
        Ok(outcomes)
    }
}

/// Shift one well. `None` when it has no top on the horizon.
fn shift_well(
    project: &mut Project,
    well: WellId,
    horizon: usize,
    target: &Target,
) -> Result<Option<KbShiftResult>, WellError> {
    let Some((marker, md)) = nearest_marker(project.markers_for(horizon, well))
        .map(|(id, m)| (id, m.md))
    else {
        return Ok(None);
    };

    let domain = target.domain();
    let top = project.point_at_md(well, md, domain)?;
    let target_z = match target {
        Target::Flat(z) => *z,
        Target::Surface { surface, half_length } => project
            .intersect_vertical(surface, top.x, top.y, -half_length, *half_length)?
            .last()
            .map(|p| p.z)
            .ok_or(WellError::NoIntersection)?,
    };
    let shift = kb_shift(target_z, top.z);

    let old_kelly_bushing = project
        .well(well)
        .map(|w| w.kelly_bushing)
        .ok_or(HostError::UnknownWell(well))?;
    let new_kelly_bushing = match target {
        Target::Flat(_) => old_kelly_bushing + shift,
        Target::Surface { surface, .. } => {
            let kb = project.convert_z(well, old_kelly_bushing, VerticalDomain::Elevation, surface.domain)?;
            project.convert_z(well, kb + shift, surface.domain, VerticalDomain::Elevation)?
        }
    };

    let mut tx = project.begin();
    tx.lock(LockTarget::Well(well))?;
    tx.set_kelly_bushing(well, new_kelly_bushing)?;
    tx.commit();

    Ok(Some(KbShiftResult {
        marker,
        shift,
        old_kelly_bushing,
        new_kelly_bushing,
    }))
}
