//! Interwell Distance - report well pairs whose bottoms are close together
//!
//! The bottom of a well is its deepest trajectory station (the well head for
//! a well without a survey). Every unordered pair of selected wells is
//! compared once by planar distance between bottoms; pairs strictly closer
//! than the threshold are reported in discovery order.

use crate::config;
use crate::host::{CoordinateTransform, HostError};
use crate::types::{Point3, VerticalDomain, WellId};
use crate::workflow::{
    flatten_wells, log_well_failure, resolve_collection, ArgumentError, Outcome, WellError,
    WellFilter, Workstep, WorkstepContext, WorkstepDescription, WorkstepError,
};
use tracing::info;

pub static DESCRIPTION: WorkstepDescription = WorkstepDescription {
    name: "Find close wells",
    short_description: "Find pairs of wells with close bottom holes",
    description: "Computes the horizontal distance between the bottom holes of every pair \
                  of wells in the collection and lists the pairs closer than Threshold.",
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterwellDistanceArgs {
    pub collection: Option<String>,
    /// Configured default when `None`
    pub threshold: Option<f64>,
    pub filter: Option<String>,
}

/// Two wells whose bottoms are closer than the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct DistancePair {
    pub first: WellId,
    pub first_name: String,
    pub second: WellId,
    pub second_name: String,
    pub distance: f64,
}

/// Horizontal distance between two points; z is ignored.
pub fn planar_distance(a: &Point3, b: &Point3) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Every pair `(i, j)` with `i < j` whose distance is below `threshold`,
/// as indices into `points`.
pub fn close_pairs(points: &[Point3], threshold: f64) -> Vec<(usize, usize, f64)> {
    let mut pairs = Vec::new();
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate().skip(i + 1) {
            let distance = planar_distance(a, b);
            if distance < threshold {
                pairs.push((i, j, distance));
            }
        }
    }
    pairs
}

#[derive(Debug, Clone)]
pub struct InterwellDistance {
    args: InterwellDistanceArgs,
}

impl InterwellDistance {
    pub fn new(args: InterwellDistanceArgs) -> Self {
        Self { args }
    }
}

impl Workstep for InterwellDistance {
    type Output = DistancePair;

    fn description(&self) -> &'static WorkstepDescription {
        &DESCRIPTION
    }

    fn invoke(&self, ctx: &mut WorkstepContext<'_>) -> Result<Vec<Outcome<DistancePair>>, WorkstepError> {
        let settings = &config::get().distance;
        let project = &*ctx.project;

        let collection = resolve_collection(project, self.args.collection.as_deref())?;
        let threshold = self.args.threshold.unwrap_or(settings.default_threshold);
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ArgumentError::NonPositiveThreshold(threshold).into());
        }
        let filter = WellFilter::resolve(project, self.args.filter.as_deref())?;

        let wells = flatten_wells(collection);
        if wells.is_empty() {
            return Err(WorkstepError::NoWells);
        }

        let mut outcomes = Vec::new();
        let mut bottoms: Vec<(WellId, Point3)> = Vec::new();
        for well in filter.apply(project, &wells) {
            let bottom = project
                .well(well)
                .map(|w| w.bottom_md())
                .ok_or(HostError::UnknownWell(well))
                .and_then(|md| project.point_at_md(well, md, VerticalDomain::Elevation));
            match bottom {
                Ok(point) => bottoms.push((well, point)),
                Err(e) => {
                    let name = project.well_name(well);
                    let e = WellError::from(e);
                    log_well_failure(name, &e);
                    outcomes.push(Outcome::failure(name, e));
                }
            }
        }

        let points: Vec<Point3> = bottoms.iter().map(|(_, p)| *p).collect();
        info!("Well 1\tWell 2\tDistance");
        for (i, j, distance) in close_pairs(&points, threshold) {
            let (first, second) = (bottoms[i].0, bottoms[j].0);
            let pair = DistancePair {
                first,
                first_name: project.well_name(first).to_string(),
                second,
                second_name: project.well_name(second).to_string(),
                distance,
            };
            info!(
                "{}\t{}\t{:.*}",
                pair.first_name, pair.second_name, settings.decimals, pair.distance
            );
            outcomes.push(Outcome::success(pair.first_name.clone(), pair));
        }
        Ok(outcomes)
    }
}
