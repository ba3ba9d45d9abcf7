//! Coordinate transforms and surface intersection for the in-memory project
//!
//! Positions along a well are interpolated linearly between survey
//! stations. Elevation is `kelly_bushing - tvd`; TVDSS is `-elevation`.

use crate::types::{Point3, Surface, TrajectoryRecord, VerticalDomain, WellId};
use tracing::trace;

use super::{CoordinateTransform, HostError, Project, SurfaceIntersector};

/// Station at MD 0 implied by the well head.
fn head_record(x: f64, y: f64) -> TrajectoryRecord {
    TrajectoryRecord { md: 0.0, x, y, tvd: 0.0 }
}

/// Interpolate `(x, y, tvd)` at a measured depth.
fn interpolate(stations: &[TrajectoryRecord], md: f64) -> Option<(f64, f64, f64)> {
    let first = stations.first()?;
    if md <= first.md {
        return (md == first.md).then_some((first.x, first.y, first.tvd));
    }
    stations.windows(2).find_map(|pair| {
        let (a, b) = (pair[0], pair[1]);
        if md < a.md || md > b.md {
            return None;
        }
        let span = b.md - a.md;
        let t = if span > 0.0 { (md - a.md) / span } else { 0.0 };
        Some((
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.tvd + (b.tvd - a.tvd) * t,
        ))
    })
}

impl CoordinateTransform for Project {
    fn point_at_md(&self, well: WellId, md: f64, domain: VerticalDomain) -> Result<Point3, HostError> {
        let w = self.well(well).ok_or(HostError::UnknownWell(well))?;
        let bottom = w.bottom_md();

        let mut stations = Vec::with_capacity(w.trajectory.len() + 1);
        if w.trajectory.first().map_or(true, |r| r.md > 0.0) {
            stations.push(head_record(w.head_x, w.head_y));
        }
        stations.extend(w.trajectory.iter().copied());

        let (x, y, tvd) = if md.is_finite() && md >= 0.0 {
            interpolate(&stations, md)
        } else {
            None
        }
        .ok_or(HostError::OutsideTrajectory { md, bottom })?;

        let z = match domain {
            VerticalDomain::MeasuredDepth => md,
            VerticalDomain::Elevation => w.kelly_bushing - tvd,
            VerticalDomain::Tvdss => tvd - w.kelly_bushing,
        };
        trace!(well = %w.name, md, %domain, x, y, z, "Transformed MD");
        Ok(Point3::new(x, y, z))
    }

    fn convert_z(
        &self,
        well: WellId,
        z: f64,
        from: VerticalDomain,
        to: VerticalDomain,
    ) -> Result<f64, HostError> {
        use VerticalDomain::{Elevation, MeasuredDepth, Tvdss};

        if self.well(well).is_none() {
            return Err(HostError::UnknownWell(well));
        }
        match (from, to) {
            _ if from == to => Ok(z),
            (Elevation, Tvdss) | (Tvdss, Elevation) => Ok(-z),
            (MeasuredDepth, _) => self.point_at_md(well, z, to).map(|p| p.z),
            // MD from a vertical position would need the inverse trajectory
            _ => Err(HostError::UnsupportedConversion { from, to }),
        }
    }
}

impl SurfaceIntersector for Project {
    fn intersect_vertical(
        &self,
        surface: &Surface,
        x: f64,
        y: f64,
        z_min: f64,
        z_max: f64,
    ) -> Result<Vec<Point3>, HostError> {
        if !surface.is_well_formed() {
            return Err(HostError::MalformedSurface(surface.name.clone()));
        }
        let hits = surface
            .z_at(x, y)
            .filter(|z| (z_min..=z_max).contains(z))
            .map(|z| Point3::new(x, y, z))
            .into_iter()
            .collect();
        Ok(hits)
    }
}
