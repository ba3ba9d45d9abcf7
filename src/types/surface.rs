//! Gridded surfaces and vertical domains

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vertical axis a z value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalDomain {
    /// Measured depth along hole from the kelly bushing
    MeasuredDepth,
    /// Elevation relative to datum, positive up
    Elevation,
    /// True vertical depth sub-sea, positive down (`-elevation`)
    Tvdss,
}

impl fmt::Display for VerticalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerticalDomain::MeasuredDepth => write!(f, "MD"),
            VerticalDomain::Elevation => write!(f, "elevation"),
            VerticalDomain::Tvdss => write!(f, "TVDSS"),
        }
    }
}

/// Regular lattice surface. Nodes are stored row-major (`row * columns + column`);
/// `None` marks an undefined node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub name: String,
    pub domain: VerticalDomain,
    pub origin_x: f64,
    pub origin_y: f64,
    pub increment_x: f64,
    pub increment_y: f64,
    pub columns: usize,
    pub rows: usize,
    pub z: Vec<Option<f64>>,
}

impl Surface {
    /// A constant surface covering `columns x rows` nodes.
    pub fn flat(
        name: impl Into<String>,
        domain: VerticalDomain,
        origin: (f64, f64),
        increment: f64,
        size: (usize, usize),
        z: f64,
    ) -> Self {
        Self {
            name: name.into(),
            domain,
            origin_x: origin.0,
            origin_y: origin.1,
            increment_x: increment,
            increment_y: increment,
            columns: size.0,
            rows: size.1,
            z: vec![Some(z); size.0 * size.1],
        }
    }

    /// Node count and increments are consistent.
    pub fn is_well_formed(&self) -> bool {
        self.columns >= 2
            && self.rows >= 2
            && self.columns.checked_mul(self.rows) == Some(self.z.len())
            && self.increment_x > 0.0
            && self.increment_y > 0.0
    }

    fn node(&self, column: usize, row: usize) -> Option<f64> {
        self.z.get(row * self.columns + column).copied().flatten()
    }

    /// Bilinear z at a map location, `None` outside the grid or next to an undefined node.
    pub fn z_at(&self, x: f64, y: f64) -> Option<f64> {
        if !self.is_well_formed() || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let u = (x - self.origin_x) / self.increment_x;
        let v = (y - self.origin_y) / self.increment_y;
        let max_u = (self.columns - 1) as f64;
        let max_v = (self.rows - 1) as f64;
        if u < 0.0 || v < 0.0 || u > max_u || v > max_v {
            return None;
        }

        // Clamp so points on the last row/column use the final cell
        let column = (u.floor() as usize).min(self.columns - 2);
        let row = (v.floor() as usize).min(self.rows - 2);
        let fu = u - column as f64;
        let fv = v - row as f64;

        let z00 = self.node(column, row)?;
        let z10 = self.node(column + 1, row)?;
        let z01 = self.node(column, row + 1)?;
        let z11 = self.node(column + 1, row + 1)?;

        let bottom = z00 + (z10 - z00) * fu;
        let top = z01 + (z11 - z01) * fu;
        Some(bottom + (top - bottom) * fv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilted() -> Surface {
        // z = -1000 - x / 10, two by two cells of 100 m
        let mut z = Vec::new();
        for _row in 0..3 {
            for column in 0..3 {
                z.push(Some(-1000.0 - f64::from(column) * 10.0));
            }
        }
        Surface {
            name: "Tilted".into(),
            domain: VerticalDomain::Elevation,
            origin_x: 0.0,
            origin_y: 0.0,
            increment_x: 100.0,
            increment_y: 100.0,
            columns: 3,
            rows: 3,
            z,
        }
    }

    #[test]
    fn test_z_at_interpolates() {
        let s = tilted();
        let z = s.z_at(150.0, 42.0).unwrap();
        assert!((z - -1015.0).abs() < 1e-9);
    }

    #[test]
    fn test_z_at_grid_edge() {
        let s = tilted();
        let z = s.z_at(200.0, 200.0).unwrap();
        assert!((z - -1020.0).abs() < 1e-9);
    }

    #[test]
    fn test_z_at_outside_is_none() {
        let s = tilted();
        assert!(s.z_at(-1.0, 50.0).is_none());
        assert!(s.z_at(50.0, 250.0).is_none());
    }

    #[test]
    fn test_undefined_node_gives_none() {
        let mut s = tilted();
        s.z[4] = None;
        assert!(s.z_at(150.0, 150.0).is_none());
        // cell (0,0) touches node 4 (column 1, row 1)
        assert!(s.z_at(10.0, 10.0).is_none());
    }

    #[test]
    fn test_malformed_surface() {
        let mut s = tilted();
        s.z.pop();
        assert!(!s.is_well_formed());
        assert!(s.z_at(50.0, 50.0).is_none());
    }

    #[test]
    fn test_oversized_grid_is_malformed() {
        let mut s = tilted();
        s.columns = usize::MAX;
        assert!(!s.is_well_formed());
        assert!(s.z_at(50.0, 50.0).is_none());
    }
}
