//! Horizons and their markers (well tops)

use crate::attributes::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::WellId;

/// Address of a marker: horizon index plus position in that horizon's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId {
    pub horizon: usize,
    pub index: usize,
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.horizon, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub well: WellId,
    /// Measured depth of the pick
    pub md: f64,
    /// Marker attribute values keyed by attribute name; absent means undefined
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Marker {
    pub fn new(well: WellId, md: f64) -> Self {
        Self {
            well,
            md,
            attributes: BTreeMap::new(),
        }
    }
}

/// A stratigraphic horizon; may have several markers per well.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Horizon {
    pub name: String,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl Horizon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markers: Vec::new(),
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }
}
