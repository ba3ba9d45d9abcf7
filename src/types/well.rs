//! Wells, well collections and presentation

use crate::attributes::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::HistoryEntry;

/// Index of a well in the project's well list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WellId(pub usize);

impl fmt::Display for WellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point in project coordinates. `z` is interpreted in whatever vertical
/// domain produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One survey station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    /// Measured depth along hole from the kelly bushing
    pub md: f64,
    pub x: f64,
    pub y: f64,
    /// True vertical depth below the kelly bushing
    pub tvd: f64,
}

// ============================================================================
// Presentation
// ============================================================================

/// 24-bit display color, written as `#rrggbb` in project files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{s}' must start with '#'"))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("color '{s}' must have six hex digits"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("color '{s}': {e}"))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Map symbol drawn at the well head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WellSymbol {
    pub id: u32,
    pub name: String,
}

impl Default for WellSymbol {
    fn default() -> Self {
        Self {
            id: 0,
            name: "Undefined".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Presentation {
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub symbol: WellSymbol,
}

// ============================================================================
// Well
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    pub name: String,

    /// Elevation of the kelly bushing (vertical reference), positive up
    pub kelly_bushing: f64,

    /// Surface location
    pub head_x: f64,
    pub head_y: f64,

    /// Survey stations ordered by measured depth
    #[serde(default)]
    pub trajectory: Vec<TrajectoryRecord>,

    #[serde(default)]
    pub presentation: Presentation,

    /// Well attribute values keyed by attribute name; absent means undefined
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Well {
    pub fn new(name: impl Into<String>, head_x: f64, head_y: f64, kelly_bushing: f64) -> Self {
        Self {
            name: name.into(),
            kelly_bushing,
            head_x,
            head_y,
            trajectory: Vec::new(),
            presentation: Presentation::default(),
            attributes: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    /// Deepest measured depth of the trajectory, 0 for a well without survey.
    pub fn bottom_md(&self) -> f64 {
        self.trajectory
            .iter()
            .map(|r| r.md)
            .fold(0.0, |deepest, md| if md > deepest { md } else { deepest })
    }
}

// ============================================================================
// Well Collection
// ============================================================================

/// Folder of wells. Collections nest; the host guarantees there are no cycles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WellCollection {
    pub name: String,
    #[serde(default)]
    pub wells: Vec<WellId>,
    #[serde(default)]
    pub collections: Vec<WellCollection>,
}

impl WellCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wells: Vec::new(),
            collections: Vec::new(),
        }
    }

    pub fn with_wells(mut self, wells: impl IntoIterator<Item = WellId>) -> Self {
        self.wells.extend(wells);
        self
    }

    pub fn with_collection(mut self, child: WellCollection) -> Self {
        self.collections.push(child);
        self
    }

    /// Find a descendant by `/`-separated path of child names. An empty path is `self`.
    pub fn find(&self, path: &str) -> Option<&WellCollection> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |current, segment| {
                current.collections.iter().find(|c| c.name == segment)
            })
    }
}
