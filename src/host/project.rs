//! In-memory project host
//!
//! A `Project` is the whole well database of one study: the well arena, the
//! collection tree referencing it, horizons with markers, surfaces and the
//! attribute catalogue. It is read from and written back to JSON.

use crate::attributes::{AttributeDescriptor, AttributeScope, AttributeValue, ConversionError};
use crate::types::{
    HistoryEntry, Horizon, Marker, MarkerId, Presentation, Surface, Well, WellCollection, WellId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::{HostError, Transaction};

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project parse error ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Project serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Project validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Project
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,

    /// Well arena; collections and markers refer to wells by index
    #[serde(default)]
    pub wells: Vec<Well>,

    /// Top of the well folder tree
    #[serde(default)]
    pub root: WellCollection,

    #[serde(default)]
    pub horizons: Vec<Horizon>,

    #[serde(default)]
    pub surfaces: Vec<Surface>,

    #[serde(default)]
    pub well_attributes: Vec<AttributeDescriptor>,

    #[serde(default)]
    pub marker_attributes: Vec<AttributeDescriptor>,

    /// Bumped by every applied write; not saved
    #[serde(skip)]
    revision: u64,
}

/// Content equality; the in-memory revision is ignored.
impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        let Project {
            name,
            wells,
            root,
            horizons,
            surfaces,
            well_attributes,
            marker_attributes,
            revision: _,
        } = self;
        *name == other.name
            && *wells == other.wells
            && *root == other.root
            && *horizons == other.horizons
            && *surfaces == other.surfaces
            && *well_attributes == other.well_attributes
            && *marker_attributes == other.marker_attributes
    }
}

impl Project {
    /// Empty project with a root collection named `Wells`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: WellCollection::new("Wells"),
            ..Self::default()
        }
    }

    /// Load from a JSON project file and check internal references.
    pub fn load_from_file(path: &Path) -> Result<Self, ProjectError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ProjectError::Io { path: path.to_path_buf(), source })?;
        let project: Self = serde_json::from_str(&contents)
            .map_err(|source| ProjectError::Parse { path: path.to_path_buf(), source })?;
        project.validate()?;
        info!(
            path = %path.display(),
            project = %project.name,
            wells = project.wells.len(),
            horizons = project.horizons.len(),
            "Loaded project"
        );
        Ok(project)
    }

    /// Write the project as pretty JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ProjectError> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|source| ProjectError::Io { path: path.to_path_buf(), source })?;
        info!(path = %path.display(), "Project saved");
        Ok(())
    }

    /// Reject dangling well references, unordered trajectories, duplicate
    /// attribute names, descriptors filed under the wrong scope and
    /// inconsistent surface grids.
    pub fn validate(&self) -> Result<(), ProjectError> {
        let mut errors = Vec::new();
        let well_count = self.wells.len();

        let mut seen = HashSet::new();
        self.check_collection(&self.root, well_count, &mut seen, &mut errors);

        for horizon in &self.horizons {
            for (i, marker) in horizon.markers.iter().enumerate() {
                if marker.well.0 >= well_count {
                    errors.push(format!(
                        "horizon '{}' marker {} refers to missing well {}",
                        horizon.name, i, marker.well
                    ));
                }
            }
        }

        for well in &self.wells {
            let unordered = well.trajectory.windows(2).any(|pair| {
                pair[0].md.partial_cmp(&pair[1].md).map_or(true, |order| order.is_gt())
            });
            if unordered {
                errors.push(format!("well '{}' trajectory is not ordered by MD", well.name));
            }
        }

        Self::check_descriptors(&self.well_attributes, AttributeScope::Well, &mut errors);
        Self::check_descriptors(&self.marker_attributes, AttributeScope::Marker, &mut errors);

        for surface in &self.surfaces {
            if !surface.is_well_formed() {
                errors.push(format!(
                    "surface '{}' has {} nodes for a {}x{} grid",
                    surface.name,
                    surface.z.len(),
                    surface.columns,
                    surface.rows
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProjectError::Validation(errors))
        }
    }

    fn check_collection(
        &self,
        collection: &WellCollection,
        well_count: usize,
        seen: &mut HashSet<WellId>,
        errors: &mut Vec<String>,
    ) {
        for id in &collection.wells {
            if id.0 >= well_count {
                errors.push(format!(
                    "collection '{}' refers to missing well {}",
                    collection.name, id
                ));
            } else if !seen.insert(*id) {
                errors.push(format!(
                    "well {} appears more than once in the collection tree",
                    id
                ));
            }
        }
        for child in &collection.collections {
            self.check_collection(child, well_count, seen, errors);
        }
    }

    fn check_descriptors(
        descriptors: &[AttributeDescriptor],
        scope: AttributeScope,
        errors: &mut Vec<String>,
    ) {
        let mut names = HashSet::new();
        for d in descriptors {
            if d.scope != scope {
                errors.push(format!(
                    "attribute '{}' is declared with scope {:?} but listed as {:?}",
                    d.name, d.scope, scope
                ));
            }
            if !names.insert(d.name.as_str()) {
                errors.push(format!("attribute '{}' declared twice", d.name));
            }
        }
    }

    // ------------------------------------------------------------------------
    // Builders (tests and tooling)
    // ------------------------------------------------------------------------

    /// Append a well to the arena without placing it in a collection.
    pub fn add_well(&mut self, well: Well) -> WellId {
        self.wells.push(well);
        WellId(self.wells.len() - 1)
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn well(&self, id: WellId) -> Option<&Well> {
        self.wells.get(id.0)
    }

    pub(crate) fn well_mut(&mut self, id: WellId) -> Option<&mut Well> {
        self.wells.get_mut(id.0)
    }

    pub fn well_name(&self, id: WellId) -> &str {
        self.well(id).map_or("<unknown well>", |w| w.name.as_str())
    }

    pub fn well_id_by_name(&self, name: &str) -> Option<WellId> {
        self.wells.iter().position(|w| w.name == name).map(WellId)
    }

    /// Collection at a `/`-separated path below the root.
    pub fn collection(&self, path: &str) -> Option<&WellCollection> {
        self.root.find(path)
    }

    pub fn horizon_index(&self, name: &str) -> Option<usize> {
        self.horizons.iter().position(|h| h.name == name)
    }

    pub fn surface(&self, name: &str) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.name == name)
    }

    /// Attribute by name, well attributes first.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.well_attributes
            .iter()
            .chain(self.marker_attributes.iter())
            .find(|d| d.name == name)
    }

    pub fn marker_attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.marker_attributes.iter().find(|d| d.name == name)
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.horizons.get(id.horizon)?.markers.get(id.index)
    }

    pub(crate) fn marker_mut(&mut self, id: MarkerId) -> Option<&mut Marker> {
        self.horizons.get_mut(id.horizon)?.markers.get_mut(id.index)
    }

    /// Markers of one well on one horizon, in stored order.
    pub fn markers_for(&self, horizon: usize, well: WellId) -> Vec<(MarkerId, &Marker)> {
        self.horizons
            .get(horizon)
            .map(|h| {
                h.markers
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| m.well == well)
                    .map(|(index, m)| (MarkerId { horizon, index }, m))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn marker_count(&self, horizon: usize) -> usize {
        self.horizons.get(horizon).map_or(0, |h| h.markers.len())
    }

    /// A well's value for an attribute, expressed in the descriptor's kind.
    ///
    /// Missing values read as undefined.
    pub fn well_value(
        &self,
        well: WellId,
        descriptor: &AttributeDescriptor,
    ) -> Result<AttributeValue, HostValueError> {
        let well = self.well(well).ok_or(HostValueError::Host(HostError::UnknownWell(well)))?;
        match well.attributes.get(&descriptor.name) {
            Some(stored) => Ok(stored.convert(descriptor.kind)?),
            None => Ok(AttributeValue::undefined(descriptor.kind)),
        }
    }

    pub fn presentation(&self, well: WellId) -> Option<&Presentation> {
        self.well(well).map(|w| &w.presentation)
    }

    pub(crate) fn presentation_mut(&mut self, well: WellId) -> Result<&mut Presentation, HostError> {
        let presentation = self
            .wells
            .get_mut(well.0)
            .map(|w| &mut w.presentation)
            .ok_or(HostError::UnknownWell(well))?;
        self.revision += 1;
        Ok(presentation)
    }

    pub fn history(&self, well: WellId) -> &[HistoryEntry] {
        self.well(well).map_or(&[], |w| w.history.as_slice())
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// Counter of applied writes since the project was created or loaded.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }

    /// Open a write scope. Nothing reaches the project until `commit`.
    pub fn begin(&mut self) -> Transaction<'_> {
        debug!("Transaction opened");
        Transaction::new(self)
    }
}

/// Reading an attribute can fail in the host or while converting the stored value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostValueError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
