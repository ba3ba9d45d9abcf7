//! Well collection flattening
//!
//! Depth-first: the wells directly in a collection come first, in stored
//! order, then each child collection's wells in child order. The host
//! guarantees a tree, so there is no cycle detection.

use crate::host::Project;
use crate::types::{WellCollection, WellId};

use super::ArgumentError;

/// All wells below `collection`, parent wells before descending.
pub fn flatten_wells(collection: &WellCollection) -> Vec<WellId> {
    let mut wells = Vec::new();
    collect(collection, &mut wells);
    wells
}

fn collect(collection: &WellCollection, out: &mut Vec<WellId>) {
    out.extend(collection.wells.iter().copied());
    for child in &collection.collections {
        collect(child, out);
    }
}

/// Resolve the collection argument. `None` is the "null collection" error,
/// distinct from a collection that resolves but holds no wells.
pub fn resolve_collection<'p>(
    project: &'p Project,
    path: Option<&str>,
) -> Result<&'p WellCollection, ArgumentError> {
    let path = path.ok_or(ArgumentError::MissingCollection)?;
    project
        .collection(path)
        .ok_or_else(|| ArgumentError::UnknownCollection(path.to_string()))
}
