//! Nearest marker selection

use crate::types::{Marker, MarkerId};

/// The shallowest marker (minimum measured depth). Ties keep the first one
/// seen; markers with a NaN depth are never picked.
pub fn nearest_marker<'a, I>(markers: I) -> Option<(MarkerId, &'a Marker)>
where
    I: IntoIterator<Item = (MarkerId, &'a Marker)>,
{
    markers.into_iter().fold(None, |best, candidate| match best {
        Some((_, current)) if candidate.1.md < current.md => Some(candidate),
        None if !candidate.1.md.is_nan() => Some(candidate),
        _ => best,
    })
}
