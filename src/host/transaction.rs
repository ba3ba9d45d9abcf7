//! Transactional write scope
//!
//! Every write names its target entity, and the target must have been
//! locked on this transaction first. Writes are staged and applied in
//! order by `commit`; dropping the transaction discards them.

use crate::attributes::{AttributeDescriptor, AttributeScope, AttributeValue};
use crate::types::{MarkerId, WellId};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::Project;

/// Entity a transaction can hold an exclusive lock on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockTarget {
    Well(WellId),
    Marker(MarkerId),
    /// The catalogue of marker attributes
    MarkerAttributes,
}

impl fmt::Display for LockTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockTarget::Well(id) => write!(f, "well {id}"),
            LockTarget::Marker(id) => write!(f, "marker {id}"),
            LockTarget::MarkerAttributes => write!(f, "marker attribute collection"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransactionError {
    #[error("{0} is not locked by this transaction")]
    NotLocked(LockTarget),

    #[error("{0} does not exist")]
    UnknownTarget(LockTarget),

    #[error("marker attribute '{0}' does not exist")]
    UnknownAttribute(String),

    #[error("marker attribute '{0}' already exists")]
    DuplicateAttribute(String),

    #[error("value {value} for '{attribute}' is not of kind {expected}")]
    KindMismatch {
        attribute: String,
        value: AttributeValue,
        expected: crate::attributes::AttributeKind,
    },

    #[error("kelly bushing must be finite, got {0}")]
    NonFiniteElevation(f64),
}

#[derive(Debug, Clone)]
enum PendingWrite {
    KellyBushing { well: WellId, value: f64 },
    MarkerValue { marker: MarkerId, attribute: String, value: AttributeValue },
    CreateMarkerAttribute(AttributeDescriptor),
}

/// Exclusive write scope over a [`Project`].
pub struct Transaction<'p> {
    project: &'p mut Project,
    locks: HashSet<LockTarget>,
    pending: Vec<PendingWrite>,
}

impl<'p> Transaction<'p> {
    pub(crate) fn new(project: &'p mut Project) -> Self {
        Self {
            project,
            locks: HashSet::new(),
            pending: Vec::new(),
        }
    }

    /// Read access to the project as it was when the transaction opened.
    pub fn project(&self) -> &Project {
        self.project
    }

    /// Take an exclusive lock on an entity.
    pub fn lock(&mut self, target: LockTarget) -> Result<(), TransactionError> {
        let exists = match target {
            LockTarget::Well(id) => self.project.well(id).is_some(),
            LockTarget::Marker(id) => self.project.marker(id).is_some(),
            LockTarget::MarkerAttributes => true,
        };
        if !exists {
            return Err(TransactionError::UnknownTarget(target));
        }
        self.locks.insert(target);
        Ok(())
    }

    pub fn is_locked(&self, target: LockTarget) -> bool {
        self.locks.contains(&target)
    }

    fn require(&self, target: LockTarget) -> Result<(), TransactionError> {
        if self.is_locked(target) {
            Ok(())
        } else {
            Err(TransactionError::NotLocked(target))
        }
    }

    pub fn set_kelly_bushing(&mut self, well: WellId, value: f64) -> Result<(), TransactionError> {
        self.require(LockTarget::Well(well))?;
        if !value.is_finite() {
            return Err(TransactionError::NonFiniteElevation(value));
        }
        self.pending.push(PendingWrite::KellyBushing { well, value });
        Ok(())
    }

    /// Stage a marker attribute value. The value must already be in the attribute's kind.
    pub fn set_marker_value(
        &mut self,
        marker: MarkerId,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<(), TransactionError> {
        self.require(LockTarget::Marker(marker))?;
        let expected = self
            .project
            .marker_attribute(attribute)
            .or_else(|| self.staged_attribute(attribute))
            .map(|d| d.kind)
            .ok_or_else(|| TransactionError::UnknownAttribute(attribute.to_string()))?;
        if value.kind() != expected {
            return Err(TransactionError::KindMismatch {
                attribute: attribute.to_string(),
                value,
                expected,
            });
        }
        self.pending.push(PendingWrite::MarkerValue {
            marker,
            attribute: attribute.to_string(),
            value,
        });
        Ok(())
    }

    /// Stage a new marker attribute in the catalogue.
    pub fn create_marker_attribute(
        &mut self,
        descriptor: AttributeDescriptor,
    ) -> Result<(), TransactionError> {
        self.require(LockTarget::MarkerAttributes)?;
        if self.project.marker_attribute(&descriptor.name).is_some()
            || self.staged_attribute(&descriptor.name).is_some()
        {
            return Err(TransactionError::DuplicateAttribute(descriptor.name));
        }
        self.pending.push(PendingWrite::CreateMarkerAttribute(AttributeDescriptor {
            scope: AttributeScope::Marker,
            ..descriptor
        }));
        Ok(())
    }

    fn staged_attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.pending.iter().find_map(|w| match w {
            PendingWrite::CreateMarkerAttribute(d) if d.name == name => Some(d),
            _ => None,
        })
    }

    /// Number of staged writes.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Apply all staged writes and release the locks. Returns the number applied.
    pub fn commit(mut self) -> usize {
        let writes = std::mem::take(&mut self.pending);
        let count = writes.len();
        for write in writes {
            match write {
                PendingWrite::KellyBushing { well, value } => {
                    if let Some(w) = self.project.well_mut(well) {
                        w.kelly_bushing = value;
                    }
                }
                PendingWrite::MarkerValue { marker, attribute, value } => {
                    if let Some(m) = self.project.marker_mut(marker) {
                        // Undefined is stored as absence
                        if value.is_undefined() {
                            m.attributes.remove(&attribute);
                        } else {
                            m.attributes.insert(attribute, value);
                        }
                    }
                }
                PendingWrite::CreateMarkerAttribute(descriptor) => {
                    self.project.marker_attributes.push(descriptor);
                }
            }
        }
        if count > 0 {
            self.project.bump_revision();
        }
        debug!(writes = count, locks = self.locks.len(), "Transaction committed");
        count
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            debug!(discarded = self.pending.len(), "Transaction dropped without commit");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeKind, AttributeRole};
    use crate::types::{Horizon, Marker, Well};

    fn project() -> Project {
        let mut p = Project::new("T");
        let w = p.add_well(Well::new("W", 0.0, 0.0, 20.0));
        p.root.wells.push(w);
        p.horizons
            .push(Horizon::new("H").with_marker(Marker::new(w, 1000.0)));
        p
    }

    fn zone() -> AttributeDescriptor {
        AttributeDescriptor::new(
            "Zone",
            AttributeScope::Marker,
            AttributeRole::Discrete,
            AttributeKind::Integer,
        )
    }

    const M0: MarkerId = MarkerId { horizon: 0, index: 0 };

    #[test]
    fn test_write_requires_lock() {
        let mut p = project();
        let mut tx = p.begin();
        let err = tx.set_kelly_bushing(WellId(0), 30.0).unwrap_err();
        assert_eq!(err, TransactionError::NotLocked(LockTarget::Well(WellId(0))));
    }

    #[test]
    fn test_commit_applies_writes() {
        let mut p = project();
        let mut tx = p.begin();
        tx.lock(LockTarget::Well(WellId(0))).unwrap();
        tx.set_kelly_bushing(WellId(0), 31.5).unwrap();
        assert_eq!(tx.commit(), 1);
        assert_eq!(p.wells[0].kelly_bushing, 31.5);
    }

    #[test]
    fn test_only_applied_writes_bump_revision() {
        let mut p = project();
        {
            let mut tx = p.begin();
            tx.lock(LockTarget::Well(WellId(0))).unwrap();
            tx.set_kelly_bushing(WellId(0), 99.0).unwrap();
        }
        let mut tx = p.begin();
        tx.lock(LockTarget::Well(WellId(0))).unwrap();
        assert_eq!(tx.commit(), 0);
        assert_eq!(p.revision(), 0);

        let mut tx = p.begin();
        tx.lock(LockTarget::Well(WellId(0))).unwrap();
        tx.set_kelly_bushing(WellId(0), 31.5).unwrap();
        tx.commit();
        assert_eq!(p.revision(), 1);

        // Revision is not project content
        let mut fresh = project();
        fresh.wells[0].kelly_bushing = 31.5;
        assert_eq!(p, fresh);
    }

    #[test]
    fn test_drop_discards_writes() {
        let mut p = project();
        {
            let mut tx = p.begin();
            tx.lock(LockTarget::Well(WellId(0))).unwrap();
            tx.set_kelly_bushing(WellId(0), 99.0).unwrap();
        }
        assert_eq!(p.wells[0].kelly_bushing, 20.0);
    }

    #[test]
    fn test_lock_unknown_target() {
        let mut p = project();
        let mut tx = p.begin();
        assert!(matches!(
            tx.lock(LockTarget::Well(WellId(7))),
            Err(TransactionError::UnknownTarget(_))
        ));
    }

    #[test]
    fn test_create_attribute_then_write_in_same_transaction() {
        let mut p = project();
        let mut tx = p.begin();
        tx.lock(LockTarget::MarkerAttributes).unwrap();
        tx.create_marker_attribute(zone()).unwrap();
        tx.lock(LockTarget::Marker(M0)).unwrap();
        tx.set_marker_value(M0, "Zone", AttributeValue::Integer(3)).unwrap();
        tx.commit();
        assert_eq!(p.marker_attributes.len(), 1);
        assert_eq!(
            p.horizons[0].markers[0].attributes.get("Zone"),
            Some(&AttributeValue::Integer(3))
        );
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let mut p = project();
        p.marker_attributes.push(zone());
        let mut tx = p.begin();
        tx.lock(LockTarget::MarkerAttributes).unwrap();
        assert_eq!(
            tx.create_marker_attribute(zone()),
            Err(TransactionError::DuplicateAttribute("Zone".into()))
        );
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut p = project();
        p.marker_attributes.push(zone());
        let mut tx = p.begin();
        tx.lock(LockTarget::Marker(M0)).unwrap();
        let err = tx
            .set_marker_value(M0, "Zone", AttributeValue::Real(1.0))
            .unwrap_err();
        assert!(matches!(err, TransactionError::KindMismatch { .. }));
    }

    #[test]
    fn test_undefined_value_clears_marker_attribute() {
        let mut p = project();
        p.marker_attributes.push(zone());
        p.horizons[0].markers[0]
            .attributes
            .insert("Zone".into(), AttributeValue::Integer(2));
        let mut tx = p.begin();
        tx.lock(LockTarget::Marker(M0)).unwrap();
        tx.set_marker_value(M0, "Zone", AttributeValue::undefined(AttributeKind::Integer))
            .unwrap();
        tx.commit();
        assert!(p.horizons[0].markers[0].attributes.is_empty());
    }

    #[test]
    fn test_non_finite_kelly_bushing_rejected() {
        let mut p = project();
        let mut tx = p.begin();
        tx.lock(LockTarget::Well(WellId(0))).unwrap();
        assert_eq!(
            tx.set_kelly_bushing(WellId(0), f64::NAN).unwrap_err().to_string(),
            "kelly bushing must be finite, got NaN"
        );
    }
}
