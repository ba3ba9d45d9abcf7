//! Discrete well filter
//!
//! An optional integer discrete well attribute. A well passes when its value
//! is defined and non-zero; without a filter every well passes.

use crate::attributes::{AttributeDescriptor, AttributeScope, UNDEFINED_DISCRETE};
use crate::host::Project;
use crate::types::WellId;

use super::ArgumentError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WellFilter {
    descriptor: Option<AttributeDescriptor>,
}

impl WellFilter {
    /// A filter that accepts every well.
    pub fn none() -> Self {
        Self::default()
    }

    /// Resolve an optional filter attribute by name.
    ///
    /// The attribute must be a well-scoped integer discrete attribute.
    pub fn resolve(project: &Project, name: Option<&str>) -> Result<Self, ArgumentError> {
        let Some(name) = name else {
            return Ok(Self::none());
        };
        let descriptor = project
            .attribute(name)
            .ok_or_else(|| ArgumentError::UnknownAttribute(name.to_string()))?;
        if descriptor.scope != AttributeScope::Well || !descriptor.is_discrete_integer() {
            return Err(ArgumentError::FilterNotDiscrete(name.to_string()));
        }
        Ok(Self {
            descriptor: Some(descriptor.clone()),
        })
    }

    pub fn is_active(&self) -> bool {
        self.descriptor.is_some()
    }

    /// Whether a raw filter value lets a well through.
    pub fn passes(value: i32) -> bool {
        value != 0 && value != UNDEFINED_DISCRETE
    }

    pub fn accepts(&self, project: &Project, well: WellId) -> bool {
        let Some(descriptor) = &self.descriptor else {
            return true;
        };
        let value = project
            .well_value(well, descriptor)
            .ok()
            .and_then(|v| v.as_integer())
            .unwrap_or(UNDEFINED_DISCRETE);
        Self::passes(value)
    }

    /// Keep the accepted wells, preserving order.
    pub fn apply(&self, project: &Project, wells: &[WellId]) -> Vec<WellId> {
        wells
            .iter()
            .copied()
            .filter(|w| self.accepts(project, *w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeKind, AttributeRole, AttributeValue};
    use crate::types::Well;

    fn project() -> Project {
        let mut p = Project::new("T");
        for (name, tag) in [("A", Some(1)), ("B", Some(0)), ("C", None), ("D", Some(-4))] {
            let mut w = Well::new(name, 0.0, 0.0, 0.0);
            if let Some(tag) = tag {
                w.attributes.insert("Use".into(), AttributeValue::Integer(tag));
            }
            let id = p.add_well(w);
            p.root.wells.push(id);
        }
        p.wells[2]
            .attributes
            .insert("Porosity".into(), AttributeValue::Real(0.2));
        p.well_attributes.push(AttributeDescriptor::new(
            "Use",
            AttributeScope::Well,
            AttributeRole::Discrete,
            AttributeKind::Integer,
        ));
        p.well_attributes.push(AttributeDescriptor::new(
            "Porosity",
            AttributeScope::Well,
            AttributeRole::Continuous,
            AttributeKind::Real,
        ));
        p
    }

    #[test]
    fn test_passes_rules() {
        assert!(!WellFilter::passes(0));
        assert!(!WellFilter::passes(UNDEFINED_DISCRETE));
        assert!(WellFilter::passes(1));
        assert!(WellFilter::passes(-1));
        assert!(WellFilter::passes(i32::MAX));
    }

    #[test]
    fn test_no_filter_accepts_everything() {
        let p = project();
        let wells: Vec<_> = p.root.wells.clone();
        assert_eq!(WellFilter::none().apply(&p, &wells), wells);
    }

    #[test]
    fn test_filter_excludes_zero_and_undefined() {
        let p = project();
        let filter = WellFilter::resolve(&p, Some("Use")).unwrap();
        assert!(filter.is_active());
        let kept = filter.apply(&p, &p.root.wells);
        assert_eq!(kept, vec![WellId(0), WellId(3)]);
    }

    #[test]
    fn test_continuous_filter_rejected() {
        let p = project();
        assert_eq!(
            WellFilter::resolve(&p, Some("Porosity")).unwrap_err(),
            ArgumentError::FilterNotDiscrete("Porosity".into())
        );
    }

    #[test]
    fn test_unknown_filter_rejected() {
        let p = project();
        assert_eq!(
            WellFilter::resolve(&p, Some("Nope")).unwrap_err(),
            ArgumentError::UnknownAttribute("Nope".into())
        );
    }
}
