//! Set Presentation - copy a reference well's color and/or symbol

use crate::config;
use crate::types::{Color, WellSymbol};
use crate::workflow::{
    flatten_wells, log_well_failure, resolve_collection, ArgumentError, Outcome, WellError,
    WellFilter, Workstep, WorkstepContext, WorkstepDescription, WorkstepError,
};
use tracing::debug;

pub static DESCRIPTION: WorkstepDescription = WorkstepDescription {
    name: "Set color",
    short_description: "Copy color and symbol of a reference well",
    description: "Sets the display color and/or well symbol of every well in the \
                  collection to those of the reference well.",
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetPresentationArgs {
    pub collection: Option<String>,
    /// Name of the well to copy from
    pub reference: Option<String>,
    /// Configured default when `None`
    pub set_color: Option<bool>,
    /// Configured default when `None`
    pub set_symbol: Option<bool>,
    pub filter: Option<String>,
}

/// Attributes written to one well; `None` for the ones left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationChange {
    pub color: Option<Color>,
    pub symbol: Option<WellSymbol>,
}

#[derive(Debug, Clone)]
pub struct SetPresentation {
    args: SetPresentationArgs,
}

impl SetPresentation {
    pub fn new(args: SetPresentationArgs) -> Self {
        Self { args }
    }
}

impl Workstep for SetPresentation {
    type Output = PresentationChange;

    fn description(&self) -> &'static WorkstepDescription {
        &DESCRIPTION
    }

    fn invoke(&self, ctx: &mut WorkstepContext<'_>) -> Result<Vec<Outcome<PresentationChange>>, WorkstepError> {
        let defaults = &config::get().presentation;
        let project = &*ctx.project;

        let collection = resolve_collection(project, self.args.collection.as_deref())?;
        let reference_name = self.args.reference.as_deref().ok_or(ArgumentError::MissingReferenceWell)?;
        let reference = project
            .well_id_by_name(reference_name)
            .ok_or_else(|| ArgumentError::UnknownWell(reference_name.to_string()))?;
        let set_color = self.args.set_color.unwrap_or(defaults.set_color);
        let set_symbol = self.args.set_symbol.unwrap_or(defaults.set_symbol);
        if !set_color && !set_symbol {
            return Err(ArgumentError::NoPresentationFlag.into());
        }
        let filter = WellFilter::resolve(project, self.args.filter.as_deref())?;

        let wells = flatten_wells(collection);
        if wells.is_empty() {
            return Err(WorkstepError::NoWells);
        }

        // Read once; the reference itself may be among the targets
        let source = project
            .presentation(reference)
            .cloned()
            .ok_or_else(|| ArgumentError::UnknownWell(reference_name.to_string()))?;
        let change = PresentationChange {
            color: set_color.then_some(source.color),
            symbol: set_symbol.then(|| source.symbol.clone()),
        };

        let mut outcomes = Vec::new();
        for well in filter.apply(ctx.project, &wells) {
            let name = ctx.project.well_name(well).to_string();
            match ctx.project.presentation_mut(well) {
                Ok(presentation) => {
                    if let Some(color) = change.color {
                        presentation.color = color;
                    }
                    if let Some(symbol) = &change.symbol {
                        presentation.symbol = symbol.clone();
                    }
                    debug!(well = %name, "Presentation updated");
                    outcomes.push(Outcome::success(name, change.clone()));
                }
                Err(e) => {
                    let e = WellError::from(e);
                    log_well_failure(&name, &e);
                    outcomes.push(Outcome::failure(name, e));
                }
            }
        }
        Ok(outcomes)
    }
}
