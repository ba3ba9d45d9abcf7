//! Worksteps
//!
//! Each workstep is a struct holding its arguments and implementing
//! [`Workstep`](crate::workflow::Workstep). Run one through
//! [`workflow::execute`](crate::workflow::execute).
//!
//! ## Worksteps
//!
//! 1. **KbShift** - tie horizon tops to a surface or flat plane by shifting KB
//! 2. **InterwellDistance** - pairs of wells with close bottom holes
//! 3. **CopyAttributes** - well attribute onto the well's horizon tops
//! 4. **FindUserHistory** - latest matching history entry per well
//! 5. **SetPresentation** - reference well color/symbol onto other wells

pub mod copy_attributes;
pub mod interwell_distance;
pub mod kb_shift;
pub mod presentation;
pub mod user_history;

#[cfg(test)]
pub(crate) mod fixtures;

pub use copy_attributes::{CopiedValue, CopyAttributes, CopyAttributesArgs};
pub use interwell_distance::{DistancePair, InterwellDistance, InterwellDistanceArgs};
pub use kb_shift::{KbShift, KbShiftArgs, KbShiftResult};
pub use presentation::{PresentationChange, SetPresentation, SetPresentationArgs};
pub use user_history::{FindUserHistory, FindUserHistoryArgs, HistoryMatch};

use crate::workflow::WorkstepDescription;

/// Descriptions of every workstep, in menu order.
pub fn all_descriptions() -> [&'static WorkstepDescription; 5] {
    [
        &kb_shift::DESCRIPTION,
        &interwell_distance::DESCRIPTION,
        &copy_attributes::DESCRIPTION,
        &user_history::DESCRIPTION,
        &presentation::DESCRIPTION,
    ]
}
