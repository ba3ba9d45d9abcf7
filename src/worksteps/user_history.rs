//! Find User History - latest run of an operation by a user, per well

use crate::types::HistoryEntry;
use crate::workflow::{
    flatten_wells, resolve_collection, Outcome, Workstep, WorkstepContext, WorkstepDescription,
    WorkstepError,
};
use chrono::{DateTime, Utc};
use tracing::info;

pub static DESCRIPTION: WorkstepDescription = WorkstepDescription {
    name: "Find user history",
    short_description: "Find the latest operation of a user on each well",
    description: "Searches the history of every well for entries made by User with \
                  operation Action and prints the most recent one with its arguments.",
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindUserHistoryArgs {
    pub collection: Option<String>,
    pub user: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMatch {
    pub began: DateTime<Utc>,
    pub arguments: String,
}

/// The entry by `user` for `action` with the latest start. Exact string
/// matches only; on equal start times the earlier entry wins.
pub fn latest_matching<'a>(
    entries: &'a [HistoryEntry],
    user: &str,
    action: &str,
) -> Option<&'a HistoryEntry> {
    entries
        .iter()
        .filter(|e| e.user == user && e.operation == action)
        .fold(None, |best: Option<&HistoryEntry>, e| match best {
            Some(b) if e.began <= b.began => Some(b),
            _ => Some(e),
        })
}

#[derive(Debug, Clone)]
pub struct FindUserHistory {
    args: FindUserHistoryArgs,
}

impl FindUserHistory {
    pub fn new(args: FindUserHistoryArgs) -> Self {
        Self { args }
    }
}

impl Workstep for FindUserHistory {
    type Output = HistoryMatch;

    fn description(&self) -> &'static WorkstepDescription {
        &DESCRIPTION
    }

    fn invoke(&self, ctx: &mut WorkstepContext<'_>) -> Result<Vec<Outcome<HistoryMatch>>, WorkstepError> {
        let project = &*ctx.project;
        let collection = resolve_collection(project, self.args.collection.as_deref())?;
        let wells = flatten_wells(collection);
        if wells.is_empty() {
            return Err(WorkstepError::NoWells);
        }

        let outcomes = wells
            .into_iter()
            .filter_map(|well| {
                let entry = latest_matching(project.history(well), &self.args.user, &self.args.action)?;
                let name = project.well_name(well);
                info!("{} {} {}", name, entry.began, entry.arguments);
                Some(Outcome::success(
                    name,
                    HistoryMatch {
                        began: entry.began,
                        arguments: entry.arguments.clone(),
                    },
                ))
            })
            .collect();
        Ok(outcomes)
    }
}
