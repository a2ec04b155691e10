//! The contest update event: the single closed input type of the engine.
//!
//! Every producer (protocol adapter, emulation adapter, previous-day
//! chaining) speaks this enum and nothing else. Extending the contract means
//! adding a variant here and handling it in every exhaustive match.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::model::time::duration_ms;
use crate::model::{CommentaryId, ContestInfo, ProblemId, RunInfo, TeamId};

/// A human-readable commentary message attached to the contest timeline.
/// Stored by the accumulator, never consulted by scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryMessage {
    pub id: CommentaryId,
    pub message: String,
    /// Offset from contest start.
    #[serde(with = "duration_ms")]
    pub relative_time: Duration,
    #[serde(default)]
    pub team_ids: Vec<TeamId>,
    #[serde(default)]
    pub problem_ids: Vec<ProblemId>,
}

/// One element of the totally ordered event stream of a contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContestUpdate {
    /// A full replacement snapshot of the contest configuration.
    InfoUpdate(ContestInfo),
    /// A new submission or a rejudge of an existing one (same run id).
    RunUpdate(RunInfo),
    /// Commentary; stored separately, never affects scoring.
    CommentaryUpdate(CommentaryMessage),
}

impl ContestUpdate {
    /// The contest-relative offset this event is anchored to, used by the
    /// replay scheduler. Info updates carry no offset of their own.
    pub fn relative_time(&self) -> Option<Duration> {
        match self {
            ContestUpdate::InfoUpdate(_) => None,
            ContestUpdate::RunUpdate(run) => Some(run.time),
            ContestUpdate::CommentaryUpdate(msg) => Some(msg.relative_time),
        }
    }
}
