//! Engine error taxonomy.
//!
//! Only foreign-key violations are ever rejected by the fold; the policy for
//! them is drop-and-log, applied uniformly. Configuration problems fail fast
//! at startup. Replay running out of events is completion, not an error.

use thiserror::Error;

use crate::model::{ProblemId, RunId, TeamId};

/// An event referencing an id unknown to the latest contest info.
///
/// The fold drops such events and logs them; it never crashes and never
/// coerces the reference into a guess.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEvent {
    #[error("run {run} references unknown team {team}")]
    UnknownTeam { run: RunId, team: TeamId },
    #[error("run {run} references unknown problem {problem}")]
    UnknownProblem { run: RunId, problem: ProblemId },
    #[error("run {run} arrived before any contest info")]
    NoContestInfo { run: RunId },
}

/// Invalid award, penalty or emulation configuration. Raised once at
/// startup; the engine never starts with a bad config.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("emulation speed must be positive, got {0}")]
    NonPositiveSpeed(f64),
    #[error("freeze time {freeze_ms}ms exceeds contest length {length_ms}ms")]
    FreezeAfterEnd { freeze_ms: u64, length_ms: u64 },
    #[error("medal band {0:?} has zero count")]
    EmptyMedalBand(String),
    #[error("duplicate award id {0:?}")]
    DuplicateAwardId(String),
    #[error("invalid awards file {path}: {source}")]
    UnreadableAwards {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}
