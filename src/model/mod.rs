//! Canonical contest data model.
//!
//! One internal schema for every upstream judging system. Wire-protocol
//! adapters translate their own vocabulary into these types at the boundary;
//! nothing downstream of the accumulator ever sees an upstream quirk.

pub mod contest;
pub mod ids;
pub mod problem;
pub mod run;
pub mod team;
pub mod time;

pub use contest::{
    AwardsSettings, ContestInfo, ContestResultType, ContestStatus, ManualAwardSettings,
    MedalSettings, MedalTiebreakMode, PenaltyRoundingMode,
};
pub use ids::{CommentaryId, GroupId, LanguageId, OrganizationId, ProblemId, RunId, TeamId};
pub use problem::{ProblemInfo, ScoreMergeMode};
pub use run::{RunInfo, RunResult, Verdict};
pub use team::{GroupInfo, LanguageInfo, OrganizationInfo, TeamInfo};
