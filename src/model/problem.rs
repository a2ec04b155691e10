//! Problems and IOI score merging configuration.

use serde::{Deserialize, Serialize};

use super::ids::ProblemId;

/// How repeated IOI submissions on one problem combine into one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMergeMode {
    /// Maximum score per declared score group, summed over groups.
    MaxPerGroup,
    /// Maximum total score over all submissions.
    MaxTotal,
    /// Score of the last submission.
    Last,
    /// Score of the last submission without a wrong verdict.
    LastOk,
    /// Sum of scores over all submissions.
    Sum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInfo {
    pub id: ProblemId,
    /// Short label shown on scoreboards ("A", "B", ...), unique per contest.
    pub display_name: String,
    pub full_name: String,
    /// Default display order.
    pub ordinal: u32,
    /// Solving this problem adds `weight` to the ICPC total score.
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub score_merge_mode: Option<ScoreMergeMode>,
    /// Hidden problems are removed from scoreboards; their runs are hidden
    /// by the hidden-entity adapter.
    #[serde(default)]
    pub is_hidden: bool,
}

fn default_weight() -> u32 {
    1
}

impl ProblemInfo {
    pub fn new(id: impl Into<ProblemId>, display_name: &str, ordinal: u32) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.to_string(),
            full_name: display_name.to_string(),
            ordinal,
            weight: 1,
            min_score: None,
            max_score: None,
            score_merge_mode: None,
            is_hidden: false,
        }
    }
}
