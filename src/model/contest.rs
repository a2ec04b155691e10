//! The contest snapshot: status, scoring configuration and entity lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::ids::{GroupId, LanguageId, OrganizationId, ProblemId, TeamId};
use super::problem::ProblemInfo;
use super::team::{GroupInfo, LanguageInfo, OrganizationInfo, TeamInfo};
use super::time::{duration_ms, opt_duration_ms};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContestResultType {
    Icpc,
    Ioi,
}

/// Lifecycle of a contest. Transitions move strictly forward:
/// Before -> Running -> Over -> Finalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContestStatus {
    Before {
        #[serde(default)]
        scheduled_start_at: Option<DateTime<Utc>>,
    },
    Running {
        started_at: DateTime<Utc>,
        #[serde(default)]
        frozen_at: Option<DateTime<Utc>>,
    },
    Over {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        #[serde(default)]
        frozen_at: Option<DateTime<Utc>>,
    },
    Finalized {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        finalized_at: DateTime<Utc>,
    },
}

impl ContestStatus {
    fn phase(&self) -> u8 {
        match self {
            ContestStatus::Before { .. } => 0,
            ContestStatus::Running { .. } => 1,
            ContestStatus::Over { .. } => 2,
            ContestStatus::Finalized { .. } => 3,
        }
    }

    /// Whether `next` is a legal successor (same phase or strictly later).
    pub fn allows_transition_to(&self, next: &ContestStatus) -> bool {
        self.phase() <= next.phase()
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, ContestStatus::Finalized { .. })
    }
}

/// How the penalty of a solved ICPC problem is derived from the accepted
/// submission time and the wrong attempts before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyRoundingMode {
    /// Round each accepted submission time down to a whole minute, then sum.
    #[default]
    EachSubmissionDownToMinute,
    /// Round each accepted submission time up to a whole minute, then sum.
    EachSubmissionUpToMinute,
    /// Sum exact times, then round the sum down to a whole minute.
    SumDownToMinute,
    /// Sum exact times without rounding.
    SumInSeconds,
    /// Time of the last accepted submission plus wrong-attempt penalties.
    Last,
    /// No penalty tie-break at all.
    Zero,
}

/// In case of rank ties at a medal boundary, `All` extends the medal to the
/// whole tied block while `None` cuts the band before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MedalTiebreakMode {
    #[default]
    All,
    None,
}

/// One rank-and-score based award band (medal, diploma, honorable mention).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedalSettings {
    pub id: String,
    pub citation: String,
    /// How many teams the band covers before tie-breaking.
    pub count: usize,
    /// Teams below this score are not eligible. Defaults to any positive
    /// score.
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub tiebreak_mode: MedalTiebreakMode,
}

/// An award granted manually to an explicit team list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAwardSettings {
    pub id: String,
    pub citation: String,
    pub team_ids: Vec<TeamId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AwardsSettings {
    /// If set, teams ranked first receive a winner award with this title.
    #[serde(default)]
    pub champion_title: Option<String>,
    /// Group-champion award titles per group id.
    #[serde(default)]
    pub groups_champion_titles: BTreeMap<GroupId, String>,
    /// Ordered medal bands, best first.
    #[serde(default)]
    pub medals: Vec<MedalSettings>,
    #[serde(default)]
    pub manual: Vec<ManualAwardSettings>,
}

/// Immutable snapshot of everything known about a contest.
///
/// Every info update replaces the whole snapshot; nothing is patched in
/// place, so readers can hold an `Arc<ContestInfo>` indefinitely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestInfo {
    pub name: String,
    pub status: ContestStatus,
    pub result_type: ContestResultType,
    #[serde(with = "duration_ms")]
    pub contest_length: Duration,
    /// Offset from contest start when the public scoreboard freezes.
    /// Must not exceed `contest_length`.
    #[serde(default, with = "opt_duration_ms")]
    pub freeze_time: Option<Duration>,
    pub problems: BTreeMap<ProblemId, ProblemInfo>,
    pub teams: BTreeMap<TeamId, TeamInfo>,
    #[serde(default)]
    pub groups: BTreeMap<GroupId, GroupInfo>,
    #[serde(default)]
    pub organizations: BTreeMap<OrganizationId, OrganizationInfo>,
    #[serde(default)]
    pub languages: BTreeMap<LanguageId, LanguageInfo>,
    #[serde(default)]
    pub penalty_rounding_mode: PenaltyRoundingMode,
    #[serde(default = "default_penalty_per_wrong_attempt", with = "duration_ms")]
    pub penalty_per_wrong_attempt: Duration,
    #[serde(default)]
    pub awards: AwardsSettings,
    /// Informational; set by the emulation adapter.
    #[serde(default = "default_emulation_speed")]
    pub emulation_speed: f64,
}

fn default_penalty_per_wrong_attempt() -> Duration {
    Duration::from_secs(20 * 60)
}

fn default_emulation_speed() -> f64 {
    1.0
}

impl ContestInfo {
    /// Problems that participate in scoreboards, in display order.
    pub fn scoreboard_problems(&self) -> Vec<&ProblemInfo> {
        let mut problems: Vec<&ProblemInfo> =
            self.problems.values().filter(|p| !p.is_hidden).collect();
        problems.sort_by_key(|p| p.ordinal);
        problems
    }

    /// Whether a run at `time` falls into the frozen part of the contest.
    pub fn is_after_freeze(&self, time: Duration) -> bool {
        matches!(self.freeze_time, Some(freeze) if time >= freeze)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions_forward_only() {
        let before = ContestStatus::Before {
            scheduled_start_at: None,
        };
        let running = ContestStatus::Running {
            started_at: Utc::now(),
            frozen_at: None,
        };
        assert!(before.allows_transition_to(&running));
        assert!(running.allows_transition_to(&running));
        assert!(!running.allows_transition_to(&before));
    }

    #[test]
    fn test_scoreboard_problems_ordered_and_filtered() {
        let mut problems = BTreeMap::new();
        for (id, ordinal, hidden) in [("b", 1u32, false), ("a", 0, false), ("x", 2, true)] {
            let mut p = ProblemInfo::new(id, &id.to_uppercase(), ordinal);
            p.is_hidden = hidden;
            problems.insert(p.id.clone(), p);
        }
        let info = ContestInfo {
            name: "test".into(),
            status: ContestStatus::Before {
                scheduled_start_at: None,
            },
            result_type: ContestResultType::Icpc,
            contest_length: Duration::from_secs(5 * 3600),
            freeze_time: Some(Duration::from_secs(4 * 3600)),
            problems,
            teams: BTreeMap::new(),
            groups: BTreeMap::new(),
            organizations: BTreeMap::new(),
            languages: BTreeMap::new(),
            penalty_rounding_mode: PenaltyRoundingMode::default(),
            penalty_per_wrong_attempt: Duration::from_secs(20 * 60),
            awards: AwardsSettings::default(),
            emulation_speed: 1.0,
        };
        let names: Vec<&str> = info
            .scoreboard_problems()
            .iter()
            .map(|p| p.display_name.as_str())
            .collect();
        assert_eq!(names, ["A", "B"]);
        assert!(info.is_after_freeze(Duration::from_secs(4 * 3600)));
        assert!(!info.is_after_freeze(Duration::from_secs(4 * 3600 - 1)));
    }
}
