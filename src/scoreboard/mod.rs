//! Scoreboard computation: per-team rows, ranking and awards.
//!
//! Everything here is a pure function of `(ContestInfo, runs)`. Rankings are
//! always recomputed from scratch, never patched incrementally; that keeps a
//! whole class of stale-rank bugs impossible and makes the three optimism
//! projections trivially independent.

mod awards;
mod icpc;
pub(crate) mod ioi;
mod penalty;

pub use awards::{validate_awards, Award};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::model::time::{duration_ms, opt_duration_ms};
use crate::model::{ContestInfo, ContestResultType, RunInfo, TeamId};

/// How not-yet-judged submissions are scored.
///
/// A per-computation parameter, not a global mode: the same run set is
/// scored all three ways on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimismLevel {
    Normal,
    Optimistic,
    Pessimistic,
}

impl OptimismLevel {
    pub const ALL: [OptimismLevel; 3] = [
        OptimismLevel::Normal,
        OptimismLevel::Optimistic,
        OptimismLevel::Pessimistic,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            OptimismLevel::Normal => 0,
            OptimismLevel::Optimistic => 1,
            OptimismLevel::Pessimistic => 2,
        }
    }
}

/// Per-problem cell of a scoreboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProblemResult {
    Icpc {
        wrong_attempts: u32,
        pending_attempts: u32,
        is_solved: bool,
        is_first_to_solve: bool,
        #[serde(default, with = "opt_duration_ms")]
        last_submit_time: Option<Duration>,
    },
    Ioi {
        score: Option<f64>,
        is_first_best: bool,
        #[serde(default, with = "opt_duration_ms")]
        last_submit_time: Option<Duration>,
    },
}

/// Fully derived scoreboard row of one team. Never hand-mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardRow {
    pub total_score: f64,
    #[serde(with = "duration_ms")]
    pub penalty: Duration,
    #[serde(with = "duration_ms")]
    pub last_accepted: Duration,
    pub problem_results: Vec<ProblemResult>,
}

/// Ranking over the eligible teams plus the awards derived from it.
///
/// `order` lists eligible team ids best first; `ranks[i]` is the rank of
/// `order[i]`. Ties share a rank and the next distinct rank is `i + 1`
/// (competition ranking, not dense).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Ranking {
    pub order: Vec<TeamId>,
    pub ranks: Vec<u32>,
    pub awards: Vec<Award>,
}

/// Compute one team's row from its runs, in submission order.
///
/// A team with no runs yields an all-zero row.
pub fn scoreboard_row(
    info: &ContestInfo,
    runs: &[Arc<RunInfo>],
    level: OptimismLevel,
) -> ScoreboardRow {
    match info.result_type {
        ContestResultType::Icpc => icpc::icpc_row(info, runs, level),
        ContestResultType::Ioi => ioi::ioi_row(info, runs),
    }
}

/// The team comparator shared by both result types:
/// total score descending, then penalty, then last accepted time.
pub(crate) fn compare_rows(a: &ScoreboardRow, b: &ScoreboardRow) -> Ordering {
    b.total_score
        .total_cmp(&a.total_score)
        .then_with(|| a.penalty.cmp(&b.penalty))
        .then_with(|| a.last_accepted.cmp(&b.last_accepted))
}

/// Rank the eligible teams and assign awards.
///
/// Hidden teams are absent entirely; out-of-contest teams keep their rows
/// but are excluded from `order`/`ranks` and from every award. The display
/// name breaks comparator ties deterministically without affecting ranks.
pub fn ranking(info: &ContestInfo, rows: &BTreeMap<TeamId, ScoreboardRow>) -> Ranking {
    let mut eligible: Vec<(&TeamId, &str, &ScoreboardRow)> = info
        .teams
        .values()
        .filter(|team| !team.is_hidden && !team.is_out_of_contest)
        .filter_map(|team| {
            rows.get(&team.id)
                .map(|row| (&team.id, team.display_name.as_str(), row))
        })
        .collect();
    eligible.sort_by(|a, b| compare_rows(a.2, b.2).then_with(|| a.1.cmp(b.1)));

    let mut ranks = vec![0u32; eligible.len()];
    let mut right = 0;
    while right < eligible.len() {
        let left = right;
        while right < eligible.len() && compare_rows(eligible[left].2, eligible[right].2).is_eq() {
            right += 1;
        }
        for rank in ranks.iter_mut().take(right).skip(left) {
            *rank = (left + 1) as u32;
        }
    }

    let order: Vec<TeamId> = eligible.iter().map(|(id, _, _)| (*id).clone()).collect();
    let awards = awards::assign(info, rows, &order, &ranks);
    Ranking {
        order,
        ranks,
        awards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProblemInfo, TeamInfo, Verdict};
    use crate::test_support::{contest_info, icpc_run, pending_run};

    fn rows_for(
        info: &ContestInfo,
        runs: Vec<RunInfo>,
        level: OptimismLevel,
    ) -> BTreeMap<TeamId, ScoreboardRow> {
        let mut by_team: BTreeMap<TeamId, Vec<Arc<RunInfo>>> = BTreeMap::new();
        for run in runs {
            by_team
                .entry(run.team_id.clone())
                .or_default()
                .push(Arc::new(run));
        }
        info.teams
            .keys()
            .map(|id| {
                let runs = by_team.get(id).map(Vec::as_slice).unwrap_or(&[]);
                (id.clone(), scoreboard_row(info, runs, level))
            })
            .collect()
    }

    #[test]
    fn test_tie_ranking_competition_style() {
        // Four teams, each solving A with no wrong attempts at 10, 30, 30
        // and 40 minutes: ranks [1, 2, 2, 4], tie broken by name in order.
        let info = contest_info(
            vec![ProblemInfo::new("A", "A", 0)],
            vec![
                TeamInfo::new("t1", "fast"),
                TeamInfo::new("t2", "mid-a"),
                TeamInfo::new("t3", "mid-b"),
                TeamInfo::new("t4", "slow"),
            ],
        );
        let runs = vec![
            icpc_run("1", "t1", "A", 10 * 60, Verdict::Accepted),
            icpc_run("2", "t2", "A", 30 * 60, Verdict::Accepted),
            icpc_run("3", "t3", "A", 30 * 60, Verdict::Accepted),
            icpc_run("4", "t4", "A", 40 * 60, Verdict::Accepted),
        ];
        let rows = rows_for(&info, runs, OptimismLevel::Normal);
        let ranking = ranking(&info, &rows);
        assert_eq!(ranking.ranks, vec![1, 2, 2, 4]);
        let order: Vec<&str> = ranking.order.iter().map(|t| t.as_str()).collect();
        assert_eq!(order, vec!["t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn test_hidden_and_out_of_contest_teams() {
        let mut hidden = TeamInfo::new("th", "ghost");
        hidden.is_hidden = true;
        let mut ooc = TeamInfo::new("to", "guest");
        ooc.is_out_of_contest = true;
        let info = contest_info(
            vec![ProblemInfo::new("A", "A", 0)],
            vec![TeamInfo::new("t1", "official"), hidden, ooc],
        );
        let runs = vec![
            icpc_run("1", "to", "A", 5 * 60, Verdict::Accepted),
            icpc_run("2", "t1", "A", 10 * 60, Verdict::Accepted),
        ];
        let rows = rows_for(&info, runs, OptimismLevel::Normal);
        let ranking = ranking(&info, &rows);
        // The guest team has a better row but no place in the order.
        assert_eq!(ranking.order, vec![TeamId::from("t1")]);
        assert_eq!(ranking.ranks, vec![1]);
        assert!(rows.contains_key(&TeamId::from("to")));
    }

    #[test]
    fn test_optimism_ordering_per_team() {
        let info = contest_info(
            vec![ProblemInfo::new("A", "A", 0), ProblemInfo::new("B", "B", 1)],
            vec![TeamInfo::new("t1", "one")],
        );
        let runs = vec![
            icpc_run("1", "t1", "A", 10 * 60, Verdict::Accepted),
            pending_run("2", "t1", "B", 20 * 60),
        ];
        let score = |level| {
            rows_for(&info, runs.clone(), level)
                .get(&TeamId::from("t1"))
                .unwrap()
                .total_score
        };
        let optimistic = score(OptimismLevel::Optimistic);
        let normal = score(OptimismLevel::Normal);
        let pessimistic = score(OptimismLevel::Pessimistic);
        assert!(optimistic >= normal && normal >= pessimistic);
        assert_eq!(optimistic, 2.0);
        assert_eq!(normal, 1.0);
        assert_eq!(pessimistic, 1.0);
    }

    #[test]
    fn test_team_with_no_runs_gets_zero_row() {
        let info = contest_info(
            vec![ProblemInfo::new("A", "A", 0)],
            vec![TeamInfo::new("t1", "one")],
        );
        let rows = rows_for(&info, vec![], OptimismLevel::Normal);
        let row = rows.get(&TeamId::from("t1")).unwrap();
        assert_eq!(row.total_score, 0.0);
        assert_eq!(row.penalty, Duration::ZERO);
        assert_eq!(row.last_accepted, Duration::ZERO);
        assert_eq!(row.problem_results.len(), 1);
    }
}
