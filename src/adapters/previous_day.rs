//! Multi-day contest chaining.
//!
//! Earlier days enter the current day's feed as already-final results: their
//! problems are merged into the contest info under a day prefix and their
//! runs are replayed once at offset zero. Each day's freeze was resolved
//! inside that day's own feed before it got here, so freezing stays a
//! per-day concern.

use std::collections::BTreeMap;

use super::UpdateAdapter;
use crate::event::ContestUpdate;
use crate::model::{ContestInfo, ProblemInfo, RunInfo, TeamInfo};
use crate::state::ContestState;

/// The final outcome of one earlier contest day.
#[derive(Debug, Clone)]
pub struct PreviousDay {
    pub info: ContestInfo,
    pub runs: Vec<RunInfo>,
}

impl PreviousDay {
    /// Capture a finished day from its folded state.
    pub fn from_state(state: &ContestState) -> Option<Self> {
        let info = state.info_after_event()?.as_ref().clone();
        let runs = state
            .runs_after_event()
            .values()
            .map(|run| run.as_ref().clone())
            .collect();
        Some(Self { info, runs })
    }
}

pub struct PreviousDayAdapter {
    days: Vec<PreviousDay>,
    replayed: bool,
}

impl PreviousDayAdapter {
    pub fn new(days: Vec<PreviousDay>) -> Self {
        Self {
            days,
            replayed: false,
        }
    }

    fn day_prefix(day: usize) -> String {
        format!("d{}.", day + 1)
    }

    /// Merge previous-day problems (day-prefixed, ordered before today's)
    /// and any teams today's info does not know into the current info.
    fn merge_info(&self, mut current: ContestInfo) -> ContestInfo {
        let mut problems: BTreeMap<_, ProblemInfo> = BTreeMap::new();
        let mut ordinal = 0u32;
        let mut extra_teams: Vec<TeamInfo> = Vec::new();
        for (day, previous) in self.days.iter().enumerate() {
            let prefix = Self::day_prefix(day);
            for problem in previous.info.scoreboard_problems() {
                let mut problem = problem.clone();
                problem.id = format!("{prefix}{}", problem.id).into();
                problem.ordinal = ordinal;
                ordinal += 1;
                problems.insert(problem.id.clone(), problem);
            }
            for team in previous.info.teams.values() {
                if !current.teams.contains_key(&team.id) {
                    extra_teams.push(team.clone());
                }
            }
        }
        let mut current_problems: Vec<&ProblemInfo> =
            current.problems.values().collect();
        current_problems.sort_by_key(|p| p.ordinal);
        let mut merged_current = BTreeMap::new();
        for problem in current_problems {
            let mut problem = problem.clone();
            problem.ordinal = ordinal;
            ordinal += 1;
            merged_current.insert(problem.id.clone(), problem);
        }
        problems.append(&mut merged_current);
        current.problems = problems;
        for team in extra_teams {
            current.teams.insert(team.id.clone(), team);
        }
        current
    }

    /// All previous-day runs, re-keyed under their day prefix at offset zero.
    fn replay_runs(&self) -> Vec<RunInfo> {
        let mut runs = Vec::new();
        for (day, previous) in self.days.iter().enumerate() {
            let prefix = Self::day_prefix(day);
            for run in &previous.runs {
                let mut run = run.clone();
                run.id = format!("{prefix}{}", run.id).into();
                run.problem_id = format!("{prefix}{}", run.problem_id).into();
                run.time = std::time::Duration::ZERO;
                runs.push(run);
            }
        }
        runs
    }
}

impl UpdateAdapter for PreviousDayAdapter {
    fn apply(&mut self, update: ContestUpdate, out: &mut Vec<ContestUpdate>) {
        match update {
            ContestUpdate::InfoUpdate(info) => {
                out.push(ContestUpdate::InfoUpdate(self.merge_info(info)));
                if !self.replayed {
                    self.replayed = true;
                    out.extend(self.replay_runs().into_iter().map(ContestUpdate::RunUpdate));
                }
            }
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::apply_all;
    use crate::model::Verdict;
    use crate::test_support::{contest_info, icpc_run};
    use crate::model::{ProblemInfo, TeamInfo};

    fn day_one() -> PreviousDay {
        PreviousDay {
            info: contest_info(
                vec![ProblemInfo::new("A", "A", 0)],
                vec![TeamInfo::new("t1", "one"), TeamInfo::new("t2", "two")],
            ),
            runs: vec![icpc_run("7", "t1", "A", 3600, Verdict::Accepted)],
        }
    }

    #[test]
    fn test_previous_day_merged_in_front() {
        let today = contest_info(
            vec![ProblemInfo::new("A", "A", 0), ProblemInfo::new("B", "B", 1)],
            vec![TeamInfo::new("t1", "one")],
        );
        let mut adapter = PreviousDayAdapter::new(vec![day_one()]);
        let out = apply_all(&mut adapter, [ContestUpdate::InfoUpdate(today)]);

        let ContestUpdate::InfoUpdate(info) = &out[0] else {
            panic!("expected info update");
        };
        let ids: Vec<&str> = info
            .scoreboard_problems()
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["d1.A", "A", "B"]);
        // The missing team came along, and the old run replays at offset 0.
        assert!(info.teams.contains_key(&"t2".into()));
        let ContestUpdate::RunUpdate(run) = &out[1] else {
            panic!("expected replayed run");
        };
        assert_eq!(run.id.as_str(), "d1.7");
        assert_eq!(run.problem_id.as_str(), "d1.A");
        assert_eq!(run.time, std::time::Duration::ZERO);
    }

    #[test]
    fn test_runs_replay_only_once() {
        let today = contest_info(
            vec![ProblemInfo::new("A", "A", 0)],
            vec![TeamInfo::new("t1", "one")],
        );
        let mut adapter = PreviousDayAdapter::new(vec![day_one()]);
        let first = apply_all(&mut adapter, [ContestUpdate::InfoUpdate(today.clone())]);
        let second = apply_all(&mut adapter, [ContestUpdate::InfoUpdate(today)]);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
    }
}
