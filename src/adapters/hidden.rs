//! Propagation of entity hiding onto teams and runs.
//!
//! Upstream marks groups and problems hidden or out-of-contest; the flags
//! belong on the entities that scoring actually reads. This stage folds
//! group flags into each team's flags and hides runs of hidden teams and
//! problems, re-emitting previously seen runs when an info update flips
//! their visibility.

use std::collections::BTreeMap;

use super::UpdateAdapter;
use crate::event::ContestUpdate;
use crate::model::{ContestInfo, RunId, RunInfo};

#[derive(Default)]
pub struct HiddenEntityAdapter {
    info: Option<ContestInfo>,
    /// Runs as received, before this stage touched their hidden flag.
    base_runs: BTreeMap<RunId, RunInfo>,
    emitted_hidden: BTreeMap<RunId, bool>,
}

impl HiddenEntityAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold group flags into team flags, returning the normalized info.
    fn normalize(mut info: ContestInfo) -> ContestInfo {
        let groups = info.groups.clone();
        for team in info.teams.values_mut() {
            for group_id in &team.groups {
                if let Some(group) = groups.get(group_id) {
                    team.is_hidden |= group.is_hidden;
                    team.is_out_of_contest |= group.is_out_of_contest;
                }
            }
        }
        info
    }

    fn effective_hidden(&self, run: &RunInfo) -> bool {
        let Some(info) = &self.info else {
            return run.is_hidden;
        };
        let team_hidden = info
            .teams
            .get(&run.team_id)
            .is_some_and(|team| team.is_hidden);
        let problem_hidden = info
            .problems
            .get(&run.problem_id)
            .is_some_and(|problem| problem.is_hidden);
        run.is_hidden || team_hidden || problem_hidden
    }
}

impl UpdateAdapter for HiddenEntityAdapter {
    fn apply(&mut self, update: ContestUpdate, out: &mut Vec<ContestUpdate>) {
        match update {
            ContestUpdate::InfoUpdate(info) => {
                let info = Self::normalize(info);
                self.info = Some(info.clone());
                out.push(ContestUpdate::InfoUpdate(info));
                // Visibility of already-seen runs may have flipped.
                for (id, base) in &self.base_runs {
                    let hidden = self.effective_hidden(base);
                    if self.emitted_hidden.get(id) != Some(&hidden) {
                        let mut run = base.clone();
                        run.is_hidden = hidden;
                        self.emitted_hidden.insert(id.clone(), hidden);
                        out.push(ContestUpdate::RunUpdate(run));
                    }
                }
            }
            ContestUpdate::RunUpdate(run) => {
                let hidden = self.effective_hidden(&run);
                self.base_runs.insert(run.id.clone(), run.clone());
                self.emitted_hidden.insert(run.id.clone(), hidden);
                let mut run = run;
                run.is_hidden = hidden;
                out.push(ContestUpdate::RunUpdate(run));
            }
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::apply_all;
    use crate::model::{GroupInfo, ProblemInfo, TeamInfo, Verdict};
    use crate::test_support::{contest_info, icpc_run};

    #[test]
    fn test_group_flags_fold_into_teams() {
        let mut team = TeamInfo::new("t1", "one");
        team.groups.insert("guests".into());
        let mut info = contest_info(vec![ProblemInfo::new("A", "A", 0)], vec![team]);
        info.groups.insert(
            "guests".into(),
            GroupInfo {
                id: "guests".into(),
                display_name: "Guests".into(),
                is_hidden: false,
                is_out_of_contest: true,
            },
        );
        let out = apply_all(
            &mut HiddenEntityAdapter::new(),
            [ContestUpdate::InfoUpdate(info)],
        );
        let ContestUpdate::InfoUpdate(info) = &out[0] else {
            panic!("expected info update");
        };
        assert!(info.teams.get(&"t1".into()).unwrap().is_out_of_contest);
    }

    #[test]
    fn test_hiding_a_problem_re_emits_its_runs() {
        let info = contest_info(
            vec![ProblemInfo::new("A", "A", 0)],
            vec![TeamInfo::new("t1", "one")],
        );
        let mut hidden_info = info.clone();
        hidden_info.problems.get_mut(&"A".into()).unwrap().is_hidden = true;

        let mut adapter = HiddenEntityAdapter::new();
        let out = apply_all(
            &mut adapter,
            [
                ContestUpdate::InfoUpdate(info),
                ContestUpdate::RunUpdate(icpc_run("1", "t1", "A", 60, Verdict::Accepted)),
                ContestUpdate::InfoUpdate(hidden_info),
            ],
        );
        let hidden_flags: Vec<bool> = out
            .iter()
            .filter_map(|u| match u {
                ContestUpdate::RunUpdate(run) => Some(run.is_hidden),
                _ => None,
            })
            .collect();
        assert_eq!(hidden_flags, vec![false, true]);
    }
}
