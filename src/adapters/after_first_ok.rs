//! Hiding of submissions made after a team's first accepted run.
//!
//! Once a team has an accepted run on a problem, later submissions to it
//! change nothing and only clutter broadcasts. They get `is_hidden` set
//! here; a rejudge that revokes the accept recomputes the whole group and
//! un-hides them again.

use std::collections::BTreeMap;

use super::UpdateAdapter;
use crate::event::ContestUpdate;
use crate::model::{ProblemId, RunId, RunInfo, TeamId};

#[derive(Default)]
pub struct AfterFirstOkAdapter {
    /// Runs as received, keyed per team-problem cell, before this stage's
    /// own hiding.
    cells: BTreeMap<(TeamId, ProblemId), BTreeMap<RunId, RunInfo>>,
    emitted_hidden: BTreeMap<RunId, bool>,
}

impl AfterFirstOkAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute hiding for one cell. Returns the runs whose effective flag
    /// changed, in submission order.
    fn recompute(&mut self, team: &TeamId, problem: &ProblemId) -> Vec<RunInfo> {
        let Some(cell) = self.cells.get(&(team.clone(), problem.clone())) else {
            return Vec::new();
        };
        let mut ordered: Vec<&RunInfo> = cell.values().collect();
        ordered.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.cmp(&b.id)));

        let first_ok = ordered
            .iter()
            .position(|run| !run.is_hidden && run.is_accepted());
        let mut changed = Vec::new();
        for (index, base) in ordered.iter().enumerate() {
            let after_ok = first_ok.is_some_and(|ok| index > ok);
            let hidden = base.is_hidden || after_ok;
            if self.emitted_hidden.get(&base.id) != Some(&hidden) {
                let mut run = (*base).clone();
                run.is_hidden = hidden;
                changed.push(run);
            }
        }
        for run in &changed {
            self.emitted_hidden.insert(run.id.clone(), run.is_hidden);
        }
        changed
    }
}

impl UpdateAdapter for AfterFirstOkAdapter {
    fn apply(&mut self, update: ContestUpdate, out: &mut Vec<ContestUpdate>) {
        let ContestUpdate::RunUpdate(run) = update else {
            out.push(update);
            return;
        };
        let key = (run.team_id.clone(), run.problem_id.clone());
        self.cells
            .entry(key)
            .or_default()
            .insert(run.id.clone(), run.clone());

        let mut changed = self.recompute(&run.team_id, &run.problem_id);
        // Side effects on other runs go out first; the triggering run is
        // always forwarded, and last.
        let trigger = match changed.iter().position(|r| r.id == run.id) {
            Some(at) => changed.remove(at),
            None => {
                let mut unchanged = run;
                unchanged.is_hidden = self
                    .emitted_hidden
                    .get(&unchanged.id)
                    .copied()
                    .unwrap_or(unchanged.is_hidden);
                unchanged
            }
        };
        out.extend(changed.into_iter().map(ContestUpdate::RunUpdate));
        out.push(ContestUpdate::RunUpdate(trigger));
    }
}
