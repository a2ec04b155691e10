//! First-to-solve flag maintenance.
//!
//! The first visible accepted run of each problem carries
//! `is_first_to_solve_run`. IOI runs carry `is_first_best_run` instead, on
//! the run that last raised the problem's best merged score. Either holder
//! can change on rejudge, in which case both the old and the new holder are
//! re-emitted with corrected flags.

use std::collections::BTreeMap;

use super::UpdateAdapter;
use crate::event::ContestUpdate;
use crate::model::{ContestInfo, ProblemId, RunId, RunInfo, RunResult, ScoreMergeMode, TeamId};
use crate::scoreboard::ioi::ScoreAccumulator;

#[derive(Default)]
pub struct FirstToSolveAdapter {
    /// ICPC runs as received, grouped per problem.
    problems: BTreeMap<ProblemId, BTreeMap<RunId, RunInfo>>,
    emitted_flag: BTreeMap<RunId, bool>,
    /// IOI runs as received, grouped per problem.
    best_runs: BTreeMap<ProblemId, BTreeMap<RunId, RunInfo>>,
    emitted_best: BTreeMap<RunId, bool>,
    info: Option<ContestInfo>,
}

impl FirstToSolveAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn recompute(&mut self, problem: &ProblemId) -> Vec<RunInfo> {
        let Some(runs) = self.problems.get(problem) else {
            return Vec::new();
        };
        // Hidden accepts only win when no visible one exists, and then the
        // flag is withheld anyway.
        let holder = runs
            .values()
            .filter(|run| run.is_accepted())
            .min_by(|a, b| {
                (a.is_hidden, a.time, &a.id).cmp(&(b.is_hidden, b.time, &b.id))
            })
            .filter(|run| !run.is_hidden)
            .map(|run| run.id.clone());

        let mut changed = Vec::new();
        for base in runs.values() {
            let RunResult::Icpc { verdict, .. } = &base.result else {
                continue;
            };
            let flag = holder.as_ref() == Some(&base.id);
            if self.emitted_flag.get(&base.id) != Some(&flag) {
                let mut run = base.clone();
                run.result = RunResult::Icpc {
                    verdict: *verdict,
                    is_first_to_solve_run: flag,
                };
                changed.push(run);
            }
        }
        for run in &changed {
            let flagged = matches!(
                run.result,
                RunResult::Icpc {
                    is_first_to_solve_run: true,
                    ..
                }
            );
            self.emitted_flag.insert(run.id.clone(), flagged);
        }
        changed
    }

    fn recompute_best(&mut self, problem: &ProblemId) -> Vec<RunInfo> {
        let Some(runs) = self.best_runs.get(problem) else {
            return Vec::new();
        };
        let mode = self
            .info
            .as_ref()
            .and_then(|info| info.problems.get(problem))
            .and_then(|p| p.score_merge_mode)
            .unwrap_or(ScoreMergeMode::Last);

        // Replay in submission order with one accumulator per team; the
        // holder is the run that last raised the problem's best merged
        // score. Hidden runs still feed their team's accumulator but never
        // hold the flag.
        let mut ordered: Vec<&RunInfo> = runs.values().collect();
        ordered.sort_by(|a, b| (a.time, &a.id).cmp(&(b.time, &b.id)));

        let mut per_team: BTreeMap<&TeamId, ScoreAccumulator> = BTreeMap::new();
        let mut best = 0.0;
        let mut holder: Option<RunId> = None;
        for run in &ordered {
            let RunResult::Ioi {
                score,
                wrong_verdict,
                ..
            } = &run.result
            else {
                continue;
            };
            let accumulator = per_team
                .entry(&run.team_id)
                .or_insert_with(|| ScoreAccumulator::new(mode));
            accumulator.add(score, wrong_verdict.is_none());
            let total = accumulator.total();
            if total > best && !run.is_hidden {
                best = total;
                holder = Some(run.id.clone());
            }
        }

        let mut changed = Vec::new();
        for base in runs.values() {
            let RunResult::Ioi {
                score,
                wrong_verdict,
                ..
            } = &base.result
            else {
                continue;
            };
            let flag = holder.as_ref() == Some(&base.id);
            if self.emitted_best.get(&base.id) != Some(&flag) {
                let mut run = base.clone();
                run.result = RunResult::Ioi {
                    score: score.clone(),
                    wrong_verdict: *wrong_verdict,
                    is_first_best_run: flag,
                };
                changed.push(run);
            }
        }
        for run in &changed {
            let flagged = matches!(
                run.result,
                RunResult::Ioi {
                    is_first_best_run: true,
                    ..
                }
            );
            self.emitted_best.insert(run.id.clone(), flagged);
        }
        changed
    }
}

impl UpdateAdapter for FirstToSolveAdapter {
    fn apply(&mut self, update: ContestUpdate, out: &mut Vec<ContestUpdate>) {
        let run = match update {
            ContestUpdate::RunUpdate(run) => run,
            ContestUpdate::InfoUpdate(info) => {
                self.info = Some(info.clone());
                out.push(ContestUpdate::InfoUpdate(info));
                return;
            }
            other => {
                out.push(other);
                return;
            }
        };
        let mut changed = match run.result {
            RunResult::Icpc { .. } | RunResult::InProgress { .. } => {
                self.problems
                    .entry(run.problem_id.clone())
                    .or_default()
                    .insert(run.id.clone(), run.clone());
                self.recompute(&run.problem_id)
            }
            RunResult::Ioi { .. } => {
                self.best_runs
                    .entry(run.problem_id.clone())
                    .or_default()
                    .insert(run.id.clone(), run.clone());
                self.recompute_best(&run.problem_id)
            }
        };
        let trigger = match changed.iter().position(|r| r.id == run.id) {
            Some(at) => changed.remove(at),
            None => {
                // Unchanged trigger still goes out with the flag we last
                // emitted for it, never upstream's copy.
                let mut run = run;
                match &mut run.result {
                    RunResult::Icpc {
                        is_first_to_solve_run,
                        ..
                    } => {
                        *is_first_to_solve_run =
                            self.emitted_flag.get(&run.id).copied().unwrap_or(false);
                    }
                    RunResult::Ioi {
                        is_first_best_run, ..
                    } => {
                        *is_first_best_run =
                            self.emitted_best.get(&run.id).copied().unwrap_or(false);
                    }
                    RunResult::InProgress { .. } => {}
                }
                run
            }
        };
        out.extend(changed.into_iter().map(ContestUpdate::RunUpdate));
        out.push(ContestUpdate::RunUpdate(trigger));
    }
}
