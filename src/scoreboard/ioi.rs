//! IOI row calculation.
//!
//! Unlike ICPC there is no stop-at-first-accept prefix; every judged run
//! feeds the problem's score accumulator and the merge mode decides how the
//! scores combine. Optimism levels do not apply.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{ProblemResult, ScoreboardRow};
use crate::model::{ContestInfo, ProblemId, ProblemInfo, RunInfo, RunResult, ScoreMergeMode};

/// Running merge of one team's scores on one problem.
#[derive(Debug)]
pub(crate) enum ScoreAccumulator {
    MaxPerGroup { best: Vec<f64> },
    MaxTotal { best: f64 },
    Last { last: f64 },
    LastOk { last_ok: f64 },
    Sum { sum: f64 },
}

impl ScoreAccumulator {
    pub(crate) fn new(mode: ScoreMergeMode) -> Self {
        match mode {
            ScoreMergeMode::MaxPerGroup => ScoreAccumulator::MaxPerGroup { best: Vec::new() },
            ScoreMergeMode::MaxTotal => ScoreAccumulator::MaxTotal { best: 0.0 },
            ScoreMergeMode::Last => ScoreAccumulator::Last { last: 0.0 },
            ScoreMergeMode::LastOk => ScoreAccumulator::LastOk { last_ok: 0.0 },
            ScoreMergeMode::Sum => ScoreAccumulator::Sum { sum: 0.0 },
        }
    }

    /// Feed one judged run's per-group scores. `is_ok` is false when the run
    /// carries a wrong verdict.
    pub(crate) fn add(&mut self, score: &[f64], is_ok: bool) {
        let total: f64 = score.iter().sum();
        match self {
            ScoreAccumulator::MaxPerGroup { best } => {
                if best.len() < score.len() {
                    best.resize(score.len(), 0.0);
                }
                for (slot, value) in best.iter_mut().zip(score) {
                    *slot = slot.max(*value);
                }
            }
            ScoreAccumulator::MaxTotal { best } => *best = best.max(total),
            ScoreAccumulator::Last { last } => *last = total,
            ScoreAccumulator::LastOk { last_ok } => {
                if is_ok {
                    *last_ok = total;
                }
            }
            ScoreAccumulator::Sum { sum } => *sum += total,
        }
    }

    pub(crate) fn total(&self) -> f64 {
        match self {
            ScoreAccumulator::MaxPerGroup { best } => best.iter().sum(),
            ScoreAccumulator::MaxTotal { best } => *best,
            ScoreAccumulator::Last { last } => *last,
            ScoreAccumulator::LastOk { last_ok } => *last_ok,
            ScoreAccumulator::Sum { sum } => *sum,
        }
    }
}

fn clamp_score(problem: &ProblemInfo, score: f64) -> f64 {
    let mut score = score;
    if let Some(max) = problem.max_score {
        score = score.min(max);
    }
    if let Some(min) = problem.min_score {
        score = score.max(min);
    }
    score
}

pub(super) fn ioi_row(info: &ContestInfo, runs: &[Arc<RunInfo>]) -> ScoreboardRow {
    let mut by_problem: HashMap<&ProblemId, Vec<&RunInfo>> = HashMap::new();
    for run in runs.iter().filter(|r| !r.is_hidden) {
        by_problem.entry(&run.problem_id).or_default().push(run);
    }

    let mut total_score = 0.0;
    let mut last_accepted = Duration::ZERO;
    let mut problem_results = Vec::with_capacity(info.problems.len());

    for problem in info.scoreboard_problems() {
        let problem_runs: &[&RunInfo] = by_problem
            .get(&problem.id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let mode = problem.score_merge_mode.unwrap_or(ScoreMergeMode::Last);
        let mut accumulator = ScoreAccumulator::new(mode);
        let mut merged: Option<f64> = None;
        let mut improved_at: Option<Duration> = None;
        let mut is_first_best = false;
        let mut last_submit_time = None;

        for run in problem_runs {
            let RunResult::Ioi {
                score,
                wrong_verdict,
                is_first_best_run,
            } = &run.result
            else {
                continue;
            };
            last_submit_time = Some(run.time);
            accumulator.add(score, wrong_verdict.is_none());
            let next = accumulator.total();
            if merged.map_or(true, |previous| next > previous) {
                improved_at = Some(run.time);
            }
            merged = Some(next);
            is_first_best |= *is_first_best_run;
        }

        let score = merged.map(|s| clamp_score(problem, s));
        if let Some(score) = score {
            total_score += score;
        }
        if let Some(at) = improved_at {
            last_accepted = last_accepted.max(at);
        }
        problem_results.push(ProblemResult::Ioi {
            score,
            is_first_best,
            last_submit_time,
        });
    }

    ScoreboardRow {
        total_score,
        penalty: Duration::ZERO,
        last_accepted,
        problem_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TeamInfo, Verdict};
    use crate::test_support::{ioi_contest_info, ioi_run};

    fn info_with_mode(mode: ScoreMergeMode) -> ContestInfo {
        let mut problem = ProblemInfo::new("A", "A", 0);
        problem.score_merge_mode = Some(mode);
        ioi_contest_info(vec![problem], vec![TeamInfo::new("t1", "one")])
    }

    fn row_for(mode: ScoreMergeMode, runs: Vec<RunInfo>) -> ScoreboardRow {
        let arcs: Vec<Arc<RunInfo>> = runs.into_iter().map(Arc::new).collect();
        ioi_row(&info_with_mode(mode), &arcs)
    }

    #[test]
    fn test_max_per_group_merges_groupwise() {
        // Group maxima: [40, 30] -> 70, better than either single run.
        let r = row_for(
            ScoreMergeMode::MaxPerGroup,
            vec![
                ioi_run("1", "t1", "A", 600, vec![40.0, 0.0]),
                ioi_run("2", "t1", "A", 1200, vec![10.0, 30.0]),
            ],
        );
        assert_eq!(r.total_score, 70.0);
        assert_eq!(r.last_accepted, Duration::from_secs(1200));
    }

    #[test]
    fn test_max_total_ignores_worse_later_runs() {
        let r = row_for(
            ScoreMergeMode::MaxTotal,
            vec![
                ioi_run("1", "t1", "A", 600, vec![80.0]),
                ioi_run("2", "t1", "A", 1200, vec![50.0]),
            ],
        );
        assert_eq!(r.total_score, 80.0);
        // The second run did not improve anything.
        assert_eq!(r.last_accepted, Duration::from_secs(600));
    }

    #[test]
    fn test_last_takes_latest_even_if_worse() {
        let r = row_for(
            ScoreMergeMode::Last,
            vec![
                ioi_run("1", "t1", "A", 600, vec![80.0]),
                ioi_run("2", "t1", "A", 1200, vec![50.0]),
            ],
        );
        assert_eq!(r.total_score, 50.0);
    }

    #[test]
    fn test_unset_merge_mode_defaults_to_last() {
        let problem = ProblemInfo::new("A", "A", 0);
        assert!(problem.score_merge_mode.is_none());
        let info = ioi_contest_info(vec![problem], vec![TeamInfo::new("t1", "one")]);
        let runs = vec![
            Arc::new(ioi_run("1", "t1", "A", 600, vec![80.0])),
            Arc::new(ioi_run("2", "t1", "A", 1200, vec![50.0])),
        ];
        assert_eq!(ioi_row(&info, &runs).total_score, 50.0);
    }

    #[test]
    fn test_last_ok_skips_wrong_verdicts() {
        let mut failed = ioi_run("2", "t1", "A", 1200, vec![0.0]);
        if let RunResult::Ioi { wrong_verdict, .. } = &mut failed.result {
            *wrong_verdict = Some(Verdict::RuntimeError);
        }
        let r = row_for(
            ScoreMergeMode::LastOk,
            vec![ioi_run("1", "t1", "A", 600, vec![80.0]), failed],
        );
        assert_eq!(r.total_score, 80.0);
    }

    #[test]
    fn test_sum_accumulates() {
        let r = row_for(
            ScoreMergeMode::Sum,
            vec![
                ioi_run("1", "t1", "A", 600, vec![30.0]),
                ioi_run("2", "t1", "A", 1200, vec![20.0]),
            ],
        );
        assert_eq!(r.total_score, 50.0);
    }

    #[test]
    fn test_first_best_flag_survives_later_runs() {
        // The flag sits on the improving run, which need not be the last one.
        let mut best = ioi_run("1", "t1", "A", 600, vec![80.0]);
        if let RunResult::Ioi {
            is_first_best_run, ..
        } = &mut best.result
        {
            *is_first_best_run = true;
        }
        let r = row_for(
            ScoreMergeMode::MaxTotal,
            vec![best, ioi_run("2", "t1", "A", 1200, vec![50.0])],
        );
        assert!(matches!(
            r.problem_results[0],
            ProblemResult::Ioi {
                is_first_best: true,
                ..
            }
        ));
    }

    #[test]
    fn test_no_runs_gives_no_score() {
        let r = row_for(ScoreMergeMode::MaxTotal, vec![]);
        assert_eq!(r.total_score, 0.0);
        assert!(matches!(
            r.problem_results[0],
            ProblemResult::Ioi { score: None, .. }
        ));
    }

    #[test]
    fn test_max_score_clamps() {
        let mut problem = ProblemInfo::new("A", "A", 0);
        problem.score_merge_mode = Some(ScoreMergeMode::Sum);
        problem.max_score = Some(100.0);
        let info = ioi_contest_info(vec![problem], vec![TeamInfo::new("t1", "one")]);
        let runs = vec![
            Arc::new(ioi_run("1", "t1", "A", 600, vec![80.0])),
            Arc::new(ioi_run("2", "t1", "A", 1200, vec![80.0])),
        ];
        assert_eq!(ioi_row(&info, &runs).total_score, 100.0);
    }
}
