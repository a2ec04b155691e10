//! ICPC row calculation.
//!
//! A problem is scanned in submission order up to the first counted accept;
//! everything after it is ignored. The optimism level only changes how
//! not-yet-judged runs are classified.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::penalty::PenaltyCalculator;
use super::{OptimismLevel, ProblemResult, ScoreboardRow};
use crate::model::{ContestInfo, ProblemId, RunInfo, RunResult};

fn counts_as_accepted(run: &RunInfo, index: usize, count: usize, level: OptimismLevel) -> bool {
    match level {
        OptimismLevel::Normal | OptimismLevel::Pessimistic => run.is_accepted(),
        OptimismLevel::Optimistic => {
            run.is_accepted() || (!run.is_judged() && index == count - 1)
        }
    }
}

fn counts_as_pending(run: &RunInfo, level: OptimismLevel) -> bool {
    match level {
        OptimismLevel::Normal => !run.is_judged(),
        OptimismLevel::Optimistic | OptimismLevel::Pessimistic => false,
    }
}

fn counts_as_penalty(run: &RunInfo, index: usize, count: usize, level: OptimismLevel) -> bool {
    match level {
        OptimismLevel::Normal => run.is_judged() && run.is_adding_penalty(),
        OptimismLevel::Optimistic => {
            run.is_adding_penalty() || (!run.is_judged() && index != count - 1)
        }
        OptimismLevel::Pessimistic => !run.is_judged() || run.is_adding_penalty(),
    }
}

pub(super) fn icpc_row(
    info: &ContestInfo,
    runs: &[Arc<RunInfo>],
    level: OptimismLevel,
) -> ScoreboardRow {
    let mut by_problem: HashMap<&ProblemId, Vec<&RunInfo>> = HashMap::new();
    for run in runs.iter().filter(|r| !r.is_hidden) {
        by_problem.entry(&run.problem_id).or_default().push(run);
    }

    let mut total_score = 0.0;
    let mut last_accepted = Duration::ZERO;
    let mut penalty = PenaltyCalculator::new(
        info.penalty_rounding_mode,
        info.penalty_per_wrong_attempt,
    );
    let mut problem_results = Vec::with_capacity(info.problems.len());

    for problem in info.scoreboard_problems() {
        let problem_runs: &[&RunInfo] = by_problem
            .get(&problem.id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let count = problem_runs.len();
        // The prefix ends at the first counted accept, inclusive.
        let mut accepted: Option<&RunInfo> = None;
        let mut wrong_attempts = 0u32;
        let mut pending_attempts = 0u32;
        let mut last_submit_time = None;
        for (index, run) in problem_runs.iter().enumerate() {
            last_submit_time = Some(run.time);
            if counts_as_accepted(run, index, count, level) {
                accepted = Some(run);
                break;
            }
            if counts_as_penalty(run, index, count, level) {
                wrong_attempts += 1;
            }
            if counts_as_pending(run, level) {
                pending_attempts += 1;
            }
        }

        let is_solved = accepted.is_some();
        let mut is_first_to_solve = false;
        if let Some(run) = accepted {
            total_score += f64::from(problem.weight);
            last_accepted = last_accepted.max(run.time);
            penalty.add_solved_problem(run.time, wrong_attempts);
            is_first_to_solve = matches!(
                &run.result,
                RunResult::Icpc {
                    is_first_to_solve_run: true,
                    ..
                }
            );
        }

        problem_results.push(ProblemResult::Icpc {
            wrong_attempts,
            pending_attempts,
            is_solved,
            is_first_to_solve,
            last_submit_time,
        });
    }

    ScoreboardRow {
        total_score,
        penalty: penalty.penalty(),
        last_accepted,
        problem_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProblemInfo, TeamInfo, Verdict};
    use crate::test_support::{contest_info, icpc_run, pending_run};

    fn info_ab() -> ContestInfo {
        contest_info(
            vec![ProblemInfo::new("A", "A", 0), ProblemInfo::new("B", "B", 1)],
            vec![TeamInfo::new("t1", "one")],
        )
    }

    fn row(runs: &[RunInfo], level: OptimismLevel) -> ScoreboardRow {
        let arcs: Vec<Arc<RunInfo>> = runs.iter().cloned().map(Arc::new).collect();
        icpc_row(&info_ab(), &arcs, level)
    }

    #[test]
    fn test_scan_stops_at_first_accept() {
        // WA, AC, then another WA and AC: only the prefix up to the first
        // accept counts, the tail changes nothing.
        let runs = vec![
            icpc_run("1", "t1", "A", 10 * 60, Verdict::WrongAnswer),
            icpc_run("2", "t1", "A", 20 * 60, Verdict::Accepted),
            icpc_run("3", "t1", "A", 30 * 60, Verdict::WrongAnswer),
            icpc_run("4", "t1", "A", 40 * 60, Verdict::Accepted),
        ];
        let r = row(&runs, OptimismLevel::Normal);
        assert_eq!(r.total_score, 1.0);
        // 20 min accepted + 1 wrong * 20 min.
        assert_eq!(r.penalty, Duration::from_secs(40 * 60));
        assert_eq!(r.last_accepted, Duration::from_secs(20 * 60));
        match &r.problem_results[0] {
            ProblemResult::Icpc {
                wrong_attempts,
                is_solved,
                last_submit_time,
                ..
            } => {
                assert_eq!(*wrong_attempts, 1);
                assert!(is_solved);
                assert_eq!(*last_submit_time, Some(Duration::from_secs(20 * 60)));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_compilation_error_adds_no_penalty() {
        let runs = vec![
            icpc_run("1", "t1", "A", 10 * 60, Verdict::CompilationError),
            icpc_run("2", "t1", "A", 20 * 60, Verdict::Accepted),
        ];
        let r = row(&runs, OptimismLevel::Normal);
        assert_eq!(r.penalty, Duration::from_secs(20 * 60));
    }

    #[test]
    fn test_optimistic_counts_last_pending_as_accept() {
        let runs = vec![
            pending_run("1", "t1", "B", 10 * 60),
            pending_run("2", "t1", "B", 20 * 60),
        ];
        let r = row(&runs, OptimismLevel::Optimistic);
        // Last pending accepted, earlier pending penalized.
        assert_eq!(r.total_score, 1.0);
        assert_eq!(r.penalty, Duration::from_secs(40 * 60));
    }

    #[test]
    fn test_pessimistic_penalizes_pending_and_never_accepts_it() {
        let runs = vec![
            pending_run("1", "t1", "B", 10 * 60),
            pending_run("2", "t1", "B", 20 * 60),
        ];
        let r = row(&runs, OptimismLevel::Pessimistic);
        assert_eq!(r.total_score, 0.0);
        // Unsolved problems contribute no penalty.
        assert_eq!(r.penalty, Duration::ZERO);
        match &r.problem_results[1] {
            ProblemResult::Icpc {
                wrong_attempts,
                pending_attempts,
                ..
            } => {
                assert_eq!(*wrong_attempts, 2);
                assert_eq!(*pending_attempts, 0);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_hidden_runs_are_invisible() {
        let mut hidden = icpc_run("1", "t1", "A", 10 * 60, Verdict::Accepted);
        hidden.is_hidden = true;
        let r = row(&[hidden], OptimismLevel::Normal);
        assert_eq!(r.total_score, 0.0);
    }

    #[test]
    fn test_problem_weight_scales_score() {
        let mut info = info_ab();
        info.problems.get_mut(&"A".into()).unwrap().weight = 3;
        let runs = vec![Arc::new(icpc_run("1", "t1", "A", 10 * 60, Verdict::Accepted))];
        let r = icpc_row(&info, &runs, OptimismLevel::Normal);
        assert_eq!(r.total_score, 3.0);
    }
}
