//! Shared builders for unit tests.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::model::{
    AwardsSettings, ContestInfo, ContestResultType, ContestStatus, PenaltyRoundingMode,
    ProblemInfo, RunInfo, RunResult, TeamInfo, Verdict,
};

pub(crate) fn contest_info(problems: Vec<ProblemInfo>, teams: Vec<TeamInfo>) -> ContestInfo {
    ContestInfo {
        name: "test contest".into(),
        status: ContestStatus::Before {
            scheduled_start_at: None,
        },
        result_type: ContestResultType::Icpc,
        contest_length: Duration::from_secs(5 * 3600),
        freeze_time: Some(Duration::from_secs(4 * 3600)),
        problems: problems.into_iter().map(|p| (p.id.clone(), p)).collect(),
        teams: teams.into_iter().map(|t| (t.id.clone(), t)).collect(),
        groups: BTreeMap::new(),
        organizations: BTreeMap::new(),
        languages: BTreeMap::new(),
        penalty_rounding_mode: PenaltyRoundingMode::EachSubmissionDownToMinute,
        penalty_per_wrong_attempt: Duration::from_secs(20 * 60),
        awards: AwardsSettings::default(),
        emulation_speed: 1.0,
    }
}

pub(crate) fn ioi_contest_info(problems: Vec<ProblemInfo>, teams: Vec<TeamInfo>) -> ContestInfo {
    let mut info = contest_info(problems, teams);
    info.result_type = ContestResultType::Ioi;
    info.penalty_rounding_mode = PenaltyRoundingMode::Zero;
    info
}

pub(crate) fn icpc_run(
    id: &str,
    team: &str,
    problem: &str,
    time_secs: u64,
    verdict: Verdict,
) -> RunInfo {
    RunInfo {
        id: id.into(),
        result: RunResult::Icpc {
            verdict,
            is_first_to_solve_run: false,
        },
        problem_id: problem.into(),
        team_id: team.into(),
        time: Duration::from_secs(time_secs),
        language_id: None,
        is_hidden: false,
    }
}

pub(crate) fn pending_run(id: &str, team: &str, problem: &str, time_secs: u64) -> RunInfo {
    RunInfo {
        id: id.into(),
        result: RunResult::InProgress { tested_part: 0.5 },
        problem_id: problem.into(),
        team_id: team.into(),
        time: Duration::from_secs(time_secs),
        language_id: None,
        is_hidden: false,
    }
}

pub(crate) fn ioi_run(
    id: &str,
    team: &str,
    problem: &str,
    time_secs: u64,
    score: Vec<f64>,
) -> RunInfo {
    RunInfo {
        id: id.into(),
        result: RunResult::Ioi {
            score,
            wrong_verdict: None,
            is_first_best_run: false,
        },
        problem_id: problem.into(),
        team_id: team.into(),
        time: Duration::from_secs(time_secs),
        language_id: None,
        is_hidden: false,
    }
}
