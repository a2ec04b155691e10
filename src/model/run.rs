//! Submissions and their judging results.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ids::{LanguageId, ProblemId, RunId, TeamId};
use super::time::duration_ms;

/// Judging verdict for a single submission.
///
/// The set is closed; upstream adapters map their own vocabulary onto it via
/// [`Verdict::lookup`], which also tolerates common alternative spellings
/// (OK, TLE, RTE, ...) and falls back on the penalty/accepted flags when the
/// short name is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accepted,
    Rejected,
    Fail,
    CompilationError,
    CompilationErrorWithPenalty,
    PresentationError,
    RuntimeError,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    OutputLimitExceeded,
    IdlenessLimitExceeded,
    SecurityViolation,
    Ignored,
    Challenged,
    WrongAnswer,
}

impl Verdict {
    pub const ALL: [Verdict; 15] = [
        Verdict::Accepted,
        Verdict::Rejected,
        Verdict::Fail,
        Verdict::CompilationError,
        Verdict::CompilationErrorWithPenalty,
        Verdict::PresentationError,
        Verdict::RuntimeError,
        Verdict::TimeLimitExceeded,
        Verdict::MemoryLimitExceeded,
        Verdict::OutputLimitExceeded,
        Verdict::IdlenessLimitExceeded,
        Verdict::SecurityViolation,
        Verdict::Ignored,
        Verdict::Challenged,
        Verdict::WrongAnswer,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::Rejected => "RJ",
            Verdict::Fail => "FL",
            Verdict::CompilationError | Verdict::CompilationErrorWithPenalty => "CE",
            Verdict::PresentationError => "PE",
            Verdict::RuntimeError => "RE",
            Verdict::TimeLimitExceeded => "TL",
            Verdict::MemoryLimitExceeded => "ML",
            Verdict::OutputLimitExceeded => "OL",
            Verdict::IdlenessLimitExceeded => "IL",
            Verdict::SecurityViolation => "SV",
            Verdict::Ignored => "IG",
            Verdict::Challenged => "CH",
            Verdict::WrongAnswer => "WA",
        }
    }

    /// Whether this verdict solves the problem under ICPC rules.
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted | Verdict::Fail)
    }

    /// Whether a run with this verdict adds a wrong-attempt penalty.
    pub fn is_adding_penalty(self) -> bool {
        matches!(
            self,
            Verdict::Rejected
                | Verdict::CompilationErrorWithPenalty
                | Verdict::PresentationError
                | Verdict::RuntimeError
                | Verdict::TimeLimitExceeded
                | Verdict::MemoryLimitExceeded
                | Verdict::OutputLimitExceeded
                | Verdict::IdlenessLimitExceeded
                | Verdict::SecurityViolation
                | Verdict::Challenged
                | Verdict::WrongAnswer
        )
    }

    /// Resolve an upstream verdict name, tolerating alternative spellings.
    ///
    /// When the name is unknown the flags decide: accepted wins over
    /// penalizing, anything else maps to [`Verdict::Ignored`].
    pub fn lookup(short_name: &str, is_adding_penalty: bool, is_accepted: bool) -> Verdict {
        let candidate = match short_name {
            "OK" => Some(Verdict::Accepted),
            "TLE" => Some(Verdict::TimeLimitExceeded),
            "RT" | "RTE" => Some(Verdict::RuntimeError),
            "OLE" => Some(Verdict::OutputLimitExceeded),
            "MLE" => Some(Verdict::MemoryLimitExceeded),
            "ILE" | "WTL" => Some(Verdict::IdlenessLimitExceeded),
            "CTL" => Some(Verdict::CompilationError),
            _ => Verdict::ALL.into_iter().find(|v| {
                v.short_name() == short_name
                    && v.is_adding_penalty() == is_adding_penalty
                    && v.is_accepted() == is_accepted
            }),
        };
        match candidate {
            Some(v) => v,
            None if is_accepted => Verdict::Accepted,
            None if is_adding_penalty => Verdict::Rejected,
            None => Verdict::Ignored,
        }
    }
}

/// Result of judging a run, or its in-progress state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunResult {
    Icpc {
        verdict: Verdict,
        /// Set by the first-to-solve adapter, never by upstream sources.
        #[serde(default)]
        is_first_to_solve_run: bool,
    },
    Ioi {
        /// Score per declared score group. Problems without groups use a
        /// single-element vector.
        score: Vec<f64>,
        #[serde(default)]
        wrong_verdict: Option<Verdict>,
        /// True for the run that most recently raised the team's merged
        /// score on this problem.
        #[serde(default)]
        is_first_best_run: bool,
    },
    InProgress {
        /// Fraction of tests finished, in `[0, 1]`.
        tested_part: f64,
    },
}

impl RunResult {
    pub fn is_judged(&self) -> bool {
        !matches!(self, RunResult::InProgress { .. })
    }
}

/// A single submission. Rejudges republish the same `id` with a revised
/// result (and possibly a revised `time`), never a new run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub id: RunId,
    pub result: RunResult,
    pub problem_id: ProblemId,
    pub team_id: TeamId,
    /// Offset from contest start.
    #[serde(with = "duration_ms")]
    pub time: Duration,
    #[serde(default)]
    pub language_id: Option<LanguageId>,
    /// Hidden runs are invisible to scoring. Set by the freeze and
    /// hidden-entity adapters, or by upstream for disqualified runs.
    #[serde(default)]
    pub is_hidden: bool,
}

impl RunInfo {
    pub fn is_accepted(&self) -> bool {
        matches!(&self.result, RunResult::Icpc { verdict, .. } if verdict.is_accepted())
    }

    pub fn is_adding_penalty(&self) -> bool {
        matches!(&self.result, RunResult::Icpc { verdict, .. } if verdict.is_adding_penalty())
    }

    pub fn is_judged(&self) -> bool {
        self.result.is_judged()
    }
}
