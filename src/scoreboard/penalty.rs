//! ICPC penalty accumulation under the configured rounding mode.

use std::time::Duration;

use crate::model::time::{down_to_minute, up_to_minute};
use crate::model::PenaltyRoundingMode;

/// Accumulates penalty over the solved problems of one team.
///
/// Fed once per solved problem with the accepted submission time and the
/// number of wrong attempts before it; the rounding mode decides where the
/// minute rounding happens (per submission, on the sum, or not at all).
#[derive(Debug)]
pub(crate) enum PenaltyCalculator {
    EachSubmissionDownToMinute {
        per_wrong: Duration,
        penalty: Duration,
    },
    EachSubmissionUpToMinute {
        per_wrong: Duration,
        penalty: Duration,
    },
    SumDownToMinute {
        per_wrong: Duration,
        exact: Duration,
    },
    SumInSeconds {
        per_wrong: Duration,
        penalty: Duration,
    },
    Last {
        per_wrong: Duration,
        wrongs: u32,
        last: Duration,
    },
    Zero,
}

impl PenaltyCalculator {
    pub(crate) fn new(mode: PenaltyRoundingMode, penalty_per_wrong_attempt: Duration) -> Self {
        let per_wrong = penalty_per_wrong_attempt;
        match mode {
            PenaltyRoundingMode::EachSubmissionDownToMinute => {
                PenaltyCalculator::EachSubmissionDownToMinute {
                    per_wrong,
                    penalty: Duration::ZERO,
                }
            }
            PenaltyRoundingMode::EachSubmissionUpToMinute => {
                PenaltyCalculator::EachSubmissionUpToMinute {
                    per_wrong,
                    penalty: Duration::ZERO,
                }
            }
            PenaltyRoundingMode::SumDownToMinute => PenaltyCalculator::SumDownToMinute {
                per_wrong,
                exact: Duration::ZERO,
            },
            PenaltyRoundingMode::SumInSeconds => PenaltyCalculator::SumInSeconds {
                per_wrong,
                penalty: Duration::ZERO,
            },
            PenaltyRoundingMode::Last => PenaltyCalculator::Last {
                per_wrong,
                wrongs: 0,
                last: Duration::ZERO,
            },
            PenaltyRoundingMode::Zero => PenaltyCalculator::Zero,
        }
    }

    pub(crate) fn add_solved_problem(&mut self, time: Duration, wrong_attempts: u32) {
        match self {
            PenaltyCalculator::EachSubmissionDownToMinute { per_wrong, penalty } => {
                *penalty += down_to_minute(time) + *per_wrong * wrong_attempts;
            }
            PenaltyCalculator::EachSubmissionUpToMinute { per_wrong, penalty } => {
                *penalty += up_to_minute(time) + *per_wrong * wrong_attempts;
            }
            PenaltyCalculator::SumDownToMinute { per_wrong, exact }
            | PenaltyCalculator::SumInSeconds {
                per_wrong,
                penalty: exact,
            } => {
                *exact += time + *per_wrong * wrong_attempts;
            }
            PenaltyCalculator::Last {
                wrongs,
                last,
                ..
            } => {
                *wrongs += wrong_attempts;
                *last = (*last).max(time);
            }
            PenaltyCalculator::Zero => {}
        }
    }

    pub(crate) fn penalty(&self) -> Duration {
        match self {
            PenaltyCalculator::EachSubmissionDownToMinute { penalty, .. }
            | PenaltyCalculator::EachSubmissionUpToMinute { penalty, .. }
            | PenaltyCalculator::SumInSeconds { penalty, .. } => *penalty,
            PenaltyCalculator::SumDownToMinute { exact, .. } => down_to_minute(*exact),
            PenaltyCalculator::Last {
                per_wrong,
                wrongs,
                last,
            } => *last + *per_wrong * *wrongs,
            PenaltyCalculator::Zero => Duration::ZERO,
        }
    }
}
