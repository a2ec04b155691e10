//! Scoreboard freeze.
//!
//! From `freeze_time` onward, judged results are withheld: the run goes out
//! as `InProgress(0.0)` while the true result stays inside this stage. A
//! Finalized info update thaws the board and replays every withheld result.

use std::collections::BTreeMap;

use tracing::info;

use super::UpdateAdapter;
use crate::event::ContestUpdate;
use crate::model::{ContestInfo, RunId, RunInfo, RunResult};

#[derive(Default)]
pub struct FreezeAdapter {
    info: Option<ContestInfo>,
    /// True results of runs currently masked.
    withheld: BTreeMap<RunId, RunInfo>,
    thawed: bool,
}

impl FreezeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn should_mask(&self, run: &RunInfo) -> bool {
        if self.thawed || !run.is_judged() {
            return false;
        }
        self.info
            .as_ref()
            .is_some_and(|info| info.is_after_freeze(run.time))
    }

    fn masked(run: &RunInfo) -> RunInfo {
        let mut masked = run.clone();
        masked.result = RunResult::InProgress { tested_part: 0.0 };
        masked
    }
}

impl UpdateAdapter for FreezeAdapter {
    fn apply(&mut self, update: ContestUpdate, out: &mut Vec<ContestUpdate>) {
        match update {
            ContestUpdate::InfoUpdate(new_info) => {
                let thaw = new_info.status.is_finalized() && !self.thawed;
                self.info = Some(new_info.clone());
                out.push(ContestUpdate::InfoUpdate(new_info));
                if thaw {
                    self.thawed = true;
                    info!(count = self.withheld.len(), "thawing frozen results");
                    for (_, run) in std::mem::take(&mut self.withheld) {
                        out.push(ContestUpdate::RunUpdate(run));
                    }
                }
            }
            ContestUpdate::RunUpdate(run) => {
                if self.should_mask(&run) {
                    out.push(ContestUpdate::RunUpdate(Self::masked(&run)));
                    self.withheld.insert(run.id.clone(), run);
                } else {
                    // A rejudge can pull a masked run back before the
                    // freeze; the stored copy must not resurface at thaw.
                    self.withheld.remove(&run.id);
                    out.push(ContestUpdate::RunUpdate(run));
                }
            }
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::adapters::apply_all;
    use crate::model::{ContestStatus, ProblemInfo, TeamInfo, Verdict};
    use crate::test_support::{contest_info, icpc_run};

    fn base_info() -> ContestInfo {
        // Freeze at 4h of 5h.
        contest_info(
            vec![ProblemInfo::new("A", "A", 0)],
            vec![TeamInfo::new("t1", "one")],
        )
    }

    fn finalized(mut info: ContestInfo) -> ContestInfo {
        let now = Utc::now();
        info.status = ContestStatus::Finalized {
            started_at: now,
            finished_at: now,
            finalized_at: now,
        };
        info
    }

    #[test]
    fn test_post_freeze_results_masked_until_thaw() {
        let mut adapter = FreezeAdapter::new();
        let out = apply_all(
            &mut adapter,
            [
                ContestUpdate::InfoUpdate(base_info()),
                ContestUpdate::RunUpdate(icpc_run(
                    "1",
                    "t1",
                    "A",
                    4 * 3600 + 60,
                    Verdict::Accepted,
                )),
            ],
        );
        let ContestUpdate::RunUpdate(run) = &out[1] else {
            panic!("expected run update");
        };
        assert!(matches!(run.result, RunResult::InProgress { .. }));

        let out = apply_all(
            &mut adapter,
            [ContestUpdate::InfoUpdate(finalized(base_info()))],
        );
        let ContestUpdate::RunUpdate(run) = &out[1] else {
            panic!("expected thawed run");
        };
        assert!(matches!(
            run.result,
            RunResult::Icpc {
                verdict: Verdict::Accepted,
                ..
            }
        ));
    }

    #[test]
    fn test_pre_freeze_results_flow_through() {
        let mut adapter = FreezeAdapter::new();
        let out = apply_all(
            &mut adapter,
            [
                ContestUpdate::InfoUpdate(base_info()),
                ContestUpdate::RunUpdate(icpc_run("1", "t1", "A", 600, Verdict::Accepted)),
            ],
        );
        let ContestUpdate::RunUpdate(run) = &out[1] else {
            panic!("expected run update");
        };
        assert!(matches!(run.result, RunResult::Icpc { .. }));
    }

    #[test]
    fn test_rejudge_to_pre_freeze_time_cancels_withholding() {
        let mut adapter = FreezeAdapter::new();
        let _ = apply_all(
            &mut adapter,
            [
                ContestUpdate::InfoUpdate(base_info()),
                ContestUpdate::RunUpdate(icpc_run(
                    "1",
                    "t1",
                    "A",
                    4 * 3600 + 60,
                    Verdict::Accepted,
                )),
                ContestUpdate::RunUpdate(icpc_run("1", "t1", "A", 600, Verdict::WrongAnswer)),
            ],
        );
        let out = apply_all(
            &mut adapter,
            [ContestUpdate::InfoUpdate(finalized(base_info()))],
        );
        // Nothing left to thaw.
        assert_eq!(out.len(), 1);
    }
}
