//! Event-sourced contest state accumulation.
//!
//! `ContestState::apply` folds one [`ContestUpdate`] into a new immutable
//! state. Exactly one task owns the fold for a contest (single-writer);
//! readers hold `Arc` snapshots and never need a lock against it.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::MalformedEvent;
use crate::event::{CommentaryMessage, ContestUpdate};
use crate::model::{CommentaryId, ContestInfo, RunId, RunInfo};

/// Accumulated state after some prefix of the event stream.
///
/// Each state keeps both the "before" and "after" view of whatever its last
/// event changed, so consumers can diff without replaying: `info_before` /
/// `info_after` for info updates, the replaced run for run updates.
#[derive(Debug, Clone, Default)]
pub struct ContestState {
    info_before: Option<Arc<ContestInfo>>,
    info_after: Option<Arc<ContestInfo>>,
    runs: Arc<BTreeMap<RunId, Arc<RunInfo>>>,
    /// Id changed by the last event and the value it replaced, if any.
    changed_run: Option<(RunId, Option<Arc<RunInfo>>)>,
    commentary: Arc<BTreeMap<CommentaryId, CommentaryMessage>>,
    last_event: Option<ContestUpdate>,
}

impl ContestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into a new state.
    ///
    /// A `RunUpdate` must reference a team and problem present in the latest
    /// contest info; otherwise the event is rejected as [`MalformedEvent`]
    /// and the state is left untouched. Identical ordered event sequences
    /// yield identical state sequences.
    pub fn apply(&self, event: ContestUpdate) -> Result<ContestState, MalformedEvent> {
        match event {
            ContestUpdate::InfoUpdate(new_info) => {
                if let Some(old) = &self.info_after {
                    if !old.status.allows_transition_to(&new_info.status) {
                        // Upstream resent an older phase; keep folding, the
                        // snapshot replacement itself is still well-formed.
                        debug!(
                            old = ?old.status,
                            new = ?new_info.status,
                            "contest status moved backwards"
                        );
                    }
                }
                Ok(ContestState {
                    info_before: self.info_after.clone(),
                    info_after: Some(Arc::new(new_info.clone())),
                    runs: self.runs.clone(),
                    changed_run: None,
                    commentary: self.commentary.clone(),
                    last_event: Some(ContestUpdate::InfoUpdate(new_info)),
                })
            }
            ContestUpdate::RunUpdate(new_run) => {
                let info = self
                    .info_after
                    .as_ref()
                    .ok_or_else(|| MalformedEvent::NoContestInfo {
                        run: new_run.id.clone(),
                    })?;
                if !info.teams.contains_key(&new_run.team_id) {
                    return Err(MalformedEvent::UnknownTeam {
                        run: new_run.id.clone(),
                        team: new_run.team_id.clone(),
                    });
                }
                if !info.problems.contains_key(&new_run.problem_id) {
                    return Err(MalformedEvent::UnknownProblem {
                        run: new_run.id.clone(),
                        problem: new_run.problem_id.clone(),
                    });
                }
                let mut runs = (*self.runs).clone();
                let replaced = runs.insert(new_run.id.clone(), Arc::new(new_run.clone()));
                Ok(ContestState {
                    info_before: self.info_after.clone(),
                    info_after: self.info_after.clone(),
                    runs: Arc::new(runs),
                    changed_run: Some((new_run.id.clone(), replaced)),
                    commentary: self.commentary.clone(),
                    last_event: Some(ContestUpdate::RunUpdate(new_run)),
                })
            }
            ContestUpdate::CommentaryUpdate(message) => {
                let mut commentary = (*self.commentary).clone();
                commentary.insert(message.id.clone(), message.clone());
                Ok(ContestState {
                    info_before: self.info_after.clone(),
                    info_after: self.info_after.clone(),
                    runs: self.runs.clone(),
                    changed_run: None,
                    commentary: Arc::new(commentary),
                    last_event: Some(ContestUpdate::CommentaryUpdate(message)),
                })
            }
        }
    }

    /// Fold one event, applying the uniform drop-and-log policy to
    /// malformed events. Returns `None` when the event was dropped.
    pub fn apply_or_log(&self, event: ContestUpdate) -> Option<ContestState> {
        match self.apply(event) {
            Ok(state) => Some(state),
            Err(rejection) => {
                warn!(%rejection, "dropping malformed contest update");
                None
            }
        }
    }

    /// Fold a whole recorded event list into its final state.
    pub fn from_events(events: impl IntoIterator<Item = ContestUpdate>) -> ContestState {
        let mut state = ContestState::new();
        for event in events {
            if let Some(next) = state.apply_or_log(event) {
                state = next;
            }
        }
        state
    }

    pub fn info_before_event(&self) -> Option<&Arc<ContestInfo>> {
        self.info_before.as_ref()
    }

    pub fn info_after_event(&self) -> Option<&Arc<ContestInfo>> {
        self.info_after.as_ref()
    }

    /// The run map after the last event.
    pub fn runs_after_event(&self) -> &Arc<BTreeMap<RunId, Arc<RunInfo>>> {
        &self.runs
    }

    /// The run map as it was before the last event.
    pub fn runs_before_event(&self) -> BTreeMap<RunId, Arc<RunInfo>> {
        let mut runs = (*self.runs).clone();
        if let Some((id, replaced)) = &self.changed_run {
            match replaced {
                Some(old) => {
                    runs.insert(id.clone(), old.clone());
                }
                None => {
                    runs.remove(id);
                }
            }
        }
        runs
    }

    /// Id of the run changed by the last event, if it was a run update.
    pub fn changed_run_id(&self) -> Option<&RunId> {
        self.changed_run.as_ref().map(|(id, _)| id)
    }

    /// The previous version of the changed run (a rejudge replaced it).
    pub fn run_before_event(&self) -> Option<&Arc<RunInfo>> {
        self.changed_run
            .as_ref()
            .and_then(|(_, replaced)| replaced.as_ref())
    }

    pub fn commentary_after_event(&self) -> &Arc<BTreeMap<CommentaryId, CommentaryMessage>> {
        &self.commentary
    }

    pub fn last_event(&self) -> Option<&ContestUpdate> {
        self.last_event.as_ref()
    }

    /// Latest submission offset seen so far, handy for progress reporting.
    pub fn last_submission_time(&self) -> Duration {
        self.runs
            .values()
            .map(|run| run.time)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}
