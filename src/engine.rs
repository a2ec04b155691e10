//! The single-writer fold pairing contest state with live scoreboards.
//!
//! One engine instance owns the total event order of a contest. Every
//! accepted event produces a [`ContestStateWithScoreboard`] carrying the
//! rankings before and after it, at all three optimism levels at once.
//! Per-team rows are cached and only recomputed for teams an event touched;
//! the ranking itself is always rebuilt from scratch.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::broadcast::ScoreboardBroadcaster;
use crate::event::ContestUpdate;
use crate::model::{RunInfo, TeamId};
use crate::scoreboard::{ranking, scoreboard_row, OptimismLevel, Ranking, ScoreboardRow};
use crate::state::ContestState;

/// Rows plus ranking at one optimism level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSnapshot {
    pub rows: BTreeMap<TeamId, ScoreboardRow>,
    pub ranking: Ranking,
}

/// One folded event with its surrounding scoreboards, indexed by
/// [`OptimismLevel::index`].
#[derive(Debug, Clone)]
pub struct ContestStateWithScoreboard {
    pub state: ContestState,
    pub before: [Arc<LevelSnapshot>; 3],
    pub after: [Arc<LevelSnapshot>; 3],
}

impl ContestStateWithScoreboard {
    pub fn level_after(&self, level: OptimismLevel) -> &Arc<LevelSnapshot> {
        &self.after[level.index()]
    }

    pub fn level_before(&self, level: OptimismLevel) -> &Arc<LevelSnapshot> {
        &self.before[level.index()]
    }
}

#[derive(Default)]
pub struct ScoreboardEngine {
    state: ContestState,
    /// Per-team runs sorted by (time, id), the order row computation scans.
    runs_by_team: BTreeMap<TeamId, Vec<Arc<RunInfo>>>,
    levels: [Arc<LevelSnapshot>; 3],
}

impl ScoreboardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ContestState {
        &self.state
    }

    pub fn level(&self, level: OptimismLevel) -> &Arc<LevelSnapshot> {
        &self.levels[level.index()]
    }

    /// Fold one event. Returns `None` when the event was dropped as
    /// malformed (already logged).
    pub fn apply(&mut self, update: ContestUpdate) -> Option<ContestStateWithScoreboard> {
        let next_state = self.state.apply_or_log(update)?;
        let before = self.levels.clone();

        // Keep the per-team index in step with the single changed run.
        let mut touched: Vec<TeamId> = Vec::new();
        if let Some(run_id) = next_state.changed_run_id() {
            if let Some(old) = next_state.run_before_event() {
                touched.push(old.team_id.clone());
                if let Some(runs) = self.runs_by_team.get_mut(&old.team_id) {
                    runs.retain(|r| r.id != *run_id);
                }
            }
            if let Some(new_run) = next_state.runs_after_event().get(run_id) {
                touched.push(new_run.team_id.clone());
                let runs = self.runs_by_team.entry(new_run.team_id.clone()).or_default();
                let at = match runs.binary_search_by(|r| {
                    r.time
                        .cmp(&new_run.time)
                        .then_with(|| r.id.cmp(&new_run.id))
                }) {
                    Ok(at) | Err(at) => at,
                };
                runs.insert(at, new_run.clone());
            }
        }

        let info_changed = matches!(next_state.last_event(), Some(ContestUpdate::InfoUpdate(_)));
        if let Some(contest) = next_state.info_after_event().cloned() {
            for level in OptimismLevel::ALL {
                let snapshot = &self.levels[level.index()];
                let mut rows = snapshot.rows.clone();
                if info_changed {
                    // Team or problem sets may have changed; rebuild all.
                    // Hidden teams get no row at all.
                    rows = contest
                        .teams
                        .values()
                        .filter(|team| !team.is_hidden)
                        .map(|team| {
                            let runs = self
                                .runs_by_team
                                .get(&team.id)
                                .map(Vec::as_slice)
                                .unwrap_or(&[]);
                            (team.id.clone(), scoreboard_row(&contest, runs, level))
                        })
                        .collect();
                } else {
                    for team in &touched {
                        match contest.teams.get(team) {
                            Some(entry) if !entry.is_hidden => {
                                let runs = self
                                    .runs_by_team
                                    .get(team)
                                    .map(Vec::as_slice)
                                    .unwrap_or(&[]);
                                rows.insert(team.clone(), scoreboard_row(&contest, runs, level));
                            }
                            _ => {
                                rows.remove(team);
                            }
                        }
                    }
                }
                let ranking = ranking(&contest, &rows);
                self.levels[level.index()] = Arc::new(LevelSnapshot { rows, ranking });
            }
        }

        self.state = next_state;
        Some(ContestStateWithScoreboard {
            state: self.state.clone(),
            before,
            after: self.levels.clone(),
        })
    }
}

/// Drive an engine from a channel, publishing every folded event.
pub async fn run(mut rx: mpsc::Receiver<ContestUpdate>, broadcaster: ScoreboardBroadcaster) {
    let mut engine = ScoreboardEngine::new();
    let mut folded = 0u64;
    while let Some(update) = rx.recv().await {
        if let Some(result) = engine.apply(update) {
            folded += 1;
            broadcaster.publish(&result);
        }
    }
    info!(folded, "event stream ended");
    debug!(
        runs = engine.state().runs_after_event().len(),
        "final contest state"
    );
}
