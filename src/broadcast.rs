//! Scoreboard snapshot store and diff fan-out.
//!
//! One publisher (the engine fold) and any number of subscribers. Each
//! optimism level has its own snapshot slot and diff channel. Subscribers
//! read the current snapshot and then tail diffs; subscribing to the diff
//! channel before loading the snapshot means nothing can fall in between.
//! Lagging subscribers lose the oldest diffs, never the newest.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::broadcast;
use tracing::trace;

use crate::engine::ContestStateWithScoreboard;
use crate::model::{ContestInfo, TeamId};
use crate::scoreboard::{OptimismLevel, Ranking, ScoreboardRow};

/// Complete scoreboard at one optimism level.
#[derive(Debug, Clone)]
pub struct ScoreboardSnapshot {
    pub level: OptimismLevel,
    pub contest: Arc<ContestInfo>,
    pub rows: BTreeMap<TeamId, ScoreboardRow>,
    pub ranking: Ranking,
}

/// What one folded event changed at one optimism level.
#[derive(Debug, Clone)]
pub struct ScoreboardDiff {
    pub level: OptimismLevel,
    /// Rows that appeared or changed.
    pub changed_rows: BTreeMap<TeamId, ScoreboardRow>,
    /// Teams whose row disappeared (team hidden or removed).
    pub removed_teams: Vec<TeamId>,
    pub ranking: Ranking,
}

impl ScoreboardDiff {
    pub fn is_empty(&self) -> bool {
        self.changed_rows.is_empty() && self.removed_teams.is_empty()
    }
}

struct LevelChannel {
    snapshot: ArcSwapOption<ScoreboardSnapshot>,
    diffs: broadcast::Sender<Arc<ScoreboardDiff>>,
}

/// Shared handle; clones publish and subscribe against the same slots.
#[derive(Clone)]
pub struct ScoreboardBroadcaster {
    levels: Arc<[LevelChannel; 3]>,
}

impl ScoreboardBroadcaster {
    pub fn new(diff_capacity: usize) -> Self {
        let levels = [(); 3].map(|_| LevelChannel {
            snapshot: ArcSwapOption::empty(),
            diffs: broadcast::channel(diff_capacity).0,
        });
        Self {
            levels: Arc::new(levels),
        }
    }

    /// Current snapshot plus a diff receiver, in that order of validity:
    /// every diff the receiver yields applies on top of the snapshot.
    pub fn subscribe(
        &self,
        level: OptimismLevel,
    ) -> (
        Option<Arc<ScoreboardSnapshot>>,
        broadcast::Receiver<Arc<ScoreboardDiff>>,
    ) {
        let channel = &self.levels[level.index()];
        let receiver = channel.diffs.subscribe();
        let snapshot = channel.snapshot.load_full();
        (snapshot, receiver)
    }

    pub fn snapshot(&self, level: OptimismLevel) -> Option<Arc<ScoreboardSnapshot>> {
        self.levels[level.index()].snapshot.load_full()
    }

    /// Publish one folded event to all three levels.
    pub fn publish(&self, update: &ContestStateWithScoreboard) {
        let Some(contest) = update.state.info_after_event() else {
            return;
        };
        for level in OptimismLevel::ALL {
            let before = update.level_before(level);
            let after = update.level_after(level);

            let mut changed_rows = BTreeMap::new();
            for (team, row) in &after.rows {
                if before.rows.get(team) != Some(row) {
                    changed_rows.insert(team.clone(), row.clone());
                }
            }
            let removed_teams: Vec<TeamId> = before
                .rows
                .keys()
                .filter(|team| !after.rows.contains_key(*team))
                .cloned()
                .collect();

            let channel = &self.levels[level.index()];
            channel.snapshot.store(Some(Arc::new(ScoreboardSnapshot {
                level,
                contest: contest.clone(),
                rows: after.rows.clone(),
                ranking: after.ranking.clone(),
            })));

            let diff = ScoreboardDiff {
                level,
                changed_rows,
                removed_teams,
                ranking: after.ranking.clone(),
            };
            if diff.is_empty() && before.ranking == after.ranking {
                continue;
            }
            trace!(
                level = ?level,
                changed = diff.changed_rows.len(),
                removed = diff.removed_teams.len(),
                "publishing scoreboard diff"
            );
            // Send fails only with zero subscribers, which is fine.
            let _ = channel.diffs.send(Arc::new(diff));
        }
    }
}
