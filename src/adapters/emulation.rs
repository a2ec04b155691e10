//! Time-compressed replay of a recorded contest.
//!
//! A finite historic event list is folded to its final state, rebuilt into a
//! schedule of contest-relative offsets, and emitted as a live-shaped stream
//! where the event at offset `t` fires at `start_time + t / speed`. Late
//! targets fire immediately in a burst; the scheduler never accelerates the
//! clock beyond `speed` to catch up.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::ConfigurationError;
use crate::event::ContestUpdate;
use crate::model::{ContestStatus, RunResult};
use crate::state::ContestState;

#[derive(Debug, Clone)]
pub struct EmulationSettings {
    /// Replay speed factor, strictly positive. 1.0 is real time.
    pub speed: f64,
    /// Wall-clock moment that maps to contest offset zero.
    pub start_time: DateTime<Utc>,
    /// Synthesize rising in-progress updates before each judged run.
    pub use_random_in_progress: bool,
    /// Fixed RNG seed for the synthesized updates.
    pub rng_seed: Option<u64>,
}

impl EmulationSettings {
    pub fn new(speed: f64, start_time: DateTime<Utc>) -> Self {
        Self {
            speed,
            start_time,
            use_random_in_progress: false,
            rng_seed: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.speed > 0.0) {
            return Err(ConfigurationError::NonPositiveSpeed(self.speed));
        }
        Ok(())
    }

    fn wall_clock_at(&self, offset: Duration) -> DateTime<Utc> {
        self.start_time
            + chrono::Duration::milliseconds(offset.div_f64(self.speed).as_millis() as i64)
    }
}

/// Rebuild the emitted schedule from the final folded state.
///
/// Info updates for the running start, the freeze boundary and the finish
/// are synthesized; runs fire at their recorded offsets with rejudges
/// already collapsed. Ordering at equal offsets is deterministic: info
/// first, then runs by id, then commentary.
fn build_schedule(
    events: Vec<ContestUpdate>,
    settings: &EmulationSettings,
) -> Vec<(Duration, ContestUpdate)> {
    let state = ContestState::from_events(events);
    let Some(info) = state.info_after_event() else {
        return Vec::new();
    };
    let mut info = info.as_ref().clone();
    info.emulation_speed = settings.speed;
    let started_at = settings.start_time;
    let frozen_at = info.freeze_time.map(|freeze| settings.wall_clock_at(freeze));

    let mut schedule: Vec<(Duration, ContestUpdate)> = Vec::new();
    let mut running = info.clone();
    running.status = ContestStatus::Running {
        started_at,
        frozen_at: None,
    };
    schedule.push((Duration::ZERO, ContestUpdate::InfoUpdate(running)));
    if let Some(freeze) = info.freeze_time {
        let mut frozen = info.clone();
        frozen.status = ContestStatus::Running {
            started_at,
            frozen_at,
        };
        schedule.push((freeze, ContestUpdate::InfoUpdate(frozen)));
    }
    let mut over = info.clone();
    over.status = ContestStatus::Over {
        started_at,
        finished_at: settings.wall_clock_at(info.contest_length),
        frozen_at,
    };
    schedule.push((info.contest_length, ContestUpdate::InfoUpdate(over)));

    let mut rng = ChaCha8Rng::seed_from_u64(settings.rng_seed.unwrap_or_else(rand::random));
    for run in state.runs_after_event().values() {
        let run = run.as_ref().clone();
        if settings.use_random_in_progress && run.is_judged() {
            let steps = rng.gen_range(0..3u32);
            for step in 0..steps {
                let progress = f64::from(step + 1) / f64::from(steps + 1);
                let mut partial = run.clone();
                partial.result = RunResult::InProgress {
                    tested_part: progress,
                };
                // Spread the partial updates over the tail before the
                // final verdict lands.
                let at = run.time.mul_f64(0.5 + 0.5 * progress);
                schedule.push((at, ContestUpdate::RunUpdate(partial)));
            }
        }
        schedule.push((run.time, ContestUpdate::RunUpdate(run)));
    }
    for message in state.commentary_after_event().values() {
        schedule.push((
            message.relative_time,
            ContestUpdate::CommentaryUpdate(message.clone()),
        ));
    }
    // Stable: equal offsets keep push order.
    schedule.sort_by_key(|(at, _)| *at);
    schedule
}

/// Start the replay scheduler, returning the live-shaped stream.
///
/// Dropping the receiver stops the scheduler; exhausting the schedule
/// closes the channel normally.
pub fn spawn(
    events: Vec<ContestUpdate>,
    settings: EmulationSettings,
) -> Result<mpsc::Receiver<ContestUpdate>, ConfigurationError> {
    settings.validate()?;
    let schedule = build_schedule(events, &settings);
    info!(
        events = schedule.len(),
        speed = settings.speed,
        "starting contest replay"
    );
    let (tx, rx) = mpsc::channel(64);
    let speed = settings.speed;
    let start_time = settings.start_time;
    tokio::spawn(async move {
        let origin = tokio::time::Instant::now();
        // Offset of start_time from the moment the task began; negative
        // when replaying a start in the past (burst catch-up).
        let lead_ms = (start_time - Utc::now()).num_milliseconds();
        for (offset, update) in schedule {
            let target_ms = lead_ms + offset.div_f64(speed).as_millis() as i64;
            if target_ms > 0 {
                tokio::time::sleep_until(origin + Duration::from_millis(target_ms as u64)).await;
            }
            if tx.send(update).await.is_err() {
                debug!("replay consumer dropped, stopping scheduler");
                return;
            }
        }
        debug!("replay schedule exhausted");
    });
    Ok(rx)
}
