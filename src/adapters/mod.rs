//! Event-stream adapters.
//!
//! Each adapter is a synchronous stage turning one incoming [`ContestUpdate`]
//! into zero or more outgoing ones, with whatever private state it needs.
//! Stages compose into an [`AdapterChain`]; [`pump`] drives a chain between
//! two channels. The canonical live order is
//! hidden -> after-first-ok -> first-to-solve -> freeze.

pub mod after_first_ok;
pub mod emulation;
pub mod first_to_solve;
pub mod freeze;
pub mod hidden;
pub mod previous_day;

pub use after_first_ok::AfterFirstOkAdapter;
pub use emulation::EmulationSettings;
pub use first_to_solve::FirstToSolveAdapter;
pub use freeze::FreezeAdapter;
pub use hidden::HiddenEntityAdapter;
pub use previous_day::PreviousDayAdapter;

use tokio::sync::mpsc;
use tracing::debug;

use crate::event::ContestUpdate;

/// One stage of the update pipeline.
pub trait UpdateAdapter: Send {
    /// Process one update, pushing the resulting updates onto `out` in the
    /// order they should reach the next stage.
    fn apply(&mut self, update: ContestUpdate, out: &mut Vec<ContestUpdate>);
}

/// A sequence of adapters applied left to right.
#[derive(Default)]
pub struct AdapterChain {
    stages: Vec<Box<dyn UpdateAdapter>>,
}

impl AdapterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stage: impl UpdateAdapter + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// The standard live pipeline for a contest feed.
    pub fn standard() -> Self {
        Self::new()
            .with(HiddenEntityAdapter::new())
            .with(AfterFirstOkAdapter::new())
            .with(FirstToSolveAdapter::new())
            .with(FreezeAdapter::new())
    }
}

impl UpdateAdapter for AdapterChain {
    fn apply(&mut self, update: ContestUpdate, out: &mut Vec<ContestUpdate>) {
        let mut current = vec![update];
        let mut next = Vec::new();
        for stage in &mut self.stages {
            for update in current.drain(..) {
                stage.apply(update, &mut next);
            }
            std::mem::swap(&mut current, &mut next);
        }
        out.append(&mut current);
    }
}

/// Drive an adapter between two channels until the input closes or the
/// consumer goes away.
pub async fn pump(
    mut rx: mpsc::Receiver<ContestUpdate>,
    mut adapter: impl UpdateAdapter,
    tx: mpsc::Sender<ContestUpdate>,
) {
    let mut out = Vec::new();
    while let Some(update) = rx.recv().await {
        adapter.apply(update, &mut out);
        for update in out.drain(..) {
            if tx.send(update).await.is_err() {
                debug!("update consumer dropped, stopping adapter pump");
                return;
            }
        }
    }
}

/// Run a whole recorded event list through an adapter.
pub fn apply_all(
    adapter: &mut impl UpdateAdapter,
    events: impl IntoIterator<Item = ContestUpdate>,
) -> Vec<ContestUpdate> {
    let mut out = Vec::new();
    for event in events {
        adapter.apply(event, &mut out);
    }
    out
}
