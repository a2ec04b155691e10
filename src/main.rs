//! scorefeed - replay a recorded contest feed as a live scoreboard.
//!
//! Reads a JSON-lines event feed, replays it through the emulation
//! scheduler and the standard adapter pipeline, folds it in the engine and
//! prints the final standings of the chosen optimism level.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scorefeed_backend::adapters::{
    self, AdapterChain, PreviousDayAdapter,
};
use scorefeed_backend::adapters::previous_day::PreviousDay;
use scorefeed_backend::broadcast::ScoreboardBroadcaster;
use scorefeed_backend::config::{self, Config};
use scorefeed_backend::engine;
use scorefeed_backend::event::ContestUpdate;
use scorefeed_backend::feed;
use scorefeed_backend::scoreboard::OptimismLevel;
use scorefeed_backend::state::ContestState;

#[derive(Parser)]
#[command(name = "scorefeed", about = "Contest scoreboard replay engine")]
struct Args {
    /// Recorded event feed (JSON lines).
    #[arg(long, env = "FEED_PATH")]
    feed: PathBuf,

    /// Replay speed factor; overrides EMULATION_SPEED.
    #[arg(long)]
    speed: Option<f64>,

    /// Synthesize random in-progress updates before judged runs.
    #[arg(long)]
    random_in_progress: bool,

    /// RNG seed for the synthesized updates.
    #[arg(long)]
    seed: Option<u64>,

    /// Optimism level of the printed standings.
    #[arg(long, default_value = "normal", value_parser = parse_level)]
    level: OptimismLevel,
}

fn parse_level(raw: &str) -> Result<OptimismLevel, String> {
    match raw {
        "normal" => Ok(OptimismLevel::Normal),
        "optimistic" => Ok(OptimismLevel::Optimistic),
        "pessimistic" => Ok(OptimismLevel::Pessimistic),
        other => Err(format!("unknown optimism level {other:?}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(speed) = args.speed {
        config.emulation.speed = speed;
    }
    if args.random_in_progress {
        config.emulation.use_random_in_progress = true;
    }
    if args.seed.is_some() {
        config.emulation.rng_seed = args.seed;
    }

    let mut events = feed::read_feed(&args.feed)?;
    apply_overrides(&mut events, &config)?;
    info!(events = events.len(), feed = %args.feed.display(), "loaded feed");

    let mut previous_days = Vec::new();
    for path in &config.previous_day_feeds {
        let day_events = feed::read_feed(path)?;
        let state = ContestState::from_events(day_events);
        let day = PreviousDay::from_state(&state)
            .with_context(|| format!("feed {} holds no contest info", path.display()))?;
        previous_days.push(day);
    }

    let replay_rx = adapters::emulation::spawn(events, config.emulation.clone())?;
    let chain = AdapterChain::new()
        .with(PreviousDayAdapter::new(previous_days))
        .with(AdapterChain::standard());
    let (chain_tx, engine_rx) = mpsc::channel(256);
    tokio::spawn(adapters::pump(replay_rx, chain, chain_tx));

    let broadcaster = ScoreboardBroadcaster::new(256);
    engine::run(engine_rx, broadcaster.clone()).await;

    print_standings(&broadcaster, args.level);
    Ok(())
}

fn apply_overrides(events: &mut [ContestUpdate], config: &Config) -> Result<()> {
    for event in events.iter_mut() {
        let ContestUpdate::InfoUpdate(info) = event else {
            continue;
        };
        if let Some(awards) = &config.awards {
            info.awards = awards.clone();
        }
        if let Some(mode) = config.penalty_rounding_mode {
            info.penalty_rounding_mode = mode;
        }
        config::validate_contest(info)?;
    }
    Ok(())
}

fn print_standings(broadcaster: &ScoreboardBroadcaster, level: OptimismLevel) {
    let Some(snapshot) = broadcaster.snapshot(level) else {
        println!("no contest info seen, nothing to show");
        return;
    };
    println!("{} final standings ({:?})", snapshot.contest.name, level);
    for (team_id, rank) in snapshot.ranking.order.iter().zip(&snapshot.ranking.ranks) {
        let name = snapshot
            .contest
            .teams
            .get(team_id)
            .map(|t| t.display_name.as_str())
            .unwrap_or(team_id.as_str());
        let Some(row) = snapshot.rows.get(team_id) else {
            continue;
        };
        println!(
            "{rank:>4}  {name:<32} {:>6.1}  {:>5}",
            row.total_score,
            row.penalty.as_secs() / 60
        );
    }
    for award in &snapshot.ranking.awards {
        println!("award {}: {} team(s)", award.id(), award.teams().len());
    }
}
