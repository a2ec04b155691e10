//! feed_inspector - sanity-check and summarize a recorded contest feed.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scorefeed_backend::event::ContestUpdate;
use scorefeed_backend::feed;
use scorefeed_backend::model::RunResult;
use scorefeed_backend::scoreboard::{ranking, scoreboard_row, OptimismLevel};
use scorefeed_backend::state::ContestState;

#[derive(Parser)]
#[command(name = "feed_inspector", about = "Summarize a contest event feed")]
struct Args {
    /// Recorded event feed (JSON lines).
    feed: PathBuf,

    /// Also print the final standings at normal optimism.
    #[arg(long)]
    standings: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let events = feed::read_feed(&args.feed)?;

    let mut infos = 0usize;
    let mut runs = 0usize;
    let mut commentary = 0usize;
    let mut verdicts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for event in &events {
        match event {
            ContestUpdate::InfoUpdate(_) => infos += 1,
            ContestUpdate::RunUpdate(run) => {
                runs += 1;
                let label = match &run.result {
                    RunResult::Icpc { verdict, .. } => verdict.short_name(),
                    RunResult::Ioi { .. } => "IOI",
                    RunResult::InProgress { .. } => "..",
                };
                *verdicts.entry(label).or_default() += 1;
            }
            ContestUpdate::CommentaryUpdate(_) => commentary += 1,
        }
    }

    println!("{}", args.feed.display());
    println!("  events:     {}", events.len());
    println!("  info:       {infos}");
    println!("  runs:       {runs}");
    println!("  commentary: {commentary}");
    for (label, count) in &verdicts {
        println!("    {label:<4} {count}");
    }

    let state = ContestState::from_events(events);
    let Some(info) = state.info_after_event() else {
        println!("  no contest info in feed");
        return Ok(());
    };
    println!("  contest:    {}", info.name);
    println!("  teams:      {}", info.teams.len());
    println!("  problems:   {}", info.problems.len());
    println!(
        "  last run:   {}s into the contest",
        state.last_submission_time().as_secs()
    );

    if args.standings {
        let rows: BTreeMap<_, _> = info
            .teams
            .keys()
            .map(|team| {
                let mut team_runs: Vec<_> = state
                    .runs_after_event()
                    .values()
                    .filter(|r| r.team_id == *team)
                    .cloned()
                    .collect();
                team_runs.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.id.cmp(&b.id)));
                (
                    team.clone(),
                    scoreboard_row(info, &team_runs, OptimismLevel::Normal),
                )
            })
            .collect();
        let ranking = ranking(info, &rows);
        for (team, rank) in ranking.order.iter().zip(&ranking.ranks) {
            let name = info
                .teams
                .get(team)
                .map(|t| t.display_name.as_str())
                .unwrap_or(team.as_str());
            let row = &rows[team];
            println!(
                "{rank:>4}  {name:<32} {:>6.1}  {:>5}",
                row.total_score,
                row.penalty.as_secs() / 60
            );
        }
    }
    Ok(())
}
