//! Recorded event feeds: one JSON object per line, in stream order.
//!
//! The format the replay tooling reads and writes. Blank lines are skipped
//! so hand-edited feeds stay readable.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use crate::event::ContestUpdate;

pub fn read_feed(path: impl AsRef<Path>) -> anyhow::Result<Vec<ContestUpdate>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("opening feed {}", path.display()))?;
    let mut events = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading feed {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: ContestUpdate = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed event", path.display(), number + 1))?;
        events.push(event);
    }
    Ok(events)
}

pub fn write_feed(
    path: impl AsRef<Path>,
    events: &[ContestUpdate],
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("creating feed {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
