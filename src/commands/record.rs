//! Feed points into a trail as if they were sampled tick by tick

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::store::TrailStore;
use crate::tracker::Tracker;
use crate::trail::{Point, SpatialDomain};

pub fn run(map: &str, domain: SpatialDomain, input: Option<&Path>, store: TrailStore) -> Result<()> {
    let content = match input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read points from stdin")?;
            buf
        }
    };
    let points = parse_points(&content)?;

    let mut tracker = Tracker::new(store);
    tracker.enter_map(map);
    tracker.set_tracking(true);

    let before = tracker.trail(domain).len();
    let mut appended = 0;
    for p in points {
        if tracker.on_tick(domain, p) {
            appended += 1;
        }
    }
    let total = tracker.trail(domain).len();

    if tracker.on_shutdown() == 0 {
        eyre::bail!("Failed to save trail for {} (see log for details)", map);
    }

    println!(
        "{} Recorded {} points on {} ({}) in session {}: {} -> {} total",
        "✓".green(),
        appended,
        map.cyan(),
        domain,
        tracker.current_session().cyan(),
        before,
        total
    );
    Ok(())
}

/// One point per line; blank lines and `#` comments are ignored
fn parse_points(content: &str) -> Result<Vec<Point>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| line.parse::<Point>().with_context(|| format!("Line {}", n)))
        .collect()
}
