use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::store::TrailStore;
use crate::trail::{Point, SpatialDomain};

#[derive(Serialize)]
struct TrailOutput<'a> {
    session: &'a str,
    map: &'a str,
    domain: SpatialDomain,
    points: &'a [Point],
}

pub fn run(
    map: &str,
    domain: Option<SpatialDomain>,
    session: Option<&str>,
    format: OutputFormat,
    store: &TrailStore,
) -> Result<()> {
    let session = session.unwrap_or(store.settings().current_session.as_str());
    if !store.has_session(session) {
        eyre::bail!("Session not found: {}", session);
    }

    let trails = store.load(session, map);
    let output: Vec<TrailOutput> = trails
        .iter()
        .filter(|(d, _)| domain.is_none_or(|wanted| wanted == **d))
        .map(|(d, points)| TrailOutput {
            session,
            map,
            domain: *d,
            points,
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&output)?),
        OutputFormat::Text => {
            println!("{} {} / {}", "Trail".bold(), session.cyan(), map.cyan());
            for trail in &output {
                println!();
                println!("  {} ({} points)", trail.domain.to_string().bold(), trail.points.len());
                if trail.points.is_empty() {
                    println!("    {}", "(empty)".dimmed());
                }
                for p in trail.points {
                    println!("    {}", p);
                }
            }
        }
    }
    Ok(())
}
