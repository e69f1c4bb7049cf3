//! Storage status command
//!
//! Shows where trails live, the sessions, the overlay settings and the trail
//! files of every session.

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::store::settings::Settings;
use crate::store::{TrailFile, TrailStore};

#[derive(Serialize)]
struct Status<'a> {
    version: &'static str,
    storage_root: String,
    settings: &'a Settings,
    sessions: Vec<SessionStatus>,
}

#[derive(Serialize)]
struct SessionStatus {
    name: String,
    current: bool,
    total_points: usize,
    files: Vec<TrailFile>,
}

pub fn run(format: OutputFormat, store: &TrailStore) -> Result<()> {
    let settings = store.settings();
    let sessions: Vec<SessionStatus> = store
        .sessions()
        .iter()
        .map(|name| {
            let files = store.trail_files(name);
            SessionStatus {
                name: name.clone(),
                current: *name == settings.current_session,
                total_points: files.iter().map(|f| f.points).sum(),
                files,
            }
        })
        .collect();

    let status = Status {
        version: env!("CARGO_PKG_VERSION"),
        storage_root: store.root().display().to_string(),
        settings,
        sessions,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&status)?),
        OutputFormat::Text => print_text(&status),
    }
    Ok(())
}

fn print_text(status: &Status) {
    println!("{} {}", "pathtrail".bold(), status.version.dimmed());
    println!("  storage: {}", status.storage_root.cyan());
    println!(
        "  overlay: {} mode, color {}, alpha {}, thickness {}",
        status.settings.mode, status.settings.color, status.settings.transparency, status.settings.thickness
    );
    println!();

    println!("{}", "Sessions:".bold());
    for session in &status.sessions {
        let marker = if session.current { "*".green() } else { " ".normal() };
        println!(
            "  {} {:16} {} files, {} points",
            marker,
            session.name.cyan(),
            session.files.len(),
            session.total_points
        );
        for file in &session.files {
            let modified = file
                .modified
                .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "      {:24} {:22} {:>8} points  {}",
                file.map_id,
                file.domain.to_string(),
                file.points,
                modified.dimmed()
            );
        }
    }
}
