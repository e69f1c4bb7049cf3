//! Storage format migrations
//!
//! Runs once when the store opens, before any trail is loaded. The only
//! migration today converts JSON trail files into the binary format; it can
//! be removed once no JSON trails are left in the wild.

use eyre::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::store::{self, layout};
use crate::trail::Point;

/// What a migration did (or would do, on a dry run)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub converted: usize,
    pub skipped_records: usize,
    pub failed: usize,
    pub writes: usize,
}

/// A one-shot storage migration
pub trait Migration {
    fn description(&self) -> &str;
    fn apply(&self, root: &Path, dry_run: bool) -> Result<MigrationReport>;
}

/// JSON `[{"x":..,"y":..,"z":..}]` trail files to 12-byte binary records
struct LegacyJsonTrails;

impl Migration for LegacyJsonTrails {
    fn description(&self) -> &str {
        "JSON trail files to binary"
    }

    fn apply(&self, root: &Path, dry_run: bool) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        for legacy in find_legacy_files(root) {
            match convert_file(&legacy, dry_run) {
                Ok(skipped) => {
                    report.converted += 1;
                    report.skipped_records += skipped;
                    if !dry_run {
                        report.writes += 1;
                    }
                }
                Err(e) => {
                    log::warn!("Leaving {} in place: {:#}", legacy.display(), e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

fn get_migrations() -> Vec<Box<dyn Migration>> {
    vec![Box::new(LegacyJsonTrails)]
}

/// Run every migration against `root`, returning one summary line per
/// migration that found work. Failures are logged, never returned.
pub fn run_migrations(root: &Path, dry_run: bool) -> Vec<String> {
    let mut applied = Vec::new();

    for migration in get_migrations() {
        match migration.apply(root, dry_run) {
            Ok(report) if report.converted == 0 && report.failed == 0 => {
                log::debug!("Nothing to migrate for: {}", migration.description());
            }
            Ok(report) => {
                let line = format!(
                    "{}{}: {} converted, {} malformed records skipped, {} failed",
                    if dry_run { "[dry-run] " } else { "" },
                    migration.description(),
                    report.converted,
                    report.skipped_records,
                    report.failed
                );
                applied.push(line);
            }
            Err(e) => log::error!("Migration '{}' failed: {:#}", migration.description(), e),
        }
    }

    applied
}

/// Legacy trail files directly inside session directories
fn find_legacy_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    let walker = WalkDir::new(root).min_depth(2).max_depth(2).sort_by_file_name();

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::debug!("Error walking storage root: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let is_legacy = entry
            .file_name()
            .to_str()
            .and_then(layout::parse_trail_file_name)
            .map(|(_, _, ext)| ext == layout::LEGACY_EXT)
            .unwrap_or(false);
        if is_legacy {
            found.push(entry.into_path());
        }
    }
    found
}

/// Convert one legacy file, returning how many records were skipped
fn convert_file(legacy: &Path, dry_run: bool) -> Result<usize> {
    let content = fs::read_to_string(legacy).context("Failed to read legacy trail")?;
    let value: Value = serde_json::from_str(&content).context("Failed to parse legacy trail")?;
    let (points, skipped) = parse_legacy_points(&value)?;

    let target = legacy.with_extension(layout::TRAIL_EXT);
    if dry_run {
        log::info!("[dry-run] Would convert {} ({} points)", legacy.display(), points.len());
        return Ok(skipped);
    }

    store::write_trail(&target, &points)?;
    fs::remove_file(legacy).context("Failed to remove legacy trail")?;
    log::info!(
        "Converted {} -> {} ({} points, {} skipped)",
        legacy.display(),
        target.display(),
        points.len(),
        skipped
    );
    Ok(skipped)
}

/// Points from a legacy array, in order. Whole-number floats such as `1.0`
/// count as integers. Records missing a coordinate (or holding one that is
/// not a 32-bit integer) are skipped.
fn parse_legacy_points(value: &Value) -> Result<(Vec<Point>, usize)> {
    let Some(records) = value.as_array() else {
        eyre::bail!("Legacy trail is not an array");
    };

    let coord = |record: &Value, key: &str| -> Option<i32> {
        let v = record.get(key)?;
        match v.as_i64() {
            Some(n) => i32::try_from(n).ok(),
            None => v
                .as_f64()
                .filter(|f| f.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(f))
                .map(|f| f as i32),
        }
    };

    let mut points = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for record in records {
        match (coord(record, "x"), coord(record, "y"), coord(record, "z")) {
            (Some(x), Some(y), Some(z)) => points.push(Point::new(x, y, z)),
            _ => skipped += 1,
        }
    }
    Ok((points, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trail::SpatialDomain;
    use serde_json::json;
    use tempfile::TempDir;

    fn legacy_path(root: &Path, session: &str, map: &str, domain: SpatialDomain) -> PathBuf {
        let dir = root.join(session);
        fs::create_dir_all(&dir).unwrap();
        dir.join(layout::trail_file_name(map, domain, layout::LEGACY_EXT))
    }

    #[test]
    fn test_parse_legacy_points_skips_malformed() {
        let value = json!([
            {"x": 1, "y": 2, "z": 3},
            {"x": 4, "y": 5},
            {"x": "7", "y": 8, "z": 9},
            {"x": 10, "y": 11, "z": 12, "extra": true},
            {"x": 1, "y": 2, "z": 99999999999i64},
            42
        ]);
        let (points, skipped) = parse_legacy_points(&value).unwrap();
        assert_eq!(points, vec![Point::new(1, 2, 3), Point::new(10, 11, 12)]);
        assert_eq!(skipped, 4);
    }

    #[test]
    fn test_parse_legacy_points_accepts_whole_floats() {
        let value = json!([
            {"x": 1.0, "y": 64.0, "z": -3.0},
            {"x": 1.5, "y": 64, "z": 0},
            {"x": 1, "y": 3e10, "z": 0}
        ]);
        let (points, skipped) = parse_legacy_points(&value).unwrap();
        assert_eq!(points, vec![Point::new(1, 64, -3)]);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_parse_legacy_points_rejects_non_array() {
        assert!(parse_legacy_points(&json!({"x": 1})).is_err());
    }

    #[test]
    fn test_migration_converts_and_removes_legacy() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let legacy = legacy_path(root, "default", "world", SpatialDomain::Overworld);
        fs::write(&legacy, r#"[{"x":1,"y":2,"z":3},{"x":-4,"y":5},{"x":6,"y":7,"z":-8}]"#).unwrap();

        let lines = run_migrations(root, false);
        assert_eq!(lines.len(), 1);
        assert!(!legacy.exists());

        let binary = legacy.with_extension("bin");
        let points = store::read_trail(&binary).unwrap();
        assert_eq!(points, vec![Point::new(1, 2, 3), Point::new(6, 7, -8)]);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let a = legacy_path(root, "default", "world", SpatialDomain::Nether);
        let b = legacy_path(root, "other", "server_25565", SpatialDomain::End);
        fs::write(&a, r#"[{"x":1,"y":1,"z":1},{"x":2,"y":1,"z":1}]"#).unwrap();
        fs::write(&b, r#"[{"x":0,"y":0,"z":0}]"#).unwrap();

        let first = LegacyJsonTrails.apply(root, false).unwrap();
        assert_eq!(first.converted, 2);
        assert_eq!(first.writes, 2);
        let a_bytes = fs::read(a.with_extension("bin")).unwrap();

        let second = LegacyJsonTrails.apply(root, false).unwrap();
        assert_eq!(second, MigrationReport::default());
        assert!(run_migrations(root, false).is_empty());
        assert_eq!(fs::read(a.with_extension("bin")).unwrap(), a_bytes);
        assert!(find_legacy_files(root).is_empty());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let legacy = legacy_path(temp.path(), "default", "world", SpatialDomain::Overworld);
        fs::write(&legacy, r#"[{"x":1,"y":2,"z":3}]"#).unwrap();

        let report = LegacyJsonTrails.apply(temp.path(), true).unwrap();
        assert_eq!(report.converted, 1);
        assert_eq!(report.writes, 0);
        assert!(legacy.exists());
        assert!(!legacy.with_extension("bin").exists());
    }

    #[test]
    fn test_unparseable_file_left_in_place() {
        let temp = TempDir::new().unwrap();
        let legacy = legacy_path(temp.path(), "default", "world", SpatialDomain::End);
        fs::write(&legacy, "{ not json").unwrap();

        let report = LegacyJsonTrails.apply(temp.path(), false).unwrap();
        assert_eq!(report.failed, 1);
        assert!(legacy.exists());
    }

    #[test]
    fn test_root_level_json_is_not_a_trail() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("settings.json"), "{}").unwrap();
        fs::write(
            temp.path().join(layout::trail_file_name("w", SpatialDomain::End, layout::LEGACY_EXT)),
            "[]",
        )
        .unwrap();
        assert!(find_legacy_files(temp.path()).is_empty());
    }

    #[test]
    fn test_missing_root() {
        assert!(run_migrations(Path::new("/nonexistent/pathtrail/root"), false).is_empty());
    }
}
