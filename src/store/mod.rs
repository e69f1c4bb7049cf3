//! Session-scoped trail storage
//!
//! Owns the on-disk layout under a storage root: the session index, the
//! settings record and one binary file per (session, map, domain) trail.
//! Public operations never fail; I/O errors are logged and the caller gets
//! a default (empty trail, unchanged settings).

pub mod codec;
pub mod layout;
pub mod settings;

use chrono::{DateTime, Local};
use eyre::{Context, Result};
use indexmap::IndexSet;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::migrate;
use crate::trail::{Point, SpatialDomain, Trails, empty_trails};
use layout::{DEFAULT_SESSION, SESSIONS_FILE, SETTINGS_FILE, TRAIL_EXT};
use settings::{Settings, SettingsField};

/// A binary trail file found in a session directory
#[derive(Debug, Clone, Serialize)]
pub struct TrailFile {
    pub map_id: String,
    pub domain: SpatialDomain,
    pub points: usize,
    pub bytes: u64,
    pub modified: Option<DateTime<Local>>,
    pub path: PathBuf,
}

/// Trail storage rooted at one directory
pub struct TrailStore {
    root: PathBuf,
    sessions: IndexSet<String>,
    settings: Settings,
}

impl TrailStore {
    /// Open the store: create missing layout, convert legacy trail files,
    /// then read the session index and settings.
    pub fn open(root: PathBuf) -> Self {
        initialize(&root);

        for line in migrate::run_migrations(&root, false) {
            log::info!("Migration: {}", line);
        }

        let mut store = Self {
            root,
            sessions: IndexSet::new(),
            settings: Settings::default(),
        };
        let (sessions, recovered) = store.read_sessions();
        store.sessions = sessions;
        if recovered {
            store.persist_sessions();
        }
        store.settings = store.read_settings();
        store
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_dir(&self, session: &str) -> PathBuf {
        self.root.join(session)
    }

    /// Known session names, in index order
    pub fn sessions(&self) -> &IndexSet<String> {
        &self.sessions
    }

    pub fn has_session(&self, name: &str) -> bool {
        self.sessions.contains(name)
    }

    /// Register a new session. Returns false if it already existed.
    pub fn create_session(&mut self, name: &str) -> Result<bool> {
        if !layout::is_valid_session_name(name) {
            eyre::bail!("Invalid session name '{}' (use letters, digits, '.', '_' or '-')", name);
        }
        if self.sessions.contains(name) {
            return Ok(false);
        }

        self.sessions.insert(name.to_string());
        if let Err(e) = fs::create_dir_all(self.session_dir(name)) {
            log::warn!("Failed to create session directory for {}: {}", name, e);
        }
        self.persist_sessions();
        log::info!("Created session: {}", name);
        Ok(true)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate and set one settings field, writing the whole record through
    pub fn set_setting(&mut self, field: SettingsField, value: &str) -> Result<()> {
        self.settings.apply(field, value)?;
        log::info!("Setting {} = {}", field.key(), self.settings.get(field));
        self.persist_settings();
        Ok(())
    }

    /// Make `name` the current session. The session must exist.
    pub fn set_current_session(&mut self, name: &str) -> Result<()> {
        if !self.sessions.contains(name) {
            eyre::bail!("Session not found: {}", name);
        }
        self.settings.current_session = name.to_string();
        self.persist_settings();
        Ok(())
    }

    /// Write every domain's trail for `map_id` under `session`, overwriting
    /// existing files. Returns the number of files written.
    pub fn save(&mut self, session: &str, map_id: &str, trails: &Trails) -> usize {
        if !self.sessions.contains(session) {
            if layout::is_valid_session_name(session) {
                self.sessions.insert(session.to_string());
                self.persist_sessions();
            } else {
                log::error!("Refusing to save under invalid session name '{}'", session);
                return 0;
            }
        }

        let dir = self.session_dir(session);
        if let Err(e) = fs::create_dir_all(&dir) {
            log::error!("Failed to create session directory {}: {}", dir.display(), e);
            return 0;
        }

        let mut written = 0;
        for (domain, points) in trails {
            let path = dir.join(layout::trail_file_name(map_id, *domain, TRAIL_EXT));
            match write_trail(&path, points) {
                Ok(()) => {
                    log::debug!("Saved {} points to {}", points.len(), path.display());
                    written += 1;
                }
                Err(e) => log::error!("Failed to save trail {}: {:#}", path.display(), e),
            }
        }
        written
    }

    /// Read every known domain's trail for `map_id` under `session`.
    /// Missing or unreadable files yield empty trails.
    pub fn load(&self, session: &str, map_id: &str) -> Trails {
        let mut trails = empty_trails();
        let dir = self.session_dir(session);

        for domain in SpatialDomain::ALL {
            let path = dir.join(layout::trail_file_name(map_id, domain, TRAIL_EXT));
            if !path.exists() {
                continue;
            }
            match read_trail(&path) {
                Ok(points) => {
                    log::debug!("Loaded {} points for {} from {}", points.len(), domain, path.display());
                    trails.insert(domain, points);
                }
                Err(e) => log::warn!("Failed to load trail {}: {:#}", path.display(), e),
            }
        }
        trails
    }

    /// Binary trail files stored under `session`, sorted by map then domain
    pub fn trail_files(&self, session: &str) -> Vec<TrailFile> {
        let dir = self.session_dir(session);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("No trail files for {}: {}", session, e);
                return Vec::new();
            }
        };

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some((map_id, domain, ext)) = layout::parse_trail_file_name(name) else {
                continue;
            };
            if ext != TRAIL_EXT {
                continue;
            }
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            files.push(TrailFile {
                map_id,
                domain,
                points: (meta.len() / codec::RECORD_LEN as u64) as usize,
                bytes: meta.len(),
                modified: meta.modified().ok().map(DateTime::<Local>::from),
                path,
            });
        }
        files.sort_by(|a, b| a.map_id.cmp(&b.map_id).then(a.domain.cmp(&b.domain)));
        files
    }

    /// Session index from `sessions.json`, plus any session directory the
    /// index lost. The flag is true when directories had to be added back.
    fn read_sessions(&self) -> (IndexSet<String>, bool) {
        let path = self.root.join(SESSIONS_FILE);
        let mut sessions = IndexSet::new();

        match fs::read_to_string(&path)
            .context("Failed to read session index")
            .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).context("Failed to parse session index"))
        {
            Ok(serde_json::Value::Array(items)) => {
                for item in items {
                    match item.as_str() {
                        Some(name) => {
                            sessions.insert(name.to_string());
                        }
                        None => log::warn!("Skipping non-string session entry: {}", item),
                    }
                }
            }
            Ok(other) => log::warn!("{} is not an array: {}", path.display(), other),
            Err(e) => log::warn!("{:#}", e),
        }

        if !sessions.contains(DEFAULT_SESSION) {
            sessions.shift_insert(0, DEFAULT_SESSION.to_string());
        }

        let mut recovered = false;
        for name in self.session_dirs() {
            if sessions.insert(name.clone()) {
                log::warn!("Session '{}' missing from {}, restored from its directory", name, path.display());
                recovered = true;
            }
        }
        (sessions, recovered)
    }

    /// Names of directories under the root that can be sessions, sorted
    fn session_dirs(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Cannot list {}: {}", self.root.display(), e);
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| layout::is_valid_session_name(name))
            .collect();
        names.sort();
        names
    }

    fn read_settings(&self) -> Settings {
        let path = self.root.join(SETTINGS_FILE);
        let value = fs::read_to_string(&path)
            .context("Failed to read settings")
            .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).context("Failed to parse settings"));

        let mut settings = match value {
            Ok(value) => Settings::from_json(&value),
            Err(e) => {
                log::warn!("{}: {:#}, using defaults", path.display(), e);
                Settings::default()
            }
        };

        if !self.sessions.contains(&settings.current_session) {
            log::warn!(
                "Current session '{}' is not in the session index, falling back to {}",
                settings.current_session,
                DEFAULT_SESSION
            );
            settings.current_session = DEFAULT_SESSION.to_string();
        }
        settings
    }

    fn persist_sessions(&self) {
        let names: Vec<&String> = self.sessions.iter().collect();
        if let Err(e) = write_json(&self.root.join(SESSIONS_FILE), &names) {
            log::error!("Failed to write session index: {:#}", e);
        }
    }

    fn persist_settings(&self) {
        if let Err(e) = write_json(&self.root.join(SETTINGS_FILE), &self.settings) {
            log::error!("Failed to write settings: {:#}", e);
        }
    }
}

/// Create the storage root, the default session and default settings where
/// missing. Errors are logged, never returned.
pub fn initialize(root: &Path) {
    if let Err(e) = fs::create_dir_all(root.join(DEFAULT_SESSION)) {
        log::warn!("Failed to create storage root {}: {}", root.display(), e);
        return;
    }

    let sessions = root.join(SESSIONS_FILE);
    if !sessions.exists()
        && let Err(e) = write_json(&sessions, &[DEFAULT_SESSION])
    {
        log::warn!("Failed to create session index: {:#}", e);
    }

    let settings = root.join(SETTINGS_FILE);
    if !settings.exists()
        && let Err(e) = write_json(&settings, &Settings::default())
    {
        log::warn!("Failed to create settings: {:#}", e);
    }
}

pub(crate) fn write_trail(path: &Path, points: &[Point]) -> Result<()> {
    fs::write(path, codec::encode_points(points)).context("Failed to write trail file")
}

pub(crate) fn read_trail(path: &Path) -> Result<Vec<Point>> {
    let bytes = fs::read(path).context("Failed to read trail file")?;
    let (points, trailing) = codec::decode_points(&bytes);
    if trailing > 0 {
        log::debug!("Dropped {} trailing bytes from {}", trailing, path.display());
    }
    Ok(points)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
