//! Host integration context
//!
//! Holds everything a host needs between callbacks: the store, the active
//! map, the in-memory trails for that map and the runtime toggles. The host
//! calls `on_tick` once per world update, `build_frame` once per rendered
//! frame and `on_shutdown` when it stops. Single-threaded; no locking.

#![allow(dead_code)] // toggle/is_* accessors - for hosts binding them to keys

use eyre::Result;

use crate::geometry::{self, Frame, Viewpoint};
use crate::store::TrailStore;
use crate::trail::{Point, SpatialDomain, Trails, empty_trails};

pub struct Tracker {
    store: TrailStore,
    current_map: Option<String>,
    trails: Trails,
    last_tracked: Option<Point>,
    tracking: bool,
    rendering: bool,
    depth_override: bool,
}

impl Tracker {
    pub fn new(store: TrailStore) -> Self {
        Self {
            store,
            current_map: None,
            trails: empty_trails(),
            last_tracked: None,
            tracking: false,
            rendering: false,
            depth_override: false,
        }
    }

    pub fn store(&self) -> &TrailStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TrailStore {
        &mut self.store
    }

    pub fn current_session(&self) -> &str {
        &self.store.settings().current_session
    }

    pub fn current_map(&self) -> Option<&str> {
        self.current_map.as_deref()
    }

    pub fn trail(&self, domain: SpatialDomain) -> &[Point] {
        self.trails.get(&domain).map(|t| t.as_slice()).unwrap_or(&[])
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn set_tracking(&mut self, enabled: bool) {
        self.tracking = enabled;
    }

    pub fn toggle_tracking(&mut self) -> bool {
        self.tracking = !self.tracking;
        self.tracking
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    pub fn set_rendering(&mut self, enabled: bool) {
        self.rendering = enabled;
    }

    pub fn toggle_rendering(&mut self) -> bool {
        self.rendering = !self.rendering;
        self.rendering
    }

    pub fn set_depth_override(&mut self, enabled: bool) {
        self.depth_override = enabled;
    }

    /// Make `map_id` the active map, loading its trails for the current
    /// session. The previous map's trails are saved first. Re-entering the
    /// active map keeps the in-memory trails.
    pub fn enter_map(&mut self, map_id: &str) {
        if self.current_map.as_deref() == Some(map_id) {
            return;
        }
        if self.current_map.is_some() {
            self.save();
        }
        self.trails = self.store.load(self.current_session(), map_id);
        self.current_map = Some(map_id.to_string());
        self.last_tracked = None;

        for (domain, points) in &self.trails {
            log::info!("Loaded {} points for {} on map {}", points.len(), domain, map_id);
        }
    }

    /// Record one sampled point. Returns true if it was appended.
    ///
    /// Ignored while tracking is off, before a map is entered, and when the
    /// point repeats the last one recorded.
    pub fn on_tick(&mut self, domain: SpatialDomain, point: Point) -> bool {
        if !self.tracking || self.current_map.is_none() {
            return false;
        }
        if self.last_tracked == Some(point) {
            return false;
        }
        self.trails.entry(domain).or_default().push(point);
        self.last_tracked = Some(point);
        true
    }

    /// Geometry for `domain`, or `None` while rendering is off or the trail
    /// is empty
    pub fn build_frame(&self, domain: SpatialDomain, viewpoint: &Viewpoint) -> Option<Frame> {
        if !self.rendering {
            return None;
        }
        let points = self.trail(domain);
        if points.is_empty() {
            return None;
        }
        let mut frame = geometry::build_frame(points, self.store.settings(), viewpoint);
        frame.depth_override = self.depth_override;
        Some(frame)
    }

    /// Write the active map's trails under the current session. Returns the
    /// number of files written; zero when no map is active.
    pub fn save(&mut self) -> usize {
        let Some(map_id) = self.current_map.clone() else {
            log::debug!("No active map, nothing to save");
            return 0;
        };
        let session = self.current_session().to_string();
        log::info!("Saving trails for session {} on map {}", session, map_id);
        self.store.save(&session, &map_id, &self.trails)
    }

    /// Save, then switch to `name` and reload the active map's trails from it
    pub fn switch_session(&mut self, name: &str) -> Result<()> {
        if !self.store.has_session(name) {
            eyre::bail!("Session not found: {}", name);
        }
        self.save();
        self.store.set_current_session(name)?;

        self.trails = match self.current_map.as_deref() {
            Some(map_id) => self.store.load(name, map_id),
            None => empty_trails(),
        };
        self.last_tracked = None;
        log::info!("Switched to session {}", name);
        Ok(())
    }

    pub fn on_shutdown(&mut self) -> usize {
        self.save()
    }
}
