//! Trail geometry
//!
//! Turns one domain's ordered trail into ribbon quads for an overlay
//! renderer: cull to a box around the viewer, split into neighbor runs,
//! reduce each run to control points, sample a Catmull-Rom curve through
//! them and extrude a camera-facing strip. Runs that reduce to a single
//! control point get a small cube instead.

pub mod math;
pub mod reduce;
pub mod ribbon;
pub mod segment;
pub mod spline;

use serde::Serialize;

use crate::store::settings::Settings;
use crate::trail::Point;
use math::{Rgba, Vec3};
use ribbon::{Cube, Quad};

/// Where the trail is seen from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewpoint {
    pub position: Vec3,
    pub direction: Vec3,
}

impl Viewpoint {
    /// A zero-length direction is replaced by +Z
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction: direction.try_normalize().unwrap_or(Vec3::UNIT_Z),
        }
    }
}

/// Drawable output for one domain
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    pub quads: Vec<Quad>,
    pub cubes: Vec<Cube>,
    /// Renderer hint: draw over terrain instead of depth testing
    pub depth_override: bool,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty() && self.cubes.is_empty()
    }

    /// Ribbon quads followed by every cube face
    pub fn all_quads(&self) -> Vec<Quad> {
        let mut quads = self.quads.clone();
        quads.extend(self.cubes.iter().flat_map(|c| c.faces()));
        quads
    }
}

/// Overlay color from settings, transparency as alpha
pub fn overlay_color(settings: &Settings) -> Rgba {
    let [r, g, b] = settings.color.to_unit();
    Rgba {
        r,
        g,
        b,
        a: settings.transparency,
    }
}

/// Build the frame for `points` as seen from `viewpoint`
pub fn build_frame(points: &[Point], settings: &Settings, viewpoint: &Viewpoint) -> Frame {
    let mut frame = Frame::default();
    let color = overlay_color(settings);
    let cube_color = color.with_alpha(color.a / 2.0);
    let reducer = settings.mode.reducer(settings);

    let visible = segment::cull(points, viewpoint.position, settings.render_distance);
    for run in segment::segments(&visible) {
        let centers: Vec<Vec3> = run.iter().map(|&p| Vec3::center_of(p)).collect();
        let mut controls = reducer.reduce(&centers);
        controls.dedup_by(|a, b| (*a - *b).length() <= math::EPSILON);

        match controls.as_slice() {
            [] => {}
            [only] => frame.cubes.push(Cube::new(*only, cube_color)),
            _ => {
                let curve = spline::curve(&controls, settings.subdivisions);
                frame
                    .quads
                    .extend(ribbon::ribbon(&curve, viewpoint, settings.thickness, color));
            }
        }
    }

    log::trace!(
        "Built frame: {} points, {} visible, {} quads, {} cubes",
        points.len(),
        visible.len(),
        frame.quads.len(),
        frame.cubes.len()
    );
    frame
}
