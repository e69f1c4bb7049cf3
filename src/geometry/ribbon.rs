//! Camera-facing quad strips and fallback cubes

use serde::Serialize;

use super::Viewpoint;
use super::math::{Rgba, Vec3};

/// Edge length of the cube drawn for a lone point
pub const CUBE_SIZE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Rgba,
}

/// Four vertices with consistent winding
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quad {
    pub vertices: [Vertex; 4],
}

impl Quad {
    fn new(corners: [Vec3; 4], color: Rgba) -> Self {
        Self {
            vertices: corners.map(|position| Vertex { position, color }),
        }
    }
}

/// Axis-aligned cube marking a segment too short for a ribbon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cube {
    pub center: Vec3,
    pub size: f64,
    pub color: Rgba,
}

impl Cube {
    pub fn new(center: Vec3, color: Rgba) -> Self {
        Self {
            center,
            size: CUBE_SIZE,
            color,
        }
    }

    /// The six faces as quads
    pub fn faces(&self) -> [Quad; 6] {
        let h = self.size / 2.0;
        let (x0, x1) = (self.center.x - h, self.center.x + h);
        let (y0, y1) = (self.center.y - h, self.center.y + h);
        let (z0, z1) = (self.center.z - h, self.center.z + h);
        let v = Vec3::new;
        let c = self.color;

        [
            // front
            Quad::new([v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1)], c),
            // back
            Quad::new([v(x1, y0, z0), v(x0, y0, z0), v(x0, y1, z0), v(x1, y1, z0)], c),
            // left
            Quad::new([v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0)], c),
            // right
            Quad::new([v(x1, y0, z1), v(x1, y0, z0), v(x1, y1, z0), v(x1, y1, z1)], c),
            // bottom
            Quad::new([v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1)], c),
            // top
            Quad::new([v(x0, y1, z1), v(x1, y1, z1), v(x1, y1, z0), v(x0, y1, z0)], c),
        ]
    }
}

/// Unit vector across the ribbon at `at` for a strip running along `tangent`.
///
/// Faces the viewer when possible. When the tangent points at the viewer the
/// view direction is tried, then world up, then world X, so the choice is
/// stable for a given tangent.
pub fn side_vector(tangent: Vec3, at: Vec3, viewpoint: &Viewpoint) -> Option<Vec3> {
    let to_viewer = (at - viewpoint.position).normalized();
    [to_viewer, viewpoint.direction.normalized(), Vec3::UNIT_Y, Vec3::UNIT_X]
        .into_iter()
        .find_map(|axis| tangent.cross(axis).try_normalize())
}

/// Quad strip `thickness` wide along consecutive curve points
pub fn ribbon(curve: &[Vec3], viewpoint: &Viewpoint, thickness: f64, color: Rgba) -> Vec<Quad> {
    let mut quads = Vec::with_capacity(curve.len().saturating_sub(1));

    for pair in curve.windows(2) {
        let (cur, next) = (pair[0], pair[1]);
        let Some(tangent) = (next - cur).try_normalize() else {
            continue;
        };
        let Some(perp) = side_vector(tangent, cur, viewpoint) else {
            continue;
        };
        let offset = perp * (thickness / 2.0);
        quads.push(Quad::new([cur - offset, cur + offset, next + offset, next - offset], color));
    }

    quads
}
