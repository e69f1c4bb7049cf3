//! Uniform Catmull-Rom sampling through control points

use super::math::Vec3;

/// Point at `t` in [0, 1] on the span from `p1` to `p2`
///
/// `0.5 * [2p1 + (p2 - p0)t + (2p0 - 5p1 + 4p2 - p3)t² + (-p0 + 3p1 - 3p2 + p3)t³]`
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f64) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let a = p1 * 2.0;
    let b = (p2 - p0) * t;
    let c = (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2;
    let d = (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * t3;
    (a + b + c + d) * 0.5
}

/// Sample `subdivisions` points per control interval, clamping the outer
/// neighbors at both ends, then close with the last control point.
///
/// Needs at least two control points; fewer yields an empty curve.
pub fn curve(controls: &[Vec3], subdivisions: u32) -> Vec<Vec3> {
    if controls.len() < 2 {
        return Vec::new();
    }

    let steps = subdivisions.max(1);
    let last = controls.len() - 1;
    let mut points = Vec::with_capacity(last * steps as usize + 1);

    for i in 0..last {
        let p0 = controls[i.saturating_sub(1)];
        let p1 = controls[i];
        let p2 = controls[i + 1];
        let p3 = controls[(i + 2).min(last)];
        for j in 0..steps {
            let t = j as f64 / steps as f64;
            points.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }

    points.push(controls[last]);
    points
}
