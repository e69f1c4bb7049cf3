//! Culling and segmentation of raw trail points

use crate::trail::Point;

use super::math::Vec3;

/// Points within `distance` of `viewpoint` on every axis, in order.
///
/// This is a box test, not a sphere: each axis is checked on its own.
pub fn cull(points: &[Point], viewpoint: Vec3, distance: u32) -> Vec<Point> {
    let limit = distance as f64;
    points
        .iter()
        .copied()
        .filter(|p| {
            (p.x as f64 - viewpoint.x).abs() <= limit
                && (p.y as f64 - viewpoint.y).abs() <= limit
                && (p.z as f64 - viewpoint.z).abs() <= limit
        })
        .collect()
}

/// Split points into runs of neighbors. A new segment starts wherever a
/// point is more than two cells from its predecessor on any axis.
pub fn segments(points: &[Point]) -> Vec<Vec<Point>> {
    let mut segments: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for &p in points {
        if let Some(prev) = current.last()
            && !prev.is_neighbor(&p)
        {
            segments.push(std::mem::take(&mut current));
        }
        current.push(p);
    }

    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(i32, i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y, z)| Point::new(x, y, z)).collect()
    }

    #[test]
    fn test_segments_split_on_gap() {
        let split = segments(&pts(&[(0, 0, 0), (1, 0, 0), (10, 0, 0), (11, 0, 0)]));
        assert_eq!(split, vec![pts(&[(0, 0, 0), (1, 0, 0)]), pts(&[(10, 0, 0), (11, 0, 0)])]);
    }

    #[test]
    fn test_segments_keep_diagonal_neighbors() {
        let split = segments(&pts(&[(0, 0, 0), (2, 2, 2), (4, 0, 4), (7, 0, 4)]));
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].len(), 3);
        assert_eq!(split[1], pts(&[(7, 0, 4)]));
    }

    #[test]
    fn test_segments_cover_every_point_in_order() {
        let input = pts(&[(0, 0, 0), (5, 0, 0), (5, 1, 0), (20, 0, 0), (0, 0, 0)]);
        let flat: Vec<Point> = segments(&input).into_iter().flatten().collect();
        assert_eq!(flat, input);
    }

    #[test]
    fn test_segments_empty() {
        assert!(segments(&[]).is_empty());
    }

    #[test]
    fn test_cull_boundary() {
        let view = Vec3::new(0.0, 0.0, 0.0);
        let input = pts(&[(10, 0, 0), (11, 0, 0), (0, -10, 0), (0, -11, 0), (0, 0, 10), (0, 0, 11)]);
        assert_eq!(cull(&input, view, 10), pts(&[(10, 0, 0), (0, -10, 0), (0, 0, 10)]));
    }

    #[test]
    fn test_cull_is_a_box_not_a_sphere() {
        // Euclidean distance ~17.3, but every axis is within 10
        let kept = cull(&pts(&[(10, 10, 10)]), Vec3::ZERO, 10);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_culled_point_does_not_split_segment() {
        let input = pts(&[(0, 0, 0), (1, 0, 0), (2, 0, 100), (2, 0, 0)]);
        let visible = cull(&input, Vec3::ZERO, 50);
        assert_eq!(segments(&visible).len(), 1);
    }
}
