//! Control point reduction strategies

use crate::store::settings::{RenderMode, Settings};

use super::math::Vec3;

/// Turns a segment's point centers into spline control points
pub trait Reducer {
    fn reduce(&self, centers: &[Vec3]) -> Vec<Vec3>;
}

/// Every center is a control point
pub struct Linear;

impl Reducer for Linear {
    fn reduce(&self, centers: &[Vec3]) -> Vec<Vec3> {
        centers.to_vec()
    }
}

/// Consecutive groups of `size` centers collapse to their mean
pub struct Grouped {
    pub size: usize,
}

impl Reducer for Grouped {
    fn reduce(&self, centers: &[Vec3]) -> Vec<Vec3> {
        centers
            .chunks(self.size.max(1))
            .map(|group| group.iter().fold(Vec3::ZERO, |sum, &c| sum + c) / group.len() as f64)
            .collect()
    }
}

impl RenderMode {
    /// Strategy for this mode
    pub fn reducer(&self, settings: &Settings) -> Box<dyn Reducer> {
        match self {
            RenderMode::Linear => Box::new(Linear),
            RenderMode::Grouped => Box::new(Grouped {
                size: settings.group_size as usize,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f64, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_linear_is_identity() {
        assert_eq!(Linear.reduce(&line(4)), line(4));
    }

    #[test]
    fn test_grouped_averages_with_short_tail() {
        let reduced = Grouped { size: 3 }.reduce(&line(7));
        assert_eq!(reduced.len(), 3);
        assert_eq!(reduced[0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(reduced[1], Vec3::new(4.0, 0.0, 0.0));
        // last group holds only the seventh center
        assert_eq!(reduced[2], Vec3::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn test_grouped_zero_size_acts_as_one() {
        assert_eq!(Grouped { size: 0 }.reduce(&line(3)), line(3));
    }

    #[test]
    fn test_mode_selects_strategy() {
        let settings = Settings {
            group_size: 2,
            ..Settings::default()
        };
        assert_eq!(RenderMode::Linear.reducer(&settings).reduce(&line(4)).len(), 4);
        assert_eq!(RenderMode::Grouped.reducer(&settings).reduce(&line(4)).len(), 2);
    }
}
