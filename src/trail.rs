//! Trail data model
//!
//! A trail is the ordered list of grid points an agent visited in one spatial
//! domain of one map. Order is significant and never rearranged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A signed 32-bit voxel grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// True if `other` is within two cells of `self` on every axis
    pub fn is_neighbor(&self, other: &Point) -> bool {
        (self.x as i64 - other.x as i64).abs() <= 2
            && (self.y as i64 - other.y as i64).abs() <= 2
            && (self.z as i64 - other.z as i64).abs() <= 2
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl FromStr for Point {
    type Err = eyre::Report;

    /// Parse `x y z` or `x,y,z`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() != 3 {
            eyre::bail!("Expected three coordinates, got '{}'", s.trim());
        }

        let coord = |p: &str| -> eyre::Result<i32> {
            p.parse::<i32>()
                .map_err(|e| eyre::eyre!("Invalid coordinate '{}': {}", p, e))
        };

        Ok(Self::new(coord(parts[0])?, coord(parts[1])?, coord(parts[2])?))
    }
}

/// One of the fixed logical sub-worlds that share a map identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpatialDomain {
    Overworld,
    Nether,
    End,
}

impl SpatialDomain {
    pub const ALL: [SpatialDomain; 3] = [SpatialDomain::Overworld, SpatialDomain::Nether, SpatialDomain::End];

    /// Identifier used in trail file names
    pub fn id(&self) -> &'static str {
        match self {
            SpatialDomain::Overworld => "minecraft_overworld",
            SpatialDomain::Nether => "minecraft_the_nether",
            SpatialDomain::End => "minecraft_the_end",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.id() == id)
    }
}

impl fmt::Display for SpatialDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Trails of one map, keyed by domain
pub type Trails = IndexMap<SpatialDomain, Vec<Point>>;

/// A `Trails` bundle with an empty trail for every known domain
pub fn empty_trails() -> Trails {
    SpatialDomain::ALL.into_iter().map(|d| (d, Vec::new())).collect()
}
