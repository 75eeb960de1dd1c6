//! Hex coordinate system using cube coordinates (q, r, s).
//!
//! This module provides the foundational coordinate types for the board:
//! - `CubeCoord`: Identifies individual hex tiles
//! - `CornerDirection`: Addresses one of the six corners of a tile
//! - `EdgeDirection`: Addresses one of the six edges of a tile
//!
//! The neighbour tables below are shared with the game server. A corner or
//! edge is identified remotely only by the coordinates of the tiles that meet
//! there, so the mapping from (tile, direction) to those coordinates must be
//! reproduced exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing or validating coordinates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("coordinate {q},{r},{s} does not satisfy q + r + s = 0")]
    OffPlane { q: i32, r: i32, s: i32 },

    #[error("malformed coordinate string {0:?}")]
    Malformed(String),

    #[error("expected {expected} coordinates, got {actual}")]
    WrongArity { expected: usize, actual: usize },

    #[error("coordinate {0} appears more than once")]
    Duplicate(CubeCoord),
}

/// Direction of an edge relative to a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeDirection {
    NorthEast,
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
}

impl EdgeDirection {
    /// All edge directions in the order tiles store their edges
    pub const ALL: [EdgeDirection; 6] = [
        EdgeDirection::NorthEast,
        EdgeDirection::East,
        EdgeDirection::SouthEast,
        EdgeDirection::SouthWest,
        EdgeDirection::West,
        EdgeDirection::NorthWest,
    ];

    /// Slot of this direction in a tile's edge array
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Offset to the tile on the other side of this edge
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            EdgeDirection::NorthEast => (1, -1, 0),
            EdgeDirection::East => (1, 0, -1),
            EdgeDirection::SouthEast => (0, 1, -1),
            EdgeDirection::SouthWest => (-1, 1, 0),
            EdgeDirection::West => (-1, 0, 1),
            EdgeDirection::NorthWest => (0, -1, 1),
        }
    }

    /// The same edge seen from the neighbouring tile
    pub const fn opposite(self) -> Self {
        match self {
            EdgeDirection::NorthEast => EdgeDirection::SouthWest,
            EdgeDirection::East => EdgeDirection::West,
            EdgeDirection::SouthEast => EdgeDirection::NorthWest,
            EdgeDirection::SouthWest => EdgeDirection::NorthEast,
            EdgeDirection::West => EdgeDirection::East,
            EdgeDirection::NorthWest => EdgeDirection::SouthEast,
        }
    }

    /// The two corners of the same tile this edge runs between
    pub const fn endpoints(self) -> [CornerDirection; 2] {
        match self {
            EdgeDirection::NorthEast => [CornerDirection::NorthEast, CornerDirection::North],
            EdgeDirection::East => [CornerDirection::North, CornerDirection::SouthEast],
            EdgeDirection::SouthEast => [CornerDirection::SouthEast, CornerDirection::South],
            EdgeDirection::SouthWest => [CornerDirection::South, CornerDirection::SouthWest],
            EdgeDirection::West => [CornerDirection::SouthWest, CornerDirection::NorthWest],
            EdgeDirection::NorthWest => [CornerDirection::NorthWest, CornerDirection::NorthEast],
        }
    }
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeDirection::NorthEast => "NE",
            EdgeDirection::East => "E",
            EdgeDirection::SouthEast => "SE",
            EdgeDirection::SouthWest => "SW",
            EdgeDirection::West => "W",
            EdgeDirection::NorthWest => "NW",
        };
        f.write_str(name)
    }
}

/// Direction of a corner relative to a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CornerDirection {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl CornerDirection {
    /// All corner directions in the order tiles store their corners
    pub const ALL: [CornerDirection; 6] = [
        CornerDirection::North,
        CornerDirection::NorthEast,
        CornerDirection::SouthEast,
        CornerDirection::South,
        CornerDirection::SouthWest,
        CornerDirection::NorthWest,
    ];

    /// Slot of this direction in a tile's corner array
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The two edges of the tile whose neighbours also meet at this corner.
    ///
    /// This table is agreed with the server: North touches the NE and E
    /// neighbours, South touches the SE and SW neighbours.
    pub const fn flanking_edges(self) -> [EdgeDirection; 2] {
        match self {
            CornerDirection::North => [EdgeDirection::NorthEast, EdgeDirection::East],
            CornerDirection::NorthEast => [EdgeDirection::NorthWest, EdgeDirection::NorthEast],
            CornerDirection::SouthEast => [EdgeDirection::East, EdgeDirection::SouthEast],
            CornerDirection::South => [EdgeDirection::SouthEast, EdgeDirection::SouthWest],
            CornerDirection::SouthWest => [EdgeDirection::SouthWest, EdgeDirection::West],
            CornerDirection::NorthWest => [EdgeDirection::West, EdgeDirection::NorthWest],
        }
    }
}

impl fmt::Display for CornerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CornerDirection::North => "N",
            CornerDirection::NorthEast => "NE",
            CornerDirection::SouthEast => "SE",
            CornerDirection::South => "S",
            CornerDirection::SouthWest => "SW",
            CornerDirection::NorthWest => "NW",
        };
        f.write_str(name)
    }
}

/// Cube coordinate for the hex grid.
///
/// The three components always satisfy `q + r + s == 0`. Use [`CubeCoord::new`]
/// or [`CubeCoord::try_new`] rather than building the struct by hand.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(try_from = "RawCube")]
pub struct CubeCoord {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

#[derive(Deserialize)]
struct RawCube {
    q: i32,
    r: i32,
    s: i32,
}

impl TryFrom<RawCube> for CubeCoord {
    type Error = CoordError;

    fn try_from(raw: RawCube) -> Result<Self, Self::Error> {
        CubeCoord::try_new(raw.q, raw.r, raw.s)
    }
}

impl CubeCoord {
    /// The centre tile
    pub const ORIGIN: CubeCoord = CubeCoord { q: 0, r: 0, s: 0 };

    /// Create a coordinate from its axial part; `s` is derived
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Create a coordinate from all three components, checking the invariant
    pub fn try_new(q: i32, r: i32, s: i32) -> Result<Self, CoordError> {
        if q.checked_add(r).and_then(|qr| qr.checked_add(s)) != Some(0) {
            return Err(CoordError::OffPlane { q, r, s });
        }
        Ok(Self { q, r, s })
    }

    /// Build from a `[q, r, s]` triple as sent by the server
    pub fn from_triple(triple: [i32; 3]) -> Result<Self, CoordError> {
        Self::try_new(triple[0], triple[1], triple[2])
    }

    /// The `[q, r, s]` triple form
    pub const fn to_triple(self) -> [i32; 3] {
        [self.q, self.r, self.s]
    }

    fn offset_by(self, (dq, dr, ds): (i32, i32, i32)) -> Self {
        Self {
            q: self.q + dq,
            r: self.r + dr,
            s: self.s + ds,
        }
    }

    /// The tile across the given edge
    pub fn neighbor(self, direction: EdgeDirection) -> Self {
        self.offset_by(direction.offset())
    }

    /// The six neighbouring tiles, in [`EdgeDirection::ALL`] order
    pub fn neighbors(self) -> [CubeCoord; 6] {
        EdgeDirection::ALL.map(|dir| self.neighbor(dir))
    }

    /// The three tiles that meet at the given corner, this one first
    pub fn corner_tiles(self, direction: CornerDirection) -> [CubeCoord; 3] {
        let [a, b] = direction.flanking_edges();
        [self, self.neighbor(a), self.neighbor(b)]
    }

    /// The two tiles that share the given edge, this one first
    pub fn edge_tiles(self, direction: EdgeDirection) -> [CubeCoord; 2] {
        [self, self.neighbor(direction)]
    }

    /// Distance to another tile (in hex steps)
    ///
    /// Saturates at `u32::MAX` for coordinates at opposite ends of the `i32`
    /// range.
    pub fn distance_to(self, other: CubeCoord) -> u32 {
        let delta = |a: i32, b: i32| (i64::from(a) - i64::from(b)).unsigned_abs();
        let steps = (delta(self.q, other.q) + delta(self.r, other.r) + delta(self.s, other.s)) / 2;
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Distance from the centre tile
    pub fn radius(self) -> u32 {
        self.distance_to(Self::ORIGIN)
    }

    /// Every coordinate within `radius` of the centre, ring by ring
    pub fn within_radius(radius: u32) -> Vec<CubeCoord> {
        let radius = radius as i32;
        let mut coords = Vec::new();
        for ring in 0..=radius {
            coords.extend(Self::ring(ring as u32));
        }
        debug_assert_eq!(coords.len() as i32, 3 * radius * (radius + 1) + 1);
        coords
    }

    /// The coordinates exactly `radius` steps from the centre
    pub fn ring(radius: u32) -> Vec<CubeCoord> {
        if radius == 0 {
            return vec![Self::ORIGIN];
        }
        let mut coords = Vec::with_capacity(6 * radius as usize);
        // Start at the SW-most tile of the ring and walk its six sides
        let mut current = Self::ORIGIN;
        for _ in 0..radius {
            current = current.neighbor(EdgeDirection::SouthWest);
        }
        for dir in [
            EdgeDirection::NorthWest,
            EdgeDirection::NorthEast,
            EdgeDirection::East,
            EdgeDirection::SouthEast,
            EdgeDirection::SouthWest,
            EdgeDirection::West,
        ] {
            for _ in 0..radius {
                coords.push(current);
                current = current.neighbor(dir);
            }
        }
        coords
    }
}

impl fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.q, self.r, self.s)
    }
}

impl FromStr for CubeCoord {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(CoordError::Malformed(s.to_string()));
        }
        let mut values = [0i32; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| CoordError::Malformed(s.to_string()))?;
        }
        Self::from_triple(values)
    }
}
