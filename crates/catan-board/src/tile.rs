//! Tiles and what they produce.
//!
//! A [`Tile`] holds handles to its six corners and six edges; the corners
//! and edges themselves live in the board's arena.

use crate::feature::{CornerId, EdgeId};
use crate::hex::{CornerDirection, CubeCoord, EdgeDirection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Lumber,
    Ore,
    Grain,
    Wool,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Lumber,
        Resource::Ore,
        Resource::Grain,
        Resource::Wool,
    ];
}

/// What a tile is, as far as the board knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TileType {
    /// Produces a resource when its number is rolled
    Resource(Resource),
    /// No production
    Desert,
    /// Not loaded yet, or a border tile that never produces
    #[default]
    Unassigned,
}

impl TileType {
    /// Name used on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            TileType::Resource(Resource::Brick) => "BRICK",
            TileType::Resource(Resource::Lumber) => "LUMBER",
            TileType::Resource(Resource::Ore) => "ORE",
            TileType::Resource(Resource::Grain) => "GRAIN",
            TileType::Resource(Resource::Wool) => "WOOL",
            TileType::Desert => "DESERT",
            TileType::Unassigned => "UNASSIGNED",
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TileType {
    type Err = String;

    /// Accepts the wire names plus the classic English card names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tile_type = match s.trim().to_ascii_uppercase().as_str() {
            "BRICK" | "CLAY" => TileType::Resource(Resource::Brick),
            "LUMBER" | "WOOD" => TileType::Resource(Resource::Lumber),
            "ORE" | "STONE" => TileType::Resource(Resource::Ore),
            "GRAIN" | "WHEAT" => TileType::Resource(Resource::Grain),
            "WOOL" | "SHEEP" => TileType::Resource(Resource::Wool),
            "DESERT" | "NONE" => TileType::Desert,
            "UNASSIGNED" | "" => TileType::Unassigned,
            _ => return Err(s.to_string()),
        };
        Ok(tile_type)
    }
}

/// Harbor types for maritime trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Harbor {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl Harbor {
    /// The exchange rate for this harbor
    pub fn rate(&self) -> u32 {
        match self {
            Harbor::Generic => 3,
            Harbor::Specific(_) => 2,
        }
    }
}

/// A single hex tile on the board.
///
/// The corner and edge slots hold arena handles. Neighbouring tiles hold the
/// same handle for the features they share, so a tile never owns its corners
/// outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Position on the hex grid
    pub coord: CubeCoord,
    /// What type of tile (resource, desert, unassigned)
    pub tile_type: TileType,
    /// Dice number that triggers production (2-12, None for desert)
    pub dice_number: Option<u8>,
    /// Whether the robber is currently on this tile
    pub has_robber: bool,
    border: bool,
    corners: [CornerId; 6],
    edges: [EdgeId; 6],
}

impl Tile {
    pub(crate) fn new(
        coord: CubeCoord,
        border: bool,
        corners: [CornerId; 6],
        edges: [EdgeId; 6],
    ) -> Self {
        Self {
            coord,
            tile_type: TileType::Unassigned,
            dice_number: None,
            has_robber: false,
            border,
            corners,
            edges,
        }
    }

    /// Whether this tile is part of the fictitious outer ring
    pub fn is_border(&self) -> bool {
        self.border
    }

    /// Check if this tile produces resources
    pub fn is_productive(&self) -> bool {
        matches!(self.tile_type, TileType::Resource(_)) && !self.has_robber
    }

    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self.tile_type {
            TileType::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Handle of the corner in the given direction
    pub fn corner(&self, direction: CornerDirection) -> CornerId {
        self.corners[direction.index()]
    }

    /// Handle of the edge in the given direction
    pub fn edge(&self, direction: EdgeDirection) -> EdgeId {
        self.edges[direction.index()]
    }

    /// Corner handles paired with their directions
    pub fn corners(&self) -> impl Iterator<Item = (CornerDirection, CornerId)> + '_ {
        CornerDirection::ALL
            .into_iter()
            .map(move |dir| (dir, self.corner(dir)))
    }

    /// Edge handles paired with their directions
    pub fn edges(&self) -> impl Iterator<Item = (EdgeDirection, EdgeId)> + '_ {
        EdgeDirection::ALL
            .into_iter()
            .map(move |dir| (dir, self.edge(dir)))
    }
}
