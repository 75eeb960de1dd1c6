//! Corners and edges: the shared placement slots of the board.
//!
//! Features live in arenas owned by the [`Board`](crate::Board). Tiles refer
//! to them through [`CornerId`] / [`EdgeId`] handles, so one physical corner
//! is a single value no matter how many tiles can address it.

use crate::hex::{CornerDirection, CubeCoord, EdgeDirection};
use crate::key::{CornerKey, EdgeKey};
use crate::player::{Player, PlayerId};
use crate::tile::Harbor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a corner in the board's corner arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornerId(u32);

/// Handle of an edge in the board's edge arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl CornerId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CornerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corner#{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge#{}", self.0)
    }
}

/// Kind of building that can stand on a corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildingKind {
    Settlement,
    City,
}

/// What's built on a corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Settlement (1 VP, 1 resource per adjacent tile)
    Settlement(Player),
    /// City (2 VP, 2 resources per adjacent tile)
    City(Player),
}

impl CornerBuilding {
    /// Get the owner of this building, if any
    pub fn owner(&self) -> Option<Player> {
        match self {
            CornerBuilding::Empty => None,
            CornerBuilding::Settlement(p) | CornerBuilding::City(p) => Some(*p),
        }
    }

    /// Id of the owner, if any
    pub fn owner_id(&self) -> Option<PlayerId> {
        self.owner().map(|p| p.id)
    }

    pub fn kind(&self) -> Option<BuildingKind> {
        match self {
            CornerBuilding::Empty => None,
            CornerBuilding::Settlement(_) => Some(BuildingKind::Settlement),
            CornerBuilding::City(_) => Some(BuildingKind::City),
        }
    }

    /// Victory points provided by this building
    pub fn victory_points(&self) -> u32 {
        match self {
            CornerBuilding::Empty => 0,
            CornerBuilding::Settlement(_) => 1,
            CornerBuilding::City(_) => 2,
        }
    }
}

/// What's built on an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeBuilding {
    /// Nothing built
    #[default]
    Empty,
    /// Road
    Road(Player),
}

impl EdgeBuilding {
    /// Get the owner of this road, if any
    pub fn owner(&self) -> Option<Player> {
        match self {
            EdgeBuilding::Empty => None,
            EdgeBuilding::Road(p) => Some(*p),
        }
    }

    pub fn owner_id(&self) -> Option<PlayerId> {
        self.owner().map(|p| p.id)
    }

    /// Whether this is a road of the given player
    pub fn is_road_of(&self, player: &Player) -> bool {
        self.owner().is_some_and(|owner| owner.is(player))
    }
}

/// A corner of one to three tiles, where settlements and cities stand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corner {
    key: CornerKey,
    views: Vec<(CubeCoord, CornerDirection)>,
    pub(crate) harbor: Option<Harbor>,
    pub(crate) building: CornerBuilding,
}

impl Corner {
    pub(crate) fn new(key: CornerKey) -> Self {
        Self {
            key,
            views: Vec::with_capacity(3),
            harbor: None,
            building: CornerBuilding::Empty,
        }
    }

    pub(crate) fn add_view(&mut self, tile: CubeCoord, direction: CornerDirection) {
        self.views.push((tile, direction));
    }

    pub fn key(&self) -> &CornerKey {
        &self.key
    }

    /// Every local (tile, direction) pair that addresses this corner
    pub fn views(&self) -> &[(CubeCoord, CornerDirection)] {
        &self.views
    }

    /// The direction under which `tile` sees this corner
    pub fn direction_from(&self, tile: CubeCoord) -> Option<CornerDirection> {
        self.views
            .iter()
            .find(|(coord, _)| *coord == tile)
            .map(|(_, dir)| *dir)
    }

    pub fn harbor(&self) -> Option<Harbor> {
        self.harbor
    }

    pub fn building(&self) -> CornerBuilding {
        self.building
    }

    pub fn owner(&self) -> Option<Player> {
        self.building.owner()
    }

    pub fn is_empty(&self) -> bool {
        self.building == CornerBuilding::Empty
    }
}

/// An edge between one or two tiles, where roads are built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    key: EdgeKey,
    views: Vec<(CubeCoord, EdgeDirection)>,
    pub(crate) building: EdgeBuilding,
}

impl Edge {
    pub(crate) fn new(key: EdgeKey) -> Self {
        Self {
            key,
            views: Vec::with_capacity(2),
            building: EdgeBuilding::Empty,
        }
    }

    pub(crate) fn add_view(&mut self, tile: CubeCoord, direction: EdgeDirection) {
        self.views.push((tile, direction));
    }

    pub fn key(&self) -> &EdgeKey {
        &self.key
    }

    /// Every local (tile, direction) pair that addresses this edge
    pub fn views(&self) -> &[(CubeCoord, EdgeDirection)] {
        &self.views
    }

    pub fn direction_from(&self, tile: CubeCoord) -> Option<EdgeDirection> {
        self.views
            .iter()
            .find(|(coord, _)| *coord == tile)
            .map(|(_, dir)| *dir)
    }

    pub fn building(&self) -> EdgeBuilding {
        self.building
    }

    pub fn owner(&self) -> Option<Player> {
        self.building.owner()
    }

    pub fn is_empty(&self) -> bool {
        self.building == EdgeBuilding::Empty
    }
}
