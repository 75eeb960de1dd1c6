//! Errors returned by placement operations and warnings collected while
//! reconciling a remote snapshot.

use crate::hex::{CoordError, CornerDirection, CubeCoord, EdgeDirection};
use crate::key::{CornerKey, EdgeKey};
use crate::player::Player;
use std::fmt;
use thiserror::Error;

/// The thing a placement was aimed at, for error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Tile(CubeCoord),
    Corner {
        tile: CubeCoord,
        direction: CornerDirection,
    },
    Edge {
        tile: CubeCoord,
        direction: EdgeDirection,
    },
    CornerKey(CornerKey),
    EdgeKey(EdgeKey),
}

impl Target {
    pub fn corner(tile: CubeCoord, direction: CornerDirection) -> Self {
        Target::Corner { tile, direction }
    }

    pub fn edge(tile: CubeCoord, direction: EdgeDirection) -> Self {
        Target::Edge { tile, direction }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Tile(coord) => write!(f, "tile {coord}"),
            Target::Corner { tile, direction } => write!(f, "corner {direction} of tile {tile}"),
            Target::Edge { tile, direction } => write!(f, "edge {direction} of tile {tile}"),
            Target::CornerKey(key) => write!(f, "corner [{key}]"),
            Target::EdgeKey(key) => write!(f, "edge [{key}]"),
        }
    }
}

/// Why a city could not be built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeReason {
    /// Nothing stands on the corner yet
    NoSettlement,
    /// The player already has a city there
    AlreadyCity,
    /// Someone else owns the corner
    ForeignOwner(Player),
}

impl fmt::Display for UpgradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeReason::NoSettlement => f.write_str("there is no settlement to upgrade"),
            UpgradeReason::AlreadyCity => f.write_str("it is already a city"),
            UpgradeReason::ForeignOwner(owner) => write!(f, "it belongs to {owner}"),
        }
    }
}

/// Which proximity rule rejected a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacencyReason {
    /// None of the corner's edges carries the player's road
    NoOwnRoad,
    /// A neighbouring corner is already built on
    TooClose,
    /// A caller-supplied rule said no
    Rejected,
}

impl fmt::Display for AdjacencyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjacencyReason::NoOwnRoad => f.write_str("it is not connected to one of your roads"),
            AdjacencyReason::TooClose => f.write_str("a neighbouring corner is occupied"),
            AdjacencyReason::Rejected => f.write_str("the placement rule rejected it"),
        }
    }
}

/// Errors that can occur when placing a building or road.
///
/// A failed placement never changes the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("no {0} on this board")]
    NotFound(Target),

    #[error("{target} is already taken by {owner}")]
    AlreadyOccupied { target: Target, owner: Player },

    #[error("cannot build a city on {target}: {reason}")]
    InvalidUpgrade {
        target: Target,
        reason: UpgradeReason,
    },

    #[error("cannot settle {target}: {reason}")]
    AdjacencyViolation {
        target: Target,
        reason: AdjacencyReason,
    },
}

impl PlacementError {
    /// The placement this error refers to
    pub fn target(&self) -> &Target {
        match self {
            PlacementError::NotFound(target)
            | PlacementError::AlreadyOccupied { target, .. }
            | PlacementError::InvalidUpgrade { target, .. }
            | PlacementError::AdjacencyViolation { target, .. } => target,
        }
    }
}

/// A snapshot item that could not be applied.
///
/// Reconciliation keeps going after a warning; the rest of the snapshot is
/// still applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileWarning {
    #[error("tile {tile} has unknown resource {resource:?}")]
    UnknownResource { tile: CubeCoord, resource: String },

    #[error("entry {entry:?} has malformed coordinates: {error}")]
    MalformedCoordinates { entry: String, error: CoordError },

    #[error("no local corner matches [{0}]")]
    UnknownCorner(CornerKey),

    #[error("no local edge matches [{0}]")]
    UnknownEdge(EdgeKey),

    #[error("snapshot disagrees with local state: {0}")]
    Rejected(PlacementError),

    #[error("entry {entry:?} could not be decoded: {reason}")]
    InvalidEntry { entry: String, reason: String },
}
