//! Catan board topology and placement engine
//!
//! This crate models the client-side board of a Catan game: a hex grid whose
//! tiles share corners (three tiles meet) and edges (two tiles meet), the
//! rules for building on them, and the merge of an authoritative server
//! snapshot into the local model.
//!
//! # Architecture
//!
//! Corners and edges live once in an arena owned by [`Board`] and are
//! referenced from tiles by [`CornerId`] / [`EdgeId`] handles. Their identity
//! is a [`VertexKey`]: the sorted set of cube coordinates of the tiles that
//! meet there, so every tile resolves a shared feature to the same object.
//!
//! # Modules
//!
//! - [`hex`]: cube coordinates and direction tables
//! - [`key`]: order-independent corner and edge identity
//! - [`board`]: construction, lookup and placement
//! - [`rules`]: legality checks and settlement proximity rules
//! - [`snapshot`]: server payload types and export
//! - [`reconcile`]: merging a snapshot into a board

pub mod board;
pub mod config;
pub mod error;
pub mod feature;
pub mod hex;
pub mod key;
pub mod layout;
pub mod player;
pub mod reconcile;
pub mod rules;
pub mod snapshot;
pub mod tile;

// Re-export commonly used types
pub use board::Board;
pub use config::{BoardConfig, ConfigError, MAX_BOARD_SIZE};
pub use error::{AdjacencyReason, PlacementError, ReconcileWarning, Target, UpgradeReason};
pub use feature::{BuildingKind, Corner, CornerBuilding, CornerId, Edge, EdgeBuilding, EdgeId};
pub use hex::{CoordError, CornerDirection, CubeCoord, EdgeDirection};
pub use key::{CornerKey, EdgeKey, VertexKey};
pub use layout::{RandomLayout, TileLayout, TileSeed, UnassignedLayout};
pub use player::{Player, PlayerColor, PlayerFactory, PlayerId, SeatPlayers};
pub use rules::{ProximityRule, RoadOutcome, SettlementRule};
pub use snapshot::{
    BoardSnapshot, BuildingSnapshot, EdgeSnapshot, InvalidEntry, RoadSnapshot, SnapshotError,
    TileSnapshot, VertexSnapshot,
};
pub use tile::{Harbor, Resource, Tile, TileType};
