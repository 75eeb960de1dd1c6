//! Wire format of the authoritative board state pushed by the server.
//!
//! Tiles carry their coordinate; corners and edges carry only the coordinates
//! of the tiles that meet there, under a map key the server chooses. The key
//! is informational; matching is always done on the coordinates.

use crate::board::Board;
use crate::feature::{BuildingKind, CornerBuilding, EdgeBuilding};
use crate::hex::CubeCoord;
use crate::player::{Player, PlayerId};
use crate::tile::{Harbor, TileType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Full board state as sent by the server.
///
/// Entries are decoded one by one: an entry that does not fit its schema
/// lands in `invalid` and the rest of the payload is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct BoardSnapshot {
    pub tiles: Vec<TileSnapshot>,
    pub vertices: BTreeMap<String, VertexSnapshot>,
    pub edges: BTreeMap<String, EdgeSnapshot>,
    /// Entries dropped while decoding
    #[serde(skip)]
    pub invalid: Vec<InvalidEntry>,
}

/// A snapshot entry that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    /// `tiles[i]`, or the map key of a vertex or edge
    pub entry: String,
    pub reason: String,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    tiles: Vec<Value>,
    #[serde(default)]
    vertices: BTreeMap<String, Value>,
    #[serde(default)]
    edges: BTreeMap<String, Value>,
}

impl From<RawSnapshot> for BoardSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        let mut invalid = Vec::new();
        let tiles: Vec<TileSnapshot> = raw
            .tiles
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| decode(format!("tiles[{i}]"), value, &mut invalid))
            .map(|(_, tile)| tile)
            .collect();
        let vertices: BTreeMap<String, VertexSnapshot> = raw
            .vertices
            .into_iter()
            .filter_map(|(entry, value)| decode(entry, value, &mut invalid))
            .collect();
        let edges: BTreeMap<String, EdgeSnapshot> = raw
            .edges
            .into_iter()
            .filter_map(|(entry, value)| decode(entry, value, &mut invalid))
            .collect();
        Self {
            tiles,
            vertices,
            edges,
            invalid,
        }
    }
}

fn decode<T: DeserializeOwned>(
    entry: String,
    value: Value,
    invalid: &mut Vec<InvalidEntry>,
) -> Option<(String, T)> {
    match serde_json::from_value(value) {
        Ok(item) => Some((entry, item)),
        Err(err) => {
            invalid.push(InvalidEntry {
                entry,
                reason: err.to_string(),
            });
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub coordinates: CubeCoord,
    pub resource: String,
    #[serde(default)]
    pub number: Option<u8>,
    #[serde(default)]
    pub has_robber: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexSnapshot {
    /// Three `[q, r, s]` triples
    pub coordinates: Vec<[i32; 3]>,
    pub building: Option<BuildingSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harbor: Option<Harbor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSnapshot {
    #[serde(rename = "type")]
    pub kind: BuildingKind,
    pub player_id: PlayerId,
    pub player_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    /// Two `[q, r, s]` triples
    pub coordinates: Vec<[i32; 3]>,
    pub road: Option<RoadSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSnapshot {
    pub player_id: PlayerId,
    pub player_color: String,
}

impl BuildingSnapshot {
    pub fn new(kind: BuildingKind, player: &Player) -> Self {
        Self {
            kind,
            player_id: player.id,
            player_color: player.color.to_string(),
        }
    }
}

impl RoadSnapshot {
    pub fn new(player: &Player) -> Self {
        Self {
            player_id: player.id,
            player_color: player.color.to_string(),
        }
    }
}

impl BoardSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Radius of the playable area described by the snapshot.
    ///
    /// Only tiles with a known, assigned resource count; `None` when the
    /// snapshot carries no such tile.
    pub fn radius(&self) -> Option<u32> {
        self.tiles
            .iter()
            .filter(|t| {
                t.resource
                    .parse::<TileType>()
                    .is_ok_and(|tt| tt != TileType::Unassigned)
            })
            .map(|t| t.coordinates.radius())
            .max()
    }
}

impl Board {
    /// Export the playable part of the board in the server's format.
    ///
    /// Border tiles are left out; every playable corner and edge is listed,
    /// keyed by its canonical key string.
    pub fn to_snapshot(&self) -> BoardSnapshot {
        let mut tiles: Vec<TileSnapshot> = self
            .land_tiles()
            .map(|tile| TileSnapshot {
                coordinates: tile.coord,
                resource: tile.tile_type.wire_name().to_string(),
                number: tile.dice_number,
                has_robber: tile.has_robber,
            })
            .collect();
        tiles.sort_by_key(|t| t.coordinates);

        let vertices = self
            .corners()
            .filter(|(id, _)| self.is_playable_corner(*id))
            .map(|(_, corner)| {
                let building = match corner.building() {
                    CornerBuilding::Empty => None,
                    CornerBuilding::Settlement(p) => {
                        Some(BuildingSnapshot::new(BuildingKind::Settlement, &p))
                    }
                    CornerBuilding::City(p) => Some(BuildingSnapshot::new(BuildingKind::City, &p)),
                };
                let entry = VertexSnapshot {
                    coordinates: corner.key().to_triples(),
                    building,
                    harbor: corner.harbor(),
                };
                (corner.key().to_string(), entry)
            })
            .collect();

        let edges = self
            .edges()
            .filter(|(id, _)| self.is_playable_edge(*id))
            .map(|(_, edge)| {
                let road = match edge.building() {
                    EdgeBuilding::Empty => None,
                    EdgeBuilding::Road(p) => Some(RoadSnapshot::new(&p)),
                };
                let entry = EdgeSnapshot {
                    coordinates: edge.key().to_triples(),
                    road,
                };
                (edge.key().to_string(), entry)
            })
            .collect();

        BoardSnapshot {
            tiles,
            vertices,
            edges,
            invalid: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{CornerDirection, EdgeDirection};
    use crate::player::PlayerColor;

    const PAYLOAD: &str = r#"{
        "tiles": [
            {"coordinates": {"q": 0, "r": 0, "s": 0}, "resource": "DESERT", "number": null, "has_robber": true},
            {"coordinates": {"q": 1, "r": -1, "s": 0}, "resource": "ORE", "number": 8, "has_robber": false}
        ],
        "vertices": {
            "v1": {
                "coordinates": [[0, 0, 0], [1, -1, 0], [1, 0, -1]],
                "building": {"type": "CITY", "player_id": 2, "player_color": "orange"}
            },
            "v2": {"coordinates": [[0, 0, 0], [0, 1, -1], [-1, 1, 0]], "building": null}
        },
        "edges": {
            "e1": {"coordinates": [[0, 0, 0], [-1, 0, 1]], "road": {"player_id": 1, "player_color": "blue"}}
        }
    }"#;

    #[test]
    fn test_parse_payload() {
        let snapshot = BoardSnapshot::from_json(PAYLOAD).unwrap();
        assert_eq!(snapshot.tiles.len(), 2);
        assert_eq!(snapshot.tiles[1].number, Some(8));
        assert!(snapshot.tiles[0].has_robber);

        let city = snapshot.vertices["v1"].building.as_ref().unwrap();
        assert_eq!(city.kind, BuildingKind::City);
        assert_eq!(city.player_id, 2);
        assert!(snapshot.vertices["v2"].building.is_none());

        let road = snapshot.edges["e1"].road.as_ref().unwrap();
        assert_eq!(road.player_color, "blue");
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let snapshot = BoardSnapshot::from_json(r#"{"tiles": []}"#).unwrap();
        assert!(snapshot.vertices.is_empty());
        assert!(snapshot.edges.is_empty());
        assert_eq!(snapshot.radius(), None);
    }

    #[test]
    fn test_off_plane_tile_is_dropped_alone() {
        let json = r#"{"tiles": [
            {"coordinates": {"q": 1, "r": 1, "s": 1}, "resource": "ORE"},
            {"coordinates": {"q": 2147483647, "r": 1, "s": 0}, "resource": "ORE"},
            {"coordinates": {"q": 1, "r": 0, "s": -1}, "resource": "ORE"}
        ]}"#;
        let snapshot = BoardSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.tiles.len(), 1);
        assert_eq!(snapshot.tiles[0].coordinates, CubeCoord::new(1, 0));
        let entries: Vec<&str> = snapshot.invalid.iter().map(|i| i.entry.as_str()).collect();
        assert_eq!(entries, ["tiles[0]", "tiles[1]"]);
    }

    #[test]
    fn test_bad_owner_is_dropped_alone() {
        let json = r#"{
            "tiles": [{"coordinates": {"q": 0, "r": 0, "s": 0}, "resource": "ORE", "number": 4}],
            "edges": {
                "big": {"coordinates": [[0, 0, 0], [1, 0, -1]], "road": {"player_id": 300, "player_color": "red"}},
                "neg": {"coordinates": [[0, 0, 0], [-1, 0, 1]], "road": {"player_id": -1, "player_color": "red"}}
            }
        }"#;
        let snapshot = BoardSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.tiles.len(), 1);
        assert_eq!(
            snapshot.edges["big"].road.as_ref().map(|r| r.player_id),
            Some(300)
        );
        assert!(!snapshot.edges.contains_key("neg"));
        assert_eq!(snapshot.invalid.len(), 1);
        assert_eq!(snapshot.invalid[0].entry, "neg");
    }

    #[test]
    fn test_non_object_payload_is_an_error() {
        assert!(BoardSnapshot::from_json("[1, 2]").is_err());
        assert!(BoardSnapshot::from_json(r#"{"tiles": 3}"#).is_err());
    }

    #[test]
    fn test_radius_ignores_unassigned_tiles() {
        let snapshot = BoardSnapshot::from_json(PAYLOAD).unwrap();
        assert_eq!(snapshot.radius(), Some(1));
        assert_eq!(Board::new(2).to_snapshot().radius(), None);
    }

    #[test]
    fn test_export_lists_playable_features() {
        let mut board = Board::new(2);
        let red = Player::new(0, PlayerColor::Red);
        board
            .place_settlement(CubeCoord::ORIGIN, CornerDirection::North, red, true)
            .unwrap();
        board
            .place_road(CubeCoord::ORIGIN, EdgeDirection::East, red)
            .unwrap();

        let snapshot = board.to_snapshot();
        assert_eq!(snapshot.tiles.len(), 19);
        assert_eq!(snapshot.vertices.len(), 54);
        assert_eq!(snapshot.edges.len(), 72);

        let settled = snapshot.vertices["0,0,0|1,-1,0|1,0,-1"]
            .building
            .as_ref()
            .unwrap();
        assert_eq!(settled, &BuildingSnapshot::new(BuildingKind::Settlement, &red));
        assert_eq!(
            snapshot.vertices.values().filter(|v| v.building.is_some()).count(),
            1
        );

        let json = snapshot.to_json().unwrap();
        assert_eq!(BoardSnapshot::from_json(&json).unwrap(), snapshot);
    }
}
