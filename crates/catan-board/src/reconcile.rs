//! Merging an authoritative snapshot into the local board.
//!
//! The server is the source of truth, but the local board never gives up an
//! invariant to follow it: a building the rules forbid (a road on someone
//! else's road, a settlement on a city) is reported and left out. Everything
//! else in the snapshot is still applied.

use crate::board::Board;
use crate::config::{BoardConfig, MAX_BOARD_SIZE};
use crate::error::{PlacementError, ReconcileWarning, Target};
use crate::feature::{BuildingKind, CornerBuilding, CornerId};
use crate::key::{CornerKey, EdgeKey};
use crate::layout::UnassignedLayout;
use crate::player::{Player, PlayerFactory, SeatPlayers};
use crate::rules::ProximityRule;
use crate::snapshot::{BoardSnapshot, EdgeSnapshot, TileSnapshot, VertexSnapshot};
use crate::tile::TileType;
use tracing::{debug, warn};

impl Board {
    /// Build a board sized for the snapshot and apply it.
    ///
    /// The radius comes from the snapshot when it describes any assigned
    /// tile within [`MAX_BOARD_SIZE`], otherwise from `config`. Tiles beyond
    /// the chosen radius are skipped like any other tile off the board.
    /// Warnings from the initial reconciliation are returned alongside the
    /// board.
    pub fn from_snapshot(
        snapshot: &BoardSnapshot,
        config: &BoardConfig,
    ) -> (Self, Vec<ReconcileWarning>) {
        let size = match snapshot.radius() {
            Some(radius) if radius <= MAX_BOARD_SIZE => radius,
            Some(radius) => {
                warn!(radius, max = MAX_BOARD_SIZE, "snapshot radius too large, using configured size");
                config.size
            }
            None => config.size,
        };
        let config = BoardConfig { size, ..*config };
        let mut board = Self::with_layout(&config, &mut UnassignedLayout);
        let warnings = board.reconcile(snapshot).err().unwrap_or_default();
        (board, warnings)
    }

    /// Whether the snapshot describes a board of a different radius, in
    /// which case this board should be replaced rather than reconciled.
    ///
    /// A radius above [`MAX_BOARD_SIZE`] never asks for a rebuild, since no
    /// board of that size can be built.
    pub fn needs_rebuild(&self, snapshot: &BoardSnapshot) -> bool {
        snapshot
            .radius()
            .is_some_and(|radius| radius <= MAX_BOARD_SIZE && radius != self.size())
    }

    /// Apply a snapshot, building players with [`SeatPlayers`]
    pub fn reconcile(&mut self, snapshot: &BoardSnapshot) -> Result<(), Vec<ReconcileWarning>> {
        self.reconcile_with(snapshot, &SeatPlayers)
    }

    /// Apply a snapshot.
    ///
    /// Tiles are updated first, then buildings, then roads. Items that cannot
    /// be applied are collected as warnings; the call never stops early.
    /// Applying the same snapshot again changes nothing.
    pub fn reconcile_with<F: PlayerFactory + ?Sized>(
        &mut self,
        snapshot: &BoardSnapshot,
        players: &F,
    ) -> Result<(), Vec<ReconcileWarning>> {
        let mut warnings: Vec<ReconcileWarning> = snapshot
            .invalid
            .iter()
            .map(|invalid| ReconcileWarning::InvalidEntry {
                entry: invalid.entry.clone(),
                reason: invalid.reason.clone(),
            })
            .collect();

        for tile in &snapshot.tiles {
            if let Err(warning) = self.apply_tile(tile) {
                warnings.push(warning);
            }
        }
        for (entry, vertex) in &snapshot.vertices {
            if let Err(warning) = self.apply_vertex(entry, vertex, players) {
                warnings.push(warning);
            }
        }
        for (entry, edge) in &snapshot.edges {
            if let Err(warning) = self.apply_edge(entry, edge, players) {
                warnings.push(warning);
            }
        }

        if warnings.is_empty() {
            return Ok(());
        }
        for warning in &warnings {
            warn!(%warning, "snapshot item not applied");
        }
        Err(warnings)
    }

    fn apply_tile(&mut self, snapshot: &TileSnapshot) -> Result<(), ReconcileWarning> {
        let coord = snapshot.coordinates;
        let Some(tile) = self.tile_mut(coord) else {
            debug!(%coord, "snapshot tile outside local board, skipped");
            return Ok(());
        };
        if tile.is_border() {
            debug!(%coord, "snapshot tile on border ring, skipped");
            return Ok(());
        }
        let tile_type: TileType =
            snapshot
                .resource
                .parse()
                .map_err(|resource| ReconcileWarning::UnknownResource {
                    tile: coord,
                    resource,
                })?;

        tile.tile_type = tile_type;
        tile.dice_number = snapshot.number;
        tile.has_robber = snapshot.has_robber;
        Ok(())
    }

    fn apply_vertex<F: PlayerFactory + ?Sized>(
        &mut self,
        entry: &str,
        snapshot: &VertexSnapshot,
        players: &F,
    ) -> Result<(), ReconcileWarning> {
        if snapshot.building.is_none() && snapshot.harbor.is_none() {
            return Ok(());
        }
        let key = CornerKey::from_triples(&snapshot.coordinates).map_err(|error| {
            ReconcileWarning::MalformedCoordinates {
                entry: entry.to_string(),
                error,
            }
        })?;
        let id = self
            .corner_by_key(&key)
            .ok_or(ReconcileWarning::UnknownCorner(key))?;

        if let Some(harbor) = snapshot.harbor {
            self.set_corner_harbor(id, harbor);
        }
        let Some(building) = &snapshot.building else {
            return Ok(());
        };
        let player = players.player(building.player_id, &building.player_color);
        self.apply_building(id, key, building.kind, player)
            .map_err(ReconcileWarning::Rejected)
    }

    /// Bring one corner to the remote building state
    fn apply_building(
        &mut self,
        id: CornerId,
        key: CornerKey,
        kind: BuildingKind,
        player: Player,
    ) -> Result<(), PlacementError> {
        let target = Target::CornerKey(key);
        let current = self
            .corner(id)
            .map(|c| c.building())
            .unwrap_or_default();

        match (kind, current) {
            (BuildingKind::Settlement, CornerBuilding::Settlement(owner))
            | (BuildingKind::City, CornerBuilding::City(owner))
                if owner.is(&player) =>
            {
                Ok(())
            }
            (BuildingKind::Settlement, _) => {
                self.settle_corner(id, target, player, &ProximityRule::Unrestricted)
            }
            (BuildingKind::City, CornerBuilding::Empty) => {
                // The settlement it grew from was never sent to us
                self.settle_corner(id, target.clone(), player, &ProximityRule::Unrestricted)?;
                self.upgrade_corner(id, target, player)
            }
            (BuildingKind::City, _) => self.upgrade_corner(id, target, player),
        }
    }

    fn apply_edge<F: PlayerFactory + ?Sized>(
        &mut self,
        entry: &str,
        snapshot: &EdgeSnapshot,
        players: &F,
    ) -> Result<(), ReconcileWarning> {
        let Some(road) = &snapshot.road else {
            return Ok(());
        };
        let key = EdgeKey::from_triples(&snapshot.coordinates).map_err(|error| {
            ReconcileWarning::MalformedCoordinates {
                entry: entry.to_string(),
                error,
            }
        })?;
        let id = self
            .edge_by_key(&key)
            .ok_or(ReconcileWarning::UnknownEdge(key))?;

        let player = players.player(road.player_id, &road.player_color);
        self.claim_edge(id, Target::EdgeKey(key), player)
            .map(|_| ())
            .map_err(ReconcileWarning::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{CornerDirection, CubeCoord, EdgeDirection};
    use crate::player::PlayerColor;
    use crate::snapshot::{BuildingSnapshot, RoadSnapshot};
    use crate::tile::{Harbor, Resource};
    use pretty_assertions::assert_eq;

    fn red() -> Player {
        Player::new(0, PlayerColor::Red)
    }

    fn blue() -> Player {
        Player::new(1, PlayerColor::Blue)
    }

    fn vertex(coords: Vec<[i32; 3]>, building: Option<BuildingSnapshot>) -> VertexSnapshot {
        VertexSnapshot {
            coordinates: coords,
            building,
            harbor: None,
        }
    }

    fn edge(coords: Vec<[i32; 3]>, player: &Player) -> EdgeSnapshot {
        EdgeSnapshot {
            coordinates: coords,
            road: Some(RoadSnapshot::new(player)),
        }
    }

    #[test]
    fn test_tiles_are_overwritten() {
        let mut board = Board::new(2);
        let snapshot = BoardSnapshot {
            tiles: vec![
                TileSnapshot {
                    coordinates: CubeCoord::new(1, 0),
                    resource: "brick".into(),
                    number: Some(6),
                    has_robber: false,
                },
                TileSnapshot {
                    coordinates: CubeCoord::ORIGIN,
                    resource: "DESERT".into(),
                    number: None,
                    has_robber: true,
                },
            ],
            ..Default::default()
        };
        board.reconcile(&snapshot).unwrap();

        let tile = board.tile(CubeCoord::new(1, 0)).unwrap();
        assert_eq!(tile.tile_type, TileType::Resource(Resource::Brick));
        assert_eq!(tile.dice_number, Some(6));
        assert_eq!(board.robber_location(), Some(CubeCoord::ORIGIN));
    }

    #[test]
    fn test_tiles_outside_board_are_skipped_silently() {
        let mut board = Board::new(1);
        let snapshot = BoardSnapshot {
            tiles: vec![TileSnapshot {
                coordinates: CubeCoord::new(4, -4),
                resource: "ORE".into(),
                number: Some(5),
                has_robber: false,
            }],
            ..Default::default()
        };
        assert_eq!(board.reconcile(&snapshot), Ok(()));
    }

    #[test]
    fn test_unknown_resource_off_board_is_skipped() {
        let mut board = Board::new(1);
        let snapshot = BoardSnapshot {
            tiles: vec![
                TileSnapshot {
                    coordinates: CubeCoord::new(5, -5),
                    resource: "SEA".into(),
                    number: None,
                    has_robber: false,
                },
                TileSnapshot {
                    coordinates: CubeCoord::new(2, -2),
                    resource: "SEA".into(),
                    number: None,
                    has_robber: false,
                },
            ],
            ..Default::default()
        };
        assert_eq!(board.reconcile(&snapshot), Ok(()));
    }

    #[test]
    fn test_unknown_resource_is_reported() {
        let mut board = Board::new(1);
        let snapshot = BoardSnapshot {
            tiles: vec![TileSnapshot {
                coordinates: CubeCoord::ORIGIN,
                resource: "LAVA".into(),
                number: Some(5),
                has_robber: false,
            }],
            ..Default::default()
        };
        let warnings = board.reconcile(&snapshot).unwrap_err();
        assert_eq!(
            warnings,
            vec![ReconcileWarning::UnknownResource {
                tile: CubeCoord::ORIGIN,
                resource: "LAVA".into(),
            }]
        );
        assert_eq!(
            board.tile(CubeCoord::ORIGIN).unwrap().tile_type,
            TileType::Unassigned
        );
    }

    #[test]
    fn test_city_on_empty_corner_is_settled_first() {
        let mut board = Board::new(2);
        let mut snapshot = BoardSnapshot::default();
        snapshot.vertices.insert(
            "v".into(),
            vertex(
                vec![[1, 0, -1], [0, 0, 0], [1, -1, 0]],
                Some(BuildingSnapshot::new(BuildingKind::City, &red())),
            ),
        );
        board.reconcile(&snapshot).unwrap();
        assert_eq!(
            board
                .corner_at(CubeCoord::ORIGIN, CornerDirection::North)
                .unwrap()
                .building(),
            CornerBuilding::City(red())
        );
    }

    #[test]
    fn test_settlement_is_upgraded_by_snapshot() {
        let mut board = Board::new(2);
        board
            .place_settlement(CubeCoord::ORIGIN, CornerDirection::South, blue(), true)
            .unwrap();
        let key = CornerKey::of_corner(CubeCoord::ORIGIN, CornerDirection::South);
        let mut snapshot = BoardSnapshot::default();
        snapshot.vertices.insert(
            key.to_string(),
            vertex(
                key.to_triples(),
                Some(BuildingSnapshot::new(BuildingKind::City, &blue())),
            ),
        );
        board.reconcile(&snapshot).unwrap();
        assert_eq!(
            board
                .corner_at(CubeCoord::ORIGIN, CornerDirection::South)
                .unwrap()
                .building(),
            CornerBuilding::City(blue())
        );
    }

    #[test]
    fn test_foreign_building_conflict_is_reported() {
        let mut board = Board::new(2);
        board
            .place_settlement(CubeCoord::ORIGIN, CornerDirection::South, blue(), true)
            .unwrap();
        let key = CornerKey::of_corner(CubeCoord::ORIGIN, CornerDirection::South);
        let mut snapshot = BoardSnapshot::default();
        snapshot.vertices.insert(
            key.to_string(),
            vertex(
                key.to_triples(),
                Some(BuildingSnapshot::new(BuildingKind::Settlement, &red())),
            ),
        );

        let warnings = board.reconcile(&snapshot).unwrap_err();
        assert_eq!(
            warnings,
            vec![ReconcileWarning::Rejected(PlacementError::AlreadyOccupied {
                target: Target::CornerKey(key),
                owner: blue(),
            })]
        );
        assert_eq!(
            board
                .corner_at(CubeCoord::ORIGIN, CornerDirection::South)
                .unwrap()
                .owner(),
            Some(blue())
        );
    }

    #[test]
    fn test_unknown_and_malformed_entries_do_not_stop_the_rest() {
        let mut board = Board::new(1);
        let mut snapshot = BoardSnapshot::default();
        snapshot.vertices.insert(
            "far".into(),
            vertex(
                vec![[9, -9, 0], [10, -9, -1], [10, -10, 0]],
                Some(BuildingSnapshot::new(BuildingKind::Settlement, &red())),
            ),
        );
        snapshot.vertices.insert(
            "short".into(),
            vertex(
                vec![[0, 0, 0], [1, -1, 0]],
                Some(BuildingSnapshot::new(BuildingKind::Settlement, &red())),
            ),
        );
        snapshot
            .edges
            .insert("ok".into(), edge(vec![[0, 0, 0], [-1, 0, 1]], &red()));

        let warnings = board.reconcile(&snapshot).unwrap_err();
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], ReconcileWarning::UnknownCorner(_)));
        assert!(matches!(
            warnings[1],
            ReconcileWarning::MalformedCoordinates { ref entry, .. } if entry == "short"
        ));
        assert_eq!(
            board
                .edge_at(CubeCoord::ORIGIN, EdgeDirection::West)
                .unwrap()
                .owner(),
            Some(red())
        );
    }

    #[test]
    fn test_harbor_is_applied_without_building() {
        let mut board = Board::new(2);
        let key = CornerKey::of_corner(CubeCoord::new(2, -2), CornerDirection::North);
        let mut snapshot = BoardSnapshot::default();
        snapshot.vertices.insert(
            key.to_string(),
            VertexSnapshot {
                coordinates: key.to_triples(),
                building: None,
                harbor: Some(Harbor::Generic),
            },
        );
        board.reconcile(&snapshot).unwrap();
        assert_eq!(
            board
                .corner_at(CubeCoord::new(2, -2), CornerDirection::North)
                .unwrap()
                .harbor(),
            Some(Harbor::Generic)
        );
    }

    #[test]
    fn test_custom_player_factory() {
        let mut board = Board::new(1);
        let mut snapshot = BoardSnapshot::default();
        snapshot.edges.insert(
            "e".into(),
            EdgeSnapshot {
                coordinates: vec![[0, 0, 0], [1, 0, -1]],
                road: Some(RoadSnapshot {
                    player_id: 3,
                    player_color: "#ff00ff".into(),
                }),
            },
        );
        let factory = |id, _: &str| Player::new(id, PlayerColor::Orange);
        board.reconcile_with(&snapshot, &factory).unwrap();
        assert_eq!(
            board
                .edge_at(CubeCoord::ORIGIN, EdgeDirection::East)
                .unwrap()
                .owner(),
            Some(Player::new(3, PlayerColor::Orange))
        );
    }

    #[test]
    fn test_from_snapshot_and_rebuild_check() {
        let mut source = Board::new(3);
        let ore = CubeCoord::new(3, -3);
        source.tile_mut(ore).unwrap().tile_type = TileType::Resource(Resource::Ore);
        source
            .place_road(ore, EdgeDirection::West, red())
            .unwrap();
        let snapshot = source.to_snapshot();

        let local = Board::new(2);
        assert!(local.needs_rebuild(&snapshot));

        let (board, warnings) = Board::from_snapshot(&snapshot, &BoardConfig::default());
        assert!(warnings.is_empty());
        assert_eq!(board.size(), 3);
        assert!(!board.needs_rebuild(&snapshot));
        assert_eq!(
            board.edge_at(ore, EdgeDirection::West).unwrap().owner(),
            Some(red())
        );
    }
}
