//! Board topology and placement.
//!
//! This module contains:
//! - Board construction, including the resolution of shared corners and edges
//! - Query methods over tiles, corners and edges
//! - Placement of settlements, cities and roads with rule validation
//!
//! Corners and edges are stored once, in arenas, and tiles hold handles to
//! them. During construction every (tile, direction) pair computes the key of
//! its feature; the first tile to see a key allocates the feature and the
//! neighbours that see it later reuse the same handle.

use crate::config::{BoardConfig, MAX_BOARD_SIZE};
use crate::error::{PlacementError, Target};
use crate::feature::{Corner, CornerBuilding, CornerId, Edge, EdgeBuilding, EdgeId};
use crate::hex::{CornerDirection, CubeCoord, EdgeDirection};
use crate::key::{CornerKey, EdgeKey};
use crate::layout::{RandomLayout, TileLayout, UnassignedLayout};
use crate::player::Player;
use crate::rules::{self, ProximityRule, RoadOutcome, SettlementRule};
use crate::tile::{Harbor, Tile};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// The board: tiles plus the corners and edges they share
#[derive(Debug, Clone)]
pub struct Board {
    /// Radius of the playable area
    size: u32,
    /// Rule for settlements placed without bypassing the road check
    proximity: ProximityRule,
    /// All tiles, including the border ring, indexed by coordinate
    tiles: HashMap<CubeCoord, Tile>,
    corners: Vec<Corner>,
    edges: Vec<Edge>,
    corner_index: HashMap<CornerKey, CornerId>,
    edge_index: HashMap<EdgeKey, EdgeId>,
}

impl Board {
    /// An unassigned board of the given radius, waiting for a snapshot
    pub fn new(size: u32) -> Self {
        Self::with_layout(&BoardConfig::new(size), &mut UnassignedLayout)
    }

    /// The standard 19-tile board with randomized tiles and numbers
    pub fn standard() -> Self {
        Self::with_layout(&BoardConfig::default(), &mut RandomLayout::new())
    }

    /// Build a board from a config, seeding its tiles with `layout`.
    ///
    /// Tiles within `config.size` of the centre are normal tiles; the ring at
    /// `size + 1` is a border ring that only exists so the outer corners and
    /// edges of the real tiles have a second and third tile to belong to.
    ///
    /// Sizes above [`MAX_BOARD_SIZE`] are clamped to it.
    pub fn with_layout<L: TileLayout + ?Sized>(config: &BoardConfig, layout: &mut L) -> Self {
        let size = config.size.min(MAX_BOARD_SIZE);
        if size != config.size {
            warn!(requested = config.size, size, "board size clamped");
        }
        let coords = CubeCoord::within_radius(size + 1);

        let mut board = Self {
            size,
            proximity: config.proximity,
            tiles: HashMap::with_capacity(coords.len()),
            corners: Vec::new(),
            edges: Vec::new(),
            corner_index: HashMap::new(),
            edge_index: HashMap::new(),
        };

        for coord in coords {
            let corners = CornerDirection::ALL.map(|dir| board.resolve_corner(coord, dir));
            let edges = EdgeDirection::ALL.map(|dir| board.resolve_edge(coord, dir));
            let border = coord.radius() > size;
            board
                .tiles
                .insert(coord, Tile::new(coord, border, corners, edges));
        }

        let land = CubeCoord::within_radius(size);
        let seeds = layout.assign(&land);
        for (coord, seed) in land.iter().zip(seeds) {
            if let Some(tile) = board.tiles.get_mut(coord) {
                tile.tile_type = seed.tile_type;
                tile.dice_number = seed.dice_number;
                tile.has_robber = seed.has_robber;
            }
        }

        debug!(
            size,
            tiles = board.tiles.len(),
            corners = board.corners.len(),
            edges = board.edges.len(),
            "board topology resolved"
        );
        board
    }

    /// Find or allocate the corner at `direction` of `coord`
    fn resolve_corner(&mut self, coord: CubeCoord, direction: CornerDirection) -> CornerId {
        let key = CornerKey::of_corner(coord, direction);
        let id = match self.corner_index.get(&key) {
            Some(id) => *id,
            None => {
                let id = CornerId::new(self.corners.len() as u32);
                self.corners.push(Corner::new(key));
                self.corner_index.insert(key, id);
                id
            }
        };
        self.corners[id.index()].add_view(coord, direction);
        id
    }

    /// Find or allocate the edge at `direction` of `coord`
    fn resolve_edge(&mut self, coord: CubeCoord, direction: EdgeDirection) -> EdgeId {
        let key = EdgeKey::of_edge(coord, direction);
        let id = match self.edge_index.get(&key) {
            Some(id) => *id,
            None => {
                let id = EdgeId::new(self.edges.len() as u32);
                self.edges.push(Edge::new(key));
                self.edge_index.insert(key, id);
                id
            }
        };
        self.edges[id.index()].add_view(coord, direction);
        id
    }

    // ==================== Query Methods ====================

    /// Radius of the playable area
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The rule applied by [`Board::place_settlement`] without bypass
    pub fn proximity(&self) -> ProximityRule {
        self.proximity
    }

    pub fn set_proximity(&mut self, proximity: ProximityRule) {
        self.proximity = proximity;
    }

    /// Get a tile by coordinate
    pub fn tile(&self, coord: CubeCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    pub(crate) fn tile_mut(&mut self, coord: CubeCoord) -> Option<&mut Tile> {
        self.tiles.get_mut(&coord)
    }

    /// All tiles, border ring included, in no particular order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Tiles of the playable area (no border tiles)
    pub fn land_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values().filter(|t| !t.is_border())
    }

    pub fn corner(&self, id: CornerId) -> Option<&Corner> {
        self.corners.get(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// All corners with their handles
    pub fn corners(&self) -> impl Iterator<Item = (CornerId, &Corner)> {
        self.corners
            .iter()
            .enumerate()
            .map(|(i, c)| (CornerId::new(i as u32), c))
    }

    /// All edges with their handles
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i as u32), e))
    }

    pub fn corner_id_at(&self, coord: CubeCoord, direction: CornerDirection) -> Option<CornerId> {
        self.tile(coord).map(|t| t.corner(direction))
    }

    pub fn edge_id_at(&self, coord: CubeCoord, direction: EdgeDirection) -> Option<EdgeId> {
        self.tile(coord).map(|t| t.edge(direction))
    }

    /// The corner seen from `coord` in `direction`
    pub fn corner_at(&self, coord: CubeCoord, direction: CornerDirection) -> Option<&Corner> {
        self.corner_id_at(coord, direction)
            .and_then(|id| self.corner(id))
    }

    /// The edge seen from `coord` in `direction`
    pub fn edge_at(&self, coord: CubeCoord, direction: EdgeDirection) -> Option<&Edge> {
        self.edge_id_at(coord, direction).and_then(|id| self.edge(id))
    }

    /// The six corners of a tile, in direction order
    pub fn corners_of(&self, coord: CubeCoord) -> Vec<(CornerDirection, &Corner)> {
        let Some(tile) = self.tile(coord) else {
            return Vec::new();
        };
        tile.corners()
            .filter_map(|(dir, id)| self.corner(id).map(|c| (dir, c)))
            .collect()
    }

    /// The six edges of a tile, in direction order
    pub fn edges_of(&self, coord: CubeCoord) -> Vec<(EdgeDirection, &Edge)> {
        let Some(tile) = self.tile(coord) else {
            return Vec::new();
        };
        tile.edges()
            .filter_map(|(dir, id)| self.edge(id).map(|e| (dir, e)))
            .collect()
    }

    pub fn corner_by_key(&self, key: &CornerKey) -> Option<CornerId> {
        self.corner_index.get(key).copied()
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<EdgeId> {
        self.edge_index.get(key).copied()
    }

    /// Edges meeting at a corner (fewer than 3 on the outer rim)
    pub fn incident_edges(&self, corner: CornerId) -> Vec<EdgeId> {
        let Some(corner) = self.corner(corner) else {
            return Vec::new();
        };
        corner
            .key()
            .incident_edges()
            .iter()
            .filter_map(|key| self.edge_by_key(key))
            .collect()
    }

    /// Corners at the two ends of an edge (fewer on the outer rim)
    pub fn edge_endpoints(&self, edge: EdgeId) -> Vec<CornerId> {
        let Some(edge) = self.edge(edge) else {
            return Vec::new();
        };
        let [a, b] = *edge.key().coords();
        // The endpoints are the corners shared with the two common neighbours
        a.neighbors()
            .into_iter()
            .filter(|n| *n != b && n.distance_to(b) == 1)
            .filter_map(|n| CornerKey::new([a, b, n]).ok())
            .filter_map(|key| self.corner_by_key(&key))
            .collect()
    }

    /// Corners one edge away from `corner`
    pub fn adjacent_corners(&self, corner: CornerId) -> Vec<CornerId> {
        self.incident_edges(corner)
            .into_iter()
            .flat_map(|edge| self.edge_endpoints(edge))
            .filter(|other| *other != corner)
            .collect()
    }

    /// Whether a corner touches at least one normal tile
    pub fn is_playable_corner(&self, corner: CornerId) -> bool {
        self.corner(corner)
            .is_some_and(|c| self.touches_land(c.key().coords()))
    }

    /// Whether an edge touches at least one normal tile
    pub fn is_playable_edge(&self, edge: EdgeId) -> bool {
        self.edge(edge)
            .is_some_and(|e| self.touches_land(e.key().coords()))
    }

    fn touches_land(&self, coords: &[CubeCoord]) -> bool {
        coords
            .iter()
            .any(|c| self.tiles.get(c).is_some_and(|t| !t.is_border()))
    }

    /// Get the robber's current location, if it is on the board
    pub fn robber_location(&self) -> Option<CubeCoord> {
        self.tiles.values().find(|t| t.has_robber).map(|t| t.coord)
    }

    /// Get all harbors a player has access to (through their buildings)
    pub fn player_harbors(&self, player: &Player) -> Vec<Harbor> {
        self.corners
            .iter()
            .filter(|c| c.owner().is_some_and(|owner| owner.is(player)))
            .filter_map(|c| c.harbor())
            .collect()
    }

    // ==================== Validation Queries ====================

    /// Empty playable corners where the player could settle.
    ///
    /// During setup only the distance rule applies; otherwise the corner must
    /// also touch one of the player's roads.
    pub fn valid_settlement_spots(&self, player: &Player, is_setup: bool) -> Vec<CornerId> {
        self.corners()
            .filter(|(id, corner)| {
                corner.is_empty()
                    && self.is_playable_corner(*id)
                    && rules::satisfies_distance_rule(self, *id)
                    && (is_setup || rules::touches_own_road(self, *id, player))
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// The player's settlements, which could become cities
    pub fn valid_city_spots(&self, player: &Player) -> Vec<CornerId> {
        self.corners()
            .filter(|(_, corner)| {
                matches!(corner.building(), CornerBuilding::Settlement(owner) if owner.is(player))
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Empty playable edges connected to the player's network
    pub fn valid_road_spots(&self, player: &Player) -> Vec<EdgeId> {
        self.edges()
            .filter(|(id, edge)| {
                edge.is_empty()
                    && self.is_playable_edge(*id)
                    && rules::road_connects(self, *id, player)
            })
            .map(|(id, _)| id)
            .collect()
    }

    // ==================== Placement ====================

    /// Place a settlement on an empty corner.
    ///
    /// Unless `bypass_road_check` is set (initial placement), the board's
    /// proximity rule must also pass.
    pub fn place_settlement(
        &mut self,
        coord: CubeCoord,
        direction: CornerDirection,
        player: Player,
        bypass_road_check: bool,
    ) -> Result<(), PlacementError> {
        let rule = if bypass_road_check {
            ProximityRule::Unrestricted
        } else {
            self.proximity
        };
        self.place_settlement_with(coord, direction, player, &rule)
    }

    /// Place a settlement on an empty corner, checked by a caller-supplied rule
    pub fn place_settlement_with<R: SettlementRule + ?Sized>(
        &mut self,
        coord: CubeCoord,
        direction: CornerDirection,
        player: Player,
        rule: &R,
    ) -> Result<(), PlacementError> {
        let id = self
            .corner_id_at(coord, direction)
            .ok_or(PlacementError::NotFound(Target::Tile(coord)))?;
        self.settle_corner(id, Target::corner(coord, direction), player, rule)
    }

    /// Upgrade the player's own settlement to a city
    pub fn place_city(
        &mut self,
        coord: CubeCoord,
        direction: CornerDirection,
        player: Player,
    ) -> Result<(), PlacementError> {
        let id = self
            .corner_id_at(coord, direction)
            .ok_or(PlacementError::NotFound(Target::Tile(coord)))?;
        self.upgrade_corner(id, Target::corner(coord, direction), player)
    }

    /// Build a road on an empty edge; rebuilding one's own road is a no-op
    pub fn place_road(
        &mut self,
        coord: CubeCoord,
        direction: EdgeDirection,
        player: Player,
    ) -> Result<(), PlacementError> {
        let id = self
            .edge_id_at(coord, direction)
            .ok_or(PlacementError::NotFound(Target::Tile(coord)))?;
        self.claim_edge(id, Target::edge(coord, direction), player)
            .map(|_| ())
    }

    pub(crate) fn settle_corner<R: SettlementRule + ?Sized>(
        &mut self,
        id: CornerId,
        target: Target,
        player: Player,
        rule: &R,
    ) -> Result<(), PlacementError> {
        let current = self
            .corner(id)
            .ok_or_else(|| PlacementError::NotFound(target.clone()))?
            .building();
        rules::check_settlement(&target, current)?;
        rule.check(self, id, &player)
            .map_err(|reason| PlacementError::AdjacencyViolation {
                target: target.clone(),
                reason,
            })?;

        self.corners[id.index()].building = CornerBuilding::Settlement(player);
        trace!(%target, %player, "settlement placed");
        Ok(())
    }

    pub(crate) fn upgrade_corner(
        &mut self,
        id: CornerId,
        target: Target,
        player: Player,
    ) -> Result<(), PlacementError> {
        let current = self
            .corner(id)
            .ok_or_else(|| PlacementError::NotFound(target.clone()))?
            .building();
        rules::check_city(&target, current, &player)?;

        self.corners[id.index()].building = CornerBuilding::City(player);
        trace!(%target, %player, "city placed");
        Ok(())
    }

    pub(crate) fn claim_edge(
        &mut self,
        id: EdgeId,
        target: Target,
        player: Player,
    ) -> Result<RoadOutcome, PlacementError> {
        let current = self
            .edge(id)
            .ok_or_else(|| PlacementError::NotFound(target.clone()))?
            .building();
        let outcome = rules::check_road(&target, current, &player)?;

        if outcome == RoadOutcome::Built {
            self.edges[id.index()].building = EdgeBuilding::Road(player);
            trace!(%target, %player, "road placed");
        }
        Ok(outcome)
    }

    // ==================== Other Mutations ====================

    /// Put a harbor on a corner
    pub fn set_harbor(
        &mut self,
        coord: CubeCoord,
        direction: CornerDirection,
        harbor: Harbor,
    ) -> Result<(), PlacementError> {
        let id = self
            .corner_id_at(coord, direction)
            .ok_or(PlacementError::NotFound(Target::Tile(coord)))?;
        self.corners[id.index()].harbor = Some(harbor);
        Ok(())
    }

    pub(crate) fn set_corner_harbor(&mut self, id: CornerId, harbor: Harbor) {
        if let Some(corner) = self.corners.get_mut(id.index()) {
            corner.harbor = Some(harbor);
        }
    }

    /// Move the robber to a new location
    pub fn move_robber(&mut self, new_location: CubeCoord) -> Result<(), PlacementError> {
        if !self.tiles.contains_key(&new_location) {
            return Err(PlacementError::NotFound(Target::Tile(new_location)));
        }
        for tile in self.tiles.values_mut() {
            tile.has_robber = tile.coord == new_location;
        }
        Ok(())
    }
}
