//! Placement rules.
//!
//! The state checks (`check_settlement`, `check_city`, `check_road`) look only
//! at the building currently on the target. The proximity checks look at the
//! surrounding corners and edges and are applied through a [`SettlementRule`],
//! which the caller may replace with its own predicate.

use crate::board::Board;
use crate::error::{AdjacencyReason, PlacementError, Target, UpgradeReason};
use crate::feature::{CornerBuilding, CornerId, EdgeBuilding, EdgeId};
use crate::player::Player;
use serde::{Deserialize, Serialize};

/// Result of a legal road placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadOutcome {
    /// The edge was empty and now carries the road
    Built,
    /// The player already owned the edge; nothing changed
    AlreadyOwned,
}

/// A settlement needs an empty corner
pub fn check_settlement(target: &Target, current: CornerBuilding) -> Result<(), PlacementError> {
    match current.owner() {
        None => Ok(()),
        Some(owner) => Err(PlacementError::AlreadyOccupied {
            target: target.clone(),
            owner,
        }),
    }
}

/// A city replaces the player's own settlement
pub fn check_city(
    target: &Target,
    current: CornerBuilding,
    player: &Player,
) -> Result<(), PlacementError> {
    let reason = match current {
        CornerBuilding::Settlement(owner) if owner.is(player) => return Ok(()),
        CornerBuilding::Empty => UpgradeReason::NoSettlement,
        CornerBuilding::City(owner) if owner.is(player) => UpgradeReason::AlreadyCity,
        CornerBuilding::Settlement(owner) | CornerBuilding::City(owner) => {
            UpgradeReason::ForeignOwner(owner)
        }
    };
    Err(PlacementError::InvalidUpgrade {
        target: target.clone(),
        reason,
    })
}

/// A road needs an empty edge; rebuilding one's own road is a no-op
pub fn check_road(
    target: &Target,
    current: EdgeBuilding,
    player: &Player,
) -> Result<RoadOutcome, PlacementError> {
    match current {
        EdgeBuilding::Empty => Ok(RoadOutcome::Built),
        EdgeBuilding::Road(owner) if owner.is(player) => Ok(RoadOutcome::AlreadyOwned),
        EdgeBuilding::Road(owner) => Err(PlacementError::AlreadyOccupied {
            target: target.clone(),
            owner,
        }),
    }
}

/// Whether one of the corner's edges carries the player's road
pub fn touches_own_road(board: &Board, corner: CornerId, player: &Player) -> bool {
    board
        .incident_edges(corner)
        .into_iter()
        .filter_map(|edge| board.edge(edge))
        .any(|edge| edge.building().is_road_of(player))
}

/// Check if a corner satisfies the distance rule (no adjacent buildings)
pub fn satisfies_distance_rule(board: &Board, corner: CornerId) -> bool {
    board
        .adjacent_corners(corner)
        .into_iter()
        .filter_map(|adj| board.corner(adj))
        .all(|adj| adj.is_empty())
}

/// Whether a road on `edge` would join the player's network.
///
/// It does if the player has a building on one endpoint, or a road leading
/// into an endpoint that no other player has built on.
pub fn road_connects(board: &Board, edge: EdgeId, player: &Player) -> bool {
    for endpoint in board.edge_endpoints(edge) {
        let owner = board.corner(endpoint).and_then(|c| c.owner());
        match owner {
            Some(owner) if owner.is(player) => return true,
            Some(_) => continue,
            None => {}
        }
        let has_road = board
            .incident_edges(endpoint)
            .into_iter()
            .filter(|adj| *adj != edge)
            .filter_map(|adj| board.edge(adj))
            .any(|adj| adj.building().is_road_of(player));
        if has_road {
            return true;
        }
    }
    false
}

/// Extra condition a settlement must meet beyond an empty corner
pub trait SettlementRule {
    fn check(&self, board: &Board, corner: CornerId, player: &Player)
        -> Result<(), AdjacencyReason>;
}

/// Built-in proximity rules, selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityRule {
    /// Any empty corner
    Unrestricted,
    /// Must touch one of the player's roads
    #[default]
    RoadConnected,
    /// No building on a neighbouring corner
    DistanceOnly,
    /// Both of the above, as in the board game
    RoadConnectedWithDistance,
}

impl SettlementRule for ProximityRule {
    fn check(
        &self,
        board: &Board,
        corner: CornerId,
        player: &Player,
    ) -> Result<(), AdjacencyReason> {
        let needs_road = matches!(
            self,
            ProximityRule::RoadConnected | ProximityRule::RoadConnectedWithDistance
        );
        let needs_distance = matches!(
            self,
            ProximityRule::DistanceOnly | ProximityRule::RoadConnectedWithDistance
        );
        if needs_distance && !satisfies_distance_rule(board, corner) {
            return Err(AdjacencyReason::TooClose);
        }
        if needs_road && !touches_own_road(board, corner, player) {
            return Err(AdjacencyReason::NoOwnRoad);
        }
        Ok(())
    }
}

impl<F> SettlementRule for F
where
    F: Fn(&Board, CornerId, &Player) -> bool,
{
    fn check(
        &self,
        board: &Board,
        corner: CornerId,
        player: &Player,
    ) -> Result<(), AdjacencyReason> {
        if self(board, corner, player) {
            Ok(())
        } else {
            Err(AdjacencyReason::Rejected)
        }
    }
}
