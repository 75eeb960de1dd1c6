//! Strategies that seed resources and dice numbers on a freshly built board.
//!
//! A client usually starts from [`UnassignedLayout`] and waits for the first
//! snapshot. [`RandomLayout`] deals the standard tile set and is useful for
//! offline play and tests.

use crate::hex::CubeCoord;
use crate::tile::{Resource, TileType};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Initial contents of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileSeed {
    pub tile_type: TileType,
    pub dice_number: Option<u8>,
    pub has_robber: bool,
}

/// Decides what every non-border tile starts as
pub trait TileLayout {
    /// Returns one seed per coordinate, in the same order
    fn assign(&mut self, coords: &[CubeCoord]) -> Vec<TileSeed>;
}

/// Leaves every tile unassigned until a snapshot arrives
#[derive(Debug, Clone, Copy, Default)]
pub struct UnassignedLayout;

impl TileLayout for UnassignedLayout {
    fn assign(&mut self, coords: &[CubeCoord]) -> Vec<TileSeed> {
        vec![TileSeed::default(); coords.len()]
    }
}

/// Standard Catan tile distribution for the 19 land hexes:
/// 4 Lumber, 4 Grain, 4 Wool, 3 Ore, 3 Brick, 1 Desert (represented as None)
const STANDARD_TILES: [Option<Resource>; 19] = [
    Some(Resource::Lumber),
    Some(Resource::Lumber),
    Some(Resource::Lumber),
    Some(Resource::Lumber),
    Some(Resource::Grain),
    Some(Resource::Grain),
    Some(Resource::Grain),
    Some(Resource::Grain),
    Some(Resource::Wool),
    Some(Resource::Wool),
    Some(Resource::Wool),
    Some(Resource::Wool),
    Some(Resource::Ore),
    Some(Resource::Ore),
    Some(Resource::Ore),
    Some(Resource::Brick),
    Some(Resource::Brick),
    Some(Resource::Brick),
    None,
];

/// Numbers: 2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12
const STANDARD_NUMBERS: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

const MAX_ATTEMPTS: usize = 100;

/// Deals the standard tile set at random, repeating it for larger boards
#[derive(Debug, Clone)]
pub struct RandomLayout<R> {
    rng: R,
}

impl RandomLayout<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomLayout<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomLayout<R> {
    /// Use a provided RNG, for deterministic boards
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Assign numbers while trying to avoid 6 and 8 being adjacent
    fn assign_numbers(&mut self, resource_coords: &[CubeCoord]) -> Vec<u8> {
        let mut shuffled: Vec<u8> = STANDARD_NUMBERS
            .iter()
            .copied()
            .cycle()
            .take(resource_coords.len())
            .collect();

        for _ in 0..MAX_ATTEMPTS {
            shuffled.shuffle(&mut self.rng);
            if no_adjacent_red_numbers(resource_coords, &shuffled) {
                return shuffled;
            }
        }
        // Rare on the standard board; keep the last shuffle rather than fail
        shuffled
    }
}

impl<R: Rng> TileLayout for RandomLayout<R> {
    fn assign(&mut self, coords: &[CubeCoord]) -> Vec<TileSeed> {
        let mut tile_types: Vec<Option<Resource>> = STANDARD_TILES
            .iter()
            .copied()
            .cycle()
            .take(coords.len())
            .collect();
        tile_types.shuffle(&mut self.rng);

        let resource_coords: Vec<CubeCoord> = coords
            .iter()
            .zip(&tile_types)
            .filter(|(_, t)| t.is_some())
            .map(|(c, _)| *c)
            .collect();
        let mut numbers = self.assign_numbers(&resource_coords).into_iter();

        let mut robber_placed = false;
        tile_types
            .into_iter()
            .map(|tile_type| match tile_type {
                Some(resource) => TileSeed {
                    tile_type: TileType::Resource(resource),
                    dice_number: numbers.next(),
                    has_robber: false,
                },
                None => {
                    // Robber starts on the first desert
                    let has_robber = !robber_placed;
                    robber_placed = true;
                    TileSeed {
                        tile_type: TileType::Desert,
                        dice_number: None,
                        has_robber,
                    }
                }
            })
            .collect()
    }
}

/// Check that no 6 or 8 sits next to another 6 or 8
fn no_adjacent_red_numbers(coords: &[CubeCoord], numbers: &[u8]) -> bool {
    let by_coord: HashMap<CubeCoord, u8> = coords.iter().copied().zip(numbers.iter().copied()).collect();
    let is_red = |n: u8| n == 6 || n == 8;

    by_coord.iter().all(|(coord, &number)| {
        !is_red(number)
            || coord
                .neighbors()
                .iter()
                .filter_map(|n| by_coord.get(n))
                .all(|&neighbor| !is_red(neighbor))
    })
}
