//! Order-independent identities for shared corners and edges.
//!
//! A corner is where three tiles meet, an edge where two do. Both are named by
//! the set of tile coordinates that border them. The coordinates are sorted on
//! construction so two keys built from the same tiles in any order compare,
//! hash and print identically.

use crate::hex::{CoordError, CornerDirection, CubeCoord, EdgeDirection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sorted set of `N` distinct tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey<const N: usize>([CubeCoord; N]);

/// Identity of a corner: the three tiles meeting there
pub type CornerKey = VertexKey<3>;

/// Identity of an edge: the two tiles sharing it
pub type EdgeKey = VertexKey<2>;

/// Separator between coordinates in the canonical string form
pub const KEY_SEPARATOR: char = '|';

impl<const N: usize> VertexKey<N> {
    /// Build a key from coordinates in any order.
    ///
    /// Fails if a coordinate is repeated, since a corner or edge always
    /// borders distinct tiles.
    pub fn new(mut coords: [CubeCoord; N]) -> Result<Self, CoordError> {
        coords.sort_unstable();
        if let Some(pair) = coords.windows(2).find(|w| w[0] == w[1]) {
            return Err(CoordError::Duplicate(pair[0]));
        }
        Ok(Self(coords))
    }

    /// Build a key from a slice of unknown length
    pub fn from_slice(coords: &[CubeCoord]) -> Result<Self, CoordError> {
        let array: [CubeCoord; N] = coords.try_into().map_err(|_| CoordError::WrongArity {
            expected: N,
            actual: coords.len(),
        })?;
        Self::new(array)
    }

    /// Build a key from `[q, r, s]` triples as sent by the server
    pub fn from_triples(triples: &[[i32; 3]]) -> Result<Self, CoordError> {
        let coords = triples
            .iter()
            .map(|t| CubeCoord::from_triple(*t))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_slice(&coords)
    }

    /// The coordinates in canonical (sorted) order
    pub fn coords(&self) -> &[CubeCoord; N] {
        &self.0
    }

    /// The coordinates as `[q, r, s]` triples, in canonical order
    pub fn to_triples(&self) -> Vec<[i32; 3]> {
        self.0.iter().map(|c| c.to_triple()).collect()
    }

    /// Whether the given tile borders this feature
    pub fn contains(&self, coord: CubeCoord) -> bool {
        self.0.contains(&coord)
    }
}

impl CornerKey {
    /// Key of the corner at `direction` of the tile at `coord`
    pub fn of_corner(coord: CubeCoord, direction: CornerDirection) -> Self {
        let mut coords = coord.corner_tiles(direction);
        coords.sort_unstable();
        Self(coords)
    }

    /// The three edges that meet at this corner
    pub fn incident_edges(&self) -> [EdgeKey; 3] {
        let [a, b, c] = self.0;
        [VertexKey([a, b]), VertexKey([a, c]), VertexKey([b, c])]
    }
}

impl EdgeKey {
    /// Key of the edge at `direction` of the tile at `coord`
    pub fn of_edge(coord: CubeCoord, direction: EdgeDirection) -> Self {
        let mut coords = coord.edge_tiles(direction);
        coords.sort_unstable();
        Self(coords)
    }

    /// Whether this edge meets the given corner
    pub fn touches(&self, corner: &CornerKey) -> bool {
        self.0.iter().all(|c| corner.contains(*c))
    }
}

impl<const N: usize> fmt::Display for VertexKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coord) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{KEY_SEPARATOR}")?;
            }
            write!(f, "{coord}")?;
        }
        Ok(())
    }
}

impl<const N: usize> FromStr for VertexKey<N> {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(KEY_SEPARATOR)
            .map(str::parse)
            .collect::<Result<Vec<CubeCoord>, _>>()?;
        Self::from_slice(&coords)
    }
}

impl<const N: usize> Serialize for VertexKey<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, const N: usize> Deserialize<'de> for VertexKey<N> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn c(q: i32, r: i32) -> CubeCoord {
        CubeCoord::new(q, r)
    }

    #[test]
    fn test_same_corner_from_three_tiles() {
        // Every tile meeting at a corner derives the same key for it
        let key = CornerKey::of_corner(CubeCoord::ORIGIN, CornerDirection::North);
        let mut seen = 0;
        for tile in key.coords() {
            for dir in CornerDirection::ALL {
                if CornerKey::of_corner(*tile, dir) == key {
                    seen += 1;
                }
            }
        }
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_same_edge_from_both_tiles() {
        let a = EdgeKey::of_edge(CubeCoord::ORIGIN, EdgeDirection::East);
        let b = EdgeKey::of_edge(c(1, 0), EdgeDirection::West);
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_coordinates_rejected() {
        let err = EdgeKey::new([c(0, 0), c(0, 0)]).unwrap_err();
        assert_eq!(err, CoordError::Duplicate(c(0, 0)));
    }

    #[test]
    fn test_wrong_arity_rejected() {
        let err = CornerKey::from_slice(&[c(0, 0), c(1, 0)]).unwrap_err();
        assert_eq!(
            err,
            CoordError::WrongArity {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_canonical_string() {
        let key = CornerKey::new([c(1, 0), c(0, 0), c(1, -1)]).unwrap();
        assert_eq!(key.to_string(), "0,0,0|1,-1,0|1,0,-1");
        assert_eq!(key.to_string().parse::<CornerKey>().unwrap(), key);
    }

    #[test]
    fn test_incident_edges_touch_corner() {
        let corner = CornerKey::of_corner(c(1, 1), CornerDirection::SouthWest);
        for edge in corner.incident_edges() {
            assert!(edge.touches(&corner));
        }
    }

    #[test]
    fn test_serde_as_string() {
        let key = EdgeKey::of_edge(CubeCoord::ORIGIN, EdgeDirection::West);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"-1,0,1|0,0,0\"");
        let back: EdgeKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    fn coord_strategy() -> impl Strategy<Value = CubeCoord> {
        (-5i32..=5, -5i32..=5).prop_map(|(q, r)| CubeCoord::new(q, r))
    }

    proptest! {
        #[test]
        fn corner_key_ignores_order(a in coord_strategy(), b in coord_strategy(), c in coord_strategy()) {
            prop_assume!(a != b && b != c && a != c);
            let base = CornerKey::new([a, b, c]).unwrap();
            for perm in [[a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
                let other = CornerKey::new(perm).unwrap();
                prop_assert_eq!(other, base);
                prop_assert_eq!(other.to_string(), base.to_string());
            }
        }

        #[test]
        fn edge_key_ignores_order(a in coord_strategy(), b in coord_strategy()) {
            prop_assume!(a != b);
            prop_assert_eq!(EdgeKey::new([a, b]).unwrap(), EdgeKey::new([b, a]).unwrap());
        }
    }
}
