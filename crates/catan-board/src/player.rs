//! Player handles as seen by the board.
//!
//! The board does not track hands, cards or scores; it only needs to know who
//! owns a building and which color to report for it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Player identifier as assigned by the server; seats 0-3 map to the
/// default colors
pub type PlayerId = u32;

/// Player color for UI rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Blue,
    Orange,
    White,
}

impl PlayerColor {
    /// Get color for a player index
    pub fn for_player(id: PlayerId) -> Self {
        match id % 4 {
            0 => PlayerColor::Red,
            1 => PlayerColor::Blue,
            2 => PlayerColor::Orange,
            _ => PlayerColor::White,
        }
    }

    /// Get hex color code for rendering
    pub fn hex_code(&self) -> u32 {
        match self {
            PlayerColor::Red => 0xE74C3C,
            PlayerColor::Blue => 0x3498DB,
            PlayerColor::Orange => 0xE67E22,
            PlayerColor::White => 0xECF0F1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlayerColor::Red => "red",
            PlayerColor::Blue => "blue",
            PlayerColor::Orange => "orange",
            PlayerColor::White => "white",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(PlayerColor::Red),
            "blue" => Ok(PlayerColor::Blue),
            "orange" => Ok(PlayerColor::Orange),
            "white" => Ok(PlayerColor::White),
            other => Err(format!("unknown player color {other:?}")),
        }
    }
}

/// The owner of a building or road.
///
/// Two handles denote the same player when their ids match; the color is
/// carried along for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub color: PlayerColor,
}

impl Player {
    pub fn new(id: PlayerId, color: PlayerColor) -> Self {
        Self { id, color }
    }

    /// A player with the default seat color for its id
    pub fn seat(id: PlayerId) -> Self {
        Self::new(id, PlayerColor::for_player(id))
    }

    /// Whether `other` refers to the same player
    pub fn is(&self, other: &Player) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {} ({})", self.id, self.color)
    }
}

/// Builds player handles from the owner fields of a remote snapshot
pub trait PlayerFactory {
    fn player(&self, id: PlayerId, color: &str) -> Player;
}

/// Parses the color name, falling back to the seat color when unknown
#[derive(Debug, Clone, Copy, Default)]
pub struct SeatPlayers;

impl PlayerFactory for SeatPlayers {
    fn player(&self, id: PlayerId, color: &str) -> Player {
        match color.parse() {
            Ok(color) => Player::new(id, color),
            Err(reason) => {
                tracing::debug!("{reason}, using seat color for player {id}");
                Player::seat(id)
            }
        }
    }
}

impl<F> PlayerFactory for F
where
    F: Fn(PlayerId, &str) -> Player,
{
    fn player(&self, id: PlayerId, color: &str) -> Player {
        self(id, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_color() {
        let a = Player::new(1, PlayerColor::Blue);
        let b = Player::new(1, PlayerColor::Red);
        assert!(a.is(&b));
        assert!(!a.is(&Player::seat(2)));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("RED".parse::<PlayerColor>(), Ok(PlayerColor::Red));
        assert_eq!(" orange ".parse::<PlayerColor>(), Ok(PlayerColor::Orange));
        assert!("purple".parse::<PlayerColor>().is_err());
    }

    #[test]
    fn test_seat_factory_falls_back() {
        let factory = SeatPlayers;
        assert_eq!(factory.player(2, "white").color, PlayerColor::White);
        assert_eq!(factory.player(1, "teal").color, PlayerColor::Blue);
        assert_eq!(factory.player(300, "red").id, 300);
    }

    #[test]
    fn test_closure_factory() {
        let factory = |id: PlayerId, _: &str| Player::new(id, PlayerColor::Orange);
        assert_eq!(factory.player(0, "red").color, PlayerColor::Orange);
    }
}
