use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{GameCandidate, PlayerCount};

/// Ranking partition of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Unknown count, or enough seats for the whole group
    Adequate,
    /// Known count below the group size
    Inadequate,
}

/// Player count annotation shown next to a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityHint {
    Unknown,
    Singleplayer,
    BelowGroup,
    Fits,
}

impl CapacityHint {
    pub fn for_count(players: PlayerCount, group_size: usize) -> Self {
        match players {
            PlayerCount::Unknown => CapacityHint::Unknown,
            PlayerCount::Known(1) => CapacityHint::Singleplayer,
            PlayerCount::Known(n) if (n as usize) < group_size => CapacityHint::BelowGroup,
            PlayerCount::Known(_) => CapacityHint::Fits,
        }
    }

    /// Rendered with the "short" highlight
    pub fn is_short(&self) -> bool {
        !matches!(self, CapacityHint::Fits)
    }

    /// Tooltip text
    pub fn title(&self) -> Option<&'static str> {
        match self {
            CapacityHint::Unknown => Some("Unable to retrieve the player count for this game from the catalog"),
            CapacityHint::Singleplayer => Some("This game is singleplayer"),
            CapacityHint::BelowGroup => Some("This game has less supported users than the number of selected users"),
            CapacityHint::Fits => None,
        }
    }
}

/// A candidate in display position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGame {
    pub game: GameCandidate,
    pub tier: Tier,
    pub hint: CapacityHint,
}

/// Ordered result of one intersection, ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedList {
    /// Number of users the games were ranked for
    pub group_size: usize,

    /// Games in display order
    pub games: Vec<RankedGame>,

    /// Records skipped because they had no name
    #[serde(default)]
    pub dropped: usize,

    /// Ranking method used
    pub ranking_method: String,

    #[serde(default = "Utc::now")]
    pub ranked_at: DateTime<Utc>,
}

impl RankedList {
    pub fn new(group_size: usize, games: Vec<RankedGame>, dropped: usize) -> Self {
        Self {
            group_size,
            games,
            dropped,
            ranking_method: String::from("unknown"),
            ranked_at: Utc::now(),
        }
    }

    /// Set ranking method
    pub fn with_ranking_method(mut self, method: impl Into<String>) -> Self {
        self.ranking_method = method.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Games the whole group can play (or might, if the count is unknown)
    pub fn adequate(&self) -> impl Iterator<Item = &RankedGame> {
        self.games.iter().filter(|g| g.tier == Tier::Adequate)
    }

    pub fn names(&self) -> Vec<&str> {
        self.games.iter().map(|g| g.game.name.as_str()).collect()
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        format!(
            "{} games for {} users ({} adequate, {} dropped) [{}]",
            self.games.len(),
            self.group_size,
            self.adequate().count(),
            self.dropped,
            self.ranking_method
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_precedence() {
        assert_eq!(CapacityHint::for_count(PlayerCount::Unknown, 4), CapacityHint::Unknown);
        assert_eq!(CapacityHint::for_count(PlayerCount::Known(1), 4), CapacityHint::Singleplayer);
        assert_eq!(CapacityHint::for_count(PlayerCount::Known(1), 1), CapacityHint::Singleplayer);
        assert_eq!(CapacityHint::for_count(PlayerCount::Known(3), 4), CapacityHint::BelowGroup);
        assert_eq!(CapacityHint::for_count(PlayerCount::Known(4), 4), CapacityHint::Fits);
        assert_eq!(CapacityHint::for_count(PlayerCount::Known(0), 2), CapacityHint::BelowGroup);
    }

    #[test]
    fn test_hint_short() {
        assert!(CapacityHint::Unknown.is_short());
        assert!(CapacityHint::BelowGroup.is_short());
        assert!(!CapacityHint::Fits.is_short());
        assert_eq!(CapacityHint::Fits.title(), None);
    }

    #[test]
    fn test_display() {
        let game = GameCandidate::new(1, "Terraria", PlayerCount::Known(8));
        let list = RankedList::new(
            3,
            vec![RankedGame { game, tier: Tier::Adequate, hint: CapacityHint::Fits }],
            1,
        )
        .with_ranking_method("tier");

        assert_eq!(list.display(), "1 games for 3 users (1 adequate, 1 dropped) [tier]");
        assert_eq!(list.names(), vec!["Terraria"]);
    }
}
