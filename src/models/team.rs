//! Team and RankingRow data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in fixtures and lookups).
pub type TeamId = Uuid;

/// Number of groups in the group stage.
pub const GROUP_COUNT: u8 = 10;

/// Teams per full group.
pub const GROUP_SIZE: usize = 6;

/// Full roster size (ghost teams pad up to this).
pub const ROSTER_SIZE: usize = GROUP_COUNT as usize * GROUP_SIZE;

/// A registered team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Group 1..=10.
    pub group: u8,
    /// Synthetic bye-filler: loses every match 0-42 and never qualifies.
    #[serde(default)]
    pub ghost: bool,
}

impl Team {
    /// Create a real team in the given group.
    pub fn new(name: impl Into<String>, group: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            group,
            ghost: false,
        }
    }

    pub fn ghost(name: impl Into<String>, group: u8) -> Self {
        Self {
            ghost: true,
            ..Self::new(name, group)
        }
    }
}

/// Aggregate group-stage standing of one team.
///
/// A projection of the recorded group results: always rebuilt from scratch,
/// never patched match by match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub team_id: TeamId,
    pub group: u8,
    pub ghost: bool,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl RankingRow {
    /// Zeroed row for a team.
    pub fn for_team(team: &Team) -> Self {
        Self {
            team_id: team.id,
            group: team.group,
            ghost: team.ghost,
            ..Self::default()
        }
    }

    /// Fold one result into the row, seen from this team's side.
    pub fn add_result(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference += scored as i32 - conceded as i32;
        if scored > conceded {
            self.wins += 1;
            self.points += 3;
        } else if scored < conceded {
            self.losses += 1;
        } else {
            self.draws += 1;
            self.points += 1;
        }
    }

    /// Sort key: points, goal difference, goals for (all higher is better).
    pub fn rank_key(&self) -> (u32, i32, u32) {
        (self.points, self.goal_difference, self.goals_for)
    }

    /// Strictly ahead of `other` under the ranking order.
    pub fn beats(&self, other: &RankingRow) -> bool {
        self.rank_key() > other.rank_key()
    }
}
