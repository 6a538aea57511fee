//! Super finals, follower cup, and placement round fixtures.

use crate::models::game::Fixture;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Fixed role of a super-finals match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuperFinalsRole {
    /// Bracket A champion vs bracket B runner-up.
    Hf1,
    /// Bracket B champion vs bracket A runner-up.
    Hf2,
    Third,
    Final,
}

impl SuperFinalsRole {
    /// Numbering and display order.
    pub const ORDER: [SuperFinalsRole; 4] = [
        SuperFinalsRole::Hf1,
        SuperFinalsRole::Hf2,
        SuperFinalsRole::Third,
        SuperFinalsRole::Final,
    ];
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SuperFinalsMatch {
    pub role: SuperFinalsRole,
    #[serde(flatten)]
    pub fixture: Fixture,
}

/// Overall place decided in the super finals.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Placing {
    pub place: u32,
    pub team_id: TeamId,
}

/// Round of the follower cup ladder.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CupRound {
    Eighth,
    Quarter,
    Semi,
    Third,
    Final,
}

impl CupRound {
    /// Numbering and scheduling order.
    pub const ORDER: [CupRound; 5] = [
        CupRound::Eighth,
        CupRound::Quarter,
        CupRound::Semi,
        CupRound::Third,
        CupRound::Final,
    ];

    pub fn size(self) -> u8 {
        match self {
            CupRound::Eighth => 8,
            CupRound::Quarter => 4,
            CupRound::Semi => 2,
            CupRound::Third | CupRound::Final => 1,
        }
    }
}

/// Qualification match for the last follower cup places.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FollowerQualiMatch {
    #[serde(flatten)]
    pub fixture: Fixture,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FollowerCupMatch {
    pub round: CupRound,
    pub index: u8,
    #[serde(flatten)]
    pub fixture: Fixture,
}

/// One placement pairing; the winner takes `placement`, the loser `placement + 1`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacementMatch {
    pub placement: u32,
    #[serde(flatten)]
    pub fixture: Fixture,
}

impl PlacementMatch {
    pub fn label(&self) -> String {
        format!("P{}", self.placement)
    }
}
