//! Double-elimination bracket: slots, ladders, and the 16-entrant layout.

use crate::models::game::Fixture;
use crate::models::team::TeamId;
use crate::models::tournament::Phase;
use serde::{Deserialize, Serialize};

/// Which of the two parallel brackets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSide {
    /// Fed by groups 1-5.
    A,
    /// Fed by groups 6-10.
    B,
}

impl BracketSide {
    /// Inclusive group range feeding this bracket.
    pub fn groups(self) -> (u8, u8) {
        match self {
            BracketSide::A => (1, 5),
            BracketSide::B => (6, 10),
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            BracketSide::A => Phase::BracketA,
            BracketSide::B => Phase::BracketB,
        }
    }
}

/// Sub-bracket inside a double-elimination bracket.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ladder {
    Winners,
    Losers,
}

/// Position of a slot inside one ladder.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SlotKey {
    pub round: u8,
    pub index: u8,
}

impl SlotKey {
    pub const fn new(round: u8, index: u8) -> Self {
        Self { round, index }
    }
}

/// Lifecycle of a bracket slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// One or both entrants still missing.
    Pending,
    /// Both entrants known, no result yet.
    Ready,
    /// Result recorded, winner/loser not (or no longer) present in every successor.
    Played,
    /// Result recorded and forwarded to every successor slot.
    Terminal,
}

/// One match position in a double-elimination bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketSlot {
    pub ladder: Ladder,
    pub round: u8,
    pub index: u8,
    #[serde(flatten)]
    pub fixture: Fixture,
}

impl BracketSlot {
    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.round, self.index)
    }
}

/// Matches per Winners round (8 -> 4 -> 2 -> 1).
pub const WINNERS_ROUND_SIZES: [u8; 4] = [8, 4, 2, 1];

/// Matches per Losers round, as fed by the forwarding tables.
pub const LOSERS_ROUND_SIZES: [u8; 6] = [4, 4, 2, 2, 1, 1];

/// Entrants seeded into round 1 of the Winners ladder.
pub const BRACKET_ENTRANTS: usize = 16;

/// Full state of one 16-entrant double-elimination bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DoubleElimBracket {
    pub side: BracketSide,
    /// Seeded entrants in qualification order.
    pub entrants: Vec<TeamId>,
    /// Winners rounds first, then Losers rounds; each round by index.
    pub slots: Vec<BracketSlot>,
}

impl DoubleElimBracket {
    /// Lay out every slot. Round 1 Winners pairs entrant i vs entrant 15-i;
    /// everything else starts empty and fills by forwarding.
    /// `entrants` must hold exactly [`BRACKET_ENTRANTS`] teams.
    pub fn seeded(side: BracketSide, entrants: Vec<TeamId>) -> Self {
        let mut slots = Vec::new();
        for (r, &size) in WINNERS_ROUND_SIZES.iter().enumerate() {
            for index in 0..size {
                let fixture = if r == 0 {
                    let i = index as usize;
                    Fixture::new(
                        entrants.get(i).copied(),
                        entrants.get(BRACKET_ENTRANTS - 1 - i).copied(),
                    )
                } else {
                    Fixture::empty()
                };
                slots.push(BracketSlot {
                    ladder: Ladder::Winners,
                    round: r as u8 + 1,
                    index,
                    fixture,
                });
            }
        }
        for (r, &size) in LOSERS_ROUND_SIZES.iter().enumerate() {
            for index in 0..size {
                slots.push(BracketSlot {
                    ladder: Ladder::Losers,
                    round: r as u8 + 1,
                    index,
                    fixture: Fixture::empty(),
                });
            }
        }
        Self {
            side,
            entrants,
            slots,
        }
    }

    pub fn slot(&self, ladder: Ladder, key: SlotKey) -> Option<&BracketSlot> {
        self.slots
            .iter()
            .find(|s| s.ladder == ladder && s.key() == key)
    }

    pub fn slot_mut(&mut self, ladder: Ladder, key: SlotKey) -> Option<&mut BracketSlot> {
        self.slots
            .iter_mut()
            .find(|s| s.ladder == ladder && s.key() == key)
    }

    /// Winner of the Winners-ladder final.
    pub fn champion(&self) -> Option<TeamId> {
        let last = WINNERS_ROUND_SIZES.len() as u8;
        self.slot(Ladder::Winners, SlotKey::new(last, 0))
            .and_then(|s| s.fixture.winner)
    }

    /// Winner of the Losers-ladder grand final (2nd place of the bracket).
    pub fn runner_up(&self) -> Option<TeamId> {
        let last = LOSERS_ROUND_SIZES.len() as u8;
        self.slot(Ladder::Losers, SlotKey::new(last, 0))
            .and_then(|s| s.fixture.winner)
    }

    /// Teams knocked out: every loser of a Losers-ladder match.
    pub fn eliminated(&self) -> Vec<TeamId> {
        self.slots
            .iter()
            .filter(|s| s.ladder == Ladder::Losers)
            .filter_map(|s| s.fixture.loser)
            .collect()
    }

    /// Entrants not yet eliminated.
    pub fn remaining(&self) -> Vec<TeamId> {
        let out = self.eliminated();
        self.entrants
            .iter()
            .copied()
            .filter(|t| !out.contains(t))
            .collect()
    }
}
