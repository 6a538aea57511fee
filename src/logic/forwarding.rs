//! Forwarding tables of the 16-entrant double-elimination chart.
//!
//! Each table maps a resolved slot (round, index) to the successor slot and
//! team field that receives a team. They are the literal bracket chart, not
//! a computed pairing.

use crate::models::{SlotKey, TeamSlot};

/// Destination of a forwarded team.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Forward {
    pub round: u8,
    pub index: u8,
    pub slot: TeamSlot,
}

impl Forward {
    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.round, self.index)
    }
}

/// Immutable lookup keyed by the source slot.
#[derive(Clone, Copy, Debug)]
pub struct ForwardingTable(&'static [(SlotKey, Forward)]);

impl ForwardingTable {
    pub fn get(&self, key: SlotKey) -> Option<Forward> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, f)| *f)
    }

    pub fn entries(&self) -> &'static [(SlotKey, Forward)] {
        self.0
    }
}

const fn fwd(from: (u8, u8), to: (u8, u8), slot: TeamSlot) -> (SlotKey, Forward) {
    (
        SlotKey::new(from.0, from.1),
        Forward {
            round: to.0,
            index: to.1,
            slot,
        },
    )
}

use TeamSlot::{One, Two};

/// Winners ladder winner -> next Winners slot.
pub const WINNERS_ADVANCE: ForwardingTable = ForwardingTable(&[
    fwd((1, 0), (2, 0), One),
    fwd((1, 1), (2, 0), Two),
    fwd((1, 2), (2, 1), One),
    fwd((1, 3), (2, 1), Two),
    fwd((1, 4), (2, 2), One),
    fwd((1, 5), (2, 2), Two),
    fwd((1, 6), (2, 3), One),
    fwd((1, 7), (2, 3), Two),
    fwd((2, 0), (3, 0), One),
    fwd((2, 1), (3, 0), Two),
    fwd((2, 2), (3, 1), One),
    fwd((2, 3), (3, 1), Two),
    fwd((3, 0), (4, 0), One),
    fwd((3, 1), (4, 0), Two),
]);

/// Winners ladder loser -> Losers slot (drop-down). The Winners final loser
/// enters the Losers grand final as its second entrant.
pub const WINNERS_DROP: ForwardingTable = ForwardingTable(&[
    fwd((1, 0), (1, 0), One),
    fwd((1, 1), (1, 0), Two),
    fwd((1, 2), (1, 1), One),
    fwd((1, 3), (1, 1), Two),
    fwd((1, 4), (1, 2), One),
    fwd((1, 5), (1, 2), Two),
    fwd((1, 6), (1, 3), One),
    fwd((1, 7), (1, 3), Two),
    fwd((2, 0), (2, 0), Two),
    fwd((2, 1), (2, 1), Two),
    fwd((2, 2), (2, 2), Two),
    fwd((2, 3), (2, 3), Two),
    fwd((3, 0), (4, 0), Two),
    fwd((3, 1), (4, 1), Two),
    fwd((4, 0), (6, 0), Two),
]);

/// Losers ladder winner -> next Losers slot. Losers-ladder losers are out.
pub const LOSERS_ADVANCE: ForwardingTable = ForwardingTable(&[
    fwd((1, 0), (2, 0), One),
    fwd((1, 1), (2, 1), One),
    fwd((1, 2), (2, 2), One),
    fwd((1, 3), (2, 3), One),
    fwd((2, 0), (3, 0), One),
    fwd((2, 1), (3, 0), Two),
    fwd((2, 2), (3, 1), One),
    fwd((2, 3), (3, 1), Two),
    fwd((3, 0), (4, 0), One),
    fwd((3, 1), (4, 1), One),
    fwd((4, 0), (5, 0), One),
    fwd((4, 1), (5, 0), Two),
    fwd((5, 0), (6, 0), One),
]);
