//! Double-elimination bracket state machine for brackets A and B.

use crate::logic::forwarding::{ForwardingTable, LOSERS_ADVANCE, WINNERS_ADVANCE, WINNERS_DROP};
use crate::logic::numbering::number_new_phase;
use crate::logic::qualification::qualified_for_bracket;
use crate::logic::schedule::schedule_brackets;
use crate::models::{
    BracketSide, BracketSlot, DoubleElimBracket, Ladder, MatchId, Phase, Reference, Score, SlotKey,
    SlotState, TeamId, Tournament, TournamentError, BRACKET_ENTRANTS,
};

/// Seed both brackets from the current standings. Either both are created
/// or neither is.
pub fn generate_double_elim(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.bracket_a.is_some() || tournament.bracket_b.is_some() {
        return Err(TournamentError::AlreadyGenerated(Phase::BracketA));
    }
    if !tournament.group_stage_generated() {
        return Err(TournamentError::not_ready(
            Phase::GroupStage,
            "group stage has not been generated",
        ));
    }

    let mut seeded = Vec::with_capacity(2);
    for side in [BracketSide::A, BracketSide::B] {
        let entrants = qualified_for_bracket(tournament, side);
        if entrants.len() < BRACKET_ENTRANTS {
            return Err(TournamentError::not_ready(
                side.phase(),
                format!(
                    "only {} of {} entrants qualified",
                    entrants.len(),
                    BRACKET_ENTRANTS
                ),
            ));
        }
        seeded.push(DoubleElimBracket::seeded(side, entrants));
    }

    let mut seeded = seeded.into_iter();
    tournament.bracket_a = seeded.next();
    tournament.bracket_b = seeded.next();
    log::info!("Generated brackets A and B for {}", tournament.name);

    number_new_phase(tournament, Phase::BracketA);
    number_new_phase(tournament, Phase::BracketB);
    if let Err(e) = schedule_brackets(tournament) {
        tournament.bracket_a = None;
        tournament.bracket_b = None;
        return Err(e);
    }
    Ok(())
}

/// Where a match id lives: which bracket, ladder and slot.
pub fn locate_bracket_match(
    tournament: &Tournament,
    match_id: MatchId,
) -> Option<(BracketSide, Ladder, SlotKey)> {
    [BracketSide::A, BracketSide::B].into_iter().find_map(|side| {
        tournament.bracket(side).and_then(|b| {
            b.slots
                .iter()
                .find(|s| s.fixture.id == match_id)
                .map(|s| (side, s.ladder, s.key()))
        })
    })
}

fn forward(
    bracket: &mut DoubleElimBracket,
    table: ForwardingTable,
    from: SlotKey,
    ladder: Ladder,
    team: TeamId,
) {
    let Some(to) = table.get(from) else {
        return;
    };
    if let Some(next) = bracket.slot_mut(ladder, to.key()) {
        next.fixture.set_team(to.slot, team);
    } else {
        log::warn!("Forwarding target {:?} {:?} missing", ladder, to.key());
    }
}

/// Record (or re-record) a bracket result and forward winner and loser.
///
/// Re-recording overwrites the successor entrants but leaves results already
/// recorded further down untouched.
pub fn record_bracket_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<(), TournamentError> {
    let (side, ladder, key) = locate_bracket_match(tournament, match_id)
        .ok_or(TournamentError::NotFound(Reference::Match(match_id)))?;
    let bracket = tournament
        .bracket_mut(side)
        .ok_or(TournamentError::NotFound(Reference::Match(match_id)))?;
    let slot = bracket
        .slot_mut(ladder, key)
        .ok_or(TournamentError::NotFound(Reference::Match(match_id)))?;

    if !slot.fixture.is_ready() {
        return Err(TournamentError::not_ready(
            side.phase(),
            format!("{:?} round {} match {} is waiting for an entrant", ladder, key.round, key.index + 1),
        ));
    }
    slot.fixture.apply(score, false)?;
    let (Some(winner), Some(loser)) = (slot.fixture.winner, slot.fixture.loser) else {
        return Ok(());
    };

    match ladder {
        Ladder::Winners => {
            forward(bracket, WINNERS_ADVANCE, key, Ladder::Winners, winner);
            forward(bracket, WINNERS_DROP, key, Ladder::Losers, loser);
        }
        Ladder::Losers => {
            forward(bracket, LOSERS_ADVANCE, key, Ladder::Losers, winner);
            log::debug!("Team {} eliminated from {}", loser, side.phase());
        }
    }
    Ok(())
}

/// Clear one bracket result. Entrants forwarded earlier stay where they are.
pub fn reset_bracket_result(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    let (side, ladder, key) = locate_bracket_match(tournament, match_id)
        .ok_or(TournamentError::NotFound(Reference::Match(match_id)))?;
    if let Some(slot) = tournament
        .bracket_mut(side)
        .and_then(|b| b.slot_mut(ladder, key))
    {
        slot.fixture.clear_result();
    }
    Ok(())
}

fn forwarded(bracket: &DoubleElimBracket, table: ForwardingTable, from: SlotKey, ladder: Ladder, team: Option<TeamId>) -> bool {
    match (table.get(from), team) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(to), Some(team)) => bracket
            .slot(ladder, to.key())
            .is_some_and(|s| s.fixture.team(to.slot) == Some(team)),
    }
}

/// Lifecycle state of a slot, derived from its fixture and its successors.
pub fn slot_state(bracket: &DoubleElimBracket, slot: &BracketSlot) -> SlotState {
    let f = &slot.fixture;
    if !f.is_ready() {
        return SlotState::Pending;
    }
    if !f.is_played() {
        return SlotState::Ready;
    }
    let key = slot.key();
    let done = match slot.ladder {
        Ladder::Winners => {
            forwarded(bracket, WINNERS_ADVANCE, key, Ladder::Winners, f.winner)
                && forwarded(bracket, WINNERS_DROP, key, Ladder::Losers, f.loser)
        }
        Ladder::Losers => forwarded(bracket, LOSERS_ADVANCE, key, Ladder::Losers, f.winner),
    };
    if done {
        SlotState::Terminal
    } else {
        SlotState::Played
    }
}
