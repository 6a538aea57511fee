//! Follower cup: a qualification round and a 16-team single-elimination cup
//! for the best teams that missed both brackets.

use crate::logic::group_stage::FIELD_COUNT;
use crate::logic::numbering::number_new_phase;
use crate::logic::ranking::ranked_real_teams;
use crate::logic::schedule::schedule_follower_cup;
use crate::models::{
    BracketSide, CupRound, Fixture, FollowerCupMatch, FollowerQualiMatch, MatchId, Phase,
    Reference, Score, TeamId, TeamSlot, Tournament, TournamentError,
};

/// Teams in the cup ladder.
pub const CUP_ENTRANTS: usize = 16;

/// Most teams the follower pool takes; the rest go to the placement round.
pub const POOL_LIMIT: usize = 20;

/// Hand out courts 1..=15 in order.
pub(crate) fn cycle_courts<'a>(fixtures: impl Iterator<Item = &'a mut Fixture>) {
    let mut court = 1;
    for f in fixtures {
        f.court = Some(court);
        court = court % FIELD_COUNT + 1;
    }
}

/// Every bracket entrant, both sides.
pub(crate) fn bracket_entrants(tournament: &Tournament) -> Result<Vec<TeamId>, TournamentError> {
    let mut entrants = Vec::new();
    for side in [BracketSide::A, BracketSide::B] {
        let bracket = tournament
            .bracket(side)
            .ok_or_else(|| TournamentError::not_ready(side.phase(), "bracket has not been generated"))?;
        entrants.extend_from_slice(&bracket.entrants);
    }
    Ok(entrants)
}

/// Real teams in neither bracket, best first, capped at [`POOL_LIMIT`].
pub fn follower_pool(tournament: &Tournament) -> Result<Vec<TeamId>, TournamentError> {
    let entrants = bracket_entrants(tournament)?;
    let mut pool = ranked_real_teams(tournament, &entrants);
    pool.truncate(POOL_LIMIT);
    Ok(pool)
}

/// Freeze the pool and create its qualification matches: with P pool teams
/// the bottom 2(P-16) play best against worst, the rest go through directly.
pub fn generate_follower_quali(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.follower_quali.is_some() {
        return Err(TournamentError::AlreadyGenerated(Phase::FollowerQualification));
    }
    let pool = follower_pool(tournament)?;
    if pool.len() < CUP_ENTRANTS {
        return Err(TournamentError::not_ready(
            Phase::FollowerQualification,
            format!("only {} teams left for the follower cup", pool.len()),
        ));
    }

    let extra = pool.len() - CUP_ENTRANTS;
    let contenders = &pool[pool.len() - 2 * extra..];
    let mut matches: Vec<FollowerQualiMatch> = (0..extra)
        .map(|i| FollowerQualiMatch {
            fixture: Fixture::new(Some(contenders[i]), Some(contenders[contenders.len() - 1 - i])),
        })
        .collect();
    cycle_courts(matches.iter_mut().map(|m| &mut m.fixture));

    log::info!(
        "Follower pool of {} teams, {} qualification match(es)",
        pool.len(),
        matches.len()
    );
    tournament.follower_pool = pool;
    tournament.follower_quali = Some(matches);
    number_new_phase(tournament, Phase::FollowerQualification);
    if let Err(e) = schedule_follower_cup(tournament) {
        tournament.follower_pool.clear();
        tournament.follower_quali = None;
        return Err(e);
    }
    Ok(())
}

pub fn record_follower_quali_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<(), TournamentError> {
    let m = tournament
        .follower_quali
        .iter_mut()
        .flatten()
        .find(|m| m.fixture.id == match_id)
        .ok_or(TournamentError::NotFound(Reference::Match(match_id)))?;
    m.fixture.apply(score, false)
}

/// Seed the cup: direct entrants, then qualification winners; eighth-final
/// i meets entrant 15-i. Every qualification match must be decided.
pub fn generate_follower_cup(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.follower_cup.is_some() {
        return Err(TournamentError::AlreadyGenerated(Phase::FollowerCup));
    }
    let quali = tournament.follower_quali.as_ref().ok_or_else(|| {
        TournamentError::not_ready(Phase::FollowerQualification, "qualification has not been generated")
    })?;

    let mut winners = Vec::with_capacity(quali.len());
    for m in quali {
        let winner = m.fixture.winner.ok_or_else(|| {
            TournamentError::not_ready(Phase::FollowerQualification, "not every qualification match is decided")
        })?;
        winners.push(winner);
    }
    let contenders: Vec<TeamId> = quali
        .iter()
        .flat_map(|m| [m.fixture.team_1, m.fixture.team_2])
        .flatten()
        .collect();

    let mut entrants: Vec<TeamId> = tournament
        .follower_pool
        .iter()
        .copied()
        .filter(|t| !contenders.contains(t))
        .collect();
    entrants.extend(winners);
    if entrants.len() != CUP_ENTRANTS {
        return Err(TournamentError::not_ready(
            Phase::FollowerCup,
            format!("{} cup entrants instead of {}", entrants.len(), CUP_ENTRANTS),
        ));
    }

    let mut matches = Vec::new();
    for round in CupRound::ORDER {
        for index in 0..round.size() {
            let fixture = if round == CupRound::Eighth {
                let i = index as usize;
                Fixture::new(Some(entrants[i]), Some(entrants[CUP_ENTRANTS - 1 - i]))
            } else {
                Fixture::empty()
            };
            matches.push(FollowerCupMatch {
                round,
                index,
                fixture,
            });
        }
    }
    cycle_courts(matches.iter_mut().map(|m| &mut m.fixture));

    log::info!("Generated follower cup for {}", tournament.name);
    tournament.follower_cup = Some(matches);
    number_new_phase(tournament, Phase::FollowerCup);
    if let Err(e) = schedule_follower_cup(tournament) {
        tournament.follower_cup = None;
        return Err(e);
    }
    Ok(())
}

/// Successor of a cup match for its winner, as (round, index, slot).
fn next_cup_slot(round: CupRound, index: u8) -> Option<(CupRound, u8, TeamSlot)> {
    let slot = if index % 2 == 0 { TeamSlot::One } else { TeamSlot::Two };
    match round {
        CupRound::Eighth => Some((CupRound::Quarter, index / 2, slot)),
        CupRound::Quarter => Some((CupRound::Semi, index / 2, slot)),
        CupRound::Semi => Some((CupRound::Final, 0, slot)),
        CupRound::Third | CupRound::Final => None,
    }
}

/// Record a cup result and move the winner on; semi-final losers meet in
/// the third-place match.
pub fn record_follower_cup_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<(), TournamentError> {
    let matches = tournament
        .follower_cup
        .as_mut()
        .ok_or(TournamentError::NotFound(Reference::Match(match_id)))?;
    let m = matches
        .iter_mut()
        .find(|m| m.fixture.id == match_id)
        .ok_or(TournamentError::NotFound(Reference::Match(match_id)))?;
    if !m.fixture.is_ready() {
        return Err(TournamentError::not_ready(
            Phase::FollowerCup,
            format!("{:?} match {} is waiting for an entrant", m.round, m.index + 1),
        ));
    }
    m.fixture.apply(score, false)?;
    let (round, index) = (m.round, m.index);
    let (Some(winner), Some(loser)) = (m.fixture.winner, m.fixture.loser) else {
        return Ok(());
    };

    let Some((next_round, next_index, slot)) = next_cup_slot(round, index) else {
        return Ok(());
    };
    for m in matches.iter_mut() {
        if m.round == next_round && m.index == next_index {
            m.fixture.set_team(slot, winner);
        } else if round == CupRound::Semi && m.round == CupRound::Third {
            m.fixture.set_team(slot, loser);
        }
    }
    Ok(())
}
