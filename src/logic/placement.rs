//! Placement round: one match each for the teams outside both brackets and
//! the follower cup.

use crate::logic::follower_cup::{bracket_entrants, cycle_courts};
use crate::logic::numbering::number_new_phase;
use crate::logic::ranking::ranked_real_teams;
use crate::logic::schedule::schedule_placement;
use crate::models::{
    Fixture, MatchId, Phase, PlacementMatch, Reference, Score, TeamId, Tournament, TournamentError,
};

/// Teams left for the placement round, best first.
pub fn placement_teams(tournament: &Tournament) -> Result<Vec<TeamId>, TournamentError> {
    let mut taken = bracket_entrants(tournament)?;
    if tournament.follower_quali.is_none() {
        return Err(TournamentError::not_ready(
            Phase::FollowerQualification,
            "follower pool has not been drawn",
        ));
    }
    taken.extend_from_slice(&tournament.follower_pool);
    Ok(ranked_real_teams(tournament, &taken))
}

/// Pair best against worst. The winner of each match takes the label's place,
/// the loser the next one; an odd team out gets no match.
pub fn generate_placement_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.placement.is_some() {
        return Err(TournamentError::AlreadyGenerated(Phase::Placement));
    }
    let teams = placement_teams(tournament)?;
    let first_place = (bracket_entrants(tournament)?.len() + tournament.follower_pool.len() + 1) as u32;

    let n = teams.len();
    let mut matches: Vec<PlacementMatch> = (0..n / 2)
        .map(|i| PlacementMatch {
            placement: first_place + 2 * i as u32,
            fixture: Fixture::new(Some(teams[i]), Some(teams[n - 1 - i])),
        })
        .collect();
    cycle_courts(matches.iter_mut().map(|m| &mut m.fixture));

    if n % 2 == 1 {
        log::info!("Placement round: {} teams, one without a match", n);
    }
    log::info!("Generated {} placement match(es)", matches.len());
    tournament.placement = Some(matches);
    number_new_phase(tournament, Phase::Placement);
    if let Err(e) = schedule_placement(tournament) {
        tournament.placement = None;
        return Err(e);
    }
    Ok(())
}

pub fn record_placement_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<(), TournamentError> {
    let m = tournament
        .placement
        .iter_mut()
        .flatten()
        .find(|m| m.fixture.id == match_id)
        .ok_or(TournamentError::NotFound(Reference::Match(match_id)))?;
    m.fixture.apply(score, false)
}
