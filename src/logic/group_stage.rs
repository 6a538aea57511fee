//! Group stage: round-robin fixture generation and result entry.

use crate::logic::numbering::number_new_phase;
use crate::logic::ranking::recalculate_rankings;
use crate::logic::schedule::schedule_group_stage;
use crate::models::{
    GroupMatch, MatchId, Phase, Reference, ResultProblem, Score, TeamId, Tournament,
    TournamentError, GROUP_COUNT, MAX_SCORE,
};

/// Fields are handed out round-robin over this many pitches.
pub const FIELD_COUNT: u32 = 15;

/// Round-robin pairings for one group via the circle method: the first
/// entrant stays put, the rest rotate one step per round. Odd groups get a
/// bye slot (`None`), whose pairings are skipped.
///
/// Returns `(round, team_1, team_2)` with rounds starting at 1.
pub fn round_robin_pairings(teams: &[TeamId]) -> Vec<(u8, TeamId, TeamId)> {
    if teams.len() < 2 {
        return Vec::new();
    }
    let mut slots: Vec<Option<TeamId>> = teams.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    let mut pairings = Vec::with_capacity(teams.len() * (teams.len() - 1) / 2);

    for round in 1..n as u8 {
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (slots[i], slots[n - 1 - i]) {
                pairings.push((round, a, b));
            }
        }
        // [first, last, second, ..., second to last]
        if let Some(last) = slots.pop() {
            slots.insert(1, last);
        }
    }
    pairings
}

/// Generate the round-robin schedule of every group (exactly once).
///
/// Matches against a ghost team are pre-filled as a 42-0 win for the real
/// team; matches between two ghosts stay unscored. Both kinds are fixed.
/// Afterwards the new matches are numbered and timed, and standings
/// recomputed.
pub fn generate_group_matches(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.group_stage_generated() {
        return Err(TournamentError::AlreadyGenerated(Phase::GroupStage));
    }

    let mut matches = Vec::new();
    let mut field = 1;
    for group in 1..=GROUP_COUNT {
        let ids: Vec<TeamId> = tournament.group_teams(group).iter().map(|t| t.id).collect();
        for (round, team_1, team_2) in round_robin_pairings(&ids) {
            let mut m = GroupMatch::new(round, group, team_1, team_2);
            m.fixture.court = Some(field);
            field = field % FIELD_COUNT + 1;

            // A ghost in the first slot takes the 0-42 loss, so a ghost pair
            // is fixed like any other ghost fixture.
            match (tournament.is_ghost(team_1), tournament.is_ghost(team_2)) {
                (false, false) => {}
                (ghost_1, _) => {
                    let score = if ghost_1 {
                        Score::new(0, MAX_SCORE)
                    } else {
                        Score::new(MAX_SCORE, 0)
                    };
                    m.fixture.apply(score, true)?;
                    m.fixed = true;
                }
            }
            matches.push(m);
        }
    }

    if matches.is_empty() {
        return Err(TournamentError::not_ready(
            Phase::GroupStage,
            "no group has at least two teams",
        ));
    }

    log::info!(
        "Generated {} group matches for {} teams",
        matches.len(),
        tournament.teams.len()
    );
    tournament.group_matches = matches;
    number_new_phase(tournament, Phase::GroupStage);
    if let Err(e) = schedule_group_stage(tournament) {
        tournament.group_matches.clear();
        return Err(e);
    }
    recalculate_rankings(tournament);
    Ok(())
}

fn group_match_mut(tournament: &mut Tournament, match_id: MatchId) -> Result<&mut GroupMatch, TournamentError> {
    tournament
        .group_matches
        .iter_mut()
        .find(|m| m.fixture.id == match_id)
        .ok_or(TournamentError::NotFound(Reference::Match(match_id)))
}

/// Record (or correct) a group result. Draws are allowed. Standings are
/// recomputed from scratch.
pub fn record_group_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<(), TournamentError> {
    let m = group_match_mut(tournament, match_id)?;
    if m.fixed {
        return Err(TournamentError::InvalidResult(ResultProblem::GhostFixture));
    }
    m.fixture.apply(score, true)?;
    recalculate_rankings(tournament);
    Ok(())
}

/// Remove a recorded group result. Standings are recomputed from scratch.
pub fn clear_group_result(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    let m = group_match_mut(tournament, match_id)?;
    if m.fixed {
        return Err(TournamentError::InvalidResult(ResultProblem::GhostFixture));
    }
    m.fixture.clear_result();
    recalculate_rankings(tournament);
    Ok(())
}
