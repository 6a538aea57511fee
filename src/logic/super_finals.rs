//! Super finals: cross-seeded semi-finals between the two brackets' finalists.

use crate::logic::numbering::number_new_phase;
use crate::logic::schedule::schedule_super_finals;
use crate::models::{
    BracketSide, Fixture, Phase, Placing, Score, SuperFinalsMatch, SuperFinalsRole, TeamId,
    TeamSlot, Tournament, TournamentError,
};

fn finalists(tournament: &Tournament, side: BracketSide) -> Result<(TeamId, TeamId), TournamentError> {
    let bracket = tournament
        .bracket(side)
        .ok_or_else(|| TournamentError::not_ready(side.phase(), "bracket has not been generated"))?;
    let champion = bracket
        .champion()
        .ok_or_else(|| TournamentError::not_ready(side.phase(), "winners final has not been played"))?;
    let runner_up = bracket
        .runner_up()
        .ok_or_else(|| TournamentError::not_ready(side.phase(), "losers final has not been played"))?;
    Ok((champion, runner_up))
}

/// Create HF1 (A champion vs B runner-up), HF2 (B champion vs A runner-up)
/// and the empty third-place match and final.
pub fn generate_super_finals(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.super_finals.is_some() {
        return Err(TournamentError::AlreadyGenerated(Phase::SuperFinals));
    }
    let (a_champion, a_runner_up) = finalists(tournament, BracketSide::A)?;
    let (b_champion, b_runner_up) = finalists(tournament, BracketSide::B)?;

    let matches = SuperFinalsRole::ORDER
        .iter()
        .map(|&role| {
            let fixture = match role {
                SuperFinalsRole::Hf1 => Fixture::new(Some(a_champion), Some(b_runner_up)),
                SuperFinalsRole::Hf2 => Fixture::new(Some(b_champion), Some(a_runner_up)),
                SuperFinalsRole::Third | SuperFinalsRole::Final => Fixture::empty(),
            };
            SuperFinalsMatch { role, fixture }
        })
        .collect();
    tournament.super_finals = Some(matches);
    log::info!("Generated super finals for {}", tournament.name);

    number_new_phase(tournament, Phase::SuperFinals);
    if let Err(e) = schedule_super_finals(tournament) {
        tournament.super_finals = None;
        return Err(e);
    }
    Ok(())
}

/// Record a super-finals result. Semi-final winners move to the final,
/// losers to the third-place match (HF1 into slot 1, HF2 into slot 2).
pub fn record_super_finals_result(
    tournament: &mut Tournament,
    role: SuperFinalsRole,
    score: Score,
) -> Result<(), TournamentError> {
    let matches = tournament
        .super_finals
        .as_mut()
        .ok_or_else(|| TournamentError::not_ready(Phase::SuperFinals, "super finals have not been generated"))?;
    let m = matches
        .iter_mut()
        .find(|m| m.role == role)
        .ok_or_else(|| TournamentError::not_ready(Phase::SuperFinals, format!("no {:?} match", role)))?;
    if !m.fixture.is_ready() {
        return Err(TournamentError::not_ready(
            Phase::SuperFinals,
            format!("{:?} is waiting for an entrant", role),
        ));
    }
    m.fixture.apply(score, false)?;
    let (Some(winner), Some(loser)) = (m.fixture.winner, m.fixture.loser) else {
        return Ok(());
    };

    let slot = match role {
        SuperFinalsRole::Hf1 => TeamSlot::One,
        SuperFinalsRole::Hf2 => TeamSlot::Two,
        SuperFinalsRole::Third | SuperFinalsRole::Final => return Ok(()),
    };
    for m in matches.iter_mut() {
        match m.role {
            SuperFinalsRole::Final => m.fixture.set_team(slot, winner),
            SuperFinalsRole::Third => m.fixture.set_team(slot, loser),
            _ => {}
        }
    }
    Ok(())
}

/// Places 1-4 decided so far: final winner and loser, third-place winner and loser.
pub fn final_standings(tournament: &Tournament) -> Vec<Placing> {
    let Some(matches) = &tournament.super_finals else {
        return Vec::new();
    };
    let fixture = |role: SuperFinalsRole| matches.iter().find(|m| m.role == role).map(|m| &m.fixture);

    let mut placings = Vec::new();
    for (role, place) in [(SuperFinalsRole::Final, 1), (SuperFinalsRole::Third, 3)] {
        let Some(f) = fixture(role) else {
            continue;
        };
        if let Some(team_id) = f.winner {
            placings.push(Placing { place, team_id });
        }
        if let Some(team_id) = f.loser {
            placings.push(Placing {
                place: place + 1,
                team_id,
            });
        }
    }
    placings
}
