//! Setup phase: pad the roster with ghost teams so every group is full.

use crate::logic::ranking::recalculate_rankings;
use crate::models::{Phase, Team, Tournament, TournamentError, GROUP_COUNT, GROUP_SIZE, ROSTER_SIZE};

const GHOST_NAMES: [&str; 24] = [
    "Ghost Team Alpha",
    "Ghost Team Beta",
    "Ghost Team Gamma",
    "Ghost Team Delta",
    "Phantom Squad 1",
    "Phantom Squad 2",
    "Phantom Squad 3",
    "Phantom Squad 4",
    "Shadow Players",
    "Invisible Warriors",
    "Bye Team Red",
    "Bye Team Blue",
    "Bye Team Green",
    "Bye Team Yellow",
    "Placeholder United 1",
    "Placeholder United 2",
    "Specter Team 1",
    "Specter Team 2",
    "Wraith Squad",
    "Spirit Squad",
    "Phantom Force",
    "Shadow Brigade",
    "Invisible Legion",
    "Ghost Eleven",
];

fn ghost_name(tournament: &Tournament, next: &mut usize) -> String {
    loop {
        let candidate = match GHOST_NAMES.get(*next) {
            Some(name) => name.to_string(),
            None => format!("Ghost Team {}", *next + 1),
        };
        *next += 1;
        if !tournament
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(&candidate))
        {
            return candidate;
        }
    }
}

/// Fill groups 1..=10 up to six teams each with ghost teams, stopping at the
/// full roster size. Returns how many ghosts were created.
pub fn generate_ghost_teams(tournament: &mut Tournament) -> Result<usize, TournamentError> {
    if tournament.group_stage_generated() {
        return Err(TournamentError::AlreadyGenerated(Phase::GroupStage));
    }
    let missing = ROSTER_SIZE.saturating_sub(tournament.teams.len());
    if missing == 0 {
        return Err(TournamentError::RosterFull);
    }

    let mut next_name = 0;
    let mut created = 0;
    'groups: for group in 1..=GROUP_COUNT {
        let present = tournament.teams.iter().filter(|t| t.group == group).count();
        for _ in present..GROUP_SIZE {
            if created >= missing {
                break 'groups;
            }
            let name = ghost_name(tournament, &mut next_name);
            tournament.teams.push(Team::ghost(name, group));
            created += 1;
        }
    }

    recalculate_rankings(tournament);
    log::info!("Generated {} ghost team(s) for {}", created, tournament.name);
    Ok(created)
}
