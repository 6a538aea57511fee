//! Shared fixtures: a full 60-team roster with a predictable group stage.
#![allow(dead_code)]

use field_tournament_web::logic::record_group_result;
use field_tournament_web::models::{BracketSide, MatchId, Score, TeamId, Tournament, GROUP_COUNT};
use field_tournament_web::{generate_double_elim, generate_group_matches, record_bracket_result};
use rand::Rng;

/// Ten groups of six real teams named `G{group}T{index}`.
pub fn full_roster() -> Tournament {
    let mut t = Tournament::new("Field Day");
    for group in 1..=GROUP_COUNT {
        for i in 0..6 {
            t.add_team(format!("G{group}T{i}"), group).unwrap();
        }
    }
    t
}

/// Position of a team inside its group, in registration order.
pub fn team_index(t: &Tournament, id: TeamId) -> usize {
    let team = t.team(id).unwrap();
    t.group_teams(team.group)
        .iter()
        .position(|x| x.id == id)
        .unwrap()
}

pub fn team_id(t: &Tournament, name: &str) -> TeamId {
    t.teams.iter().find(|x| x.name == name).unwrap().id
}

/// Play every open group match: the lower index wins (10 + group) to 10.
pub fn play_group_stage(t: &mut Tournament) {
    let open: Vec<_> = t
        .group_matches
        .iter()
        .filter(|m| !m.fixed)
        .map(|m| (m.fixture.id, m.group, m.fixture.team_1.unwrap(), m.fixture.team_2.unwrap()))
        .collect();
    for (id, group, a, b) in open {
        let win = 10 + u32::from(group);
        let score = if team_index(t, a) < team_index(t, b) {
            Score::new(win, 10)
        } else {
            Score::new(10, win)
        };
        record_group_result(t, id, score).unwrap();
    }
}

/// Full roster with a generated and fully played group stage.
pub fn played_group_stage() -> Tournament {
    let mut t = full_roster();
    generate_group_matches(&mut t).unwrap();
    play_group_stage(&mut t);
    t
}

/// Played group stage with both brackets seeded.
pub fn seeded_brackets() -> Tournament {
    let mut t = played_group_stage();
    generate_double_elim(&mut t).unwrap();
    t
}

pub fn random_score(rng: &mut impl Rng) -> Score {
    loop {
        let a = rng.gen_range(0..=42);
        let b = rng.gen_range(0..=42);
        if a != b {
            return Score::new(a, b);
        }
    }
}

/// First bracket match with both entrants and no result.
pub fn next_open_slot(t: &Tournament, side: BracketSide) -> Option<MatchId> {
    t.bracket(side)?
        .slots
        .iter()
        .find(|s| s.fixture.is_ready() && !s.fixture.is_played())
        .map(|s| s.fixture.id)
}

/// Play a bracket to the end with random results.
pub fn play_out_bracket(t: &mut Tournament, side: BracketSide, rng: &mut impl Rng) {
    while let Some(id) = next_open_slot(t, side) {
        record_bracket_result(t, id, random_score(rng)).unwrap();
    }
}

/// Every phase generated, brackets played out, follower qualification
/// decided (team 1 always wins). Cup and placement results stay open.
pub fn all_phases_generated(seed: u64) -> Tournament {
    use field_tournament_web::{
        generate_follower_cup, generate_follower_quali, generate_placement_round,
        generate_super_finals, record_follower_quali_result,
    };
    use rand::SeedableRng;

    let mut t = seeded_brackets();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    play_out_bracket(&mut t, BracketSide::A, &mut rng);
    play_out_bracket(&mut t, BracketSide::B, &mut rng);
    generate_super_finals(&mut t).unwrap();

    generate_follower_quali(&mut t).unwrap();
    let quali: Vec<MatchId> = t
        .follower_quali
        .iter()
        .flatten()
        .map(|m| m.fixture.id)
        .collect();
    for id in quali {
        record_follower_quali_result(&mut t, id, Score::new(12, 6)).unwrap();
    }
    generate_follower_cup(&mut t).unwrap();
    generate_placement_round(&mut t).unwrap();
    t
}
