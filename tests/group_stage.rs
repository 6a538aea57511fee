//! Integration tests for registration, ghost padding and the group stage.

mod common;

use common::{full_roster, played_group_stage};
use field_tournament_web::logic::{
    group_standings, recalculate_rankings, round_robin_pairings, FIELD_COUNT,
};
use field_tournament_web::models::{
    Phase, Reference, ResultProblem, Score, TeamId, MAX_SCORE, ROSTER_SIZE,
};
use field_tournament_web::{
    clear_group_result, generate_ghost_teams, generate_group_matches, record_group_result,
    Tournament, TournamentError,
};
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn round_robin_meets_every_pair_once() {
    for n in 2..=7 {
        let teams: Vec<TeamId> = (0..n).map(|_| Uuid::new_v4()).collect();
        let pairings = round_robin_pairings(&teams);
        assert_eq!(pairings.len(), n * (n - 1) / 2, "{n} teams");

        let pairs: HashSet<(TeamId, TeamId)> = pairings
            .iter()
            .map(|&(_, a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        assert_eq!(pairs.len(), pairings.len());

        let rounds = pairings.iter().map(|p| p.0).max().unwrap();
        let expected = if n % 2 == 0 { n - 1 } else { n };
        assert_eq!(rounds as usize, expected);
    }
}

#[test]
fn nobody_plays_twice_in_one_round() {
    let teams: Vec<TeamId> = (0..6).map(|_| Uuid::new_v4()).collect();
    let pairings = round_robin_pairings(&teams);
    for round in 1..=5 {
        let mut seen = HashSet::new();
        for &(_, a, b) in pairings.iter().filter(|p| p.0 == round) {
            assert!(seen.insert(a));
            assert!(seen.insert(b));
        }
        assert_eq!(seen.len(), 6);
    }
}

#[test]
fn full_roster_generates_fifteen_matches_per_group() {
    let mut t = full_roster();
    generate_group_matches(&mut t).unwrap();
    assert_eq!(t.group_matches.len(), 150);
    for group in 1..=10 {
        assert_eq!(t.group_matches.iter().filter(|m| m.group == group).count(), 15);
    }
    for m in &t.group_matches {
        let court = m.fixture.court.unwrap();
        assert!((1..=FIELD_COUNT).contains(&court));
        assert!(m.fixture.match_number.is_some());
        assert!(m.fixture.time.is_some());
    }
}

#[test]
fn group_stage_is_generated_once() {
    let mut t = full_roster();
    generate_group_matches(&mut t).unwrap();
    assert_eq!(
        generate_group_matches(&mut t),
        Err(TournamentError::AlreadyGenerated(Phase::GroupStage))
    );
}

#[test]
fn empty_roster_is_not_ready() {
    let mut t = Tournament::new("Empty");
    assert!(matches!(
        generate_group_matches(&mut t),
        Err(TournamentError::NotReady { phase: Phase::GroupStage, .. })
    ));
}

#[test]
fn registration_rules() {
    let mut t = Tournament::new("Rules");
    t.add_team("Rovers", 1).unwrap();
    assert_eq!(t.add_team("rovers", 2), Err(TournamentError::DuplicateTeamName));
    assert_eq!(t.add_team("   ", 2), Err(TournamentError::InvalidTeamName));
    assert_eq!(t.add_team("Elf", 11), Err(TournamentError::InvalidGroup(11)));
    for i in 0..5 {
        t.add_team(format!("Team {i}"), 1).unwrap();
    }
    assert_eq!(t.add_team("Seventh", 1), Err(TournamentError::GroupFull { group: 1 }));

    let id = t.add_team("Mover", 2).unwrap();
    t.edit_team(id, "Moved", 3).unwrap();
    assert_eq!(t.team(id).unwrap().group, 3);
    assert_eq!(t.ranking(id).unwrap().group, 3);

    t.remove_team(id).unwrap();
    assert!(t.team(id).is_none());
    assert!(t.ranking(id).is_none());
}

#[test]
fn roster_is_frozen_after_generation() {
    let mut t = full_roster();
    let id = t.teams[0].id;
    generate_group_matches(&mut t).unwrap();
    let frozen = Err(TournamentError::AlreadyGenerated(Phase::GroupStage));
    assert_eq!(t.add_team("Late", 1).map(|_| ()), frozen);
    assert_eq!(t.edit_team(id, "Renamed", 1), frozen);
    assert_eq!(t.remove_team(id), frozen);
}

#[test]
fn ghosts_fill_every_group_to_six() {
    let mut t = Tournament::new("Ghosts");
    t.add_team("Alpha", 1).unwrap();
    t.add_team("Beta", 1).unwrap();
    t.add_team("Gamma", 4).unwrap();

    let created = generate_ghost_teams(&mut t).unwrap();
    assert_eq!(created, ROSTER_SIZE - 3);
    assert_eq!(t.teams.len(), ROSTER_SIZE);
    for group in 1..=10 {
        assert_eq!(t.group_teams(group).len(), 6);
    }
    let names: HashSet<String> = t.teams.iter().map(|x| x.name.to_lowercase()).collect();
    assert_eq!(names.len(), ROSTER_SIZE);
    assert_eq!(generate_ghost_teams(&mut t), Err(TournamentError::RosterFull));
}

#[test]
fn ghost_fixtures_are_fixed_losses() {
    let mut t = Tournament::new("Ghosts");
    for i in 0..4 {
        t.add_team(format!("Real {i}"), 1).unwrap();
    }
    generate_ghost_teams(&mut t).unwrap();
    generate_group_matches(&mut t).unwrap();

    let ghost_matches: Vec<_> = t
        .group_matches
        .iter()
        .filter(|m| m.group == 1 && m.fixed)
        .collect();
    // 4 real x 2 ghosts plus the ghost pair
    assert_eq!(ghost_matches.len(), 9);
    for m in &ghost_matches {
        let (Some(a), Some(b)) = (m.fixture.team_1, m.fixture.team_2) else {
            panic!("ghost fixture without entrants");
        };
        match (t.is_ghost(a), t.is_ghost(b)) {
            (true, _) => assert_eq!(m.fixture.score, Some(Score::new(0, MAX_SCORE))),
            (false, true) => assert_eq!(m.fixture.score, Some(Score::new(MAX_SCORE, 0))),
            (false, false) => panic!("real pair marked fixed"),
        }
    }

    // The ghost pair is scored too: the first ghost loses 0-42.
    let pair = ghost_matches
        .iter()
        .find(|m| [m.fixture.team_1, m.fixture.team_2].iter().flatten().all(|id| t.is_ghost(*id)))
        .unwrap();
    assert_eq!(pair.fixture.score, Some(Score::new(0, MAX_SCORE)));
    assert_eq!(pair.fixture.winner, pair.fixture.team_2);

    let id = ghost_matches[0].fixture.id;
    assert_eq!(
        record_group_result(&mut t, id, Score::new(1, 1)),
        Err(TournamentError::InvalidResult(ResultProblem::GhostFixture))
    );
    assert_eq!(
        clear_group_result(&mut t, id),
        Err(TournamentError::InvalidResult(ResultProblem::GhostFixture))
    );

    // Ghosts end up at the bottom of their group.
    let standings = group_standings(&t, 1);
    assert!(standings[..4].iter().all(|r| !r.ghost));
    assert!(standings[4..].iter().all(|r| r.ghost));
}

#[test]
fn results_validate_and_update_standings() {
    let mut t = full_roster();
    generate_group_matches(&mut t).unwrap();
    let m = t.group_matches[0].fixture.clone();
    let (a, b) = (m.team_1.unwrap(), m.team_2.unwrap());

    assert_eq!(
        record_group_result(&mut t, m.id, Score::new(43, 0)),
        Err(TournamentError::InvalidResult(ResultProblem::OutOfRange(43)))
    );

    record_group_result(&mut t, m.id, Score::new(7, 7)).unwrap();
    assert_eq!(t.ranking(a).unwrap().points, 1);
    assert_eq!(t.ranking(b).unwrap().draws, 1);

    record_group_result(&mut t, m.id, Score::new(9, 4)).unwrap();
    let row = t.ranking(a).unwrap();
    assert_eq!((row.played, row.wins, row.points), (1, 1, 3));
    assert_eq!((row.goals_for, row.goals_against, row.goal_difference), (9, 4, 5));
    assert_eq!(t.ranking(b).unwrap().losses, 1);

    clear_group_result(&mut t, m.id).unwrap();
    assert_eq!(t.ranking(a).unwrap().played, 0);

    assert!(matches!(
        record_group_result(&mut t, Uuid::new_v4(), Score::new(1, 0)),
        Err(TournamentError::NotFound(Reference::Match(_)))
    ));
}

#[test]
fn ranking_recalculation_is_idempotent() {
    let mut t = played_group_stage();
    let before = t.rankings.clone();
    recalculate_rankings(&mut t);
    assert_eq!(t.rankings, before);
    recalculate_rankings(&mut t);
    assert_eq!(t.rankings, before);
}

#[test]
fn standings_follow_points_then_goal_difference() {
    let t = played_group_stage();
    for group in 1..=10 {
        let rows = group_standings(&t, group);
        assert_eq!(rows.len(), 6);
        for pair in rows.windows(2) {
            assert!(pair[0].rank_key() >= pair[1].rank_key());
        }
        let names: Vec<&str> = rows
            .iter()
            .map(|r| t.team(r.team_id).unwrap().name.as_str())
            .collect();
        let expected: Vec<String> = (0..6).map(|i| format!("G{group}T{i}")).collect();
        assert_eq!(names, expected);
    }
}
