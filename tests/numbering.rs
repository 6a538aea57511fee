//! Integration tests for the global match numbering.

mod common;

use common::{all_phases_generated, full_roster, seeded_brackets};
use field_tournament_web::logic::{next_free_match_number, phase_fixtures_mut, reset_match_numbers};
use field_tournament_web::models::{Ladder, Phase};
use field_tournament_web::{assign_all_match_numbers, generate_group_matches, Tournament};

fn numbers(t: &mut Tournament, phase: Phase) -> Vec<u32> {
    phase_fixtures_mut(t, phase)
        .into_iter()
        .map(|f| f.match_number.unwrap())
        .collect()
}

#[test]
fn phases_are_numbered_as_they_are_generated() {
    let mut t = full_roster();
    generate_group_matches(&mut t).unwrap();
    assert_eq!(numbers(&mut t, Phase::GroupStage), (1..=150).collect::<Vec<_>>());
    assert_eq!(next_free_match_number(&mut t), 151);

    let mut t = seeded_brackets();
    assert_eq!(numbers(&mut t, Phase::BracketA), (151..=179).collect::<Vec<_>>());
    assert_eq!(numbers(&mut t, Phase::BracketB), (180..=208).collect::<Vec<_>>());
}

#[test]
fn group_matches_go_round_by_round() {
    let mut t = full_roster();
    generate_group_matches(&mut t).unwrap();
    let mut rows: Vec<(u32, u8, u8)> = t
        .group_matches
        .iter()
        .map(|m| (m.fixture.match_number.unwrap(), m.round, m.group))
        .collect();
    rows.sort();
    for pair in rows.windows(2) {
        assert!((pair[0].1, pair[0].2) <= (pair[1].1, pair[1].2));
    }
    // Round 1 of group 1 opens the day.
    assert_eq!((rows[0].1, rows[0].2), (1, 1));
}

#[test]
fn bracket_numbers_run_winners_then_losers() {
    let t = seeded_brackets();
    let bracket = t.bracket_a.as_ref().unwrap();
    let last_winners = bracket
        .slots
        .iter()
        .filter(|s| s.ladder == Ladder::Winners)
        .filter_map(|s| s.fixture.match_number)
        .max()
        .unwrap();
    let first_losers = bracket
        .slots
        .iter()
        .filter(|s| s.ladder == Ladder::Losers)
        .filter_map(|s| s.fixture.match_number)
        .min()
        .unwrap();
    assert_eq!(first_losers, last_winners + 1);
}

#[test]
fn full_run_is_gap_free_and_in_phase_order() {
    let mut t = all_phases_generated(1);
    let ranges = assign_all_match_numbers(&mut t);

    let counts: Vec<(Phase, usize)> = ranges.iter().map(|r| (r.phase, r.count)).collect();
    assert_eq!(
        counts,
        vec![
            (Phase::GroupStage, 150),
            (Phase::BracketA, 29),
            (Phase::BracketB, 29),
            (Phase::SuperFinals, 4),
            (Phase::FollowerQualification, 4),
            (Phase::FollowerCup, 16),
            (Phase::Placement, 4),
        ]
    );

    let mut expected = 1;
    for phase in Phase::ALL {
        for n in numbers(&mut t, phase) {
            assert_eq!(n, expected, "{phase}");
            expected += 1;
        }
    }
    assert_eq!(ranges.last().unwrap().last, Some(expected - 1));
}

#[test]
fn reset_and_reassign_reproduces_numbers() {
    let mut t = all_phases_generated(2);
    assign_all_match_numbers(&mut t);
    let first: Vec<Vec<u32>> = Phase::ALL.iter().map(|&p| numbers(&mut t, p)).collect();

    reset_match_numbers(&mut t);
    assert_eq!(next_free_match_number(&mut t), 1);
    assert!(phase_fixtures_mut(&mut t, Phase::SuperFinals)
        .iter()
        .all(|f| f.match_number.is_none()));

    assign_all_match_numbers(&mut t);
    let second: Vec<Vec<u32>> = Phase::ALL.iter().map(|&p| numbers(&mut t, p)).collect();
    assert_eq!(first, second);
}
