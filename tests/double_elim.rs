//! Integration tests for the double-elimination bracket state machine.

mod common;

use common::{next_open_slot, play_out_bracket, random_score, seeded_brackets};
use field_tournament_web::logic::{locate_bracket_match, slot_state};
use field_tournament_web::models::{
    BracketSide, Ladder, Phase, ResultProblem, Score, SlotKey, SlotState, TeamId, TeamSlot,
    LOSERS_ROUND_SIZES, WINNERS_ROUND_SIZES,
};
use field_tournament_web::{
    generate_double_elim, qualified_for_bracket, record_bracket_result, reset_bracket_result,
    Tournament, TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn slot_id(t: &Tournament, side: BracketSide, ladder: Ladder, round: u8, index: u8) -> uuid::Uuid {
    t.bracket(side)
        .unwrap()
        .slot(ladder, SlotKey::new(round, index))
        .unwrap()
        .fixture
        .id
}

fn team_in(t: &Tournament, side: BracketSide, ladder: Ladder, round: u8, index: u8, slot: TeamSlot) -> Option<TeamId> {
    t.bracket(side)
        .unwrap()
        .slot(ladder, SlotKey::new(round, index))
        .unwrap()
        .fixture
        .team(slot)
}

fn state_of(t: &Tournament, side: BracketSide, ladder: Ladder, round: u8, index: u8) -> SlotState {
    let bracket = t.bracket(side).unwrap();
    slot_state(bracket, bracket.slot(ladder, SlotKey::new(round, index)).unwrap())
}

#[test]
fn seeding_pairs_i_against_fifteen_minus_i() {
    let t = seeded_brackets();
    for side in [BracketSide::A, BracketSide::B] {
        let entrants = qualified_for_bracket(&t, side);
        let bracket = t.bracket(side).unwrap();
        assert_eq!(bracket.entrants, entrants);

        let winners: usize = WINNERS_ROUND_SIZES.iter().map(|&n| n as usize).sum();
        let losers: usize = LOSERS_ROUND_SIZES.iter().map(|&n| n as usize).sum();
        assert_eq!(bracket.slots.len(), winners + losers);

        for i in 0..8u8 {
            let f = &bracket.slot(Ladder::Winners, SlotKey::new(1, i)).unwrap().fixture;
            assert_eq!(f.team_1, Some(entrants[i as usize]));
            assert_eq!(f.team_2, Some(entrants[15 - i as usize]));
        }
        for s in bracket.slots.iter().filter(|s| s.round > 1 || s.ladder == Ladder::Losers) {
            assert!(s.fixture.team_1.is_none() && s.fixture.team_2.is_none());
        }
    }
}

#[test]
fn brackets_are_generated_once() {
    let mut t = seeded_brackets();
    assert_eq!(
        generate_double_elim(&mut t),
        Err(TournamentError::AlreadyGenerated(Phase::BracketA))
    );
}

#[test]
fn winners_result_forwards_winner_and_loser() {
    let mut t = seeded_brackets();
    let side = BracketSide::A;
    let top = team_in(&t, side, Ladder::Winners, 1, 1, TeamSlot::One).unwrap();
    let bottom = team_in(&t, side, Ladder::Winners, 1, 1, TeamSlot::Two).unwrap();
    assert_eq!(state_of(&t, side, Ladder::Winners, 1, 1), SlotState::Ready);

    let id = slot_id(&t, side, Ladder::Winners, 1, 1);
    record_bracket_result(&mut t, id, Score::new(3, 8)).unwrap();
    assert_eq!(team_in(&t, side, Ladder::Winners, 2, 0, TeamSlot::Two), Some(bottom));
    assert_eq!(team_in(&t, side, Ladder::Losers, 1, 0, TeamSlot::Two), Some(top));
    assert_eq!(state_of(&t, side, Ladder::Winners, 1, 1), SlotState::Terminal);
    assert_eq!(state_of(&t, side, Ladder::Winners, 2, 0), SlotState::Pending);

    // Re-recording overwrites the successors.
    record_bracket_result(&mut t, id, Score::new(8, 3)).unwrap();
    assert_eq!(team_in(&t, side, Ladder::Winners, 2, 0, TeamSlot::Two), Some(top));
    assert_eq!(team_in(&t, side, Ladder::Losers, 1, 0, TeamSlot::Two), Some(bottom));

    // Bracket B is untouched.
    assert!(team_in(&t, BracketSide::B, Ladder::Winners, 2, 0, TeamSlot::Two).is_none());
}

#[test]
fn invalid_results_are_refused() {
    let mut t = seeded_brackets();
    let side = BracketSide::B;
    let first = slot_id(&t, side, Ladder::Winners, 1, 0);
    assert_eq!(
        record_bracket_result(&mut t, first, Score::new(5, 5)),
        Err(TournamentError::InvalidResult(ResultProblem::Draw))
    );
    assert_eq!(
        record_bracket_result(&mut t, first, Score::new(50, 5)),
        Err(TournamentError::InvalidResult(ResultProblem::OutOfRange(50)))
    );
    let pending = slot_id(&t, side, Ladder::Winners, 2, 0);
    assert!(matches!(
        record_bracket_result(&mut t, pending, Score::new(2, 1)),
        Err(TournamentError::NotReady { phase: Phase::BracketB, .. })
    ));
    assert!(matches!(
        record_bracket_result(&mut t, uuid::Uuid::new_v4(), Score::new(2, 1)),
        Err(TournamentError::NotFound(_))
    ));
    assert_eq!(state_of(&t, side, Ladder::Winners, 1, 0), SlotState::Ready);
}

#[test]
fn reset_clears_only_that_slot() {
    let mut t = seeded_brackets();
    let side = BracketSide::A;
    let id = slot_id(&t, side, Ladder::Winners, 1, 0);
    record_bracket_result(&mut t, id, Score::new(10, 2)).unwrap();
    let winner = team_in(&t, side, Ladder::Winners, 1, 0, TeamSlot::One);

    reset_bracket_result(&mut t, id).unwrap();
    assert_eq!(state_of(&t, side, Ladder::Winners, 1, 0), SlotState::Ready);
    assert_eq!(team_in(&t, side, Ladder::Winners, 2, 0, TeamSlot::One), winner);
    assert_eq!(locate_bracket_match(&t, id), Some((side, Ladder::Winners, SlotKey::new(1, 0))));
}

#[test]
fn winners_final_loser_drops_into_losers_final() {
    let mut t = seeded_brackets();
    let mut rng = StdRng::seed_from_u64(7);
    play_out_bracket(&mut t, BracketSide::A, &mut rng);

    let bracket = t.bracket(BracketSide::A).unwrap();
    let final_slot = &bracket.slot(Ladder::Winners, SlotKey::new(4, 0)).unwrap().fixture;
    let losers_final = &bracket.slot(Ladder::Losers, SlotKey::new(6, 0)).unwrap().fixture;
    assert_eq!(losers_final.team_2, final_slot.loser);
    assert_eq!(bracket.champion(), final_slot.winner);
    assert_eq!(bracket.runner_up(), losers_final.winner);
    for s in &bracket.slots {
        assert_eq!(slot_state(bracket, s), SlotState::Terminal, "{:?} {:?}", s.ladder, s.key());
    }
}

#[test]
fn random_playthroughs_keep_the_bracket_consistent() {
    for seed in 0..25 {
        let mut t = seeded_brackets();
        let mut rng = StdRng::seed_from_u64(seed);

        for side in [BracketSide::A, BracketSide::B] {
            let mut remaining = t.bracket(side).unwrap().remaining().len();
            assert_eq!(remaining, 16);

            while let Some(id) = next_open_slot(&t, side) {
                record_bracket_result(&mut t, id, random_score(&mut rng)).unwrap();
                let bracket = t.bracket(side).unwrap();

                // No team waits in two open slots at once.
                let mut waiting: HashMap<TeamId, usize> = HashMap::new();
                for s in bracket.slots.iter().filter(|s| !s.fixture.is_played()) {
                    for team in [s.fixture.team_1, s.fixture.team_2].into_iter().flatten() {
                        *waiting.entry(team).or_default() += 1;
                    }
                }
                assert!(waiting.values().all(|&n| n == 1), "seed {seed}");

                let now = bracket.remaining().len();
                assert!(now <= remaining, "seed {seed}");
                remaining = now;
            }

            let bracket = t.bracket(side).unwrap();
            assert!(bracket.slots.iter().all(|s| s.fixture.is_played()), "seed {seed}");
            assert_eq!(bracket.eliminated().len(), 14);
            assert_eq!(remaining, 2);

            let champion = bracket.champion().unwrap();
            let runner_up = bracket.runner_up().unwrap();
            assert_ne!(champion, runner_up);
            let mut left = bracket.remaining();
            left.sort();
            let mut finalists = vec![champion, runner_up];
            finalists.sort();
            assert_eq!(left, finalists);
        }
    }
}
