//! Global match numbering: one counter across every phase, in phase order.

use crate::models::{BracketSide, Fixture, Phase, SuperFinalsRole, Tournament};
use serde::Serialize;

/// Numbers handed to one phase.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PhaseRange {
    pub phase: Phase,
    pub first: Option<u32>,
    pub last: Option<u32>,
    pub count: usize,
}

fn bracket_fixtures(tournament: &mut Tournament, side: BracketSide) -> Vec<&mut Fixture> {
    let Some(bracket) = tournament.bracket_mut(side) else {
        return Vec::new();
    };
    let mut slots: Vec<_> = bracket.slots.iter_mut().collect();
    slots.sort_by_key(|s| (s.ladder, s.round, s.index));
    slots.into_iter().map(|s| &mut s.fixture).collect()
}

/// Fixtures of one phase in numbering order.
pub fn phase_fixtures_mut(tournament: &mut Tournament, phase: Phase) -> Vec<&mut Fixture> {
    match phase {
        Phase::GroupStage => {
            let mut matches: Vec<_> = tournament.group_matches.iter_mut().collect();
            matches.sort_by_key(|m| (m.round, m.group));
            matches.into_iter().map(|m| &mut m.fixture).collect()
        }
        Phase::BracketA => bracket_fixtures(tournament, BracketSide::A),
        Phase::BracketB => bracket_fixtures(tournament, BracketSide::B),
        Phase::SuperFinals => {
            let mut matches: Vec<_> = tournament.super_finals.iter_mut().flatten().collect();
            matches.sort_by_key(|m| SuperFinalsRole::ORDER.iter().position(|r| *r == m.role));
            matches.into_iter().map(|m| &mut m.fixture).collect()
        }
        Phase::FollowerQualification => tournament
            .follower_quali
            .iter_mut()
            .flatten()
            .map(|m| &mut m.fixture)
            .collect(),
        Phase::FollowerCup => {
            let mut matches: Vec<_> = tournament.follower_cup.iter_mut().flatten().collect();
            matches.sort_by_key(|m| (m.round, m.index));
            matches.into_iter().map(|m| &mut m.fixture).collect()
        }
        Phase::Placement => {
            let mut matches: Vec<_> = tournament.placement.iter_mut().flatten().collect();
            matches.sort_by_key(|m| m.placement);
            matches.into_iter().map(|m| &mut m.fixture).collect()
        }
    }
}

/// Every fixture of the tournament, in numbering order.
pub fn all_fixtures_mut(tournament: &mut Tournament) -> Vec<&mut Fixture> {
    let Tournament {
        group_matches,
        bracket_a,
        bracket_b,
        super_finals,
        follower_quali,
        follower_cup,
        placement,
        ..
    } = tournament;
    group_matches
        .iter_mut()
        .map(|m| &mut m.fixture)
        .chain(bracket_a.iter_mut().flat_map(|b| b.slots.iter_mut().map(|s| &mut s.fixture)))
        .chain(bracket_b.iter_mut().flat_map(|b| b.slots.iter_mut().map(|s| &mut s.fixture)))
        .chain(super_finals.iter_mut().flatten().map(|m| &mut m.fixture))
        .chain(follower_quali.iter_mut().flatten().map(|m| &mut m.fixture))
        .chain(follower_cup.iter_mut().flatten().map(|m| &mut m.fixture))
        .chain(placement.iter_mut().flatten().map(|m| &mut m.fixture))
        .collect()
}

/// Clear every match number.
pub fn reset_match_numbers(tournament: &mut Tournament) {
    for f in all_fixtures_mut(tournament) {
        f.match_number = None;
    }
}

/// Highest number assigned so far, plus one.
pub fn next_free_match_number(tournament: &mut Tournament) -> u32 {
    all_fixtures_mut(tournament)
        .into_iter()
        .filter_map(|f| f.match_number)
        .max()
        .map_or(1, |n| n + 1)
}

/// Number the unnumbered fixtures of `phase` starting at `next`.
fn assign_phase_numbers(tournament: &mut Tournament, phase: Phase, next: &mut u32) -> PhaseRange {
    let mut range = PhaseRange {
        phase,
        first: None,
        last: None,
        count: 0,
    };
    for f in phase_fixtures_mut(tournament, phase) {
        if f.match_number.is_some() {
            continue;
        }
        f.match_number = Some(*next);
        range.first.get_or_insert(*next);
        range.last = Some(*next);
        range.count += 1;
        *next += 1;
    }
    range
}

/// Number a freshly generated phase, resuming after the highest number in use.
pub fn number_new_phase(tournament: &mut Tournament, phase: Phase) -> PhaseRange {
    let mut next = next_free_match_number(tournament);
    let range = assign_phase_numbers(tournament, phase, &mut next);
    log::debug!("Numbered {}: {:?}..={:?}", phase, range.first, range.last);
    range
}

/// Renumber everything from 1 in phase order. Running it twice gives the
/// same numbers.
pub fn assign_all_match_numbers(tournament: &mut Tournament) -> Vec<PhaseRange> {
    reset_match_numbers(tournament);
    let mut next = 1;
    let ranges: Vec<PhaseRange> = Phase::ALL
        .iter()
        .map(|&phase| assign_phase_numbers(tournament, phase, &mut next))
        .collect();
    for r in ranges.iter().filter(|r| r.count > 0) {
        log::info!(
            "{}: matches {}-{} ({})",
            r.phase,
            r.first.unwrap_or_default(),
            r.last.unwrap_or_default(),
            r.count
        );
    }
    ranges
}
