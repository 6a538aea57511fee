//! Kickoff times for every phase, honoring the lunch break.

use crate::logic::numbering::all_fixtures_mut;
use crate::models::{
    BracketSide, CupRound, Fixture, Ladder, Phase, SuperFinalsRole, TournamentConfig, Tournament,
    TournamentError, LOSERS_ROUND_SIZES, WINNERS_ROUND_SIZES,
};
use chrono::{Duration, NaiveTime, Timelike};
use serde::Serialize;

/// Gap between the last group match and the brackets.
const BRACKET_GAP_MINUTES: i64 = 30;
/// Offset of the Losers ladder clock from the bracket start.
const LOSERS_OFFSET_MINUTES: i64 = 15;
/// Gap between the last bracket match and the super finals.
const SUPER_FINALS_GAP_MINUTES: i64 = 45;
/// Extra rest before the third-place match and the final of the super finals.
const THIRD_GAP_MINUTES: i64 = 30;
const FINAL_GAP_MINUTES: i64 = 15;
/// Rest after the follower cup qualification, semis and third-place match.
const CUP_REST_MINUTES: i64 = 20;
/// Secondary phases run this many matches per timeslot.
const MATCHES_PER_SLOT: usize = 4;
const DAY_SECONDS: i64 = 24 * 3600;

/// First and last kickoff of one phase.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PhaseTimes {
    pub phase: Phase,
    pub first: Option<NaiveTime>,
    pub last: Option<NaiveTime>,
}

/// Seconds since midnight of the tournament day. Unlike `NaiveTime` it keeps
/// counting past 24:00, so a day that runs too long is caught instead of
/// wrapping to the early morning.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
struct Clock(i64);

impl Clock {
    fn at(t: NaiveTime) -> Self {
        Clock(i64::from(t.num_seconds_from_midnight()))
    }

    fn plus(self, minutes: i64) -> Self {
        Clock(self.0 + minutes * 60)
    }

    fn time(self, phase: Phase) -> Result<NaiveTime, TournamentError> {
        u32::try_from(self.0)
            .ok()
            .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0))
            .ok_or(TournamentError::PastMidnight(phase))
    }
}

impl std::fmt::Display for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 3600, self.0 % 3600 / 60)
    }
}

/// Move `t` past the lunch break if a match starting at `t` would touch it.
pub fn avoid_lunch(config: &TournamentConfig, t: NaiveTime) -> NaiveTime {
    let Some(lunch) = config.lunch_break else {
        return t;
    };
    let duration = Duration::minutes(config.match_duration_minutes.into());
    let (end, wrapped) = t.overflowing_add_signed(duration);
    let overlaps_start = t < lunch.start && (wrapped != 0 || end > lunch.start);
    let during = lunch.start <= t && t < lunch.end;
    if overlaps_start || during {
        lunch.end
    } else {
        t
    }
}

/// Kickoff for a match due at `clock`, moved past the lunch break. The match
/// has to end by midnight.
fn kickoff(
    config: &TournamentConfig,
    clock: Clock,
    phase: Phase,
) -> Result<(NaiveTime, Clock), TournamentError> {
    let t = avoid_lunch(config, clock.time(phase)?);
    let at = Clock::at(t);
    if at.plus(config.match_duration_minutes.into()).0 > DAY_SECONDS {
        return Err(TournamentError::PastMidnight(phase));
    }
    Ok((t, at))
}

fn latest<'a>(fixtures: impl IntoIterator<Item = &'a Fixture>) -> Option<NaiveTime> {
    fixtures.into_iter().filter_map(|f| f.time).max()
}

/// Groups 1-5 share a timestamp per round, then groups 6-10 get the next one.
pub fn schedule_group_stage(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let config = tournament.config;
    let step = config.slot_minutes();
    let last_round = tournament.group_matches.iter().map(|m| m.round).max().unwrap_or(0);
    let mut clock = Clock::at(config.start_time);

    for round in 1..=last_round {
        for groups in [1..=5, 6..=10] {
            let mut half = tournament
                .group_matches
                .iter_mut()
                .filter(|m| m.round == round && groups.contains(&m.group))
                .peekable();
            if half.peek().is_none() {
                continue;
            }
            let (t, at) = kickoff(&config, clock, Phase::GroupStage)?;
            for m in half {
                m.fixture.time = Some(t);
            }
            clock = at.plus(step);
        }
    }
    log::debug!("Scheduled {} group matches", tournament.group_matches.len());
    Ok(())
}

fn bracket_clock(tournament: &Tournament) -> Clock {
    latest(tournament.group_matches.iter().map(|m| &m.fixture)).map_or(
        Clock::at(tournament.config.start_time),
        |t| Clock::at(t).plus(BRACKET_GAP_MINUTES),
    )
}

/// Latest group time plus 30 minutes, or the configured start.
pub fn bracket_start(tournament: &Tournament) -> Result<NaiveTime, TournamentError> {
    bracket_clock(tournament).time(Phase::BracketA)
}

/// Both brackets share the start on separate courts. Winners rounds run
/// one per timeslot; the Losers ladder keeps its own clock 15 minutes behind.
pub fn schedule_brackets(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let config = tournament.config;
    let step = config.slot_minutes();
    let start = bracket_clock(tournament);

    for side in [BracketSide::A, BracketSide::B] {
        let phase = side.phase();
        let Some(bracket) = tournament.bracket_mut(side) else {
            continue;
        };
        let ladders = [
            (Ladder::Winners, WINNERS_ROUND_SIZES.len(), start),
            (Ladder::Losers, LOSERS_ROUND_SIZES.len(), start.plus(LOSERS_OFFSET_MINUTES)),
        ];
        for (ladder, rounds, mut clock) in ladders {
            for round in 1..=rounds as u8 {
                let (t, at) = kickoff(&config, clock, phase)?;
                for slot in bracket
                    .slots
                    .iter_mut()
                    .filter(|s| s.ladder == ladder && s.round == round)
                {
                    slot.fixture.time = Some(t);
                }
                clock = at.plus(step);
            }
        }
    }
    log::debug!("Scheduled brackets from {}", start);
    Ok(())
}

/// Semis together 45 minutes after the last bracket match, then the
/// third-place match, then the final.
pub fn schedule_super_finals(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let config = tournament.config;
    let duration = i64::from(config.match_duration_minutes);
    let bracket_end = [BracketSide::A, BracketSide::B]
        .into_iter()
        .filter_map(|side| tournament.bracket(side))
        .filter_map(|b| latest(b.slots.iter().map(|s| &s.fixture)))
        .max();
    let start = bracket_end.map_or(Clock::at(config.start_time), |t| {
        Clock::at(t).plus(SUPER_FINALS_GAP_MINUTES)
    });

    let Some(matches) = tournament.super_finals.as_mut() else {
        return Ok(());
    };
    let phase = Phase::SuperFinals;
    let (semis, at) = kickoff(&config, start, phase)?;
    let (third, at) = kickoff(&config, at.plus(duration + THIRD_GAP_MINUTES), phase)?;
    let (fin, _) = kickoff(&config, at.plus(duration + FINAL_GAP_MINUTES), phase)?;
    for m in matches.iter_mut() {
        m.fixture.time = Some(match m.role {
            SuperFinalsRole::Hf1 | SuperFinalsRole::Hf2 => semis,
            SuperFinalsRole::Third => third,
            SuperFinalsRole::Final => fin,
        });
    }
    Ok(())
}

/// Give every chunk of four fixtures one timestamp. Returns the last one.
fn schedule_in_slots(
    config: &TournamentConfig,
    fixtures: Vec<&mut Fixture>,
    clock: &mut Clock,
    phase: Phase,
) -> Result<Option<Clock>, TournamentError> {
    let step = config.slot_minutes();
    let mut last = None;
    let mut fixtures = fixtures.into_iter().peekable();
    while fixtures.peek().is_some() {
        let (t, at) = kickoff(config, *clock, phase)?;
        for f in fixtures.by_ref().take(MATCHES_PER_SLOT) {
            f.time = Some(t);
        }
        last = Some(at);
        *clock = at.plus(step);
    }
    Ok(last)
}

/// Qualification four matches per slot from the bracket start, then the
/// cup round by round.
pub fn schedule_follower_cup(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let config = tournament.config;
    let duration = i64::from(config.match_duration_minutes);
    let step = config.slot_minutes();
    let rest = duration + CUP_REST_MINUTES;
    let mut clock = bracket_clock(tournament);

    let quali: Vec<&mut Fixture> = tournament
        .follower_quali
        .iter_mut()
        .flatten()
        .map(|m| &mut m.fixture)
        .collect();
    // The rest counts from the last qualification kickoff, so the cup waits
    // 20 minutes after that slot ends rather than 20 after it starts.
    if let Some(last) = schedule_in_slots(&config, quali, &mut clock, Phase::FollowerQualification)? {
        clock = last.plus(rest);
    }

    let Some(cup) = tournament.follower_cup.as_mut() else {
        return Ok(());
    };
    for round in CupRound::ORDER {
        let (t, at) = kickoff(&config, clock, Phase::FollowerCup)?;
        for m in cup.iter_mut().filter(|m| m.round == round) {
            m.fixture.time = Some(t);
        }
        clock = match round {
            CupRound::Semi | CupRound::Third => at.plus(rest),
            _ => at.plus(step),
        };
    }
    Ok(())
}

/// Four matches per slot, one slot after the follower cup ends.
pub fn schedule_placement(tournament: &mut Tournament) -> Result<(), TournamentError> {
    let config = tournament.config;
    let cup_end = latest(
        tournament
            .follower_quali
            .iter()
            .flatten()
            .map(|m| &m.fixture)
            .chain(tournament.follower_cup.iter().flatten().map(|m| &m.fixture)),
    );
    let mut clock = cup_end.map_or_else(
        || bracket_clock(tournament),
        |t| Clock::at(t).plus(config.slot_minutes()),
    );
    let fixtures: Vec<&mut Fixture> = tournament
        .placement
        .iter_mut()
        .flatten()
        .map(|m| &mut m.fixture)
        .collect();
    schedule_in_slots(&config, fixtures, &mut clock, Phase::Placement)?;
    Ok(())
}

/// Clear every kickoff time.
pub fn reset_all_times(tournament: &mut Tournament) {
    for f in all_fixtures_mut(tournament) {
        f.time = None;
    }
}

fn phase_times(tournament: &Tournament, phase: Phase) -> PhaseTimes {
    let fixtures: Vec<&Fixture> = match phase {
        Phase::GroupStage => tournament.group_matches.iter().map(|m| &m.fixture).collect(),
        Phase::BracketA | Phase::BracketB => {
            let side = if phase == Phase::BracketA { BracketSide::A } else { BracketSide::B };
            tournament
                .bracket(side)
                .map(|b| b.slots.iter().map(|s| &s.fixture).collect())
                .unwrap_or_default()
        }
        Phase::SuperFinals => tournament.super_finals.iter().flatten().map(|m| &m.fixture).collect(),
        Phase::FollowerQualification => tournament.follower_quali.iter().flatten().map(|m| &m.fixture).collect(),
        Phase::FollowerCup => tournament.follower_cup.iter().flatten().map(|m| &m.fixture).collect(),
        Phase::Placement => tournament.placement.iter().flatten().map(|m| &m.fixture).collect(),
    };
    PhaseTimes {
        phase,
        first: fixtures.iter().filter_map(|f| f.time).min(),
        last: latest(fixtures),
    }
}

/// Recompute every time from scratch, phase by phase, and report the span
/// of each phase that has matches. On error the tournament keeps its old times.
pub fn schedule_all(tournament: &mut Tournament) -> Result<Vec<PhaseTimes>, TournamentError> {
    let mut draft = tournament.clone();
    reset_all_times(&mut draft);
    schedule_group_stage(&mut draft)?;
    schedule_brackets(&mut draft)?;
    schedule_super_finals(&mut draft)?;
    schedule_follower_cup(&mut draft)?;
    schedule_placement(&mut draft)?;
    *tournament = draft;

    let summary: Vec<PhaseTimes> = Phase::ALL
        .iter()
        .map(|&phase| phase_times(tournament, phase))
        .filter(|p| p.first.is_some())
        .collect();
    for p in &summary {
        if let (Some(first), Some(last)) = (p.first, p.last) {
            log::info!("{}: {} - {}", p.phase, first.format("%H:%M"), last.format("%H:%M"));
        }
    }
    Ok(summary)
}
