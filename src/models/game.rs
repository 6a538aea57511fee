//! Fixture (one match row of any phase), Score, TeamSlot, and group-stage matches.

use crate::models::team::TeamId;
use crate::models::tournament::{ResultProblem, TournamentError};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Highest score a team can be credited with in one match.
pub const MAX_SCORE: u32 = 42;

/// Which of the two team fields of a fixture.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSlot {
    #[default]
    One,
    Two,
}

/// Submitted result: points scored by team 1 and team 2.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub team_1: u32,
    pub team_2: u32,
}

impl Score {
    pub fn new(team_1: u32, team_2: u32) -> Self {
        Self { team_1, team_2 }
    }

    /// Check range, and draws when the phase has to produce a winner.
    pub fn validate(&self, draws_allowed: bool) -> Result<(), TournamentError> {
        for s in [self.team_1, self.team_2] {
            if s > MAX_SCORE {
                return Err(TournamentError::InvalidResult(ResultProblem::OutOfRange(s)));
            }
        }
        if !draws_allowed && self.team_1 == self.team_2 {
            return Err(TournamentError::InvalidResult(ResultProblem::Draw));
        }
        Ok(())
    }

    /// Winning side, `None` on a draw.
    pub fn winner(&self) -> Option<TeamSlot> {
        use std::cmp::Ordering::*;
        match self.team_1.cmp(&self.team_2) {
            Greater => Some(TeamSlot::One),
            Less => Some(TeamSlot::Two),
            Equal => None,
        }
    }
}

/// One match row. Every phase embeds this, so numbering and scheduling
/// can treat all phases the same way.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: MatchId,
    pub team_1: Option<TeamId>,
    pub team_2: Option<TeamId>,
    /// None if not yet played.
    pub score: Option<Score>,
    pub winner: Option<TeamId>,
    pub loser: Option<TeamId>,
    /// Field or court the match is played on.
    pub court: Option<u32>,
    pub time: Option<NaiveTime>,
    /// Global match number, shared across all phases.
    pub match_number: Option<u32>,
}

impl Fixture {
    pub fn new(team_1: Option<TeamId>, team_2: Option<TeamId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_1,
            team_2,
            score: None,
            winner: None,
            loser: None,
            court: None,
            time: None,
            match_number: None,
        }
    }

    /// An empty fixture whose entrants arrive later by forwarding.
    pub fn empty() -> Self {
        Self::new(None, None)
    }

    pub fn team(&self, slot: TeamSlot) -> Option<TeamId> {
        match slot {
            TeamSlot::One => self.team_1,
            TeamSlot::Two => self.team_2,
        }
    }

    pub fn set_team(&mut self, slot: TeamSlot, team: TeamId) {
        match slot {
            TeamSlot::One => self.team_1 = Some(team),
            TeamSlot::Two => self.team_2 = Some(team),
        }
    }

    /// Both entrants are known.
    pub fn is_ready(&self) -> bool {
        self.team_1.is_some() && self.team_2.is_some()
    }

    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }

    /// Record a score and resolve winner/loser. Draws leave both unset.
    pub fn apply(&mut self, score: Score, draws_allowed: bool) -> Result<(), TournamentError> {
        score.validate(draws_allowed)?;
        let (Some(team_1), Some(team_2)) = (self.team_1, self.team_2) else {
            return Err(TournamentError::InvalidResult(ResultProblem::MissingEntrant));
        };
        self.score = Some(score);
        match score.winner() {
            Some(TeamSlot::One) => {
                self.winner = Some(team_1);
                self.loser = Some(team_2);
            }
            Some(TeamSlot::Two) => {
                self.winner = Some(team_2);
                self.loser = Some(team_1);
            }
            None => {
                self.winner = None;
                self.loser = None;
            }
        }
        Ok(())
    }

    /// Drop the result; entrants stay.
    pub fn clear_result(&mut self) {
        self.score = None;
        self.winner = None;
        self.loser = None;
    }
}

/// A round-robin match inside one group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupMatch {
    pub round: u8,
    pub group: u8,
    /// Score pre-filled against a ghost team; refuses edits.
    #[serde(default)]
    pub fixed: bool,
    #[serde(flatten)]
    pub fixture: Fixture,
}

impl GroupMatch {
    pub fn new(round: u8, group: u8, team_1: TeamId, team_2: TeamId) -> Self {
        Self {
            round,
            group,
            fixed: false,
            fixture: Fixture::new(Some(team_1), Some(team_2)),
        }
    }
}
