//! Data structures for the tournament: teams, standings, fixtures of every phase.

mod bracket;
mod config;
mod finals;
mod game;
mod team;
mod tournament;

pub use bracket::{
    BracketSide, BracketSlot, DoubleElimBracket, Ladder, SlotKey, SlotState, BRACKET_ENTRANTS,
    LOSERS_ROUND_SIZES, WINNERS_ROUND_SIZES,
};
pub use config::{LunchBreak, TournamentConfig};
pub use finals::{
    CupRound, FollowerCupMatch, FollowerQualiMatch, PlacementMatch, Placing, SuperFinalsMatch,
    SuperFinalsRole,
};
pub use game::{Fixture, GroupMatch, MatchId, Score, TeamSlot, MAX_SCORE};
pub use team::{RankingRow, Team, TeamId, GROUP_COUNT, GROUP_SIZE, ROSTER_SIZE};
pub use tournament::{
    Phase, Reference, ResultProblem, Tournament, TournamentError, TournamentId,
};
