//! Field tournament engine: 60 teams, group stage, two double-elimination
//! brackets, super finals, follower cup and placement round.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    assign_all_match_numbers, clear_group_result, final_standings, generate_double_elim,
    generate_follower_cup, generate_follower_quali, generate_ghost_teams, generate_group_matches,
    generate_placement_round, generate_super_finals, qualified_for_bracket, recalculate_rankings,
    record_bracket_result, record_follower_cup_result, record_follower_quali_result,
    record_group_result, record_placement_result, record_super_finals_result,
    reset_bracket_result, schedule_all,
};
pub use models::{
    BracketSide, MatchId, Score, SuperFinalsRole, Team, TeamId, Tournament, TournamentConfig,
    TournamentError, TournamentId,
};
pub use store::{StoreError, TournamentStore};
