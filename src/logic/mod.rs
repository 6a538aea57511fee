//! Tournament business logic: registration, group stage, brackets, finals, numbering, scheduling.

mod double_elim;
mod follower_cup;
mod forwarding;
mod group_stage;
mod numbering;
mod placement;
mod qualification;
mod ranking;
mod schedule;
mod setup;
mod super_finals;

pub use double_elim::{
    generate_double_elim, locate_bracket_match, record_bracket_result, reset_bracket_result,
    slot_state,
};
pub use follower_cup::{
    follower_pool, generate_follower_cup, generate_follower_quali, record_follower_cup_result,
    record_follower_quali_result, CUP_ENTRANTS, POOL_LIMIT,
};
pub use forwarding::{Forward, ForwardingTable, LOSERS_ADVANCE, WINNERS_ADVANCE, WINNERS_DROP};
pub use group_stage::{
    clear_group_result, generate_group_matches, record_group_result, round_robin_pairings,
    FIELD_COUNT,
};
pub use numbering::{
    assign_all_match_numbers, next_free_match_number, number_new_phase, phase_fixtures_mut,
    reset_match_numbers, PhaseRange,
};
pub use placement::{generate_placement_round, placement_teams, record_placement_result};
pub use qualification::{best_fourth_place, qualified_for_bracket, qualified_teams, DIRECT_PER_GROUP};
pub use ranking::{beaten_by, group_standings, ranked_real_teams, real_group_standings, recalculate_rankings};
pub use schedule::{
    avoid_lunch, bracket_start, reset_all_times, schedule_all, schedule_brackets,
    schedule_follower_cup, schedule_group_stage, schedule_placement, schedule_super_finals,
    PhaseTimes,
};
pub use setup::generate_ghost_teams;
pub use super_finals::{final_standings, generate_super_finals, record_super_finals_result};
