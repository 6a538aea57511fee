//! Qualification resolver: group standings -> ranked bracket entrants.

use crate::logic::ranking::{beaten_by, real_group_standings, sort_rows};
use crate::models::{BracketSide, RankingRow, TeamId, Tournament, BRACKET_ENTRANTS};

/// Places per group that qualify directly.
pub const DIRECT_PER_GROUP: usize = 3;

/// The best fourth-placed team over a group range: among real teams beaten by
/// exactly three real same-group peers, the best by points, goal difference,
/// goals for.
pub fn best_fourth_place(tournament: &Tournament, lo: u8, hi: u8) -> Option<TeamId> {
    let mut fourths: Vec<&RankingRow> = tournament
        .rankings
        .iter()
        .filter(|r| !r.ghost && (lo..=hi).contains(&r.group))
        .filter(|r| beaten_by(tournament, r.team_id) == Some(DIRECT_PER_GROUP))
        .collect();
    sort_rows(&mut fourths);
    fourths.first().map(|r| r.team_id)
}

/// Ordered entrants for a bracket fed by groups `lo..=hi`: the top three real
/// teams of each group in group order, then the best fourth place. At most
/// 16 teams; fewer means the bracket cannot be generated.
pub fn qualified_teams(tournament: &Tournament, lo: u8, hi: u8) -> Vec<TeamId> {
    let mut qualified: Vec<TeamId> = Vec::with_capacity(BRACKET_ENTRANTS);
    for group in lo..=hi {
        qualified.extend(
            real_group_standings(tournament, group)
                .iter()
                .take(DIRECT_PER_GROUP)
                .map(|r| r.team_id),
        );
    }
    if let Some(fourth) = best_fourth_place(tournament, lo, hi) {
        qualified.push(fourth);
    }
    qualified.truncate(BRACKET_ENTRANTS);
    qualified
}

/// Entrants of bracket A or B.
pub fn qualified_for_bracket(tournament: &Tournament, side: BracketSide) -> Vec<TeamId> {
    let (lo, hi) = side.groups();
    qualified_teams(tournament, lo, hi)
}
