//! Ranking table: group standings rebuilt from the full result set.

use crate::models::{RankingRow, TeamId, Tournament};

/// Rebuild every ranking row from the roster and all recorded group results.
///
/// Rows are never patched incrementally; running this twice without new
/// results yields identical rows.
pub fn recalculate_rankings(tournament: &mut Tournament) {
    let mut rows: Vec<RankingRow> = tournament.teams.iter().map(RankingRow::for_team).collect();

    for m in &tournament.group_matches {
        let f = &m.fixture;
        let (Some(team_1), Some(team_2), Some(score)) = (f.team_1, f.team_2, f.score) else {
            continue;
        };
        if let Some(row) = rows.iter_mut().find(|r| r.team_id == team_1) {
            row.add_result(score.team_1, score.team_2);
        }
        if let Some(row) = rows.iter_mut().find(|r| r.team_id == team_2) {
            row.add_result(score.team_2, score.team_1);
        }
    }

    tournament.rankings = rows;
}

/// Sort rows best first (points, goal difference, goals for). Stable, so
/// equal rows keep registration order.
pub fn sort_rows(rows: &mut [&RankingRow]) {
    rows.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));
}

/// Standings of one group, best first. Ghost teams are listed (always last
/// in practice) so the table matches what was played.
pub fn group_standings(tournament: &Tournament, group: u8) -> Vec<&RankingRow> {
    let mut rows: Vec<&RankingRow> = tournament
        .rankings
        .iter()
        .filter(|r| r.group == group)
        .collect();
    sort_rows(&mut rows);
    rows
}

/// Number of real teams in the same group strictly ahead of `team`.
/// Zero means first place, three means fourth place.
pub fn beaten_by(tournament: &Tournament, team: TeamId) -> Option<usize> {
    let row = tournament.ranking(team)?;
    Some(
        tournament
            .rankings
            .iter()
            .filter(|r| r.group == row.group && !r.ghost && r.team_id != team)
            .filter(|r| r.beats(row))
            .count(),
    )
}

/// Real (non-ghost) rows of a group, best first.
pub fn real_group_standings(tournament: &Tournament, group: u8) -> Vec<&RankingRow> {
    group_standings(tournament, group)
        .into_iter()
        .filter(|r| !r.ghost)
        .collect()
}

/// Real teams across all groups, best first, skipping `exclude`.
pub fn ranked_real_teams(tournament: &Tournament, exclude: &[TeamId]) -> Vec<TeamId> {
    let mut rows: Vec<&RankingRow> = tournament
        .rankings
        .iter()
        .filter(|r| !r.ghost && !exclude.contains(&r.team_id))
        .collect();
    sort_rows(&mut rows);
    rows.into_iter().map(|r| r.team_id).collect()
}
