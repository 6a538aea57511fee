//! Tournament aggregate, phases, and TournamentError.

use crate::models::bracket::{BracketSide, DoubleElimBracket};
use crate::models::config::TournamentConfig;
use crate::models::finals::{FollowerCupMatch, FollowerQualiMatch, PlacementMatch, SuperFinalsMatch};
use crate::models::game::{GroupMatch, MatchId};
use crate::models::team::{RankingRow, Team, TeamId, GROUP_COUNT, GROUP_SIZE};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tournament phases, in match-numbering precedence.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    GroupStage,
    BracketA,
    BracketB,
    SuperFinals,
    FollowerQualification,
    FollowerCup,
    Placement,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::GroupStage,
        Phase::BracketA,
        Phase::BracketB,
        Phase::SuperFinals,
        Phase::FollowerQualification,
        Phase::FollowerCup,
        Phase::Placement,
    ];
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::GroupStage => "Group stage",
            Phase::BracketA => "Bracket A",
            Phase::BracketB => "Bracket B",
            Phase::SuperFinals => "Super finals",
            Phase::FollowerQualification => "Follower cup qualification",
            Phase::FollowerCup => "Follower cup",
            Phase::Placement => "Placement round",
        };
        f.write_str(name)
    }
}

/// Why a submitted result was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResultProblem {
    /// Equal scores where a winner is required.
    Draw,
    /// A score above the maximum.
    OutOfRange(u32),
    /// Ghost fixtures keep their fixed scoreline.
    GhostFixture,
    /// The fixture is missing an entrant.
    MissingEntrant,
}

/// What a `NotFound` refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reference {
    Team(TeamId),
    Match(MatchId),
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Score rejected (draw in elimination, out of range, ghost fixture).
    InvalidResult(ResultProblem),
    /// A prerequisite phase has not produced what this step needs.
    NotReady { phase: Phase, detail: String },
    /// Phases are generated exactly once.
    AlreadyGenerated(Phase),
    /// Team or match does not exist in this tournament.
    NotFound(Reference),
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    /// Team names must not be empty.
    InvalidTeamName,
    /// Group number outside 1..=10.
    InvalidGroup(u8),
    /// Group already holds the maximum number of teams.
    GroupFull { group: u8 },
    /// Roster already has the full number of teams.
    RosterFull,
    /// Time configuration rejected.
    InvalidConfig(String),
    /// Scheduling this phase would run past midnight.
    PastMidnight(Phase),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidResult(ResultProblem::Draw) => {
                write!(f, "Draws are not allowed in this phase")
            }
            TournamentError::InvalidResult(ResultProblem::OutOfRange(s)) => {
                write!(f, "Score {} is out of range (0-{})", s, crate::models::MAX_SCORE)
            }
            TournamentError::InvalidResult(ResultProblem::GhostFixture) => {
                write!(f, "Matches against ghost teams have a fixed result")
            }
            TournamentError::InvalidResult(ResultProblem::MissingEntrant) => {
                write!(f, "Match is missing an entrant")
            }
            TournamentError::NotReady { phase, detail } => write!(f, "{} not ready: {}", phase, detail),
            TournamentError::AlreadyGenerated(phase) => write!(f, "{} was already generated", phase),
            TournamentError::NotFound(Reference::Team(id)) => write!(f, "Team {} not found", id),
            TournamentError::NotFound(Reference::Match(id)) => write!(f, "Match {} not found", id),
            TournamentError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            TournamentError::InvalidTeamName => write!(f, "Team name must not be empty"),
            TournamentError::InvalidGroup(g) => write!(f, "Group {} does not exist (1-{})", g, GROUP_COUNT),
            TournamentError::GroupFull { group } => {
                write!(f, "Group {} is full (max. {} teams)", group, GROUP_SIZE)
            }
            TournamentError::RosterFull => write!(f, "Roster is already complete"),
            TournamentError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            TournamentError::PastMidnight(phase) => {
                write!(f, "{} would run past midnight; start earlier or shorten the slots", phase)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

impl TournamentError {
    pub(crate) fn not_ready(phase: Phase, detail: impl Into<String>) -> Self {
        TournamentError::NotReady {
            phase,
            detail: detail.into(),
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Full tournament state: roster, standings, and every phase's fixtures.
///
/// `None` on a phase means it has not been generated yet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub config: TournamentConfig,
    pub teams: Vec<Team>,
    pub rankings: Vec<RankingRow>,
    pub group_matches: Vec<GroupMatch>,
    pub bracket_a: Option<DoubleElimBracket>,
    pub bracket_b: Option<DoubleElimBracket>,
    pub super_finals: Option<Vec<SuperFinalsMatch>>,
    /// Follower cup pool, best first, frozen when its qualification is generated.
    #[serde(default)]
    pub follower_pool: Vec<TeamId>,
    pub follower_quali: Option<Vec<FollowerQualiMatch>>,
    pub follower_cup: Option<Vec<FollowerCupMatch>>,
    pub placement: Option<Vec<PlacementMatch>>,
}

impl Tournament {
    /// Create an empty tournament with default time configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, TournamentConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: TournamentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            config,
            teams: Vec::new(),
            rankings: Vec::new(),
            group_matches: Vec::new(),
            bracket_a: None,
            bracket_b: None,
            super_finals: None,
            follower_pool: Vec::new(),
            follower_quali: None,
            follower_cup: None,
            placement: None,
        }
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn ranking(&self, id: TeamId) -> Option<&RankingRow> {
        self.rankings.iter().find(|r| r.team_id == id)
    }

    pub fn is_ghost(&self, id: TeamId) -> bool {
        self.team(id).is_some_and(|t| t.ghost)
    }

    pub fn bracket(&self, side: BracketSide) -> Option<&DoubleElimBracket> {
        match side {
            BracketSide::A => self.bracket_a.as_ref(),
            BracketSide::B => self.bracket_b.as_ref(),
        }
    }

    pub fn bracket_mut(&mut self, side: BracketSide) -> Option<&mut DoubleElimBracket> {
        match side {
            BracketSide::A => self.bracket_a.as_mut(),
            BracketSide::B => self.bracket_b.as_mut(),
        }
    }

    pub fn group_stage_generated(&self) -> bool {
        !self.group_matches.is_empty()
    }

    fn ensure_roster_open(&self) -> Result<(), TournamentError> {
        if self.group_stage_generated() {
            return Err(TournamentError::AlreadyGenerated(Phase::GroupStage));
        }
        Ok(())
    }

    fn validate_team(&self, name: &str, group: u8, skip: Option<TeamId>) -> Result<(), TournamentError> {
        if name.is_empty() {
            return Err(TournamentError::InvalidTeamName);
        }
        if !(1..=GROUP_COUNT).contains(&group) {
            return Err(TournamentError::InvalidGroup(group));
        }
        let others = || self.teams.iter().filter(|t| Some(t.id) != skip);
        if others().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateTeamName);
        }
        if others().filter(|t| t.group == group).count() >= GROUP_SIZE {
            return Err(TournamentError::GroupFull { group });
        }
        Ok(())
    }

    /// Register a team (before the group stage is generated). Returns its id.
    pub fn add_team(&mut self, name: impl Into<String>, group: u8) -> Result<TeamId, TournamentError> {
        self.ensure_roster_open()?;
        let name = name.into();
        let name = name.trim();
        self.validate_team(name, group, None)?;
        let team = Team::new(name, group);
        let id = team.id;
        self.rankings.push(RankingRow::for_team(&team));
        self.teams.push(team);
        Ok(id)
    }

    /// Rename a team or move it to another group (before the group stage is generated).
    pub fn edit_team(&mut self, id: TeamId, name: impl Into<String>, group: u8) -> Result<(), TournamentError> {
        self.ensure_roster_open()?;
        let name = name.into();
        let name = name.trim();
        if self.team(id).is_none() {
            return Err(TournamentError::NotFound(Reference::Team(id)));
        }
        self.validate_team(name, group, Some(id))?;
        if let Some(team) = self.teams.iter_mut().find(|t| t.id == id) {
            team.name = name.to_string();
            team.group = group;
        }
        if let Some(row) = self.rankings.iter_mut().find(|r| r.team_id == id) {
            row.group = group;
        }
        Ok(())
    }

    /// Remove a team and its ranking row (before the group stage is generated).
    pub fn remove_team(&mut self, id: TeamId) -> Result<(), TournamentError> {
        self.ensure_roster_open()?;
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == id)
            .ok_or(TournamentError::NotFound(Reference::Team(id)))?;
        self.teams.remove(idx);
        self.rankings.retain(|r| r.team_id != id);
        Ok(())
    }

    /// Teams of one group in registration order.
    pub fn group_teams(&self, group: u8) -> Vec<&Team> {
        self.teams.iter().filter(|t| t.group == group).collect()
    }

    /// Update the time configuration. Existing kickoff times are kept until rescheduled.
    pub fn set_config(&mut self, config: TournamentConfig) -> Result<(), TournamentError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }
}
