//! Per-tournament time configuration consumed by the scheduler.

use crate::models::tournament::TournamentError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Lunch break window `[start, end)`; no match may overlap it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LunchBreak {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Match duration, break, start time, optional lunch break.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub match_duration_minutes: u32,
    pub break_minutes: u32,
    pub start_time: NaiveTime,
    #[serde(default)]
    pub lunch_break: Option<LunchBreak>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            match_duration_minutes: 12,
            break_minutes: 3,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            lunch_break: None,
        }
    }
}

impl TournamentConfig {
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.match_duration_minutes == 0 {
            return Err(TournamentError::InvalidConfig(
                "match duration must be at least one minute".into(),
            ));
        }
        if let Some(lunch) = self.lunch_break {
            if lunch.start >= lunch.end {
                return Err(TournamentError::InvalidConfig(
                    "lunch break must end after it starts".into(),
                ));
            }
        }
        Ok(())
    }

    /// Duration plus break: how far the clock moves between timeslots.
    pub fn slot_minutes(&self) -> i64 {
        i64::from(self.match_duration_minutes) + i64::from(self.break_minutes)
    }
}
