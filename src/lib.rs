//! Tournament points tables and qualification scenarios.
//!
//! [`compute_standings`] derives the ranked table from a schedule snapshot.
//! [`find_qualifying_scenarios`] (or the configurable [`search`]) enumerates
//! results for the fixtures still to be played and returns the first ones
//! that put a team at or above a target position.

pub mod config;
pub mod report;
pub mod schedule;
pub mod sim;

pub use schedule::models::{
    Match, Outcome, QualificationScenario, Schedule, ScoringRule, StandingsRow, StandingsTable,
    TeamId, TieOutcome,
};
pub use schedule::ScheduleColumns;
pub use sim::{
    compute_standings, find_qualifying_scenarios, search, ScenarioQuery, SearchOptions,
    SearchReport, SimError,
};
