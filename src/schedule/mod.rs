//! Schedule loading and validation.
//!
//! Input is a list of loosely-typed records (a JSON array of objects, one
//! object per fixture). Caller column names are resolved once through
//! [`ScheduleColumns`]; after that everything downstream works on the typed
//! [`Schedule`] and never looks at column names again.

pub mod models;

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::sim::SimError;
use models::*;

pub type Record = Map<String, Value>;

/// Which record fields hold the match number, teams, winner and tie policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleColumns {
    pub match_number: String,
    pub home: String,
    pub away: String,
    pub winner: String,
    /// Optional per-fixture tie policy (`never`, `draw`, `no_result`)
    pub tie_outcome: Option<String>,
}

impl Default for ScheduleColumns {
    fn default() -> Self {
        ScheduleColumns {
            match_number: "match_number".into(),
            home: "home".into(),
            away: "away".into(),
            winner: "winner".into(),
            tie_outcome: None,
        }
    }
}

impl ScheduleColumns {
    fn roles(&self) -> Vec<(&'static str, &str)> {
        let mut roles = vec![
            ("match number", self.match_number.as_str()),
            ("home team", self.home.as_str()),
            ("away team", self.away.as_str()),
            ("winning team", self.winner.as_str()),
        ];
        if let Some(tie) = &self.tie_outcome {
            roles.push(("tie outcome", tie.as_str()));
        }
        roles
    }

    /// Every configured column must be non-empty and present in at least
    /// one record.
    fn validate(&self, records: &[Record]) -> Result<(), SimError> {
        let present: HashSet<&str> = records
            .iter()
            .flat_map(|r| r.keys().map(String::as_str))
            .collect();
        for (role, column) in self.roles() {
            if column.trim().is_empty() {
                return Err(SimError::InvalidArgument(format!(
                    "{} column name must not be empty",
                    role
                )));
            }
            if !present.contains(column) {
                return Err(SimError::InvalidColumnNames {
                    role,
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Schedule {
    /// Build a validated schedule from raw records.
    ///
    /// `default_tie` applies to fixtures with no tie-outcome value (or to all
    /// of them when no tie column is configured).
    pub fn from_records(
        records: &[Record],
        columns: &ScheduleColumns,
        default_tie: TieOutcome,
    ) -> Result<Schedule, SimError> {
        if records.is_empty() {
            return Err(SimError::InvalidScheduleData(
                "schedule contains no matches".into(),
            ));
        }
        columns.validate(records)?;

        let mut seen = HashSet::new();
        let mut matches = Vec::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            let m = parse_match(row, record, columns, default_tie)?;
            if !seen.insert(m.match_number) {
                return Err(SimError::InvalidScheduleData(format!(
                    "duplicate match number {} at row {}",
                    m.match_number, row
                )));
            }
            matches.push(m);
        }

        let schedule = Schedule::new(matches);
        debug!(
            "Loaded schedule: {} matches, {} teams, {} pending",
            schedule.len(),
            schedule.teams().len(),
            schedule.len() - schedule.decided_count()
        );
        Ok(schedule)
    }

    /// Parse a JSON array of fixture objects.
    pub fn from_json_str(
        text: &str,
        columns: &ScheduleColumns,
        default_tie: TieOutcome,
    ) -> Result<Schedule, SimError> {
        let records: Vec<Record> = serde_json::from_str(text).map_err(|e| {
            SimError::InvalidScheduleData(format!("expected a JSON array of objects: {}", e))
        })?;
        Schedule::from_records(&records, columns, default_tie)
    }
}

fn parse_match(
    row: usize,
    record: &Record,
    columns: &ScheduleColumns,
    default_tie: TieOutcome,
) -> Result<Match, SimError> {
    let home_team = team_name(row, record, &columns.home)?;
    let away_team = team_name(row, record, &columns.away)?;
    if home_team == away_team {
        return Err(SimError::InvalidScheduleData(format!(
            "row {}: '{}' cannot play itself",
            row, home_team
        )));
    }

    let match_number = match record.get(&columns.match_number) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        SimError::InvalidScheduleData(format!(
            "row {}: '{}' must be an integer",
            row, columns.match_number
        ))
    })?;

    let result = match record.get(&columns.winner) {
        None | Some(Value::Null) => Outcome::Pending,
        Some(Value::String(s)) => Outcome::from(Some(s.clone())),
        Some(other) => {
            return Err(SimError::InvalidScheduleData(format!(
                "row {}: winner must be a string, got {}",
                row, other
            )))
        }
    };
    if let Outcome::Decided(winner) = &result {
        if *winner != home_team && *winner != away_team {
            return Err(SimError::InvalidScheduleData(format!(
                "row {}: winner '{}' did not play in {} vs {}",
                row, winner, home_team, away_team
            )));
        }
    }

    let tie_outcome = match columns.tie_outcome.as_ref().and_then(|c| record.get(c)) {
        None | Some(Value::Null) => default_tie,
        Some(Value::String(s)) => TieOutcome::parse(s).ok_or_else(|| {
            SimError::InvalidScheduleData(format!("row {}: unknown tie outcome '{}'", row, s))
        })?,
        Some(other) => {
            return Err(SimError::InvalidScheduleData(format!(
                "row {}: tie outcome must be a string, got {}",
                row, other
            )))
        }
    };

    Ok(Match {
        match_number,
        home_team,
        away_team,
        result,
        tie_outcome,
    })
}

fn team_name(row: usize, record: &Record, column: &str) -> Result<TeamId, SimError> {
    match record.get(column) {
        // Sentinel names would be indistinguishable from a draw or no-result winner
        Some(Value::String(s)) if matches!(s.trim(), DRAW | NO_RESULT) => {
            Err(SimError::InvalidScheduleData(format!(
                "row {}: '{}' is reserved and cannot be a team name",
                row,
                s.trim()
            )))
        }
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(SimError::InvalidScheduleData(format!(
            "row {}: '{}' must be a non-empty team name",
            row, column
        ))),
    }
}
