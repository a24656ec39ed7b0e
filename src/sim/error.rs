use thiserror::Error;

/// Every way a standings or scenario request can be refused.
///
/// All variants are terminal for the call that returns them; there is no
/// partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A configured column name does not exist in the schedule records.
    #[error("{role} column '{column}' is not found in the schedule")]
    InvalidColumnNames { role: &'static str, column: String },

    /// A record is missing mandatory data or carries an unusable value.
    #[error("invalid schedule data: {0}")]
    InvalidScheduleData(String),

    #[error("team '{0}' does not appear in the schedule")]
    TeamNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "tournament is {:.1}% complete, below the {:.1}% cutoff required to simulate",
        .completed * 100.0,
        .cutoff * 100.0
    )]
    TournamentCompletionBelowCutoff { completed: f64, cutoff: f64 },

    #[error("no remaining results put '{team}' in the top {rank}")]
    NoQualifyingScenarios { team: String, rank: usize },

    /// The search ran past its time budget before finishing.
    #[error("scenario search timed out after evaluating {evaluated} candidates")]
    SearchTimedOut { evaluated: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_message_uses_percentages() {
        let err = SimError::TournamentCompletionBelowCutoff {
            completed: 1.0 / 3.0,
            cutoff: 0.5,
        };
        assert_eq!(
            err.to_string(),
            "tournament is 33.3% complete, below the 50.0% cutoff required to simulate"
        );
    }

    #[test]
    fn test_column_message_names_role() {
        let err = SimError::InvalidColumnNames {
            role: "home team",
            column: "hosts".into(),
        };
        assert_eq!(err.to_string(), "home team column 'hosts' is not found in the schedule");
    }
}
