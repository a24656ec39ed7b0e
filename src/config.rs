use clap::{Parser, Subcommand};
use std::time::Duration;

use crate::report::OutputFormat;
use crate::schedule::models::{ScoringRule, TieOutcome};
use crate::schedule::ScheduleColumns;
use crate::sim::scenarios::{DEFAULT_COMPLETION_CUTOFF, DEFAULT_MAX_SCENARIOS};
use crate::sim::{ScenarioQuery, SearchOptions};

/// Tournament points table and qualification scenario simulator
#[derive(Parser, Debug, Clone)]
#[command(name = "points-table-sim", version, about)]
pub struct Config {
    /// Schedule file: JSON array with one object per match
    #[arg(long, env = "SCHEDULE_PATH")]
    pub schedule: String,

    /// Points awarded for a win
    #[arg(long, env = "POINTS_FOR_WIN", default_value = "2")]
    pub points_for_win: i64,

    /// Points awarded to both sides for a draw
    #[arg(long, env = "POINTS_FOR_DRAW", default_value = "1")]
    pub points_for_draw: i64,

    /// Points awarded to both sides for a match with no result
    #[arg(long, env = "POINTS_FOR_NO_RESULT", default_value = "1")]
    pub points_for_no_result: i64,

    /// Field holding the match number
    #[arg(long, env = "MATCH_NUMBER_COLUMN", default_value = "match_number")]
    pub match_number_column: String,

    /// Field holding the home team
    #[arg(long, env = "HOME_COLUMN", default_value = "home")]
    pub home_column: String,

    /// Field holding the away team
    #[arg(long, env = "AWAY_COLUMN", default_value = "away")]
    pub away_column: String,

    /// Field holding the winner ("Draw", "No Result", or empty while pending)
    #[arg(long, env = "WINNER_COLUMN", default_value = "winner")]
    pub winner_column: String,

    /// Optional field holding each match's tie outcome (never, draw, no_result)
    #[arg(long, env = "TIE_COLUMN")]
    pub tie_column: Option<String>,

    /// Tie outcome for matches without a tie-column value
    #[arg(long, env = "DEFAULT_TIE_OUTCOME", default_value = "never", value_parser = parse_tie_outcome)]
    pub default_tie_outcome: TieOutcome,

    /// Output format
    #[arg(long, env = "OUTPUT_FORMAT", value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the current points table
    Standings,
    /// Find remaining results that put a team in the top N
    Scenarios {
        /// Team to qualify
        #[arg(long)]
        team: String,

        /// Table position the team must reach or beat
        #[arg(long)]
        top: usize,

        /// Stop after this many qualifying scenarios
        #[arg(long, env = "MAX_SCENARIOS", default_value_t = DEFAULT_MAX_SCENARIOS)]
        max_scenarios: usize,

        /// Minimum fraction of decided matches required to search (0.0–1.0)
        #[arg(long, env = "COMPLETION_CUTOFF", default_value_t = DEFAULT_COMPLETION_CUTOFF)]
        cutoff: f64,

        /// Evaluate every candidate instead of skipping hopeless branches
        #[arg(long)]
        no_prune: bool,

        /// Give up after this many seconds
        #[arg(long, env = "TIME_BUDGET_SECS")]
        time_budget_secs: Option<u64>,
    },
}

fn parse_tie_outcome(s: &str) -> Result<TieOutcome, String> {
    TieOutcome::parse(s).ok_or_else(|| format!("unknown tie outcome '{}': use never, draw or no-result", s))
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (flag, value) in [
            ("--match-number-column", &self.match_number_column),
            ("--home-column", &self.home_column),
            ("--away-column", &self.away_column),
            ("--winner-column", &self.winner_column),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be empty", flag);
            }
        }
        if matches!(&self.tie_column, Some(c) if c.trim().is_empty()) {
            anyhow::bail!("--tie-column must not be empty");
        }
        if let Command::Scenarios {
            top,
            max_scenarios,
            cutoff,
            ..
        } = &self.command
        {
            if *top == 0 {
                anyhow::bail!("--top must be at least 1");
            }
            if *max_scenarios == 0 {
                anyhow::bail!("--max-scenarios must be at least 1");
            }
            if !(0.0..=1.0).contains(cutoff) {
                anyhow::bail!("--cutoff must be between 0.0 and 1.0");
            }
        }
        Ok(())
    }

    pub fn columns(&self) -> ScheduleColumns {
        ScheduleColumns {
            match_number: self.match_number_column.clone(),
            home: self.home_column.clone(),
            away: self.away_column.clone(),
            winner: self.winner_column.clone(),
            tie_outcome: self.tie_column.clone(),
        }
    }

    pub fn scoring(&self) -> ScoringRule {
        ScoringRule::new(self.points_for_win)
            .with_draw(self.points_for_draw)
            .with_no_result(self.points_for_no_result)
    }

    /// Query and search options for the `scenarios` subcommand.
    pub fn scenario_search(&self) -> Option<(ScenarioQuery, SearchOptions)> {
        match &self.command {
            Command::Standings => None,
            Command::Scenarios {
                team,
                top,
                max_scenarios,
                cutoff,
                no_prune,
                time_budget_secs,
            } => Some((
                ScenarioQuery::new(team.clone(), *top),
                SearchOptions {
                    max_scenarios: *max_scenarios,
                    completion_cutoff: *cutoff,
                    prune: !*no_prune,
                    time_budget: time_budget_secs.map(Duration::from_secs),
                },
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["points-table-sim", "--schedule", "schedule.json"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["standings"]);
        assert_eq!(config.columns(), ScheduleColumns::default());
        assert_eq!(config.scoring(), ScoringRule::new(2));
        assert_eq!(config.default_tie_outcome, TieOutcome::Never);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.scenario_search().is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_scenarios_subcommand() {
        let config = parse(&[
            "--points-for-win",
            "3",
            "--default-tie-outcome",
            "draw",
            "scenarios",
            "--team",
            "Team A",
            "--top",
            "4",
            "--no-prune",
            "--time-budget-secs",
            "30",
        ]);
        config.validate().unwrap();
        assert_eq!(config.default_tie_outcome, TieOutcome::Draw);
        let (query, options) = config.scenario_search().unwrap();
        assert_eq!(query, ScenarioQuery::new("Team A", 4));
        assert_eq!(options.max_scenarios, DEFAULT_MAX_SCENARIOS);
        assert!(!options.prune);
        assert_eq!(options.time_budget, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = parse(&["scenarios", "--team", "A", "--top", "0"]);
        assert!(config.validate().is_err());
        let config = parse(&["scenarios", "--team", "A", "--top", "1", "--cutoff", "1.5"]);
        assert!(config.validate().is_err());
        let config = parse(&["--winner-column", " ", "standings"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_tie_outcome_fails_to_parse() {
        let argv = ["points-table-sim", "--schedule", "s.json", "--default-tie-outcome", "maybe", "standings"];
        assert!(Config::try_parse_from(argv).is_err());
    }
}
