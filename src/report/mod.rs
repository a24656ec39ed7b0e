//! Plain-text and JSON rendering of standings and scenario searches.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::schedule::models::{Outcome, Schedule, StandingsTable};
use crate::sim::{ScenarioQuery, SearchReport};

/// `--format` choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub table: &'a StandingsTable,
}

/// A pending fixture and the result one scenario gives it
#[derive(Debug, Clone, Serialize)]
pub struct AssignedResult<'a> {
    pub match_number: i64,
    pub home_team: &'a str,
    pub away_team: &'a str,
    pub result: &'a Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary<'a> {
    pub results: Vec<AssignedResult<'a>>,
    pub table: &'a StandingsTable,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub team: &'a str,
    pub target_rank: usize,
    pub candidates_evaluated: u64,
    pub exhausted: bool,
    pub scenarios: Vec<ScenarioSummary<'a>>,
}

impl<'a> ScenarioReport<'a> {
    pub fn new(original: &'a Schedule, query: &'a ScenarioQuery, report: &'a SearchReport) -> Self {
        let scenarios = report
            .scenarios
            .iter()
            .map(|s| ScenarioSummary {
                results: s
                    .assigned_results(original)
                    .into_iter()
                    .map(|m| AssignedResult {
                        match_number: m.match_number,
                        home_team: &m.home_team,
                        away_team: &m.away_team,
                        result: &m.result,
                    })
                    .collect(),
                table: &s.table,
            })
            .collect();
        ScenarioReport {
            generated_at: Utc::now(),
            team: &query.team,
            target_rank: query.target_rank,
            candidates_evaluated: report.candidates_evaluated,
            exhausted: report.exhausted,
            scenarios,
        }
    }
}

fn describe(result: &Outcome) -> String {
    match result {
        Outcome::Decided(team) => format!("{} win", team),
        Outcome::Draw => "Draw".into(),
        Outcome::NoResult => "No Result".into(),
        Outcome::Pending => "to be played".into(),
    }
}

/// Fixed-width points table.
pub fn render_table(table: &StandingsTable) -> String {
    let width = table
        .rows
        .iter()
        .map(|r| r.team.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<width$}  {:>3} {:>3} {:>3} {:>3} {:>3} {:>4} {:>5}",
        "Pos", "Team", "P", "W", "L", "D", "NR", "Rem", "Pts",
        width = width
    );
    for (i, r) in table.rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<width$}  {:>3} {:>3} {:>3} {:>3} {:>3} {:>4} {:>5}",
            i + 1,
            r.team,
            r.matches_played,
            r.matches_won,
            r.matches_lost,
            r.matches_drawn,
            r.matches_with_no_result,
            r.remaining_matches,
            r.points,
            width = width
        );
    }
    out
}

pub fn render_scenarios(report: &ScenarioReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} scenario(s) with {} in the top {} ({} candidates evaluated{})",
        report.scenarios.len(),
        report.team,
        report.target_rank,
        report.candidates_evaluated,
        if report.exhausted { "" } else { ", stopped early" }
    );
    for (i, s) in report.scenarios.iter().enumerate() {
        let _ = writeln!(out, "\nScenario {}", i + 1);
        for r in &s.results {
            let _ = writeln!(
                out,
                "  #{:<4} {} vs {}: {}",
                r.match_number,
                r.home_team,
                r.away_team,
                describe(r.result)
            );
        }
        out.push('\n');
        out.push_str(&render_table(s.table));
    }
    out
}
