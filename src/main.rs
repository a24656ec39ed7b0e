use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use points_table_sim::config::Config;
use points_table_sim::report::{
    render_scenarios, render_table, OutputFormat, ScenarioReport, StandingsReport,
};
use points_table_sim::sim::outcome_space_size;
use points_table_sim::{compute_standings, search, Schedule};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let text = std::fs::read_to_string(&config.schedule)
        .with_context(|| format!("Failed to read schedule file {}", config.schedule))?;
    let schedule = Schedule::from_json_str(&text, &config.columns(), config.default_tie_outcome)
        .with_context(|| format!("Failed to load schedule from {}", config.schedule))?;
    let scoring = config.scoring();
    info!(
        "Schedule loaded: {} matches, {} decided ({:.1}% complete)",
        schedule.len(),
        schedule.decided_count(),
        schedule.completion_fraction() * 100.0
    );

    let output = match config.scenario_search() {
        None => {
            let table = compute_standings(&schedule, &scoring);
            match config.format {
                OutputFormat::Table => render_table(&table),
                OutputFormat::Json => serde_json::to_string_pretty(&StandingsReport {
                    generated_at: chrono::Utc::now(),
                    table: &table,
                })?,
            }
        }
        Some((query, options)) => {
            match outcome_space_size(&schedule) {
                Some(size) => info!(
                    "Searching up to {} outcome combinations for {} to finish in the top {}",
                    size, query.team, query.target_rank
                ),
                None => warn!("Outcome space is too large to count; consider --time-budget-secs"),
            }
            let found = search(&schedule, &scoring, &query, &options)
                .with_context(|| format!("Scenario search for '{}' failed", query.team))?;
            info!(
                "Found {} scenario(s) after {} candidates",
                found.scenarios.len(),
                found.candidates_evaluated
            );
            let report = ScenarioReport::new(&schedule, &query, &found);
            match config.format {
                OutputFormat::Table => render_scenarios(&report),
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
            }
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}
