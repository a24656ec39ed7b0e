//! Points table derivation.
//!
//! Rows are built in team discovery order and then stably sorted by points,
//! so teams level on points keep the order in which they first appear in the
//! schedule. That is a weak, documented tie-break; no sporting rule (net run
//! rate, head-to-head, goal difference) is applied.

use std::collections::HashMap;

use crate::schedule::models::{
    Outcome, Schedule, ScoringRule, StandingsRow, StandingsTable, TeamId,
};

/// How a single fixture ended, relative to its home/away slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResultKind {
    HomeWin,
    AwayWin,
    Draw,
    NoResult,
    /// Recorded winner is neither participant: both sides take a loss.
    Forfeit,
}

impl ResultKind {
    pub(crate) fn classify(outcome: &Outcome, home: &str, away: &str) -> Option<Self> {
        match outcome {
            Outcome::Pending => None,
            Outcome::Draw => Some(ResultKind::Draw),
            Outcome::NoResult => Some(ResultKind::NoResult),
            Outcome::Decided(w) if w == home => Some(ResultKind::HomeWin),
            Outcome::Decided(w) if w == away => Some(ResultKind::AwayWin),
            Outcome::Decided(_) => Some(ResultKind::Forfeit),
        }
    }

    /// Points this result is worth to the home and away side.
    pub(crate) fn points(self, scoring: &ScoringRule) -> (i64, i64) {
        match self {
            ResultKind::HomeWin => (scoring.points_for_win, 0),
            ResultKind::AwayWin => (0, scoring.points_for_win),
            ResultKind::Draw => (scoring.points_for_draw, scoring.points_for_draw),
            ResultKind::NoResult => (scoring.points_for_no_result, scoring.points_for_no_result),
            ResultKind::Forfeit => (0, 0),
        }
    }
}

/// Rows in discovery order plus a name → row lookup.
pub(crate) struct Tally {
    pub rows: Vec<StandingsRow>,
    pub index: HashMap<TeamId, usize>,
}

impl Tally {
    /// Tally every decided fixture; pending fixtures only count as remaining.
    pub(crate) fn from_schedule(schedule: &Schedule, scoring: &ScoringRule) -> Self {
        let teams = schedule.teams();
        let index: HashMap<TeamId, usize> = teams
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        let mut tally = Tally {
            rows: teams.into_iter().map(StandingsRow::new).collect(),
            index,
        };

        for m in &schedule.matches {
            let home = tally.index[&m.home_team];
            let away = tally.index[&m.away_team];
            tally.rows[home].remaining_matches += 1;
            tally.rows[away].remaining_matches += 1;
            if let Some(kind) = ResultKind::classify(&m.result, &m.home_team, &m.away_team) {
                tally.apply(home, away, kind, scoring);
            }
        }
        tally
    }

    /// Move one remaining fixture between `home` and `away` into the played columns.
    pub(crate) fn apply(&mut self, home: usize, away: usize, kind: ResultKind, scoring: &ScoringRule) {
        let (home_pts, away_pts) = kind.points(scoring);
        for (slot, pts) in [(home, home_pts), (away, away_pts)] {
            let row = &mut self.rows[slot];
            row.matches_played += 1;
            row.remaining_matches -= 1;
            row.points += pts;
        }
        match kind {
            ResultKind::HomeWin => {
                self.rows[home].matches_won += 1;
                self.rows[away].matches_lost += 1;
            }
            ResultKind::AwayWin => {
                self.rows[away].matches_won += 1;
                self.rows[home].matches_lost += 1;
            }
            ResultKind::Draw => {
                self.rows[home].matches_drawn += 1;
                self.rows[away].matches_drawn += 1;
            }
            ResultKind::NoResult => {
                self.rows[home].matches_with_no_result += 1;
                self.rows[away].matches_with_no_result += 1;
            }
            ResultKind::Forfeit => {
                self.rows[home].matches_lost += 1;
                self.rows[away].matches_lost += 1;
            }
        }
    }

    /// Exact inverse of [`Tally::apply`].
    pub(crate) fn revert(&mut self, home: usize, away: usize, kind: ResultKind, scoring: &ScoringRule) {
        let (home_pts, away_pts) = kind.points(scoring);
        for (slot, pts) in [(home, home_pts), (away, away_pts)] {
            let row = &mut self.rows[slot];
            row.matches_played -= 1;
            row.remaining_matches += 1;
            row.points -= pts;
        }
        match kind {
            ResultKind::HomeWin => {
                self.rows[home].matches_won -= 1;
                self.rows[away].matches_lost -= 1;
            }
            ResultKind::AwayWin => {
                self.rows[away].matches_won -= 1;
                self.rows[home].matches_lost -= 1;
            }
            ResultKind::Draw => {
                self.rows[home].matches_drawn -= 1;
                self.rows[away].matches_drawn -= 1;
            }
            ResultKind::NoResult => {
                self.rows[home].matches_with_no_result -= 1;
                self.rows[away].matches_with_no_result -= 1;
            }
            ResultKind::Forfeit => {
                self.rows[home].matches_lost -= 1;
                self.rows[away].matches_lost -= 1;
            }
        }
    }

    /// Snapshot the current rows as a ranked table.
    pub(crate) fn ranked(&self) -> StandingsTable {
        rank(self.rows.clone())
    }
}

/// Stable sort by descending points. `rows` must be in discovery order.
fn rank(mut rows: Vec<StandingsRow>) -> StandingsTable {
    rows.sort_by(|a, b| b.points.cmp(&a.points));
    StandingsTable { rows }
}

/// Derive the current points table from a schedule snapshot.
///
/// Pure and infallible: the schedule is assumed to have passed the loader's
/// validation already.
pub fn compute_standings(schedule: &Schedule, scoring: &ScoringRule) -> StandingsTable {
    Tally::from_schedule(schedule, scoring).ranked()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::models::{Match, TieOutcome};

    fn fixture(n: i64, home: &str, away: &str, winner: Option<&str>) -> Match {
        Match {
            match_number: n,
            home_team: home.into(),
            away_team: away.into(),
            result: Outcome::from(winner.map(str::to_string)),
            tie_outcome: TieOutcome::Never,
        }
    }

    fn three_match_schedule() -> Schedule {
        Schedule::new(vec![
            fixture(1, "A", "B", Some("A")),
            fixture(2, "B", "C", Some("C")),
            fixture(3, "C", "A", None),
        ])
    }

    fn win3() -> ScoringRule {
        ScoringRule::new(3).with_draw(1).with_no_result(1)
    }

    #[test]
    fn test_three_match_example() {
        let table = compute_standings(&three_match_schedule(), &win3());
        assert_eq!(table.len(), 3);

        let a = table.get("A").unwrap();
        assert_eq!((a.matches_played, a.matches_won, a.points, a.remaining_matches), (1, 1, 3, 1));
        let b = table.get("B").unwrap();
        assert_eq!(
            (b.matches_played, b.matches_won, b.matches_lost, b.points, b.remaining_matches),
            (2, 0, 2, 0, 0)
        );
        let c = table.get("C").unwrap();
        assert_eq!((c.matches_played, c.matches_won, c.points, c.remaining_matches), (1, 1, 3, 1));

        // A and C level on points: A was discovered first
        let order: Vec<&str> = table.rows.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
        assert_eq!(table.position("B"), Some(3));
    }

    #[test]
    fn test_draw_and_no_result_points() {
        let schedule = Schedule::new(vec![
            fixture(1, "A", "B", Some("Draw")),
            fixture(2, "B", "C", Some("No Result")),
            fixture(3, "C", "A", Some("A")),
        ]);
        let scoring = ScoringRule::new(2).with_draw(1).with_no_result(0);
        let table = compute_standings(&schedule, &scoring);

        let a = table.get("A").unwrap();
        assert_eq!((a.matches_drawn, a.matches_won, a.matches_lost, a.points), (1, 1, 0, 3));
        let b = table.get("B").unwrap();
        assert_eq!((b.matches_drawn, b.matches_with_no_result, b.matches_lost, b.points), (1, 1, 0, 1));
        let c = table.get("C").unwrap();
        assert_eq!((c.matches_with_no_result, c.matches_lost, c.points), (1, 1, 0));
    }

    #[test]
    fn test_row_invariants_hold() {
        let schedule = Schedule::new(vec![
            fixture(1, "A", "B", Some("A")),
            fixture(2, "B", "C", Some("Draw")),
            fixture(3, "C", "A", Some("No Result")),
            fixture(4, "A", "D", None),
            fixture(5, "D", "B", Some("D")),
        ]);
        let scoring = win3();
        let table = compute_standings(&schedule, &scoring);
        for row in &table.rows {
            assert_eq!(
                row.matches_played,
                row.matches_won + row.matches_lost + row.matches_drawn + row.matches_with_no_result
            );
            assert_eq!(
                row.points,
                row.matches_won as i64 * scoring.points_for_win
                    + row.matches_drawn as i64 * scoring.points_for_draw
                    + row.matches_with_no_result as i64 * scoring.points_for_no_result
            );
            let involved = schedule.matches.iter().filter(|m| m.involves(&row.team)).count() as u32;
            assert_eq!(row.matches_played + row.remaining_matches, involved);
        }
        let total_wins: u32 = table.rows.iter().map(|r| r.matches_won).sum();
        let sole_winners = schedule.matches.iter().filter(|m| m.result.winner().is_some()).count();
        assert_eq!(total_wins as usize, sole_winners);
    }

    #[test]
    fn test_compute_standings_is_idempotent() {
        let schedule = three_match_schedule();
        assert_eq!(
            compute_standings(&schedule, &win3()),
            compute_standings(&schedule, &win3())
        );
    }

    #[test]
    fn test_apply_then_revert_restores_rows() {
        let schedule = three_match_schedule();
        let scoring = win3();
        let mut tally = Tally::from_schedule(&schedule, &scoring);
        let before = tally.rows.clone();
        for kind in [ResultKind::HomeWin, ResultKind::AwayWin, ResultKind::Draw, ResultKind::NoResult] {
            tally.apply(2, 0, kind, &scoring);
            tally.revert(2, 0, kind, &scoring);
            assert_eq!(tally.rows, before);
        }
    }

    #[test]
    fn test_empty_schedule_gives_empty_table() {
        let table = compute_standings(&Schedule::default(), &win3());
        assert!(table.is_empty());
    }
}
