use serde::{Deserialize, Serialize};

/// Team identifier as it appears in the schedule.
pub type TeamId = String;

/// Winner-column sentinel for a drawn match.
pub const DRAW: &str = "Draw";
/// Winner-column sentinel for an abandoned match.
pub const NO_RESULT: &str = "No Result";

/// Result of a single match.
///
/// Serialized as the winner-column value: a team name, `"Draw"`,
/// `"No Result"`, or `null` while the match is still to be played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Outcome {
    Decided(TeamId),
    Draw,
    NoResult,
    Pending,
}

impl Outcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }

    /// The sole winner, if the match produced one.
    pub fn winner(&self) -> Option<&str> {
        match self {
            Outcome::Decided(team) => Some(team),
            _ => None,
        }
    }
}

impl From<Option<String>> for Outcome {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            None | Some("") => Outcome::Pending,
            Some(DRAW) => Outcome::Draw,
            Some(NO_RESULT) => Outcome::NoResult,
            Some(team) => Outcome::Decided(team.to_string()),
        }
    }
}

impl From<Outcome> for Option<String> {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Decided(team) => Some(team),
            Outcome::Draw => Some(DRAW.to_string()),
            Outcome::NoResult => Some(NO_RESULT.to_string()),
            Outcome::Pending => None,
        }
    }
}

/// Which shared result, if any, a fixture can end in besides a win.
///
/// Some sports never draw; others record washed-out games as "No Result".
/// This decides whether a pending fixture has two or three branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieOutcome {
    #[default]
    Never,
    Draw,
    NoResult,
}

impl TieOutcome {
    /// The outcome a tie branch produces, if this fixture allows one.
    pub fn as_outcome(self) -> Option<Outcome> {
        match self {
            TieOutcome::Never => None,
            TieOutcome::Draw => Some(Outcome::Draw),
            TieOutcome::NoResult => Some(Outcome::NoResult),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "never" | "none" => Some(TieOutcome::Never),
            "draw" => Some(TieOutcome::Draw),
            "no_result" | "no result" | "no-result" => Some(TieOutcome::NoResult),
            _ => None,
        }
    }
}

/// A scheduled fixture and its (possibly pending) result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub match_number: i64,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub result: Outcome,
    #[serde(default)]
    pub tie_outcome: TieOutcome,
}

impl Match {
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// Outcomes this fixture can still end in, home win first.
    pub fn candidate_outcomes(&self) -> Vec<Outcome> {
        let mut out = vec![
            Outcome::Decided(self.home_team.clone()),
            Outcome::Decided(self.away_team.clone()),
        ];
        out.extend(self.tie_outcome.as_outcome());
        out
    }
}

/// Ordered list of every fixture in the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub matches: Vec<Match>,
}

impl Schedule {
    pub fn new(matches: Vec<Match>) -> Self {
        Schedule { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Distinct teams in discovery order: schedule order, home before away.
    pub fn teams(&self) -> Vec<TeamId> {
        let mut teams: Vec<TeamId> = Vec::new();
        for m in &self.matches {
            for team in [&m.home_team, &m.away_team] {
                if !teams.iter().any(|t| t == team) {
                    teams.push(team.clone());
                }
            }
        }
        teams
    }

    pub fn contains_team(&self, team: &str) -> bool {
        self.matches.iter().any(|m| m.involves(team))
    }

    /// Indices into `matches` of every pending fixture, by ascending match number.
    pub fn pending_indices(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.matches.len())
            .filter(|&i| self.matches[i].result.is_pending())
            .collect();
        idx.sort_by_key(|&i| self.matches[i].match_number);
        idx
    }

    pub fn decided_count(&self) -> usize {
        self.matches.iter().filter(|m| !m.result.is_pending()).count()
    }

    /// Fraction of fixtures with a recorded result (0.0 for an empty schedule).
    pub fn completion_fraction(&self) -> f64 {
        if self.matches.is_empty() {
            return 0.0;
        }
        self.decided_count() as f64 / self.matches.len() as f64
    }
}

/// Points awarded per result type. Fixed for the lifetime of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub points_for_win: i64,
    pub points_for_draw: i64,
    pub points_for_no_result: i64,
}

impl ScoringRule {
    /// Win value as given; draw and no-result default to one point each.
    pub fn new(points_for_win: i64) -> Self {
        ScoringRule {
            points_for_win,
            points_for_draw: 1,
            points_for_no_result: 1,
        }
    }

    pub fn with_draw(mut self, points: i64) -> Self {
        self.points_for_draw = points;
        self
    }

    pub fn with_no_result(mut self, points: i64) -> Self {
        self.points_for_no_result = points;
        self
    }
}

/// One team's line in the points table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: TeamId,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_drawn: u32,
    pub matches_with_no_result: u32,
    pub remaining_matches: u32,
    pub points: i64,
}

impl StandingsRow {
    pub fn new(team: TeamId) -> Self {
        StandingsRow {
            team,
            matches_played: 0,
            matches_won: 0,
            matches_lost: 0,
            matches_drawn: 0,
            matches_with_no_result: 0,
            remaining_matches: 0,
            points: 0,
        }
    }
}

/// Points table sorted by descending points; ties keep team discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsTable {
    pub rows: Vec<StandingsRow>,
}

impl StandingsTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, team: &str) -> Option<&StandingsRow> {
        self.rows.iter().find(|r| r.team == team)
    }

    /// 1-indexed table position of `team`.
    pub fn position(&self, team: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.team == team).map(|i| i + 1)
    }
}

/// A full assignment of the pending fixtures that lets the target team qualify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationScenario {
    /// Standings once every fixture is played
    pub table: StandingsTable,
    /// The schedule with every pending slot filled in
    pub schedule: Schedule,
}

impl QualificationScenario {
    /// Only the fixtures that were pending in `original`, with the results
    /// this scenario assigns them.
    pub fn assigned_results<'a>(&'a self, original: &'a Schedule) -> Vec<&'a Match> {
        self.schedule
            .matches
            .iter()
            .zip(&original.matches)
            .filter(|(_, before)| before.result.is_pending())
            .map(|(after, _)| after)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture(n: i64, home: &str, away: &str, winner: Option<&str>) -> Match {
        Match {
            match_number: n,
            home_team: home.into(),
            away_team: away.into(),
            result: Outcome::from(winner.map(str::to_string)),
            tie_outcome: TieOutcome::Never,
        }
    }

    #[test]
    fn test_outcome_from_winner_column() {
        assert_eq!(Outcome::from(None), Outcome::Pending);
        assert_eq!(Outcome::from(Some("".into())), Outcome::Pending);
        assert_eq!(Outcome::from(Some("Draw".into())), Outcome::Draw);
        assert_eq!(Outcome::from(Some("No Result".into())), Outcome::NoResult);
        assert_eq!(
            Outcome::from(Some("Team A".into())),
            Outcome::Decided("Team A".into())
        );
    }

    #[test]
    fn test_outcome_serializes_as_winner_string() {
        let json = serde_json::to_string(&Outcome::NoResult).unwrap();
        assert_eq!(json, "\"No Result\"");
        let json = serde_json::to_string(&Outcome::Pending).unwrap();
        assert_eq!(json, "null");
    }

    #[test]
    fn test_teams_in_discovery_order() {
        let s = Schedule::new(vec![
            fixture(1, "B", "C", None),
            fixture(2, "A", "B", None),
            fixture(3, "C", "D", None),
        ]);
        assert_eq!(s.teams(), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_pending_indices_sorted_by_match_number() {
        let s = Schedule::new(vec![
            fixture(5, "A", "B", None),
            fixture(1, "A", "C", Some("A")),
            fixture(3, "B", "C", None),
        ]);
        assert_eq!(s.pending_indices(), vec![2, 0]);
    }

    #[test]
    fn test_completion_fraction() {
        let s = Schedule::new(vec![
            fixture(1, "A", "B", Some("A")),
            fixture(2, "B", "C", Some("Draw")),
            fixture(3, "C", "A", None),
        ]);
        assert_eq!(s.decided_count(), 2);
        assert_relative_eq!(s.completion_fraction(), 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(Schedule::default().completion_fraction(), 0.0);
    }

    #[test]
    fn test_candidate_outcomes_home_first() {
        let mut m = fixture(1, "A", "B", None);
        assert_eq!(
            m.candidate_outcomes(),
            vec![Outcome::Decided("A".into()), Outcome::Decided("B".into())]
        );
        m.tie_outcome = TieOutcome::NoResult;
        assert_eq!(m.candidate_outcomes().last(), Some(&Outcome::NoResult));
    }

    #[test]
    fn test_tie_outcome_parse() {
        assert_eq!(TieOutcome::parse("Draw"), Some(TieOutcome::Draw));
        assert_eq!(TieOutcome::parse("no result"), Some(TieOutcome::NoResult));
        assert_eq!(TieOutcome::parse("none"), Some(TieOutcome::Never));
        assert_eq!(TieOutcome::parse("maybe"), None);
    }
}
