//! Qualification scenario search.
//!
//! The outcome space is the cartesian product of every pending fixture's
//! candidate results. Fixtures are taken in ascending match-number order with
//! the first one as the most significant digit, and each fixture tries home
//! win, away win, then its tie result (when it has one). The search walks
//! that product depth-first over a single working tally, applying a result on
//! the way down and reverting it on the way back, so every leaf sees the
//! baseline plus exactly the results on its path.
//!
//! Collection stops after `max_scenarios` hits: the result is the first N
//! qualifying assignments in iteration order, not a representative sample.
//!
//! With pruning enabled a partial assignment is dropped once enough rivals
//! are guaranteed to finish above the target team. Pruned subtrees contain no
//! qualifying leaf, so the returned scenarios and their order are identical
//! to the unpruned walk; only `candidates_evaluated` shrinks.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use super::error::SimError;
use super::standings::{ResultKind, Tally};
use crate::schedule::models::{Outcome, QualificationScenario, Schedule, ScoringRule};

/// Minimum share of decided fixtures before a search is allowed.
pub const DEFAULT_COMPLETION_CUTOFF: f64 = 0.5;
/// Qualifying scenarios collected before the search stops.
pub const DEFAULT_MAX_SCENARIOS: usize = 5;

/// Deadline is checked once per this many visited nodes.
const DEADLINE_CHECK_EVERY: u64 = 4096;

/// Who must finish where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioQuery {
    pub team: String,
    /// 1-indexed table position the team must reach or beat
    pub target_rank: usize,
}

impl ScenarioQuery {
    pub fn new(team: impl Into<String>, target_rank: usize) -> Self {
        ScenarioQuery {
            team: team.into(),
            target_rank,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub max_scenarios: usize,
    /// Fraction in `[0, 1]`; searches on schedules less complete than this are refused
    pub completion_cutoff: f64,
    pub prune: bool,
    /// Abort with [`SimError::SearchTimedOut`] once this much wall time is spent
    pub time_budget: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            max_scenarios: DEFAULT_MAX_SCENARIOS,
            completion_cutoff: DEFAULT_COMPLETION_CUTOFF,
            prune: true,
            time_budget: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub scenarios: Vec<QualificationScenario>,
    /// Complete assignments whose standings were checked
    pub candidates_evaluated: u64,
    /// False when collection stopped early at `max_scenarios`
    pub exhausted: bool,
}

/// Number of complete assignments of the pending fixtures, `None` on overflow.
pub fn outcome_space_size(schedule: &Schedule) -> Option<u128> {
    schedule
        .pending_indices()
        .into_iter()
        .try_fold(1u128, |acc, i| {
            acc.checked_mul(schedule.matches[i].candidate_outcomes().len() as u128)
        })
}

/// First `max_scenarios` assignments of the pending fixtures that leave
/// `target_team` at or above `target_rank`, using default search options.
pub fn find_qualifying_scenarios(
    schedule: &Schedule,
    scoring: &ScoringRule,
    target_team: &str,
    target_rank: usize,
    max_scenarios: usize,
) -> Result<Vec<QualificationScenario>, SimError> {
    let options = SearchOptions {
        max_scenarios,
        ..SearchOptions::default()
    };
    search(
        schedule,
        scoring,
        &ScenarioQuery::new(target_team, target_rank),
        &options,
    )
    .map(|report| report.scenarios)
}

/// Configurable scenario search. Fails fast on every precondition before
/// any candidate is evaluated.
pub fn search(
    schedule: &Schedule,
    scoring: &ScoringRule,
    query: &ScenarioQuery,
    options: &SearchOptions,
) -> Result<SearchReport, SimError> {
    let baseline = Tally::from_schedule(schedule, scoring);

    let target = *baseline
        .index
        .get(&query.team)
        .ok_or_else(|| SimError::TeamNotFound(query.team.clone()))?;
    let team_count = baseline.rows.len();
    if query.target_rank == 0 || query.target_rank > team_count {
        return Err(SimError::InvalidArgument(format!(
            "target rank must be between 1 and {}, got {}",
            team_count, query.target_rank
        )));
    }
    if options.max_scenarios == 0 {
        return Err(SimError::InvalidArgument(
            "max_scenarios must be a positive integer".into(),
        ));
    }
    if !(0.0..=1.0).contains(&options.completion_cutoff) {
        return Err(SimError::InvalidArgument(format!(
            "completion cutoff must be between 0.0 and 1.0, got {}",
            options.completion_cutoff
        )));
    }
    let completed = schedule.completion_fraction();
    if completed < options.completion_cutoff {
        return Err(SimError::TournamentCompletionBelowCutoff {
            completed,
            cutoff: options.completion_cutoff,
        });
    }

    let pending: Vec<PendingFixture> = schedule
        .pending_indices()
        .into_iter()
        .map(|slot| PendingFixture::new(schedule, slot, &baseline))
        .collect();
    let bounds = GainBounds::build(&pending, team_count, scoring);
    let chosen = Vec::with_capacity(pending.len());

    let mut walk = Walk {
        schedule,
        scoring,
        target,
        target_rank: query.target_rank,
        max_scenarios: options.max_scenarios,
        prune: options.prune,
        // A budget too large to represent as an instant never expires
        deadline: options
            .time_budget
            .and_then(|b| Instant::now().checked_add(b)),
        pending,
        bounds,
        tally: baseline,
        chosen,
        visits: 0,
        evaluated: 0,
        cut_short: false,
        found: Vec::new(),
    };
    walk.descend(0)?;

    if walk.found.is_empty() {
        return Err(SimError::NoQualifyingScenarios {
            team: query.team.clone(),
            rank: query.target_rank,
        });
    }
    Ok(SearchReport {
        scenarios: walk.found,
        candidates_evaluated: walk.evaluated,
        exhausted: !walk.cut_short,
    })
}

/// A pending fixture resolved to table rows and its branch list.
struct PendingFixture {
    slot: usize,
    home: usize,
    away: usize,
    /// Candidate results paired with the tally update each one applies
    branches: Vec<(ResultKind, Outcome)>,
}

impl PendingFixture {
    fn new(schedule: &Schedule, slot: usize, tally: &Tally) -> Self {
        let m = &schedule.matches[slot];
        let branches = m
            .candidate_outcomes()
            .into_iter()
            .filter_map(|o| ResultKind::classify(&o, &m.home_team, &m.away_team).map(|k| (k, o)))
            .collect();
        PendingFixture {
            slot,
            home: tally.index[&m.home_team],
            away: tally.index[&m.away_team],
            branches,
        }
    }
}

/// Per-team bounds on the points still obtainable from fixtures `depth..`.
struct GainBounds {
    /// `min[depth][team]`
    min: Vec<Vec<i64>>,
    max: Vec<Vec<i64>>,
}

impl GainBounds {
    fn build(pending: &[PendingFixture], team_count: usize, scoring: &ScoringRule) -> Self {
        let depth = pending.len();
        let mut min = vec![vec![0i64; team_count]; depth + 1];
        let mut max = vec![vec![0i64; team_count]; depth + 1];
        for d in (0..depth).rev() {
            min[d] = min[d + 1].clone();
            max[d] = max[d + 1].clone();
            let f = &pending[d];
            let gains: Vec<(i64, i64)> = f.branches.iter().map(|(k, _)| k.points(scoring)).collect();
            let home_lo = gains.iter().map(|g| g.0).min().unwrap_or(0);
            let home_hi = gains.iter().map(|g| g.0).max().unwrap_or(0);
            let away_lo = gains.iter().map(|g| g.1).min().unwrap_or(0);
            let away_hi = gains.iter().map(|g| g.1).max().unwrap_or(0);
            min[d][f.home] += home_lo;
            max[d][f.home] += home_hi;
            min[d][f.away] += away_lo;
            max[d][f.away] += away_hi;
        }
        GainBounds { min, max }
    }
}

struct Walk<'a> {
    schedule: &'a Schedule,
    scoring: &'a ScoringRule,
    target: usize,
    target_rank: usize,
    max_scenarios: usize,
    prune: bool,
    deadline: Option<Instant>,
    pending: Vec<PendingFixture>,
    bounds: GainBounds,
    tally: Tally,
    /// Branch index taken at each depth on the current path
    chosen: Vec<usize>,
    visits: u64,
    evaluated: u64,
    /// Set when the quota was met with branches still unexplored
    cut_short: bool,
    found: Vec<QualificationScenario>,
}

impl Walk<'_> {
    fn descend(&mut self, depth: usize) -> Result<ControlFlow<()>, SimError> {
        self.check_deadline()?;

        if depth == self.pending.len() {
            self.evaluate_leaf();
            return Ok(if self.found.len() >= self.max_scenarios {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            });
        }
        if self.prune && self.cannot_qualify(depth) {
            return Ok(ControlFlow::Continue(()));
        }

        let branch_count = self.pending[depth].branches.len();
        for b in 0..branch_count {
            let (home, away, kind) = {
                let f = &self.pending[depth];
                (f.home, f.away, f.branches[b].0)
            };
            self.tally.apply(home, away, kind, self.scoring);
            self.chosen.push(b);
            let flow = self.descend(depth + 1);
            self.chosen.pop();
            self.tally.revert(home, away, kind, self.scoring);
            if flow?.is_break() {
                if b + 1 < branch_count {
                    self.cut_short = true;
                }
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn check_deadline(&mut self) -> Result<(), SimError> {
        self.visits += 1;
        if let Some(deadline) = self.deadline {
            if self.visits % DEADLINE_CHECK_EVERY == 0 && Instant::now() >= deadline {
                return Err(SimError::SearchTimedOut {
                    evaluated: self.evaluated,
                });
            }
        }
        Ok(())
    }

    /// Teams that rank above the target: more points, or level and
    /// discovered earlier.
    fn outranks(rival: usize, rival_pts: i64, target: usize, target_pts: i64) -> bool {
        rival_pts > target_pts || (rival_pts == target_pts && rival < target)
    }

    fn evaluate_leaf(&mut self) {
        self.evaluated += 1;
        let target_pts = self.tally.rows[self.target].points;
        let above = self
            .tally
            .rows
            .iter()
            .enumerate()
            .filter(|&(i, r)| i != self.target && Self::outranks(i, r.points, self.target, target_pts))
            .count();
        if above >= self.target_rank {
            return;
        }

        let mut filled = self.schedule.clone();
        for (fixture, &b) in self.pending.iter().zip(&self.chosen) {
            filled.matches[fixture.slot].result = fixture.branches[b].1.clone();
        }
        self.found.push(QualificationScenario {
            table: self.tally.ranked(),
            schedule: filled,
        });
    }

    /// True when, however fixtures `depth..` go, at least `target_rank`
    /// rivals finish above the target.
    fn cannot_qualify(&self, depth: usize) -> bool {
        let best = self.tally.rows[self.target].points + self.bounds.max[depth][self.target];
        let mut certain_above = 0;
        for (i, row) in self.tally.rows.iter().enumerate() {
            if i == self.target {
                continue;
            }
            let worst = row.points + self.bounds.min[depth][i];
            if Self::outranks(i, worst, self.target, best) {
                certain_above += 1;
                if certain_above >= self.target_rank {
                    return true;
                }
            }
        }
        false
    }
}
