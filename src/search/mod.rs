//! Local-information search strategies.
//!
//! Every strategy walks the grid one legal move at a time, sensing only its
//! current tile, that tile's neighbors, and the Manhattan distance to the
//! office. None of them may plan globally; failing to reach the office is a
//! normal outcome reported through `SearchMetrics`, not an error.

pub mod annealing;
pub mod hill_climbing;
pub mod stochastic;

pub use annealing::{AnnealingParams, CoolingSchedule, SimulatedAnnealing};
pub use hill_climbing::{HillClimbing, HillClimbingParams};
pub use stochastic::{StochasticHillClimbing, StochasticParams};

use crate::error::SearchError;
use crate::grid::*;
use crate::location::*;
use crate::path::AgentPath;
use crate::placement::*;
use crate::topology::*;
use fnv::FnvHashMap;
use log::*;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;

/// The three selectable strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    Hc,
    Shc,
    Sa,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 3] = [AlgorithmKind::Hc, AlgorithmKind::Shc, AlgorithmKind::Sa];

    /// Short code used in reports and on the command line.
    pub fn code(self) -> &'static str {
        match self {
            AlgorithmKind::Hc => "hc",
            AlgorithmKind::Shc => "shc",
            AlgorithmKind::Sa => "sa",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AlgorithmKind::Hc => "Hill-Climbing",
            AlgorithmKind::Shc => "Stochastic Hill Climbing",
            AlgorithmKind::Sa => "Simulated Annealing",
        }
    }
}

impl std::fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AlgorithmKind {
    type Err = SearchError;

    /// Accepts the short codes and the long display names, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "hc" | "hill climbing" => Ok(AlgorithmKind::Hc),
            "shc" | "stochastic hill climbing" => Ok(AlgorithmKind::Shc),
            "sa" | "simulated annealing" => Ok(AlgorithmKind::Sa),
            _ => Err(SearchError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Give each of three agents a distinct algorithm. Requests that are missing
/// or already taken fall back to the first unused kind in `ALL` order.
pub fn assign_algorithms(requested: [Option<AlgorithmKind>; 3]) -> [AlgorithmKind; 3] {
    let mut assigned: Vec<AlgorithmKind> = Vec::with_capacity(3);
    for request in requested {
        let choice = match request {
            Some(kind) if !assigned.contains(&kind) => kind,
            _ => AlgorithmKind::ALL
                .into_iter()
                .find(|kind| !assigned.contains(kind))
                .unwrap_or(AlgorithmKind::Hc),
        };
        assigned.push(choice);
    }
    [assigned[0], assigned[1], assigned[2]]
}

/// Resource usage reported by a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMetrics {
    /// Loop iterations consumed, summed over all attempts.
    pub steps: u32,
    /// Peak size of the strategy's visit-tracking structure.
    pub space: u32,
    pub restarts: u32,
    pub sideways: u32,
    pub stagnation: u32,
    pub final_temperature: Option<f64>,
    pub reached_goal: bool,
}

impl SearchMetrics {
    pub(crate) fn observe_space(&mut self, size: usize) {
        self.space = self.space.max(size as u32);
    }
}

/// Raw result of a strategy, before sanitizing.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub path: Vec<Location>,
    pub metrics: SearchMetrics,
}

/// Tuning for all three strategies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub hill_climbing: HillClimbingParams,
    pub stochastic: StochasticParams,
    pub annealing: AnnealingParams,
}

/// A heuristic path search from `start` toward `placement.office`.
///
/// Strategies are stateless; their tuning is fixed at construction and every
/// random decision draws from the generator handed in.
pub trait SearchStrategy {
    fn name(&self) -> &str;

    fn search(
        &self,
        grid: &WorldGrid,
        placement: &Placement,
        start: Location,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome;
}

/// Build the strategy for `kind` with its section of `params`.
pub fn strategy_for(kind: AlgorithmKind, params: &SearchParams) -> Box<dyn SearchStrategy> {
    match kind {
        AlgorithmKind::Hc => Box::new(HillClimbing::new(params.hill_climbing.clone())),
        AlgorithmKind::Shc => Box::new(StochasticHillClimbing::new(params.stochastic.clone())),
        AlgorithmKind::Sa => Box::new(SimulatedAnnealing::new(params.annealing.clone())),
    }
}

/// Run `kind` and sanitize its path so it is always safe to simulate.
pub fn run_search(
    kind: AlgorithmKind,
    grid: &WorldGrid,
    placement: &Placement,
    start: Location,
    params: &SearchParams,
    rng: &mut dyn RngCore,
) -> (AgentPath, SearchMetrics) {
    let strategy = strategy_for(kind, params);
    let outcome = strategy.search(grid, placement, start, rng);

    debug!(
        "Search '{}' finished: steps={}, space={}, path_len={}, reached_goal={}",
        strategy.name(),
        outcome.metrics.steps,
        outcome.metrics.space,
        outcome.path.len(),
        outcome.metrics.reached_goal
    );

    let path = AgentPath::sanitize(grid, start, outcome.path);
    (path, outcome.metrics)
}

/// Dispatch by algorithm name (`hc`, `shc`, `sa` or a long name).
pub fn search(
    algorithm: &str,
    grid: &WorldGrid,
    placement: &Placement,
    start: Location,
    params: &SearchParams,
    rng: &mut dyn RngCore,
) -> Result<(AgentPath, SearchMetrics), SearchError> {
    let kind: AlgorithmKind = algorithm.parse()?;
    Ok(run_search(kind, grid, placement, start, params, rng))
}

/// Per-tile visit counter.
#[derive(Default)]
pub(crate) struct VisitCounts {
    counts: FnvHashMap<Location, u32>,
}

impl VisitCounts {
    /// Increment and return the new count.
    pub fn bump(&mut self, loc: Location) -> u32 {
        let count = self.counts.entry(loc).or_insert(0);
        *count += 1;
        *count
    }

    pub fn get(&self, loc: Location) -> u32 {
        self.counts.get(&loc).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }
}

/// Bounded window of the most recently recorded tiles.
pub(crate) struct VisitWindow {
    recent: VecDeque<Location>,
    capacity: usize,
}

impl VisitWindow {
    pub fn new(capacity: usize) -> Self {
        VisitWindow {
            recent: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, loc: Location) {
        self.recent.push_back(loc);
        while self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
    }

    pub fn contains(&self, loc: Location) -> bool {
        self.recent.contains(&loc)
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }
}

/// Look two moves ahead from `pos` and return the first move of the pair that
/// ends closest to `goal`. First moves rejected by `skip` are not expanded.
/// Ties keep the earliest pair in neighbor order.
pub(crate) fn two_step_lookahead<F>(
    grid: &WorldGrid,
    goal: Location,
    pos: Location,
    skip: F,
) -> Option<Location>
where
    F: Fn(Location) -> bool,
{
    let mut best: Option<(u32, Location)> = None;
    for first in legal_moves(grid, pos) {
        if skip(first) {
            continue;
        }
        for second in legal_moves(grid, first) {
            let distance = second.manhattan_to(goal);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, first));
            }
        }
    }
    best.map(|(_, first)| first)
}

/// True when the last four entries alternate between two tiles (A-B-A-B).
pub(crate) fn is_oscillating(path: &[Location]) -> bool {
    let n = path.len();
    n >= 4 && path[n - 1] == path[n - 3] && path[n - 2] == path[n - 4]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_parse() {
        assert_eq!("hc".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::Hc);
        assert_eq!("SHC".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::Shc);
        assert_eq!(
            "Simulated Annealing".parse::<AlgorithmKind>().unwrap(),
            AlgorithmKind::Sa
        );
        assert_eq!(
            "Hill-Climbing".parse::<AlgorithmKind>().unwrap(),
            AlgorithmKind::Hc
        );
        assert_eq!(
            "astar".parse::<AlgorithmKind>(),
            Err(SearchError::UnknownAlgorithm("astar".to_string()))
        );
    }

    #[test]
    fn assignment_fills_gaps_and_duplicates() {
        assert_eq!(
            assign_algorithms([None, None, None]),
            [AlgorithmKind::Hc, AlgorithmKind::Shc, AlgorithmKind::Sa]
        );
        assert_eq!(
            assign_algorithms([Some(AlgorithmKind::Sa), Some(AlgorithmKind::Sa), None]),
            [AlgorithmKind::Sa, AlgorithmKind::Hc, AlgorithmKind::Shc]
        );
    }

    #[test]
    fn window_keeps_only_recent_tiles() {
        let mut window = VisitWindow::new(2);
        window.push(Location::from_xy(0, 0));
        window.push(Location::from_xy(1, 0));
        window.push(Location::from_xy(2, 0));
        assert_eq!(window.len(), 2);
        assert!(!window.contains(Location::from_xy(0, 0)));
        assert!(window.contains(Location::from_xy(2, 0)));
    }

    #[test]
    fn oscillation_needs_two_full_swings() {
        let a = Location::from_xy(1, 1);
        let b = Location::from_xy(2, 1);
        assert!(is_oscillating(&[a, b, a, b]));
        assert!(!is_oscillating(&[a, b, a]));
        assert!(!is_oscillating(&[a, b, b, a]));
    }

    #[test]
    fn lookahead_prefers_the_closest_second_step() {
        let grid = WorldGrid::new(WorldGeometry::new(10, 3, 7));
        let goal = Location::from_xy(5, 0);
        let pos = Location::from_xy(3, 0);
        assert_eq!(
            two_step_lookahead(&grid, goal, pos, |_| false),
            Some(Location::from_xy(4, 0))
        );
        assert_eq!(
            two_step_lookahead(&grid, goal, pos, |loc| loc == Location::from_xy(4, 0)),
            Some(Location::from_xy(2, 0))
        );
    }
}
