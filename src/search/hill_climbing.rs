//! Greedy hill climbing with a few cheap escapes from plateaus and dead ends.

use super::*;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HillClimbingParams {
    pub max_steps: u32,
    /// Added to the score of the tile we just left.
    pub backtrack_penalty: u32,
    /// Maximum consecutive equal-distance moves.
    pub sideways_limit: u32,
    pub sideways_probability: f64,
    /// Number of recently left tiles avoided when picking the best neighbor.
    pub visited_window: usize,
    /// How much worse than the current distance an escape move may be.
    pub uphill_tolerance: u32,
}

impl Default for HillClimbingParams {
    fn default() -> Self {
        HillClimbingParams {
            max_steps: 4000,
            backtrack_penalty: 5,
            sideways_limit: 30,
            sideways_probability: 0.35,
            visited_window: 16,
            uphill_tolerance: 2,
        }
    }
}

pub struct HillClimbing {
    params: HillClimbingParams,
}

impl HillClimbing {
    pub fn new(params: HillClimbingParams) -> Self {
        HillClimbing { params }
    }

    /// Pick the next tile, or `None` when every rule gives up.
    fn choose_next(
        &self,
        grid: &WorldGrid,
        goal: Location,
        state: &mut ClimbState,
        rng: &mut dyn RngCore,
    ) -> Option<Location> {
        let params = &self.params;
        let current = state.current;
        let neighbors = legal_moves(grid, current);
        if neighbors.is_empty() {
            return None;
        }

        let current_distance = current.manhattan_to(goal);

        let mut scored: Vec<(u32, Location)> = neighbors
            .iter()
            .map(|&next| {
                let mut score = next.manhattan_to(goal) + state.counts.get(next);
                if Some(next) == state.last {
                    score += params.backtrack_penalty;
                }
                (score, next)
            })
            .collect();
        scored.sort_by_key(|&(score, _)| score);

        let best = scored
            .iter()
            .find(|(_, next)| !state.window.contains(*next))
            .unwrap_or(&scored[0])
            .1;
        let best_distance = best.manhattan_to(goal);

        if best_distance < current_distance {
            state.sideways_run = 0;
            return Some(best);
        }

        if best_distance == current_distance
            && state.sideways_run < params.sideways_limit
            && rng.gen_bool(params.sideways_probability)
        {
            state.sideways_run += 1;
            state.sideways_total += 1;
            return Some(best);
        }

        if let Some(detour) = two_step_lookahead(grid, goal, current, |_| false)
            .filter(|&detour| !state.window.contains(detour))
        {
            trace!("Lookahead detour from {} to {}", current, detour);
            return Some(detour);
        }

        let escapes: Vec<Location> = neighbors
            .iter()
            .copied()
            .filter(|&next| {
                next.manhattan_to(goal) <= current_distance + params.uphill_tolerance
                    && Some(next) != state.last
            })
            .collect();
        if let Some(&escape) = escapes.choose(rng) {
            trace!("Uphill escape from {} to {}", current, escape);
            return Some(escape);
        }

        if is_oscillating(&state.path) {
            let previous = state.path[state.path.len() - 2];
            let breakers: Vec<Location> = neighbors
                .iter()
                .copied()
                .filter(|&next| next != previous)
                .collect();
            if let Some(&breaker) = breakers.choose(rng) {
                return Some(breaker);
            }
        }

        None
    }
}

struct ClimbState {
    current: Location,
    last: Option<Location>,
    path: Vec<Location>,
    window: VisitWindow,
    counts: VisitCounts,
    sideways_run: u32,
    sideways_total: u32,
}

impl SearchStrategy for HillClimbing {
    fn name(&self) -> &str {
        "hc"
    }

    fn search(
        &self,
        grid: &WorldGrid,
        placement: &Placement,
        start: Location,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let goal = placement.office;
        let mut metrics = SearchMetrics::default();
        let mut state = ClimbState {
            current: start,
            last: None,
            path: vec![start],
            window: VisitWindow::new(self.params.visited_window),
            counts: VisitCounts::default(),
            sideways_run: 0,
            sideways_total: 0,
        };

        while metrics.steps < self.params.max_steps && state.current != goal {
            let next = match self.choose_next(grid, goal, &mut state, rng) {
                Some(next) => next,
                None => {
                    trace!("Hill climbing stuck at {}", state.current);
                    break;
                }
            };

            metrics.steps += 1;
            state.window.push(state.current);
            state.counts.bump(state.current);
            metrics.observe_space(state.window.len());

            state.last = Some(state.current);
            state.current = next;
            state.path.push(next);
        }

        metrics.sideways = state.sideways_total;
        metrics.reached_goal = state.current == goal;

        SearchOutcome {
            path: state.path,
            metrics,
        }
    }
}
