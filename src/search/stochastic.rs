//! Stochastic hill climbing: random choice among improving moves, with
//! restarts seeded from tiles on the first attempt's path.

use super::*;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticParams {
    /// Step budget of every single attempt.
    pub max_steps: u32,
    pub restarts: u32,
    /// Visit count at which a tile triggers a random loop escape.
    pub loop_escape_visits: u32,
    /// Improving neighbors visited this often are avoided when others exist.
    pub revisit_limit: u32,
    /// Lookahead does not expand first moves visited more often than this.
    pub lookahead_visit_limit: u32,
    pub uphill_probability: f64,
}

impl Default for StochasticParams {
    fn default() -> Self {
        StochasticParams {
            max_steps: 4000,
            restarts: 6,
            loop_escape_visits: 5,
            revisit_limit: 3,
            lookahead_visit_limit: 3,
            uphill_probability: 0.25,
        }
    }
}

pub struct StochasticHillClimbing {
    params: StochasticParams,
}

/// Prefer candidates other than `avoid`, falling back to all of them.
fn pick_avoiding(
    candidates: &[Location],
    avoid: Option<Location>,
    rng: &mut dyn RngCore,
) -> Option<Location> {
    let preferred: Vec<Location> = candidates
        .iter()
        .copied()
        .filter(|&c| Some(c) != avoid)
        .collect();
    let pool = if preferred.is_empty() {
        candidates
    } else {
        &preferred[..]
    };
    pool.choose(rng).copied()
}

impl StochasticHillClimbing {
    pub fn new(params: StochasticParams) -> Self {
        StochasticHillClimbing { params }
    }

    /// One bounded climb from `origin`. Steps and space accumulate into `metrics`.
    fn climb(
        &self,
        grid: &WorldGrid,
        goal: Location,
        origin: Location,
        rng: &mut dyn RngCore,
        metrics: &mut SearchMetrics,
    ) -> Vec<Location> {
        let params = &self.params;
        let mut current = origin;
        let mut last: Option<Location> = None;
        let mut path = vec![origin];
        let mut visits = VisitCounts::default();

        for _ in 0..params.max_steps {
            if current == goal {
                break;
            }

            let seen = visits.bump(current);
            metrics.observe_space(visits.len());

            let neighbors = legal_moves(grid, current);
            if neighbors.is_empty() {
                break;
            }

            let next = if seen >= params.loop_escape_visits {
                trace!("Loop escape at {} after {} visits", current, seen);
                pick_avoiding(&neighbors, last, rng)
            } else {
                self.choose_next(grid, goal, current, last, &neighbors, &path, &visits, rng)
            };

            let next = match next {
                Some(next) => next,
                None => break,
            };

            metrics.steps += 1;
            last = Some(current);
            current = next;
            path.push(next);
        }

        path
    }

    #[allow(clippy::too_many_arguments)]
    fn choose_next(
        &self,
        grid: &WorldGrid,
        goal: Location,
        current: Location,
        last: Option<Location>,
        neighbors: &[Location],
        path: &[Location],
        visits: &VisitCounts,
        rng: &mut dyn RngCore,
    ) -> Option<Location> {
        let params = &self.params;
        let current_distance = current.manhattan_to(goal);

        let improving: Vec<Location> = neighbors
            .iter()
            .copied()
            .filter(|next| next.manhattan_to(goal) < current_distance)
            .collect();
        let fresh: Vec<Location> = improving
            .iter()
            .copied()
            .filter(|&next| visits.get(next) < params.revisit_limit)
            .collect();
        let candidates = if fresh.is_empty() { improving } else { fresh };
        if let Some(next) = pick_avoiding(&candidates, last, rng) {
            return Some(next);
        }

        if let Some(detour) = two_step_lookahead(grid, goal, current, |first| {
            visits.get(first) > params.lookahead_visit_limit
        }) {
            return Some(detour);
        }

        if rng.gen_bool(params.uphill_probability) {
            if let Some(next) = pick_avoiding(neighbors, last, rng) {
                return Some(next);
            }
        }

        if is_oscillating(path) {
            let previous = path[path.len() - 2];
            let breakers: Vec<Location> = neighbors
                .iter()
                .copied()
                .filter(|&next| next != previous)
                .collect();
            return breakers.choose(rng).copied();
        }

        None
    }
}

impl SearchStrategy for StochasticHillClimbing {
    fn name(&self) -> &str {
        "shc"
    }

    fn search(
        &self,
        grid: &WorldGrid,
        placement: &Placement,
        start: Location,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let goal = placement.office;
        let geometry = grid.geometry();
        let mut metrics = SearchMetrics::default();

        let primary = self.climb(grid, goal, start, rng, &mut metrics);
        let mut best = primary.clone();
        let mut best_distance = best.last().map_or(u32::MAX, |end| end.manhattan_to(goal));

        // Restarts branch off the primary path at a Main tile, so the stitched
        // path always begins at `start` and every step stays legal.
        let origins: Vec<usize> = primary
            .iter()
            .enumerate()
            .filter(|(_, loc)| geometry.zone_of(**loc) == Zone::Main)
            .map(|(index, _)| index)
            .collect();

        for attempt in 0..self.params.restarts {
            if best_distance == 0 {
                break;
            }
            let index = match origins.choose(rng) {
                Some(&index) => index,
                None => break,
            };

            metrics.restarts += 1;
            let trial = self.climb(grid, goal, primary[index], rng, &mut metrics);
            let distance = trial.last().map_or(u32::MAX, |end| end.manhattan_to(goal));

            trace!(
                "Restart {} from {} ended {} from the office",
                attempt,
                primary[index],
                distance
            );

            if distance < best_distance {
                let mut stitched = primary[..index].to_vec();
                stitched.extend(trial);
                best = stitched;
                best_distance = distance;
            }
        }

        metrics.reached_goal = best_distance == 0;

        SearchOutcome {
            path: best,
            metrics,
        }
    }
}
