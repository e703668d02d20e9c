//! Simulated annealing over random neighbor proposals.

use super::*;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingSchedule {
    /// `t * alpha` every iteration.
    #[default]
    Geometric,
    /// Linear decay reaching the floor after `max_steps` iterations.
    Linear,
    /// Geometric decay that speeds up while the walk stagnates.
    Adaptive,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingParams {
    pub max_steps: u32,
    pub initial_temperature: f64,
    pub alpha: f64,
    /// The walk ends once the temperature is at or below this value.
    pub min_temperature: f64,
    pub stagnation_limit: u32,
    /// Length of the recent-tile memory used to steer away from loops.
    pub oscillation_memory: usize,
    /// The walk ends on entering a tile left more than this many times.
    pub revisit_limit: u32,
    pub cooling: CoolingSchedule,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        AnnealingParams {
            max_steps: 6000,
            initial_temperature: 15.0,
            alpha: 0.995,
            min_temperature: 1e-12,
            stagnation_limit: 250,
            oscillation_memory: 20,
            revisit_limit: 12,
            cooling: CoolingSchedule::Geometric,
        }
    }
}

pub struct SimulatedAnnealing {
    params: AnnealingParams,
}

impl SimulatedAnnealing {
    pub fn new(params: AnnealingParams) -> Self {
        SimulatedAnnealing { params }
    }

    pub fn cool(&self, temperature: f64, stagnation: u32) -> f64 {
        let params = &self.params;
        let next = match params.cooling {
            CoolingSchedule::Geometric => temperature * params.alpha,
            CoolingSchedule::Linear => {
                temperature - params.initial_temperature / params.max_steps.max(1) as f64
            }
            CoolingSchedule::Adaptive => {
                temperature * params.alpha.powf(1.0 + stagnation as f64 / 50.0)
            }
        };
        match params.cooling {
            CoolingSchedule::Geometric => next,
            _ => next.max(params.min_temperature),
        }
    }

    /// Metropolis criterion on Manhattan distance. Moves that do not increase
    /// the distance are always taken.
    fn accepts(&self, delta: i64, temperature: f64, rng: &mut dyn RngCore) -> bool {
        if delta <= 0 {
            return true;
        }
        let temperature = temperature.max(self.params.min_temperature);
        rng.gen::<f64>() < (-(delta as f64) / temperature).exp()
    }
}

impl SearchStrategy for SimulatedAnnealing {
    fn name(&self) -> &str {
        "sa"
    }

    fn search(
        &self,
        grid: &WorldGrid,
        placement: &Placement,
        start: Location,
        rng: &mut dyn RngCore,
    ) -> SearchOutcome {
        let params = &self.params;
        let goal = placement.office;
        let mut metrics = SearchMetrics::default();

        let mut current = start;
        let mut path = vec![start];
        let mut temperature = params.initial_temperature;
        let mut stagnation = 0u32;
        let mut visits = VisitCounts::default();
        let mut recent = VisitWindow::new(params.oscillation_memory);

        while metrics.steps < params.max_steps {
            if current == goal || temperature <= params.min_temperature {
                break;
            }
            metrics.steps += 1;

            let neighbors = legal_moves(grid, current);
            if neighbors.is_empty() {
                break;
            }

            let previous = path.len().checked_sub(2).map(|i| path[i]);
            let mut options: Vec<Location> = neighbors
                .iter()
                .copied()
                .filter(|&next| Some(next) != previous)
                .collect();
            if options.is_empty() {
                options = neighbors;
            }

            let mut proposal = match options.choose(rng) {
                Some(&proposal) => proposal,
                None => break,
            };
            let mut forced_repeat = false;
            if recent.contains(proposal) {
                let unseen: Vec<Location> = options
                    .iter()
                    .copied()
                    .filter(|&next| !recent.contains(next))
                    .collect();
                match unseen.choose(rng) {
                    Some(&next) => proposal = next,
                    None => forced_repeat = true,
                }
            }
            recent.push(proposal);

            let current_distance = current.manhattan_to(goal) as i64;
            let proposal_distance = proposal.manhattan_to(goal) as i64;

            if self.accepts(proposal_distance - current_distance, temperature, rng) {
                if proposal_distance == current_distance || forced_repeat {
                    stagnation += 1;
                } else {
                    stagnation = 0;
                }

                visits.bump(current);
                metrics.observe_space(visits.len());
                current = proposal;
                path.push(current);

                if visits.get(current) > params.revisit_limit {
                    trace!("Annealing revisited {} too often", current);
                    break;
                }
                if stagnation >= params.stagnation_limit {
                    trace!("Annealing stagnated at {}", current);
                    break;
                }
            }

            temperature = self.cool(temperature, stagnation);
        }

        path.dedup();

        metrics.stagnation = stagnation;
        metrics.final_temperature = Some(temperature);
        metrics.reached_goal = current == goal;

        SearchOutcome { path, metrics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn walled_office() -> (WorldGrid, Placement) {
        let geometry = WorldGeometry::new(10, 3, 7);
        let office = Location::from_xy(16, 4);
        let placement = Placement {
            start: Location::from_xy(0, 3),
            walls_main: Default::default(),
            walls_pab: [
                Location::from_xy(17, 4),
                Location::from_xy(16, 5),
                Location::from_xy(16, 3),
            ]
            .into_iter()
            .collect(),
            angry_main: Default::default(),
            angry_pab: Default::default(),
            chair: Location::from_xy(19, 6),
            office,
            bridge: geometry.bridge_cells().collect(),
        };
        (WorldGrid::from_placement(geometry, &placement), placement)
    }

    #[test]
    fn schedules_cool_down() {
        let t0 = 15.0;
        for cooling in [
            CoolingSchedule::Geometric,
            CoolingSchedule::Linear,
            CoolingSchedule::Adaptive,
        ] {
            let sa = SimulatedAnnealing::new(AnnealingParams {
                cooling,
                ..Default::default()
            });
            let t1 = sa.cool(t0, 0);
            assert!(t1 < t0, "{:?} did not cool", cooling);
            assert!(t1 > 0.0);
        }

        let adaptive = SimulatedAnnealing::new(AnnealingParams {
            cooling: CoolingSchedule::Adaptive,
            ..Default::default()
        });
        assert!(adaptive.cool(t0, 100) < adaptive.cool(t0, 0));
    }

    #[test]
    fn linear_schedule_bottoms_out_at_the_floor() {
        let sa = SimulatedAnnealing::new(AnnealingParams {
            cooling: CoolingSchedule::Linear,
            max_steps: 10,
            ..Default::default()
        });
        let mut t = 15.0;
        for _ in 0..20 {
            t = sa.cool(t, 0);
        }
        assert_eq!(t, 1e-12);
    }

    #[test]
    fn downhill_moves_are_always_accepted() {
        let sa = SimulatedAnnealing::new(AnnealingParams::default());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        for _ in 0..100 {
            assert!(sa.accepts(-1, 1e-9, &mut rng));
            assert!(sa.accepts(0, 1e-9, &mut rng));
            assert!(!sa.accepts(1, 1e-9, &mut rng));
        }
    }

    #[test]
    fn finds_walled_office_from_its_open_side() {
        let (grid, placement) = walled_office();
        let sa = SimulatedAnnealing::new(AnnealingParams::default());
        let next_to_office = Location::from_xy(15, 4);

        let successes = (0..16)
            .filter(|&seed| {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                let outcome = sa.search(&grid, &placement, next_to_office, &mut rng);
                outcome.metrics.reached_goal
            })
            .count();
        assert!(successes > 0);
    }

    #[test]
    fn path_has_no_consecutive_duplicates_and_reports_temperature() {
        let (grid, placement) = walled_office();
        let sa = SimulatedAnnealing::new(AnnealingParams::default());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let outcome = sa.search(&grid, &placement, placement.start, &mut rng);
        assert_eq!(outcome.path.first(), Some(&placement.start));
        assert!(outcome.path.windows(2).all(|pair| pair[0] != pair[1]));
        assert!(outcome.path.windows(2).all(|pair| legal_moves(&grid, pair[0]).contains(&pair[1])));
        assert!(outcome.metrics.final_temperature.is_some());
    }
}
