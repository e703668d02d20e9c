//! One race: a generated world and three agents searching it independently.

use crate::config::RaceConfig;
use crate::error::RaceResult;
use crate::generator::*;
use crate::path::AgentPath;
use crate::search::*;
use crate::trace::*;
use log::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::cmp::Reverse;

#[derive(Clone, Debug)]
pub struct AgentRun {
    pub agent_id: usize,
    pub algorithm: AlgorithmKind,
    pub path: AgentPath,
    pub metrics: SearchMetrics,
    pub trace: Trace,
}

impl AgentRun {
    pub fn reached_goal(&self) -> bool {
        self.trace.reached_goal()
    }
}

#[derive(Clone, Debug)]
pub struct RaceOutcome {
    pub world: GeneratedWorld,
    pub runs: Vec<AgentRun>,
}

impl RaceOutcome {
    /// The agent that reached the office with the most points left, fewer
    /// search steps breaking ties and the lower id after that.
    pub fn winner(&self) -> Option<&AgentRun> {
        self.runs
            .iter()
            .rev()
            .filter(|run| run.reached_goal())
            .max_by_key(|run| (run.trace.final_score(), Reverse(run.metrics.steps)))
    }

    /// The agent with the most time left when its trace ended, whether or not
    /// it reached the office. Ties go to the lower id.
    pub fn most_efficient(&self) -> Option<&AgentRun> {
        self.runs.iter().rev().max_by_key(|run| run.trace.final_timer())
    }
}

pub struct Race<'a> {
    config: &'a RaceConfig,
    world: GeneratedWorld,
}

impl<'a> Race<'a> {
    /// Validate `config` and generate the world all agents share.
    pub fn new(config: &'a RaceConfig, world_seed: Option<u64>) -> RaceResult<Self> {
        config.validate()?;
        let world = build_world(&config.world, world_seed)?;
        Ok(Race { config, world })
    }

    pub fn world(&self) -> &GeneratedWorld {
        &self.world
    }

    /// Run one agent. Its generator is seeded from `search_seed` and its id,
    /// so agents never share random state.
    pub fn run_agent(&self, agent_id: usize, algorithm: AlgorithmKind, search_seed: u64) -> AgentRun {
        let grid = &self.world.grid;
        let placement = &self.world.placement;
        let resources = &self.config.resources;

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(search_seed.wrapping_add(agent_id as u64));
        let (path, metrics) = run_search(
            algorithm,
            grid,
            placement,
            placement.start,
            &self.config.search,
            &mut rng,
        );
        let trace = simulate(
            grid,
            placement,
            path.as_slice(),
            resources.start_score,
            resources.start_time,
        );

        debug!(
            "Agent {} ({}) finished with {:?}, score {}",
            agent_id,
            algorithm,
            trace.final_reason(),
            trace.final_score()
        );

        AgentRun {
            agent_id,
            algorithm,
            path,
            metrics,
            trace,
        }
    }

    pub fn run_agents(&self, search_seed: u64) -> Vec<AgentRun> {
        self.config
            .agents
            .iter()
            .enumerate()
            .map(|(agent_id, &algorithm)| self.run_agent(agent_id, algorithm, search_seed))
            .collect()
    }

    pub fn into_outcome(self, runs: Vec<AgentRun>) -> RaceOutcome {
        RaceOutcome {
            world: self.world,
            runs,
        }
    }

    /// Generate a world and race every configured agent across it.
    pub fn run(config: &RaceConfig, world_seed: Option<u64>, search_seed: u64) -> RaceResult<RaceOutcome> {
        let race = Race::new(config, world_seed)?;
        let runs = race.run_agents(search_seed);
        Ok(race.into_outcome(runs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RaceError;

    #[test]
    fn every_agent_gets_a_trace() {
        let config = RaceConfig::default();
        let outcome = Race::run(&config, Some(3), 3).unwrap();
        assert_eq!(outcome.runs.len(), 3);
        for (id, run) in outcome.runs.iter().enumerate() {
            assert_eq!(run.agent_id, id);
            assert_eq!(run.algorithm, config.agents[id]);
            assert_eq!(run.path.as_slice()[0], outcome.world.placement.start);
            assert!(!run.trace.is_empty());
        }
    }

    #[test]
    fn races_are_reproducible() {
        let config = RaceConfig::default();
        let a = Race::run(&config, Some(8), 100).unwrap();
        let b = Race::run(&config, Some(8), 100).unwrap();
        for (x, y) in a.runs.iter().zip(&b.runs) {
            assert_eq!(x.path, y.path);
            assert_eq!(x.trace, y.trace);
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_generation() {
        let mut config = RaceConfig::default();
        config.agents = [AlgorithmKind::Sa, AlgorithmKind::Sa, AlgorithmKind::Hc];
        assert!(matches!(
            Race::run(&config, Some(1), 1),
            Err(RaceError::Config(_))
        ));
    }

    #[test]
    fn winner_reached_the_office() {
        let config = RaceConfig::default();
        for seed in 1..6 {
            let outcome = Race::run(&config, Some(seed), seed).unwrap();
            match outcome.winner() {
                Some(winner) => {
                    assert!(winner.reached_goal());
                    for run in outcome.runs.iter().filter(|r| r.reached_goal()) {
                        assert!(run.trace.final_score() <= winner.trace.final_score());
                    }
                }
                None => assert!(outcome.runs.iter().all(|r| !r.reached_goal())),
            }
        }
    }

    #[test]
    fn most_efficient_has_the_most_time_left() {
        let config = RaceConfig::default();
        for seed in 1..6 {
            let outcome = Race::run(&config, Some(seed), seed).unwrap();
            let efficient = outcome.most_efficient().unwrap();
            for run in &outcome.runs {
                assert!(run.trace.final_timer() <= efficient.trace.final_timer());
                if run.trace.final_timer() == efficient.trace.final_timer() {
                    assert!(efficient.agent_id <= run.agent_id);
                }
            }
        }
    }

    #[test]
    fn most_efficient_ties_go_to_the_lower_id() {
        let config = RaceConfig::default();
        let mut outcome = Race::run(&config, Some(4), 4).unwrap();
        let shared = outcome.runs[1].trace.clone();
        for run in outcome.runs.iter_mut() {
            run.trace = shared.clone();
        }
        assert_eq!(outcome.most_efficient().map(|run| run.agent_id), Some(0));

        outcome.runs.clear();
        assert!(outcome.most_efficient().is_none());
    }
}
