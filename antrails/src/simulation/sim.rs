use shared::{Compass, ModeCounts, RunSnapshot, StepRecord};
use tracing::{debug, info};

use crate::config::RunParameters;

use super::colony::Colony;
use super::pheromone::PheromoneField;
use super::random::{RandomSource, SeededSource};
use super::stepper::{PopulationStepper, TickSummary};
use super::ConfigError;

/// One run of the trail model: field, colony, stepper and the per-step history.
pub struct Simulation {
    pub params: RunParameters,
    field: PheromoneField,
    colony: Colony,
    stepper: PopulationStepper,
    rng: Box<dyn RandomSource>,
    history: Vec<StepRecord>,
    step: u32,
}

impl Simulation {
    /// Creates a run seeded from `params.seed`, or from fresh entropy when unset.
    pub fn new(mut params: RunParameters) -> Result<Self, ConfigError> {
        let source = match params.seed {
            Some(seed) => SeededSource::seeded(seed),
            None => SeededSource::from_entropy(),
        };
        // Keep the drawn seed so the report can replay this run.
        params.seed = Some(source.seed());
        info!(seed = source.seed(), "random source ready");
        Self::with_source(params, Box::new(source))
    }

    pub fn with_source(
        params: RunParameters,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        let field = PheromoneField::new(params.side_length)?;
        let stepper = PopulationStepper::new(
            Compass::default(),
            params.turn_kernel,
            params.fidelity,
            params.deposition,
            params.decay_rate,
        );
        Ok(Self {
            field,
            colony: Colony::with_capacity(params.side_length as usize),
            stepper,
            rng,
            history: Vec::with_capacity(params.steps as usize),
            step: 0,
            params,
        })
    }

    /// Runs one tick and records the resulting mode counts.
    pub fn step(&mut self) -> TickSummary {
        let summary = self
            .stepper
            .tick(&mut self.colony, &mut self.field, self.rng.as_mut());
        self.step += 1;

        let counts = self.colony.count_by_mode();
        self.history.push(StepRecord {
            step: self.step,
            counts,
        });
        debug!(
            step = self.step,
            population = self.colony.len(),
            followers = counts.following,
            explorers = counts.exploring,
            retired = summary.retired,
            "tick"
        );
        summary
    }

    /// Runs the remaining configured steps.
    pub fn run(&mut self) -> ModeCounts {
        info!(
            side_length = self.params.side_length,
            fidelity = self.params.fidelity.value(),
            deposition = self.params.deposition,
            decay_rate = self.params.decay_rate,
            steps = self.params.steps,
            "simulation started"
        );
        while !self.is_finished() {
            self.step();
        }
        let counts = self.counts();
        info!(
            followers = counts.following,
            explorers = counts.exploring,
            "simulation finished"
        );
        counts
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.params.steps
    }

    pub fn current_step(&self) -> u32 {
        self.step
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    pub fn colony(&self) -> &Colony {
        &self.colony
    }

    pub fn compass(&self) -> &Compass {
        self.stepper.compass()
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn counts(&self) -> ModeCounts {
        self.colony.count_by_mode()
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            step: self.step,
            field: self.field.snapshot(),
            agents: self.colony.snapshots(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;

    fn small_params(steps: u32, seed: u64) -> RunParameters {
        SimulationConfig {
            side_length: 32,
            steps,
            seed: Some(seed),
            ..SimulationConfig::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_run_records_one_entry_per_step() {
        let mut sim = Simulation::new(small_params(25, 9)).unwrap();
        let counts = sim.run();
        assert!(sim.is_finished());
        assert_eq!(sim.current_step(), 25);
        assert_eq!(sim.history().len(), 25);
        assert_eq!(sim.history()[0].step, 1);
        assert_eq!(sim.history().last().unwrap().counts, counts);
        assert_eq!(counts.total(), sim.colony().len());
    }

    #[test]
    fn test_same_seed_replays_the_same_run() {
        let mut a = Simulation::new(small_params(40, 1234)).unwrap();
        let mut b = Simulation::new(small_params(40, 1234)).unwrap();
        a.run();
        b.run();
        assert_eq!(a.history(), b.history());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_run_stops_at_configured_steps() {
        let mut sim = Simulation::new(small_params(3, 5)).unwrap();
        sim.run();
        sim.run();
        assert_eq!(sim.current_step(), 3);
        sim.step();
        assert_eq!(sim.current_step(), 4, "manual steps may go past the budget");
    }

    #[test]
    fn test_entropy_seed_is_recorded() {
        let mut params = small_params(1, 0);
        params.seed = None;
        let sim = Simulation::new(params).unwrap();
        assert!(sim.params.seed.is_some());
    }

    #[test]
    fn test_snapshot_matches_live_state() {
        let mut sim = Simulation::new(small_params(10, 77)).unwrap();
        sim.run();
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.step, 10);
        assert_eq!(snapshot.agents.len(), sim.colony().len());
        assert_eq!(snapshot.counts(), sim.counts());
        assert_eq!(snapshot.field.side_length, 32);
        for agent in &snapshot.agents {
            assert!(sim.field().contains(agent.x, agent.y));
        }
    }
}
