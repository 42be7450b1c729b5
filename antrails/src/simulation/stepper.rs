use super::ant::{Agent, Fidelity, TurnKernel};
use super::colony::{AgentKey, Colony};
use super::pheromone::PheromoneField;
use super::random::RandomSource;

use shared::{Compass, ModeCounts};

/// What a single tick did to the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub spawned: AgentKey,
    pub moved: usize,
    pub retired: usize,
}

/// Per-tick protocol: spawn, deposit and move every live agent, retire, decay.
#[derive(Debug, Clone)]
pub struct PopulationStepper {
    /// Direction table shared by every agent.
    compass: Compass,
    /// Turn weights handed to each spawned agent.
    kernel: TurnKernel,
    /// Chance out of 257 that an agent tries to follow on a tick.
    fidelity: Fidelity,
    /// Pheromone laid per agent per tick (tau).
    deposition: f32,
    /// Subtracted from every cell once per tick.
    decay_rate: f32,
}

impl PopulationStepper {
    pub fn new(
        compass: Compass,
        kernel: TurnKernel,
        fidelity: Fidelity,
        deposition: f32,
        decay_rate: f32,
    ) -> Self {
        Self {
            compass,
            kernel,
            fidelity,
            deposition,
            decay_rate,
        }
    }

    pub fn compass(&self) -> &Compass {
        &self.compass
    }

    pub fn fidelity(&self) -> Fidelity {
        self.fidelity
    }

    /// Advances the colony and field by one tick.
    ///
    /// Each agent deposits on the cell it stands on before it turns and moves,
    /// and later agents in the same tick see the deposits of earlier ones. The
    /// field decays once, after every agent has acted.
    pub fn tick(
        &self,
        colony: &mut Colony,
        field: &mut PheromoneField,
        rng: &mut dyn RandomSource,
    ) -> TickSummary {
        let origin = field.origin_cell();
        let spawned = colony.spawn(Agent::new(origin, origin, self.kernel, rng));

        let mut moved = 0;
        for (_, agent) in colony.iter_mut() {
            if !agent.active {
                continue;
            }
            field.lay(agent.x, agent.y, self.deposition);
            agent.update_heading(field, &self.compass, self.fidelity, rng);
            if agent.attempt_move(field, &self.compass) {
                moved += 1;
            }
        }

        let retired = colony.retire_inactive();
        field.decay(self.decay_rate);

        TickSummary {
            spawned,
            moved,
            retired,
        }
    }

    pub fn count_by_mode(colony: &Colony) -> ModeCounts {
        colony.count_by_mode()
    }
}
