pub mod ant;
mod colony;
mod error;
mod pheromone;
pub mod random;
mod sim;
mod stepper;

// Re-export key types for easier imports
pub use ant::{Agent, Fidelity, FollowDecision, TurnKernel};
pub use colony::{AgentKey, Colony};
pub use error::ConfigError;
pub use pheromone::PheromoneField;
pub use random::{RandomSource, ReplaySource, SeededSource};
pub use sim::Simulation;
pub use stepper::{PopulationStepper, TickSummary};

// Lattice defaults (Figure 3a)
pub const DEFAULT_SIDE_LENGTH: u32 = 256;
pub const DEFAULT_FIDELITY: u32 = 255;
pub const DEFAULT_DEPOSITION: f32 = 12.0; // tau, pheromone laid per agent per tick
pub const DEFAULT_DECAY_RATE: f32 = 1.0; // subtracted from every cell once per tick
pub const DEFAULT_STEP_COUNT: u32 = 1500;

// Agent behavior constants
pub const FIDELITY_BUCKETS: u32 = 257; // mode draw is uniform over 0..257
pub const DEFAULT_TURN_KERNEL: [f64; 4] = [0.360, 0.047, 0.008, 0.004]; // B1..B4
