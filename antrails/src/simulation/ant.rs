use super::random::RandomSource;
use super::{ConfigError, DEFAULT_TURN_KERNEL, FIDELITY_BUCKETS, PheromoneField};

use serde::{Deserialize, Serialize};
use shared::{AgentSnapshot, Compass, HEADING_COUNT, Mode};
use tracing::trace;

/// Scaled probability (out of [`FIDELITY_BUCKETS`]) of following the trail on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Fidelity(u16);

impl Fidelity {
    pub const MAX: u32 = FIDELITY_BUCKETS - 1;

    pub fn new(value: u32) -> Result<Self, ConfigError> {
        if value > Self::MAX {
            return Err(ConfigError::InvalidFidelity { fidelity: value });
        }
        Ok(Self(value as u16))
    }

    pub fn value(self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u32> for Fidelity {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fidelity> for u32 {
    fn from(fidelity: Fidelity) -> Self {
        fidelity.value()
    }
}

/// Weights B1..B4 for turning 45°, 90°, 135° and 180° while exploring.
///
/// Whatever the weights leave short of 1 is the chance of going straight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct TurnKernel {
    weights: [f64; 4],
    normalized: [f64; 4],
    stay_probability: f64,
}

impl TurnKernel {
    /// Slack allowed on the weight sum before it counts as exceeding 1.
    const SUM_TOLERANCE: f64 = 1e-9;

    pub fn new(weights: [f64; 4]) -> Result<Self, ConfigError> {
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ConfigError::InvalidTurnKernel(format!(
                "weights must be finite and non-negative, got {}",
                bad
            )));
        }
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(ConfigError::InvalidTurnKernel(
                "at least one weight must be positive".to_string(),
            ));
        }
        if sum > 1.0 + Self::SUM_TOLERANCE {
            return Err(ConfigError::InvalidTurnKernel(format!(
                "weights sum to {}, leaving a negative chance of going straight",
                sum
            )));
        }
        Ok(Self {
            weights,
            normalized: weights.map(|w| w / sum),
            stay_probability: (1.0 - sum).max(0.0),
        })
    }

    pub fn weights(&self) -> [f64; 4] {
        self.weights
    }

    /// Weights scaled to sum to 1.
    pub fn normalized(&self) -> [f64; 4] {
        self.normalized
    }

    pub fn stay_probability(&self) -> f64 {
        self.stay_probability
    }

    /// Maps a uniform draw in `[0, 1)` onto a turn magnitude in `1..=4`.
    pub fn magnitude_for(&self, draw: f64) -> i32 {
        let mut cumulative = 0.0;
        for (i, &p) in self.normalized.iter().enumerate() {
            cumulative += p;
            if p > 0.0 && draw < cumulative {
                return i as i32 + 1;
            }
        }
        // Rounding left the cumulative sum just under 1: take the last reachable magnitude.
        self.normalized
            .iter()
            .rposition(|&p| p > 0.0)
            .map_or(1, |i| i as i32 + 1)
    }
}

impl Default for TurnKernel {
    fn default() -> Self {
        let sum: f64 = DEFAULT_TURN_KERNEL.iter().sum();
        Self {
            weights: DEFAULT_TURN_KERNEL,
            normalized: DEFAULT_TURN_KERNEL.map(|w| w / sum),
            stay_probability: 1.0 - sum,
        }
    }
}

impl TryFrom<[f64; 4]> for TurnKernel {
    type Error = ConfigError;

    fn try_from(weights: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<TurnKernel> for [f64; 4] {
    fn from(kernel: TurnKernel) -> Self {
        kernel.weights
    }
}

/// Outcome of comparing the three cells ahead of a follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDecision {
    Straight,
    Right,
    Left,
    /// Neither side dominates and forward does not either.
    LostTrail,
}

impl FollowDecision {
    /// Compares forward, right-forward and left-forward concentrations, in that order.
    pub fn from_concentrations(forward: f32, right: f32, left: f32) -> Self {
        if forward > right && forward > left {
            FollowDecision::Straight
        } else if right > left {
            FollowDecision::Right
        } else if right < left {
            FollowDecision::Left
        } else {
            FollowDecision::LostTrail
        }
    }
}

/// State of an agent.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Lattice column
    pub x: i32,
    /// Lattice row, growing downward
    pub y: i32,
    /// Octant index into the compass, `0..8` clockwise from up
    pub heading: u8,
    /// Mode chosen on the latest tick
    pub mode: Mode,
    /// Cleared when a move would leave the lattice
    pub active: bool,
    kernel: TurnKernel,
}

impl Agent {
    /// Create a new exploring agent facing a random octant.
    pub fn new(x: i32, y: i32, kernel: TurnKernel, rng: &mut dyn RandomSource) -> Self {
        let heading = rng.below(HEADING_COUNT as u32) as u8;
        Self::with_heading(x, y, heading, kernel)
    }

    pub fn with_heading(x: i32, y: i32, heading: u8, kernel: TurnKernel) -> Self {
        Self {
            x,
            y,
            heading: heading % HEADING_COUNT,
            mode: Mode::Exploring,
            active: true,
            kernel,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn kernel(&self) -> &TurnKernel {
        &self.kernel
    }

    pub fn stay_probability(&self) -> f64 {
        self.kernel.stay_probability()
    }

    /// Sets the mode from a text label such as `"explorer"` or `"follower"`.
    pub fn set_mode_label(&mut self, label: &str) -> Result<Mode, ConfigError> {
        self.mode = label.parse::<Mode>()?;
        Ok(self.mode)
    }

    /// Draws from `0..257`; below `fidelity` means following this tick.
    pub fn choose_mode(&mut self, fidelity: Fidelity, rng: &mut dyn RandomSource) -> Mode {
        let mode = if rng.below(FIDELITY_BUCKETS) < fidelity.value() {
            Mode::Following
        } else {
            Mode::Exploring
        };
        if mode != self.mode {
            trace!(x = self.x, y = self.y, from = %self.mode, to = %mode, "mode switch");
        }
        self.mode = mode;
        mode
    }

    /// Random turn in octants: 0 with the stay probability, else ±1..=4 weighted by the kernel.
    pub fn explore_turn(&self, rng: &mut dyn RandomSource) -> i32 {
        if rng.unit() < self.kernel.stay_probability() {
            return 0;
        }
        let magnitude = self.kernel.magnitude_for(rng.unit());
        if rng.coin() { magnitude } else { -magnitude }
    }

    /// Concentrations forward, right-forward and left-forward of the current heading.
    pub fn sense_ahead(&self, field: &PheromoneField, compass: &Compass) -> (f32, f32, f32) {
        let sense = |heading: u8| {
            let (dx, dy) = compass.offset(heading);
            field.read(self.x + dx, self.y + dy)
        };
        (
            sense(self.heading),
            sense(Compass::turn(self.heading, 1)),
            sense(Compass::turn(self.heading, -1)),
        )
    }

    /// Follows the strongest cell ahead. Losing the trail drops the agent back
    /// to exploring and resolves this tick's turn with [`Agent::explore_turn`].
    pub fn follow_turn(
        &mut self,
        field: &PheromoneField,
        compass: &Compass,
        rng: &mut dyn RandomSource,
    ) -> i32 {
        let (forward, right, left) = self.sense_ahead(field, compass);
        match FollowDecision::from_concentrations(forward, right, left) {
            FollowDecision::Straight => 0,
            FollowDecision::Right => 1,
            FollowDecision::Left => -1,
            FollowDecision::LostTrail => {
                trace!(x = self.x, y = self.y, "trail lost");
                self.mode = Mode::Exploring;
                self.explore_turn(rng)
            }
        }
    }

    pub fn update_heading(
        &mut self,
        field: &PheromoneField,
        compass: &Compass,
        fidelity: Fidelity,
        rng: &mut dyn RandomSource,
    ) {
        let delta = match self.choose_mode(fidelity, rng) {
            Mode::Exploring => self.explore_turn(rng),
            Mode::Following => self.follow_turn(field, compass, rng),
        };
        self.heading = Compass::turn(self.heading, delta);
    }

    /// Steps one cell along the heading. Leaving the lattice deactivates the
    /// agent and leaves its position untouched.
    pub fn attempt_move(&mut self, field: &PheromoneField, compass: &Compass) -> bool {
        if !self.active {
            return false;
        }
        let (dx, dy) = compass.offset(self.heading);
        let (next_x, next_y) = (self.x + dx, self.y + dy);
        if !field.contains(next_x, next_y) {
            self.active = false;
            return false;
        }
        self.x = next_x;
        self.y = next_y;
        true
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            x: self.x,
            y: self.y,
            heading: self.heading,
            mode: self.mode,
            active: self.active,
        }
    }
}
