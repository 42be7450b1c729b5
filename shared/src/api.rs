use bincode_derive::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of compass octants an agent can face.
pub const HEADING_COUNT: u8 = 8;

/// Behavior mode of an agent for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum Mode {
    /// Random walk driven by the turn kernel.
    #[serde(rename = "explorer")]
    Exploring,
    /// Local comparison of the three cells ahead.
    #[serde(rename = "follower")]
    Following,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Exploring => "explorer",
            Mode::Following => "follower",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid mode '{0}': expected 'explorer' or 'follower'")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explorer" | "exploring" => Ok(Mode::Exploring),
            "follower" | "following" => Ok(Mode::Following),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Public view of one agent at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct AgentSnapshot {
    pub x: i32,
    pub y: i32,
    pub heading: u8,
    pub mode: Mode,
    pub active: bool,
}

/// Population split by behavior mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ModeCounts {
    pub exploring: usize,
    pub following: usize,
}

impl ModeCounts {
    pub fn record(&mut self, mode: Mode) {
        match mode {
            Mode::Exploring => self.exploring += 1,
            Mode::Following => self.following += 1,
        }
    }

    pub fn get(&self, mode: Mode) -> usize {
        match mode {
            Mode::Exploring => self.exploring,
            Mode::Following => self.following,
        }
    }

    pub fn total(&self) -> usize {
        self.exploring + self.following
    }
}

/// Counts logged after a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct StepRecord {
    pub step: u32,
    pub counts: ModeCounts,
}

/// Row-major copy of the concentration grid (`data[y * side_length + x]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct FieldSnapshot {
    pub side_length: u32,
    pub data: Vec<f32>,
}

impl FieldSnapshot {
    /// Concentration at `(x, y)`, zero off the lattice.
    pub fn get(&self, x: i32, y: i32) -> f32 {
        let side = self.side_length as i32;
        if x < 0 || y < 0 || x >= side || y >= side {
            return 0.0;
        }
        self.data[(y * side + x) as usize]
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }
}

/// Field and live agents at a given step, exported for external plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct RunSnapshot {
    pub step: u32,
    pub field: FieldSnapshot,
    pub agents: Vec<AgentSnapshot>,
}

impl RunSnapshot {
    pub fn counts(&self) -> ModeCounts {
        let mut counts = ModeCounts::default();
        for agent in self.agents.iter().filter(|a| a.active) {
            counts.record(agent.mode);
        }
        counts
    }
}
