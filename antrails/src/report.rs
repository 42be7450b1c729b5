//! Run outputs for external plotting.
//!
//! - [`RunReport`]: parameters plus the per-step follower/explorer counts, as JSON.
//! - [`save_snapshot`] / [`load_snapshot`]: field grid and live agents, as bincode.

use anyhow::{Context, Result};
use bincode::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use shared::{ModeCounts, RunSnapshot, StepRecord};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::RunParameters;
use crate::simulation::Simulation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub parameters: RunParameters,
    pub steps_run: u32,
    pub final_counts: ModeCounts,
    pub history: Vec<StepRecord>,
}

impl RunReport {
    pub fn from_simulation(sim: &Simulation) -> Self {
        Self {
            parameters: sim.params.clone(),
            steps_run: sim.current_step(),
            final_counts: sim.counts(),
            history: sim.history().to_vec(),
        }
    }

    /// Highest follower count seen over the run, with the step it occurred at.
    pub fn peak_followers(&self) -> Option<(u32, usize)> {
        self.history
            .iter()
            .max_by_key(|record| record.counts.following)
            .map(|record| (record.step, record.counts.following))
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write report '{}'", path.display()))?;
        info!(path = %path.display(), steps = self.steps_run, "report written");
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read report '{}'", path.display()))?;
        let report = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse report '{}'", path.display()))?;
        Ok(report)
    }
}

pub fn save_snapshot(snapshot: &RunSnapshot, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let data = encode_to_vec(snapshot, bincode::config::standard())
        .context("failed to encode snapshot")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write snapshot '{}'", path.display()))?;
    info!(
        path = %path.display(),
        step = snapshot.step,
        agents = snapshot.agents.len(),
        "snapshot written"
    );
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<RunSnapshot> {
    let data =
        fs::read(path).with_context(|| format!("failed to read snapshot '{}'", path.display()))?;
    let (snapshot, _len): (RunSnapshot, _) =
        decode_from_slice(&data, bincode::config::standard())
            .with_context(|| format!("failed to decode snapshot '{}'", path.display()))?;
    Ok(snapshot)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
    }
    Ok(())
}
