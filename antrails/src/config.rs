use anyhow::{Context, Result};
use clap::ValueEnum;
use macroquad::prelude::Conf;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::simulation::{
    ConfigError, DEFAULT_DECAY_RATE, DEFAULT_DEPOSITION, DEFAULT_FIDELITY, DEFAULT_SIDE_LENGTH,
    DEFAULT_STEP_COUNT, DEFAULT_TURN_KERNEL, Fidelity, TurnKernel,
};

// Window constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 1080.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 1080.0;

/// Published trail-formation runs; each fixes the follower fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Figure {
    #[serde(rename = "3a")]
    #[value(name = "3a")]
    Fig3a,
    #[serde(rename = "3b")]
    #[value(name = "3b")]
    Fig3b,
    #[serde(rename = "3c")]
    #[value(name = "3c")]
    Fig3c,
}

impl Figure {
    pub fn fidelity(self) -> u32 {
        match self {
            Figure::Fig3a => 255,
            Figure::Fig3b => 251,
            Figure::Fig3c => 247,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Figure::Fig3a => "Figure 3a",
            Figure::Fig3b => "Figure 3b",
            Figure::Fig3c => "Figure 3c",
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub steps_per_second: f32,
    pub max_concentration: f32, // concentration drawn as full black
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            steps_per_second: 30.0,
            max_concentration: 84.0,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Loose, user-facing configuration as read from TOML and the command line.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub side_length: i64,
    pub fidelity: Option<u32>, // explicit value wins over the figure preset
    pub deposition: f32,
    pub decay_rate: f32,
    pub steps: u32,
    pub turn_kernel: [f64; 4],
    pub seed: Option<u64>,
    pub figure: Option<Figure>,
    pub viewer: ViewerConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            side_length: DEFAULT_SIDE_LENGTH as i64,
            fidelity: None,
            deposition: DEFAULT_DEPOSITION,
            decay_rate: DEFAULT_DECAY_RATE,
            steps: DEFAULT_STEP_COUNT,
            turn_kernel: DEFAULT_TURN_KERNEL,
            seed: None,
            figure: None,
            viewer: ViewerConfig::default(),
        }
    }
}

/// Validated parameters of a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    pub label: Option<String>,
    pub side_length: u32,
    pub fidelity: Fidelity,
    pub deposition: f32,
    pub decay_rate: f32,
    pub steps: u32,
    pub turn_kernel: TurnKernel,
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn effective_fidelity(&self) -> u32 {
        self.fidelity
            .or(self.figure.map(Figure::fidelity))
            .unwrap_or(DEFAULT_FIDELITY)
    }

    pub fn validate(&self) -> Result<RunParameters, ConfigError> {
        if self.side_length <= 0 || self.side_length % 2 != 0 || self.side_length > u32::MAX as i64
        {
            return Err(ConfigError::InvalidSideLength {
                side_length: self.side_length,
            });
        }
        check_rate("deposition", self.deposition)?;
        check_rate("decay_rate", self.decay_rate)?;
        if self.steps == 0 {
            return Err(ConfigError::InvalidStepCount);
        }

        Ok(RunParameters {
            label: self.figure.map(|f| f.label().to_string()),
            side_length: self.side_length as u32,
            fidelity: Fidelity::new(self.effective_fidelity())?,
            deposition: self.deposition,
            decay_rate: self.decay_rate,
            steps: self.steps,
            turn_kernel: TurnKernel::new(self.turn_kernel)?,
            seed: self.seed,
        })
    }
}

fn check_rate(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidRate { name, value });
    }
    Ok(())
}

/// Loads the simulation configuration from a TOML file or uses defaults.
pub fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            let config: SimulationConfig = toml::from_str(&content)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => {
            info!("no config file provided, using defaults");
            Ok(SimulationConfig::default())
        }
    }
}

pub fn window_conf(viewer: &ViewerConfig, title: &str) -> Conf {
    Conf {
        window_title: title.to_owned(),
        window_width: viewer.window_width as i32,
        window_height: viewer.window_height as i32,
        high_dpi: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_figure_3a_run() {
        let params = SimulationConfig::default().validate().unwrap();
        assert_eq!(params.side_length, 256);
        assert_eq!(params.fidelity.value(), 255);
        assert_eq!(params.deposition, 12.0);
        assert_eq!(params.decay_rate, 1.0);
        assert_eq!(params.steps, 1500);
        assert_eq!(params.turn_kernel, TurnKernel::default());
        assert_eq!(params.label, None);
    }

    #[test]
    fn test_figure_sets_fidelity_unless_overridden() {
        let mut config = SimulationConfig {
            figure: Some(Figure::Fig3c),
            ..SimulationConfig::default()
        };
        let params = config.validate().unwrap();
        assert_eq!(params.fidelity.value(), 247);
        assert_eq!(params.label.as_deref(), Some("Figure 3c"));

        config.fidelity = Some(200);
        assert_eq!(config.validate().unwrap().fidelity.value(), 200);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            side_length = 64
            figure = "3b"
            seed = 17

            [viewer]
            steps_per_second = 5.0
            "#,
        )
        .unwrap();
        assert_eq!(config.side_length, 64);
        assert_eq!(config.figure, Some(Figure::Fig3b));
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.steps, DEFAULT_STEP_COUNT);
        assert_eq!(config.viewer.steps_per_second, 5.0);
        assert_eq!(config.viewer.max_concentration, 84.0);
        assert_eq!(config.effective_fidelity(), 251);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = |config: SimulationConfig| config.validate().unwrap_err();
        assert_eq!(
            bad(SimulationConfig {
                side_length: -4,
                ..SimulationConfig::default()
            }),
            ConfigError::InvalidSideLength { side_length: -4 }
        );
        assert_eq!(
            bad(SimulationConfig {
                side_length: 7,
                ..SimulationConfig::default()
            }),
            ConfigError::InvalidSideLength { side_length: 7 }
        );
        assert_eq!(
            bad(SimulationConfig {
                fidelity: Some(300),
                ..SimulationConfig::default()
            }),
            ConfigError::InvalidFidelity { fidelity: 300 }
        );
        assert!(matches!(
            bad(SimulationConfig {
                decay_rate: -1.0,
                ..SimulationConfig::default()
            }),
            ConfigError::InvalidRate {
                name: "decay_rate",
                ..
            }
        ));
        assert!(matches!(
            bad(SimulationConfig {
                deposition: f32::NAN,
                ..SimulationConfig::default()
            }),
            ConfigError::InvalidRate {
                name: "deposition",
                ..
            }
        ));
        assert_eq!(
            bad(SimulationConfig {
                steps: 0,
                ..SimulationConfig::default()
            }),
            ConfigError::InvalidStepCount
        );
        assert!(matches!(
            bad(SimulationConfig {
                turn_kernel: [0.9, 0.9, 0.0, 0.0],
                ..SimulationConfig::default()
            }),
            ConfigError::InvalidTurnKernel(_)
        ));
    }

    #[test]
    fn test_load_config_without_path_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), SimulationConfig::default());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/antrails.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
