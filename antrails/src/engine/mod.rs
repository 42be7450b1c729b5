mod camera;
mod rendering;
mod viewer;

pub use camera::LatticeCamera;
pub use rendering::{CameraAction, Renderer, grey_level};
pub use viewer::{StepClock, Viewer};

use macroquad::prelude::Color;

// Rendering constants
pub const BACKGROUND_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);
pub const AGENT_COLOR: Color = Color::new(0.85, 0.1, 0.1, 1.0);
pub const HIGHLIGHT_COLOR: Color = Color::new(0.95, 0.75, 0.1, 1.0);
pub const STATUS_TEXT_COLOR: Color = Color::new(0.1, 0.1, 0.12, 1.0);
pub const AGENT_LENGTH: f32 = 1.6; // in cells
pub const MIN_VISIBLE_CONCENTRATION: f32 = 0.01;
