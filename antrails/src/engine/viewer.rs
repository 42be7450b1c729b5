use macroquad::prelude::*;
use shared::Mode;
use tracing::{info, warn};

use super::{CameraAction, Renderer};
use crate::config::ViewerConfig;
use crate::simulation::Simulation;

const MAX_STEPS_PER_FRAME: u32 = 64; // avoids a spiral after a stalled frame

/// Turns wall-clock frame time into a number of simulation steps.
#[derive(Debug, Clone, PartialEq)]
pub struct StepClock {
    interval: f32,
    accumulator: f32,
}

impl StepClock {
    pub fn new(steps_per_second: f32) -> Self {
        let interval = if steps_per_second > 0.0 {
            1.0 / steps_per_second
        } else {
            f32::INFINITY
        };
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    /// Steps due after `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.interval.is_finite() {
            return 0;
        }
        self.accumulator += dt.max(0.0);
        let due = (self.accumulator / self.interval).floor() as u32;
        self.accumulator -= due as f32 * self.interval;
        if due > MAX_STEPS_PER_FRAME {
            self.accumulator = 0.0;
            return MAX_STEPS_PER_FRAME;
        }
        due
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Whether `.` advances the paused run this frame. Ignored while panning.
fn single_step_allowed(
    requested: bool,
    paused: bool,
    finished: bool,
    camera_action: CameraAction,
) -> bool {
    requested && paused && !finished && camera_action != CameraAction::Drag
}

/// Live window over a running simulation.
///
/// Space pauses, `.` advances a single step while paused, the wheel zooms and
/// a right-button drag pans. Once the configured steps are done the last frame
/// stays on screen until the window is closed or Escape is pressed.
pub struct Viewer {
    sim: Simulation,
    renderer: Renderer,
    clock: StepClock,
    highlight: Option<Mode>,
    paused: bool,
}

impl Viewer {
    pub fn new(sim: Simulation, config: &ViewerConfig, highlight: Option<Mode>) -> Self {
        if config.steps_per_second <= 0.0 {
            warn!(
                steps_per_second = config.steps_per_second,
                "viewer will only advance with single steps"
            );
        }
        let renderer = Renderer::new(sim.params.side_length, config.max_concentration);
        Self {
            sim,
            renderer,
            clock: StepClock::new(config.steps_per_second),
            highlight,
            paused: false,
        }
    }

    pub async fn run(mut self) {
        let (mut last_width, mut last_height) = (screen_width(), screen_height());
        let mut announced = false;
        loop {
            if is_key_pressed(KeyCode::Escape) {
                break;
            }
            if (screen_width(), screen_height()) != (last_width, last_height) {
                (last_width, last_height) = (screen_width(), screen_height());
                self.renderer.camera.handle_resize();
            }
            self.handle_input();
            self.advance(get_frame_time());

            if self.sim.is_finished() && !announced {
                announced = true;
                let counts = self.sim.counts();
                info!(
                    step = self.sim.current_step(),
                    followers = counts.following,
                    explorers = counts.exploring,
                    "viewer run finished"
                );
            }

            self.renderer.render(&self.sim, self.highlight, self.paused);
            next_frame().await;
        }
    }

    fn handle_input(&mut self) {
        self.renderer.process_mouse_wheel_zoom();
        let camera_action = self.renderer.process_mouse_drag_pan();

        if is_key_pressed(KeyCode::Space) {
            self.paused = !self.paused;
            self.clock.reset();
        }
        let wants_step = is_key_pressed(KeyCode::Period);
        if single_step_allowed(wants_step, self.paused, self.sim.is_finished(), camera_action) {
            self.sim.step();
        }
    }

    fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        for _ in 0..self.clock.advance(dt) {
            if self.sim.is_finished() {
                break;
            }
            self.sim.step();
        }
    }
}
