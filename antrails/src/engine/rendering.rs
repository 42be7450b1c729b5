use super::{
    AGENT_COLOR, AGENT_LENGTH, BACKGROUND_COLOR, HIGHLIGHT_COLOR, LatticeCamera,
    MIN_VISIBLE_CONCENTRATION, STATUS_TEXT_COLOR,
};
use crate::simulation::Simulation;
use macroquad::prelude::*;
use shared::Mode;

/// Camera input handled during a frame.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CameraAction {
    Drag,
    Zoom,
    None,
}

/// Grey level for a concentration: 1.0 (white) for an empty cell, 0.0 at `vmax` and above.
pub fn grey_level(concentration: f32, vmax: f32) -> f32 {
    if vmax <= 0.0 {
        return if concentration > 0.0 { 0.0 } else { 1.0 };
    }
    1.0 - (concentration / vmax).clamp(0.0, 1.0)
}

/// Draws the field, the agents and a status line.
pub struct Renderer {
    pub camera: LatticeCamera,
    max_concentration: f32,
    is_dragging: bool,
    drag_start_world_pos: Vec2,
}

impl Renderer {
    pub fn new(side_length: u32, max_concentration: f32) -> Self {
        Self {
            camera: LatticeCamera::new(side_length),
            max_concentration,
            is_dragging: false,
            drag_start_world_pos: Vec2::ZERO,
        }
    }

    pub fn process_mouse_wheel_zoom(&mut self) -> CameraAction {
        let wheel_movement = mouse_wheel().1;
        if wheel_movement != 0.0 {
            self.camera.adjust_zoom(-wheel_movement.signum());
            return CameraAction::Zoom;
        }
        CameraAction::None
    }

    /// Right-button drag pans the view.
    pub fn process_mouse_drag_pan(&mut self) -> CameraAction {
        let mouse = Vec2::from(mouse_position());
        if is_mouse_button_pressed(MouseButton::Right) {
            self.is_dragging = true;
            self.drag_start_world_pos = self.camera.screen_to_world(mouse);
        }
        if !self.is_dragging {
            return CameraAction::None;
        }
        if is_mouse_button_released(MouseButton::Right) {
            self.is_dragging = false;
        }

        let offset = self.camera.screen_to_world(mouse) - self.drag_start_world_pos;
        if offset.length_squared() > 0.01 {
            self.camera.move_by(-offset);
            return CameraAction::Drag;
        }
        CameraAction::None
    }

    pub fn render(&self, sim: &Simulation, highlight: Option<Mode>, paused: bool) {
        clear_background(BACKGROUND_COLOR);
        set_camera(&self.camera.camera);
        self.draw_field(sim);
        self.draw_agents(sim, highlight);

        set_default_camera();
        self.draw_status(sim, paused);
    }

    fn draw_field(&self, sim: &Simulation) {
        for (y, row) in sim.field().rows().enumerate() {
            for (x, &concentration) in row.iter().enumerate() {
                if concentration < MIN_VISIBLE_CONCENTRATION {
                    continue;
                }
                let level = grey_level(concentration, self.max_concentration);
                draw_rectangle(x as f32, y as f32, 1.0, 1.0, Color::new(level, level, level, 1.0));
            }
        }
    }

    fn draw_agents(&self, sim: &Simulation, highlight: Option<Mode>) {
        let compass = sim.compass();
        for (_, agent) in sim.colony().iter() {
            let color = if highlight == Some(agent.mode) {
                HIGHLIGHT_COLOR
            } else {
                AGENT_COLOR
            };
            let (dx, dy) = compass.unit_vector(agent.heading);
            let dir = vec2(dx, dy);
            let side = vec2(-dy, dx);
            let center = vec2(agent.x as f32 + 0.5, agent.y as f32 + 0.5);

            let tip = center + dir * (AGENT_LENGTH * 0.6);
            let back = center - dir * (AGENT_LENGTH * 0.4);
            let half_width = AGENT_LENGTH * 0.3;
            draw_triangle(tip, back + side * half_width, back - side * half_width, color);
        }
    }

    fn draw_status(&self, sim: &Simulation, paused: bool) {
        let counts = sim.counts();
        let mut status = format!(
            "step {}/{}   followers {}   explorers {}   zoom {:.1}x",
            sim.current_step(),
            sim.params.steps,
            counts.following,
            counts.exploring,
            self.camera.zoom(),
        );
        if let Some(label) = &sim.params.label {
            status = format!("{label}   {status}");
        }
        if sim.is_finished() {
            status.push_str("   [finished]");
        } else if paused {
            status.push_str("   [paused]");
        }
        draw_rectangle(0.0, 0.0, screen_width(), 28.0, Color::new(1.0, 1.0, 1.0, 0.8));
        draw_text(&status, 10.0, 20.0, 20.0, STATUS_TEXT_COLOR);
    }
}
