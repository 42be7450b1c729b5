use macroquad::prelude::*;

/// Minimum zoom level (whole lattice in view)
const MIN_ZOOM: f32 = 1.0;
/// Maximum zoom level, a few cells across
const MAX_ZOOM: f32 = 40.0;
/// Fraction of the current zoom applied per wheel notch
const ZOOM_SPEED: f32 = 0.1;

/// Zoom and pan over the square lattice, keeping the view inside it.
pub struct LatticeCamera {
    /// Zoom level (1.0 shows the whole lattice, higher values zoom in)
    zoom: f32,

    /// Lattice side, in cells
    side_length: u32,

    /// The macroquad camera used for world-space drawing
    pub camera: Camera2D,
}

impl LatticeCamera {
    pub fn new(side_length: u32) -> Self {
        let half = side_length as f32 / 2.0;
        let mut camera = Self {
            zoom: 1.0,
            side_length,
            camera: Camera2D {
                target: vec2(half, half),
                ..Default::default()
            },
        };
        camera.update_camera_zoom();
        camera
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Zooms around the cell under the cursor.
    pub fn adjust_zoom(&mut self, wheel_movement: f32) {
        let old_zoom = self.zoom;
        let mouse_screen_pos = Vec2::from(mouse_position());
        let mouse_world_pos = self.camera.screen_to_world(mouse_screen_pos);

        self.zoom = (self.zoom - wheel_movement * self.zoom * ZOOM_SPEED).clamp(MIN_ZOOM, MAX_ZOOM);

        if old_zoom != self.zoom {
            self.update_camera_zoom();
            let new_mouse_world_pos = self.camera.screen_to_world(mouse_screen_pos);
            self.move_by(mouse_world_pos - new_mouse_world_pos);
        }
    }

    pub fn move_by(&mut self, movement: Vec2) {
        self.camera.target += movement;
        self.clamp_to_lattice();
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.camera.screen_to_world(screen)
    }

    /// Recomputes the projection after a window resize.
    pub fn handle_resize(&mut self) {
        self.update_camera_zoom();
        self.clamp_to_lattice();
    }

    fn side(&self) -> f32 {
        self.side_length as f32
    }

    fn screen_ratio() -> f32 {
        screen_width() / screen_height()
    }

    fn update_camera_zoom(&mut self) {
        // Square lattice: stretch whichever screen axis is longer.
        let ratio = Self::screen_ratio();
        let (horizontal, vertical) = if ratio >= 1.0 {
            (1.0 / ratio, 1.0)
        } else {
            (1.0, ratio)
        };
        let base = 2.0 / self.side() * self.zoom;
        self.camera.zoom = vec2(base * horizontal, base * vertical);
    }

    fn clamp_to_lattice(&mut self) {
        let ratio = Self::screen_ratio();
        let view = self.side() / self.zoom;
        let (horizontal_view, vertical_view) = if ratio >= 1.0 {
            (view * ratio, view)
        } else {
            (view, view / ratio)
        };
        let side = self.side();
        self.camera.target.x = clamp_axis(self.camera.target.x, horizontal_view, side);
        self.camera.target.y = clamp_axis(self.camera.target.y, vertical_view, side);
    }
}

fn clamp_axis(value: f32, view_size: f32, side: f32) -> f32 {
    let min = view_size / 2.0;
    let max = side - min;
    if max < min { side / 2.0 } else { value.clamp(min, max) }
}
