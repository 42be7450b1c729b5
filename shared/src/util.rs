use crate::HEADING_COUNT;

/// Lattice step `(dx, dy)` for each heading, clockwise from "up" (y grows downward).
pub const DIRECTION_VECTORS: [(i32, i32); HEADING_COUNT as usize] = [
    (0, -1),  // 0: Up
    (1, -1),  // 1: Up-Right
    (1, 0),   // 2: Right
    (1, 1),   // 3: Down-Right
    (0, 1),   // 4: Down
    (-1, 1),  // 5: Down-Left
    (-1, 0),  // 6: Left
    (-1, -1), // 7: Up-Left
];

/// Marker rotation in degrees for each heading, counter-clockwise positive.
pub const DIRECTION_TO_ANGLE: [f32; HEADING_COUNT as usize] =
    [0.0, -45.0, -90.0, -135.0, 180.0, 135.0, 90.0, 45.0];

/// Direction table handed to agents and renderers.
///
/// `heading ± 1 (mod 8)` means "45° right/left of the current heading" only
/// because the vectors are enumerated clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Compass {
    vectors: [(i32, i32); HEADING_COUNT as usize],
    marker_angles: [f32; HEADING_COUNT as usize],
}

impl Compass {
    pub fn new(
        vectors: [(i32, i32); HEADING_COUNT as usize],
        marker_angles: [f32; HEADING_COUNT as usize],
    ) -> Self {
        Self {
            vectors,
            marker_angles,
        }
    }

    /// Lattice step for `heading`.
    #[inline(always)]
    pub fn offset(&self, heading: u8) -> (i32, i32) {
        self.vectors[(heading % HEADING_COUNT) as usize]
    }

    pub fn marker_angle(&self, heading: u8) -> f32 {
        self.marker_angles[(heading % HEADING_COUNT) as usize]
    }

    /// Unit-length version of [`Compass::offset`], for drawing.
    pub fn unit_vector(&self, heading: u8) -> (f32, f32) {
        let (dx, dy) = self.offset(heading);
        let len = ((dx * dx + dy * dy) as f32).sqrt();
        if len == 0.0 {
            return (0.0, 0.0);
        }
        (dx as f32 / len, dy as f32 / len)
    }

    /// Applies a signed turn of `delta` octants, wrapping into `0..8`.
    #[inline(always)]
    pub fn turn(heading: u8, delta: i32) -> u8 {
        (heading as i32 + delta).rem_euclid(HEADING_COUNT as i32) as u8
    }
}

impl Default for Compass {
    fn default() -> Self {
        Self::new(DIRECTION_VECTORS, DIRECTION_TO_ANGLE)
    }
}
