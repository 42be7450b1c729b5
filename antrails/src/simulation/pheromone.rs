use shared::FieldSnapshot;

use super::error::ConfigError;

/// Square lattice of trail pheromone concentration.
///
/// Cells outside `[0, side_length)²` behave as a pheromone-free halo: reads
/// return zero and writes are dropped.
#[derive(Debug, Clone)]
pub struct PheromoneField {
    side_length: u32,
    data: Vec<Vec<f32>>,
}

impl PheromoneField {
    pub fn new(side_length: u32) -> Result<Self, ConfigError> {
        if side_length == 0 || side_length % 2 != 0 {
            return Err(ConfigError::InvalidSideLength {
                side_length: side_length as i64,
            });
        }
        let side = side_length as usize;
        Ok(Self {
            side_length,
            data: vec![vec![0.0; side]; side],
        })
    }

    pub fn side_length(&self) -> u32 {
        self.side_length
    }

    /// Spawn point on both axes; exactly centered since the side is even.
    pub fn origin_cell(&self) -> i32 {
        (self.side_length / 2) as i32
    }

    #[inline(always)]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let side = self.side_length as i32;
        x >= 0 && y >= 0 && x < side && y < side
    }

    #[inline(always)]
    pub fn read(&self, x: i32, y: i32) -> f32 {
        if !self.contains(x, y) {
            return 0.0;
        }
        self.data[y as usize][x as usize]
    }

    /// Stores `value` as is; negative intermediates are cleared by the next [`decay`](Self::decay).
    #[inline(always)]
    pub fn write(&mut self, x: i32, y: i32, value: f32) {
        if !self.contains(x, y) {
            return;
        }
        self.data[y as usize][x as usize] = value;
    }

    /// Adds `amount` on top of whatever the cell already holds.
    #[inline(always)]
    pub fn lay(&mut self, x: i32, y: i32, amount: f32) {
        let current = self.read(x, y);
        self.write(x, y, current + amount);
    }

    /// Subtracts `rate` from every cell and floors the result at zero.
    pub fn decay(&mut self, rate: f32) {
        for row in &mut self.data {
            for cell in row.iter_mut() {
                *cell = (*cell - rate).max(0.0);
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.iter().map(|row| row.as_slice())
    }

    pub fn total(&self) -> f32 {
        self.rows().flat_map(|row| row.iter()).sum()
    }

    pub fn max(&self) -> f32 {
        self.rows()
            .flat_map(|row| row.iter().copied())
            .fold(0.0, f32::max)
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            side_length: self.side_length,
            data: self.rows().flat_map(|row| row.iter().copied()).collect(),
        }
    }
}
