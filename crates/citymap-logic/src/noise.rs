//! Lattice value noise.
//!
//! A `(size+1)×(size+1)` lattice of independent [`SeededRng`] draws,
//! sampled with smoothstep-weighted bilinear interpolation. Sampling uses
//! only `+`, `*` and `floor`, so results are reproducible across
//! implementations that share IEEE-754 doubles.

use crate::rng::SeededRng;
use thiserror::Error;

/// Errors from lattice construction and direct lattice access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoiseError {
    #[error("noise lattice size must be at least 1")]
    ZeroSize,
    #[error("lattice point ({x},{y}) is outside the 0..={size} lattice")]
    LatticeOutOfBounds { x: usize, y: usize, size: usize },
}

/// Smooth 2D value-noise field over `[0, size]²`.
#[derive(Debug, Clone)]
pub struct ValueNoise2D {
    size: usize,
    lattice: Vec<f64>,
}

impl ValueNoise2D {
    /// Precompute the lattice. Draws are taken row by row, `x` fastest.
    pub fn new(size: usize, seed: i32) -> Result<Self, NoiseError> {
        if size == 0 {
            return Err(NoiseError::ZeroSize);
        }
        let mut rng = SeededRng::new(seed);
        let points = (size + 1) * (size + 1);
        let lattice = (0..points).map(|_| rng.next_f64()).collect();
        Ok(Self { size, lattice })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw lattice value. Unlike [`sample`](Self::sample) this does not clamp.
    pub fn lattice_value(&self, x: usize, y: usize) -> Result<f64, NoiseError> {
        if x > self.size || y > self.size {
            return Err(NoiseError::LatticeOutOfBounds {
                x,
                y,
                size: self.size,
            });
        }
        Ok(self.at(x, y))
    }

    /// Interpolated value at `(x, y)`, in `[0, 1)`.
    ///
    /// The enclosing cell is clamped to the lattice; the fractional offset
    /// is not, so points far outside the lattice still vary smoothly with
    /// their fractional part.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let fx = x.floor();
        let fy = y.floor();
        let max_cell = (self.size - 1) as f64;
        let xi = fx.clamp(0.0, max_cell) as usize;
        let yi = fy.clamp(0.0, max_cell) as usize;
        let x1 = (xi + 1).min(self.size);
        let y1 = (yi + 1).min(self.size);

        let sx = smoothstep(x - fx);
        let sy = smoothstep(y - fy);

        let top = self.at(xi, yi) * (1.0 - sx) + self.at(x1, yi) * sx;
        let bot = self.at(xi, y1) * (1.0 - sx) + self.at(x1, y1) * sx;
        top * (1.0 - sy) + bot * sy
    }

    fn at(&self, x: usize, y: usize) -> f64 {
        self.lattice[y * (self.size + 1) + x]
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}
