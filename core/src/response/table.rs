use crate::prelude::{AntennaError, AntennaResult};
use crate::response::data::{GridPoint, ResponseData};

/// Angular spacing of the measurement grid in degrees.
pub const GRID_STEP_DEG: i32 = 5;
const THETA_STEPS: usize = 36;
const PHI_STEPS: usize = 72;
const CELL_POINTS: usize = THETA_STEPS * PHI_STEPS;

/// Dense, immutable gain/phase grid over frequency x theta x phi.
///
/// Theta covers `[0, 180)` and phi `[0, 360)` in 5 degree steps. A table with
/// no frequencies stands for a flat unity response.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    frequencies: Vec<f64>,
    grid: Vec<Vec<GridPoint>>,
}

impl ResponseTable {
    /// Table meaning "no measured response": unity gain at every frequency.
    pub fn flat() -> Self {
        Self::default()
    }

    /// Builds the dense grid, failing if any frequency lacks an angle on the grid.
    ///
    /// Points off the grid (e.g. theta = 180) are dropped since interpolation
    /// wraps onto the equivalent grid point instead.
    pub fn from_data(data: &ResponseData) -> AntennaResult<Self> {
        let mut frequencies = data.frequencies().to_vec();
        frequencies.sort_by(|a, b| a.total_cmp(b));

        let mut grid = Vec::with_capacity(frequencies.len());
        for &frequency in &frequencies {
            let mut points = Vec::with_capacity(CELL_POINTS);
            for theta_idx in 0..THETA_STEPS {
                for phi_idx in 0..PHI_STEPS {
                    let theta = theta_idx as i32 * GRID_STEP_DEG;
                    let phi = phi_idx as i32 * GRID_STEP_DEG;
                    let point = data.get(frequency, theta, phi).ok_or(
                        AntennaError::IncompleteGrid {
                            frequency,
                            theta,
                            phi,
                        },
                    )?;
                    points.push(point);
                }
            }
            grid.push(points);
        }

        Ok(Self { frequencies, grid })
    }

    /// Frequencies in ascending order.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.frequencies.len() * CELL_POINTS
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn gain_at(&self, frequency: f64, theta_deg: i32, phi_deg: i32) -> Option<f64> {
        self.point(frequency, theta_deg, phi_deg).map(|p| p.gain)
    }

    pub fn phase_at(&self, frequency: f64, theta_deg: i32, phi_deg: i32) -> Option<f64> {
        self.point(frequency, theta_deg, phi_deg).map(|p| p.phase)
    }

    fn point(&self, frequency: f64, theta_deg: i32, phi_deg: i32) -> Option<GridPoint> {
        if theta_deg % GRID_STEP_DEG != 0 || phi_deg % GRID_STEP_DEG != 0 {
            return None;
        }
        if !(0..180).contains(&theta_deg) || !(0..360).contains(&phi_deg) {
            return None;
        }
        let freq_idx = self
            .frequencies
            .iter()
            .position(|f| f.to_bits() == frequency.to_bits())?;
        let theta_idx = (theta_deg / GRID_STEP_DEG) as usize;
        let phi_idx = (phi_deg / GRID_STEP_DEG) as usize;
        Some(self.grid[freq_idx][theta_idx * PHI_STEPS + phi_idx])
    }

    /// Bilinearly interpolated gain at every tabulated frequency for angles in radians.
    ///
    /// Returns parallel `(frequencies, gains)` vectors, or `([1], [1])` for a
    /// flat table. Phase is not folded into the gain.
    pub fn interpolated_gain(&self, theta: f64, phi: f64) -> (Vec<f64>, Vec<f64>) {
        if self.is_empty() {
            return (vec![1.0], vec![1.0]);
        }

        let (theta_under, theta_over, t) =
            grid_cell(theta.to_degrees().rem_euclid(180.0), THETA_STEPS);
        let (phi_under, phi_over, u) = grid_cell(phi.to_degrees().rem_euclid(360.0), PHI_STEPS);

        let w00 = (1.0 - t) * (1.0 - u);
        let w10 = t * (1.0 - u);
        let w01 = (1.0 - t) * u;
        let w11 = t * u;

        let gains = self
            .grid
            .iter()
            .map(|points| {
                let g00 = points[theta_under * PHI_STEPS + phi_under].gain;
                let g10 = points[theta_over * PHI_STEPS + phi_under].gain;
                let g01 = points[theta_under * PHI_STEPS + phi_over].gain;
                let g11 = points[theta_over * PHI_STEPS + phi_over].gain;
                w00 * g00 + w10 * g10 + w01 * g01 + w11 * g11
            })
            .collect();

        (self.frequencies.clone(), gains)
    }
}

/// Lower index, wrapped upper index and fractional weight of the cell holding `angle` (degrees).
fn grid_cell(angle: f64, steps: usize) -> (usize, usize, f64) {
    let step = GRID_STEP_DEG as f64;
    let cell = (angle / step).floor();
    let weight = ((angle - cell * step) / step).clamp(0.0, 1.0);
    // rem_euclid can round up to the full period for tiny negative inputs
    let under = (cell as usize) % steps;
    let over = (under + 1) % steps;
    (under, over, weight)
}
