use nalgebra::Vector3;

use crate::prelude::{AntennaError, AntennaResult};

const NORM_EPSILON: f64 = 1e-12;

pub fn normalize(vector: &Vector3<f64>) -> AntennaResult<Vector3<f64>> {
    vector
        .try_normalize(NORM_EPSILON)
        .ok_or_else(|| AntennaError::InvalidInput(format!("cannot normalize {:?}", vector)))
}

/// Unit vector orthogonal to `axis`.
///
/// Built from the world basis vector least aligned with `axis`, so the choice
/// is deterministic for a given orientation.
pub fn orthogonal_axis(axis: &Vector3<f64>) -> AntennaResult<Vector3<f64>> {
    let axis = normalize(axis)?;
    let (abs_x, abs_y, abs_z) = (axis.x.abs(), axis.y.abs(), axis.z.abs());
    let helper = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::x()
    } else if abs_y <= abs_z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    normalize(&axis.cross(&helper))
}

/// Right-handed antenna frame: `z` is the orientation, `x` is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFrame {
    origin: Vector3<f64>,
    x_axis: Vector3<f64>,
    y_axis: Vector3<f64>,
    z_axis: Vector3<f64>,
}

impl LocalFrame {
    pub fn new(origin: Vector3<f64>, orientation: &Vector3<f64>) -> AntennaResult<Self> {
        let z_axis = normalize(orientation)?;
        let x_axis = orthogonal_axis(&z_axis)?;
        let y_axis = z_axis.cross(&x_axis);
        Ok(Self {
            origin,
            x_axis,
            y_axis,
            z_axis,
        })
    }

    pub fn origin(&self) -> &Vector3<f64> {
        &self.origin
    }

    pub fn x_axis(&self) -> &Vector3<f64> {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Vector3<f64> {
        &self.y_axis
    }

    pub fn z_axis(&self) -> &Vector3<f64> {
        &self.z_axis
    }

    /// Spherical `(r, theta, phi)` of a world-space point seen from this frame.
    ///
    /// `theta` is the polar angle from the z-axis in `[0, pi]`, `phi` the
    /// azimuth from the x-axis toward the y-axis in `(-pi, pi]`.
    pub fn to_local_spherical(&self, point: &Vector3<f64>) -> (f64, f64, f64) {
        let diff = point - self.origin;
        let x = diff.dot(&self.x_axis);
        let y = diff.dot(&self.y_axis);
        let z = diff.dot(&self.z_axis);
        let r = diff.norm();
        if r == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let theta = (z / r).clamp(-1.0, 1.0).acos();
        let phi = y.atan2(x);
        (r, theta, phi)
    }
}
