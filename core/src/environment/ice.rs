/// Ambient temperature of the medium surrounding an antenna.
pub trait IceModel {
    /// Temperature in Kelvin at elevation `z` in meters (negative below the surface).
    fn temperature(&self, z: f64) -> f64;
}

/// South Pole ice temperature profile used by AraSim.
#[derive(Debug, Clone, Copy, Default)]
pub struct SouthPoleIce;

impl IceModel for SouthPoleIce {
    fn temperature(&self, z: f64) -> f64 {
        let depth = -z;
        let celsius =
            -51.0696 + depth * (2.677_54e-3 + depth * (-1.597_42e-7 + depth * 1.834_15e-9));
        celsius + 273.15
    }
}

/// Uniform temperature, independent of depth.
#[derive(Debug, Clone, Copy)]
pub struct ConstantTemperature(pub f64);

impl IceModel for ConstantTemperature {
    fn temperature(&self, _z: f64) -> f64 {
        self.0
    }
}
