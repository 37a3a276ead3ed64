pub mod front_end;
pub mod trigger;
pub mod tunnel_diode;

pub use front_end::AnalogFrontEnd;
pub use trigger::{NoiseCalibration, TriggerDecision};
pub use tunnel_diode::{DiodeCoefficients, TunnelDiodeEnvelope, DIODE_COEFFICIENTS};
