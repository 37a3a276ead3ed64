//! Antenna response and trigger chain for ARA-style in-ice radio detectors.
//!
//! Incident waveforms are filtered through an empirical, angle-dependent
//! antenna response, amplified and clipped, passed through a tunnel diode
//! envelope model, and compared against a noise-calibrated trigger band.

pub mod antenna;
pub mod detector;
pub mod environment;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod response;
pub mod telemetry;

pub use antenna::SPEED_OF_LIGHT;
pub use detector::{AntennaSystem, Polarization, ResponseTables, SystemOptions};
pub use prelude::{
    AntennaError, AntennaResult, Detector, ProcessingStage, Receiver, ValueType, Waveform,
};
