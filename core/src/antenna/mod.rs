//! Antenna model: orientation, passband, directional gain and thermal noise.

pub mod config;
pub mod model;
pub mod noise;
pub mod passband;

pub use config::AntennaConfig;
pub use model::AntennaModel;
pub use noise::ThermalNoise;
pub use passband::ButterworthBandpass;

/// Speed of light (m/s), rounded as in the half-wave dipole height and travel times.
pub const SPEED_OF_LIGHT: f64 = 3e8;
