//! Composition of antenna, front end, tunnel diode and trigger for one channel.

pub mod preset;
pub mod report;
pub mod system;

pub use preset::{Polarization, ResponseTables};
pub use report::TriggerReport;
pub use system::{AntennaSystem, SystemOptions};
