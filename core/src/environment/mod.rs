pub mod ice;

pub use ice::{ConstantTemperature, IceModel, SouthPoleIce};
