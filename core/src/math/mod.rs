pub mod fft;
pub mod geometry;
pub mod interp;
pub mod stats;

pub use fft::FftHelper;
pub use geometry::LocalFrame;
pub use interp::interp;
pub use stats::StatsHelper;
