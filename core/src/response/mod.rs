//! Tabulated antenna gain/phase measurements and their angular interpolation.

pub mod data;
pub mod parser;
pub mod table;

pub use data::{GridPoint, ResponseData, ResponseKey};
pub use parser::{load_response_file, parse_response_data, read_response_data};
pub use table::ResponseTable;
