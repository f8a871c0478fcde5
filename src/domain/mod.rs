pub mod params;
pub mod plan;

pub use params::*;
pub use plan::*;
