pub mod model;
pub mod planner;
pub mod solver;

pub use model::*;
pub use planner::*;
pub use solver::*;
