//! Energy mix capacity planning.
//!
//! Builds a small mixed-integer linear program choosing solar, battery and
//! gas capacity that meets a constant demand at minimum cost, with a
//! minimum renewable share, and solves it through a pluggable
//! [`optimizer::MixSolver`].

pub mod config;
pub mod domain;
pub mod error;
pub mod optimizer;
pub mod report;
pub mod telemetry;

pub use domain::{BuildLimits, CapacityPlan, PlanParameters};
pub use error::PlanError;
pub use optimizer::{build_and_solve, plan, MilpSolver, MixSolver};
