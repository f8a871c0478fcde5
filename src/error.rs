use thiserror::Error;

/// Errors produced while planning the energy mix
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("Invalid planning parameters: {0}")]
    InvalidParameters(String),

    #[error("Model is infeasible: constraints cannot be satisfied simultaneously")]
    Infeasible,

    #[error("Model is unbounded: cost can decrease without limit")]
    Unbounded,

    #[error("Solver failed: {0}")]
    Solver(String),

    #[error("Solver returned no value for {0}")]
    MissingValue(String),
}

impl PlanError {
    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::InvalidParameters(_) => "invalid_parameters",
            PlanError::Infeasible => "infeasible",
            PlanError::Unbounded => "unbounded",
            PlanError::Solver(_) => "solver_error",
            PlanError::MissingValue(_) => "missing_value",
        }
    }
}

impl From<validator::ValidationErrors> for PlanError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PlanError::InvalidParameters(errors.to_string())
    }
}
