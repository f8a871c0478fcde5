//! Solver boundary.
//!
//! A [`MixSolver`] takes a fully specified [`CapacityModel`] and returns a
//! [`SolverResponse`]: a terminal status plus, when optimal, a value for each
//! variable. [`MilpSolver`] implements it on `good_lp` with the pure-Rust
//! `microlp` branch-and-bound backend.

use std::collections::BTreeMap;

use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use tracing::{debug, info, warn};

use super::model::{
    CapacityModel, Direction, LinearExpr, MixVariable, Relation, VariableDomain,
};

/// Terminal status reported by a solver
#[derive(Debug, Clone, PartialEq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error(String),
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Unbounded => write!(f, "unbounded"),
            SolveStatus::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl From<ResolutionError> for SolveStatus {
    fn from(error: ResolutionError) -> Self {
        match error {
            ResolutionError::Infeasible => SolveStatus::Infeasible,
            ResolutionError::Unbounded => SolveStatus::Unbounded,
            other => SolveStatus::Error(other.to_string()),
        }
    }
}

/// What comes back across the solver boundary
#[derive(Debug, Clone, PartialEq)]
pub struct SolverResponse {
    pub status: SolveStatus,
    pub values: BTreeMap<MixVariable, f64>,
    pub objective: Option<f64>,
}

impl SolverResponse {
    pub fn optimal(values: BTreeMap<MixVariable, f64>, objective: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective: Some(objective),
        }
    }

    /// A non-optimal response carries no assignment
    pub fn failed(status: SolveStatus) -> Self {
        Self {
            status,
            values: BTreeMap::new(),
            objective: None,
        }
    }
}

/// Anything that can solve a capacity model
#[cfg_attr(test, mockall::automock)]
pub trait MixSolver {
    fn solve(&self, model: &CapacityModel) -> SolverResponse;
}

/// MILP solver backed by good_lp + microlp
#[derive(Debug, Clone, Copy, Default)]
pub struct MilpSolver;

impl MilpSolver {
    pub fn new() -> Self {
        Self
    }
}

fn to_expression(expr: &LinearExpr, vars: &BTreeMap<MixVariable, Variable>) -> Expression {
    expr.terms
        .iter()
        .map(|(v, c)| *c * vars[v])
        .sum::<Expression>()
}

impl MixSolver for MilpSolver {
    fn solve(&self, model: &CapacityModel) -> SolverResponse {
        let mut problem = ProblemVariables::new();

        let mut vars = BTreeMap::new();
        for decl in &model.variables {
            let mut definition = variable().min(decl.lower).name(decl.variable.name());
            if let Some(upper) = decl.upper {
                definition = definition.max(upper);
            }
            if decl.domain == VariableDomain::Integer {
                definition = definition.integer();
            }
            vars.insert(decl.variable, problem.add(definition));
        }

        // Constraints may reference variables that were not declared; reject
        // the model rather than index-panic inside the translation.
        let undeclared = model
            .constraints
            .iter()
            .flat_map(|c| c.lhs.terms.iter())
            .chain(model.objective.expr.terms.iter())
            .find(|(v, _)| !vars.contains_key(v));
        if let Some((v, _)) = undeclared {
            warn!(variable = %v, "model references an undeclared variable");
            return SolverResponse::failed(SolveStatus::Error(format!(
                "variable {} is not declared",
                v
            )));
        }

        let objective = to_expression(&model.objective.expr, &vars);
        let unsolved = match model.objective.direction {
            Direction::Minimise => problem.minimise(objective),
            Direction::Maximise => problem.maximise(objective),
        };
        let mut solver_model = unsolved.using(microlp);

        for c in &model.constraints {
            let lhs = to_expression(&c.lhs, &vars);
            let translated = match c.relation {
                Relation::GreaterOrEqual => constraint::geq(lhs, c.rhs),
                Relation::Equal => constraint::eq(lhs, c.rhs),
                Relation::LessOrEqual => constraint::leq(lhs, c.rhs),
            };
            debug!(label = c.label, relation = %c.relation, rhs = c.rhs, "adding constraint");
            solver_model = solver_model.with(translated);
        }

        info!(model = model.name, "solving");
        match solver_model.solve() {
            Ok(solution) => {
                let values: BTreeMap<MixVariable, f64> = vars
                    .iter()
                    .map(|(name, var)| (*name, solution.value(*var)))
                    .collect();
                let objective = model.objective.expr.evaluate(&values);
                info!(objective, "solver finished: optimal");
                SolverResponse::optimal(values, objective)
            }
            Err(error) => {
                let status = SolveStatus::from(error);
                warn!(%status, "solver finished without an optimum");
                SolverResponse::failed(status)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlanParameters;
    use crate::optimizer::model::build_model;

    #[test]
    fn test_resolution_error_mapping() {
        assert_eq!(
            SolveStatus::from(ResolutionError::Infeasible),
            SolveStatus::Infeasible
        );
        assert_eq!(
            SolveStatus::from(ResolutionError::Unbounded),
            SolveStatus::Unbounded
        );
        assert!(matches!(
            SolveStatus::from(ResolutionError::Str("boom".to_string())),
            SolveStatus::Error(_)
        ));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolveStatus::Optimal.to_string(), "optimal");
        assert_eq!(
            SolveStatus::Error("no licence".to_string()).to_string(),
            "error: no licence"
        );
    }

    #[test]
    fn test_milp_solver_default_model() {
        let model = build_model(&PlanParameters::default());
        let response = MilpSolver::new().solve(&model);

        assert_eq!(response.status, SolveStatus::Optimal);
        assert_eq!(response.values.len(), 5);
        let turbines = response.values[&MixVariable::GasTurbines];
        assert!((turbines - 3.0).abs() < 1e-6, "turbines = {}", turbines);
        let objective = response.objective.unwrap();
        assert!((objective - 189_366.666_666).abs() < 1e-2, "objective = {}", objective);
    }

    #[test]
    fn test_milp_solver_reports_infeasible() {
        let mut params = PlanParameters::default();
        params.limits.max_solar_mw = Some(100.0);
        let response = MilpSolver::new().solve(&build_model(&params));

        assert_eq!(response.status, SolveStatus::Infeasible);
        assert!(response.values.is_empty());
        assert_eq!(response.objective, None);
    }

    #[test]
    fn test_milp_solver_rejects_undeclared_variable() {
        let mut model = build_model(&PlanParameters::default());
        model
            .variables
            .retain(|d| d.variable != MixVariable::BatteryUnits);
        let response = MilpSolver::new().solve(&model);

        assert!(matches!(response.status, SolveStatus::Error(_)));
    }
}
