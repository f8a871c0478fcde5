use std::collections::BTreeMap;

use tracing::{info, warn};

use super::model::{build_model, CapacityModel, MixVariable};
use super::solver::{MilpSolver, MixSolver, SolveStatus, SolverResponse};
use crate::domain::{CapacityPlan, PlanParameters};
use crate::error::PlanError;

/// How far an integer variable may drift from a whole number
const INTEGRALITY_TOLERANCE: f64 = 1e-5;

/// Build the model for `params`, solve it once with `solver` and turn the
/// response into a plan.
pub fn plan<S: MixSolver + ?Sized>(
    params: &PlanParameters,
    solver: &S,
) -> Result<CapacityPlan, PlanError> {
    params.check()?;

    let model = build_model(params);
    let response = solver.solve(&model);

    match response.status {
        SolveStatus::Optimal => extract_plan(params, &model, &response),
        SolveStatus::Infeasible => {
            warn!(demand_mw = params.demand_mw, "capacity model is infeasible");
            Err(PlanError::Infeasible)
        }
        SolveStatus::Unbounded => {
            warn!("capacity model is unbounded");
            Err(PlanError::Unbounded)
        }
        SolveStatus::Error(msg) => Err(PlanError::Solver(msg)),
    }
}

/// [`plan`] with the bundled MILP backend
pub fn build_and_solve(params: &PlanParameters) -> Result<CapacityPlan, PlanError> {
    plan(params, &MilpSolver::new())
}

fn value_of(values: &BTreeMap<MixVariable, f64>, variable: MixVariable) -> Result<f64, PlanError> {
    values
        .get(&variable)
        .copied()
        .ok_or_else(|| PlanError::MissingValue(variable.name().to_string()))
}

fn snap_count(value: f64, variable: MixVariable) -> Result<u64, PlanError> {
    let rounded = value.round();
    if !value.is_finite() || rounded < 0.0 || (value - rounded).abs() > INTEGRALITY_TOLERANCE {
        return Err(PlanError::Solver(format!(
            "{} = {} is not a non-negative integer",
            variable, value
        )));
    }
    Ok(rounded as u64)
}

fn extract_plan(
    params: &PlanParameters,
    model: &CapacityModel,
    response: &SolverResponse,
) -> Result<CapacityPlan, PlanError> {
    let values = &response.values;

    for variable in [MixVariable::BatteryCapacity, MixVariable::GasCapacity] {
        value_of(values, variable)?;
    }
    let solar = value_of(values, MixVariable::SolarCapacity)?;
    if !solar.is_finite() {
        return Err(PlanError::Solver(format!(
            "{} = {} is not finite",
            MixVariable::SolarCapacity,
            solar
        )));
    }
    let battery_units = snap_count(
        value_of(values, MixVariable::BatteryUnits)?,
        MixVariable::BatteryUnits,
    )?;
    let gas_turbines = snap_count(
        value_of(values, MixVariable::GasTurbines)?,
        MixVariable::GasTurbines,
    )?;

    // Capacities are recomputed from the snapped counts so they stay exact
    // multiples of the unit sizes.
    let mut plan = CapacityPlan {
        solar_capacity_mw: solar.max(0.0),
        battery_capacity_mwh: battery_units as f64 * params.battery_unit_capacity_mwh,
        battery_units,
        gas_capacity_mw: gas_turbines as f64 * params.gas_turbine_capacity_mw,
        gas_turbines,
        total_cost: 0.0,
        gas_heat_rate_mmbtu_per_kwh: params.gas_heat_rate_mmbtu_per_kwh,
    };
    plan.total_cost = model.objective.expr.evaluate(&plan.values());

    if let Some(reported) = response.objective {
        if (reported - plan.total_cost).abs() > 1e-6 * reported.abs().max(1.0) {
            warn!(
                reported,
                recomputed = plan.total_cost,
                "solver objective differs from snapped plan cost"
            );
        }
    }

    info!(
        solar_mw = plan.solar_capacity_mw,
        battery_units = plan.battery_units,
        gas_turbines = plan.gas_turbines,
        total_cost = plan.total_cost,
        "capacity plan ready"
    );

    Ok(plan)
}
