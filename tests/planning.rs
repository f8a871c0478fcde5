//! End-to-end planning tests against the bundled MILP backend.

use energy_mix_planner::optimizer::{build_model, MilpSolver, MixSolver, SolveStatus};
use energy_mix_planner::report::render_text;
use energy_mix_planner::{build_and_solve, plan, BuildLimits, PlanError, PlanParameters};
use proptest::prelude::*;

const TOL: f64 = 1e-6;

#[test]
fn test_reference_scenario_optimum() {
    let params = PlanParameters::default();
    let plan = build_and_solve(&params).unwrap();

    // 0.3 * solar >= 70, gas covers the remaining 30 MW at 900 per turbine
    assert!((plan.solar_capacity_mw - 700.0 / 3.0).abs() < 1e-4);
    assert_eq!(plan.gas_turbines, 3);
    assert_eq!(plan.battery_units, 0);
    assert!((plan.total_cost - 189_366.666_67).abs() < 1e-2);

    assert_eq!(
        render_text(&plan),
        "Optimal Solar Capacity: 233.33 MW\n\
         Optimal Battery Capacity: 0.00 MWh\n\
         Optimal Battery Units: 0\n\
         Optimal Gas Capacity: 30.00 MW\n\
         Optimal Gas Turbines: 3\n"
    );
}

#[test]
fn test_reference_scenario_constraints_hold() {
    let params = PlanParameters::default();
    let plan = build_and_solve(&params).unwrap();

    let supply = plan.solar_capacity_mw * 0.3 + plan.battery_capacity_mwh * 0.88 + plan.gas_capacity_mw;
    assert!(supply >= 100.0 - TOL);
    assert!(plan.solar_capacity_mw * 0.3 >= 70.0 - TOL);
    assert!(plan.solar_capacity_mw >= 233.33 - TOL);
    assert_eq!(plan.battery_capacity_mwh, plan.battery_units as f64);
    assert_eq!(plan.gas_capacity_mw, 10.0 * plan.gas_turbines as f64);
    assert!(plan.solar_capacity_mw >= 0.0);
    assert!(plan.battery_capacity_mwh >= 0.0);
    assert!(plan.gas_capacity_mw >= 0.0);
    assert!(plan.verify(&params, TOL).is_ok());
}

#[test]
fn test_resolving_is_idempotent() {
    let params = PlanParameters::default();
    let first = build_and_solve(&params).unwrap();
    let second = build_and_solve(&params).unwrap();
    assert!((first.total_cost - second.total_cost).abs() < 1e-6);
}

#[test]
fn test_zero_demand_without_renewable_floor() {
    let params = PlanParameters {
        demand_mw: 0.0,
        renewable_share: 0.0,
        ..PlanParameters::default()
    };
    let plan = build_and_solve(&params).unwrap();

    assert!(plan.solar_capacity_mw.abs() < TOL);
    assert_eq!(plan.battery_units, 0);
    assert_eq!(plan.gas_turbines, 0);
    assert!(plan.total_cost.abs() < TOL);
}

#[test]
fn test_solar_limit_below_renewable_floor_is_infeasible() {
    let params = PlanParameters {
        limits: BuildLimits {
            max_solar_mw: Some(100.0),
            ..BuildLimits::default()
        },
        ..PlanParameters::default()
    };
    assert_eq!(build_and_solve(&params).unwrap_err(), PlanError::Infeasible);
}

#[test]
fn test_turbine_limit_shifts_to_battery() {
    let params = PlanParameters {
        limits: BuildLimits {
            max_gas_turbines: Some(2),
            ..BuildLimits::default()
        },
        ..PlanParameters::default()
    };
    let plan = build_and_solve(&params).unwrap();

    // 20 MW gas, the remaining 10 MW from ceil(10 / 0.88) = 12 battery units
    assert_eq!(plan.gas_turbines, 2);
    assert_eq!(plan.battery_units, 12);
    assert!(plan.verify(&params, TOL).is_ok());
}

#[test]
fn test_negative_cost_rejected() {
    let params = PlanParameters {
        gas_cost_per_turbine: -900.0,
        ..PlanParameters::default()
    };
    assert!(matches!(
        build_and_solve(&params),
        Err(PlanError::InvalidParameters(_))
    ));
}

#[test]
fn test_solver_usable_as_trait_object() {
    let solver: Box<dyn MixSolver> = Box::new(MilpSolver::new());
    let params = PlanParameters::default();

    let response = solver.solve(&build_model(&params));
    assert_eq!(response.status, SolveStatus::Optimal);

    let planned = plan(&params, solver.as_ref()).unwrap();
    assert_eq!(planned.gas_turbines, 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_solved_plans_satisfy_model(
        demand in 0.0f64..400.0,
        share in 0.0f64..1.0,
        turbine_cost in 100.0f64..5000.0,
    ) {
        let params = PlanParameters {
            demand_mw: demand,
            renewable_share: share,
            gas_cost_per_turbine: turbine_cost,
            ..PlanParameters::default()
        };
        let plan = build_and_solve(&params).unwrap();

        prop_assert!(plan.verify(&params, TOL).is_ok());
        prop_assert!(plan.solar_capacity_mw * params.solar_cuf >= share * demand - 1e-4);
        prop_assert_eq!(plan.gas_capacity_mw, plan.gas_turbines as f64 * 10.0);
    }
}
