//! Solver-agnostic description of the capacity-planning program.
//!
//! The model is a plain data structure: five decision variables, four
//! labelled linear constraints and one linear objective. Backends translate
//! it into their own representation (see [`crate::optimizer::solver`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::debug;

use crate::domain::PlanParameters;

pub const MODEL_NAME: &str = "Energy Mix Optimization";

/// Decision variables of the energy mix model
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumIter, IntoStaticStr,
)]
pub enum MixVariable {
    #[strum(serialize = "Solar_Capacity")]
    SolarCapacity,
    #[strum(serialize = "Battery_Capacity")]
    BatteryCapacity,
    #[strum(serialize = "Gas_Capacity")]
    GasCapacity,
    #[strum(serialize = "Battery_Units")]
    BatteryUnits,
    #[strum(serialize = "Gas_Turbines")]
    GasTurbines,
}

impl MixVariable {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn domain(self) -> VariableDomain {
        match self {
            MixVariable::SolarCapacity
            | MixVariable::BatteryCapacity
            | MixVariable::GasCapacity => VariableDomain::Continuous,
            MixVariable::BatteryUnits | MixVariable::GasTurbines => VariableDomain::Integer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableDomain {
    Continuous,
    Integer,
}

/// A declared variable: non-negative, optionally bounded above
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    pub variable: MixVariable,
    pub domain: VariableDomain,
    pub lower: f64,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    GreaterOrEqual,
    Equal,
    LessOrEqual,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::GreaterOrEqual => write!(f, ">="),
            Relation::Equal => write!(f, "=="),
            Relation::LessOrEqual => write!(f, "<="),
        }
    }
}

/// Weighted sum of decision variables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    pub terms: Vec<(MixVariable, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, variable: MixVariable, coefficient: f64) -> Self {
        self.terms.push((variable, coefficient));
        self
    }

    pub fn coefficient(&self, variable: MixVariable) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| *v == variable)
            .map(|(_, c)| c)
            .sum()
    }

    /// Evaluate against an assignment; unassigned variables count as zero
    pub fn evaluate(&self, values: &BTreeMap<MixVariable, f64>) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v).copied().unwrap_or(0.0))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    pub label: &'static str,
    pub lhs: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Check the constraint with a tolerance scaled by the rhs magnitude
    pub fn is_satisfied(&self, values: &BTreeMap<MixVariable, f64>, tolerance: f64) -> bool {
        let lhs = self.lhs.evaluate(values);
        let slack = tolerance * self.rhs.abs().max(1.0);
        match self.relation {
            Relation::GreaterOrEqual => lhs >= self.rhs - slack,
            Relation::Equal => (lhs - self.rhs).abs() <= slack,
            Relation::LessOrEqual => lhs <= self.rhs + slack,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Minimise,
    Maximise,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub direction: Direction,
    pub expr: LinearExpr,
}

/// Complete mathematical program handed to a solver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityModel {
    pub name: &'static str,
    pub variables: Vec<VariableDecl>,
    pub constraints: Vec<LinearConstraint>,
    pub objective: Objective,
}

impl CapacityModel {
    pub fn constraint(&self, label: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.label == label)
    }

    /// Label of the first constraint the assignment violates, if any
    pub fn first_violation(
        &self,
        values: &BTreeMap<MixVariable, f64>,
        tolerance: f64,
    ) -> Option<&'static str> {
        self.constraints
            .iter()
            .find(|c| !c.is_satisfied(values, tolerance))
            .map(|c| c.label)
    }
}

pub const DEMAND_FULFILLMENT: &str = "Demand_Fulfillment";
pub const RENEWABLE_MINIMUM: &str = "Renewable_Minimum";
pub const BATTERY_UNIT_DEFINITION: &str = "Battery_Unit_Definition";
pub const GAS_TURBINE_DEFINITION: &str = "Gas_Turbine_Definition";

/// Declare the variables, constraints and objective for a parameter set.
///
/// Battery and gas costs are charged per discrete unit and turbine, not per
/// MWh or MW of capacity.
pub fn build_model(params: &PlanParameters) -> CapacityModel {
    use MixVariable::*;

    let variables: Vec<VariableDecl> = MixVariable::iter()
        .map(|variable| VariableDecl {
            variable,
            domain: variable.domain(),
            lower: 0.0,
            upper: match variable {
                SolarCapacity => params.limits.max_solar_mw,
                BatteryUnits => params.limits.max_battery_units.map(f64::from),
                GasTurbines => params.limits.max_gas_turbines.map(f64::from),
                BatteryCapacity | GasCapacity => None,
            },
        })
        .collect();

    let constraints = vec![
        LinearConstraint {
            label: DEMAND_FULFILLMENT,
            lhs: LinearExpr::new()
                .term(SolarCapacity, params.solar_cuf)
                .term(BatteryCapacity, params.battery_efficiency)
                .term(GasCapacity, 1.0),
            relation: Relation::GreaterOrEqual,
            rhs: params.demand_mw,
        },
        LinearConstraint {
            label: RENEWABLE_MINIMUM,
            lhs: LinearExpr::new().term(SolarCapacity, params.solar_cuf),
            relation: Relation::GreaterOrEqual,
            rhs: params.renewable_requirement_mw(),
        },
        // capacity - units * unit_size == 0
        LinearConstraint {
            label: BATTERY_UNIT_DEFINITION,
            lhs: LinearExpr::new()
                .term(BatteryCapacity, 1.0)
                .term(BatteryUnits, -params.battery_unit_capacity_mwh),
            relation: Relation::Equal,
            rhs: 0.0,
        },
        LinearConstraint {
            label: GAS_TURBINE_DEFINITION,
            lhs: LinearExpr::new()
                .term(GasCapacity, 1.0)
                .term(GasTurbines, -params.gas_turbine_capacity_mw),
            relation: Relation::Equal,
            rhs: 0.0,
        },
    ];

    let objective = Objective {
        direction: Direction::Minimise,
        expr: LinearExpr::new()
            .term(SolarCapacity, params.solar_cost_per_mw)
            .term(BatteryUnits, params.battery_cost_per_unit)
            .term(GasTurbines, params.gas_cost_per_turbine),
    };

    debug!(
        variables = variables.len(),
        constraints = constraints.len(),
        "built capacity model"
    );

    CapacityModel {
        name: MODEL_NAME,
        variables,
        constraints,
        objective,
    }
}
