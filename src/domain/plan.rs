use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::PlanParameters;
use crate::optimizer::model::{build_model, MixVariable};

/// Solved capacity plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityPlan {
    pub solar_capacity_mw: f64,
    pub battery_capacity_mwh: f64,
    pub battery_units: u64,
    pub gas_capacity_mw: f64,
    pub gas_turbines: u64,
    /// Objective value ($)
    pub total_cost: f64,
    /// Heat rate carried over from the parameters, for fuel figures
    pub gas_heat_rate_mmbtu_per_kwh: f64,
}

/// A plan that breaks one of the model constraints
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub constraint: &'static str,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "constraint {} violated", self.constraint)
    }
}

impl CapacityPlan {
    pub fn values(&self) -> BTreeMap<MixVariable, f64> {
        BTreeMap::from([
            (MixVariable::SolarCapacity, self.solar_capacity_mw),
            (MixVariable::BatteryCapacity, self.battery_capacity_mwh),
            (MixVariable::GasCapacity, self.gas_capacity_mw),
            (MixVariable::BatteryUnits, self.battery_units as f64),
            (MixVariable::GasTurbines, self.gas_turbines as f64),
        ])
    }

    /// Average solar output (MW)
    pub fn renewable_output_mw(&self, params: &PlanParameters) -> f64 {
        self.solar_capacity_mw * params.solar_cuf
    }

    /// Supply counted against demand (MW)
    pub fn firm_supply_mw(&self, params: &PlanParameters) -> f64 {
        self.renewable_output_mw(params)
            + self.battery_capacity_mwh * params.battery_efficiency
            + self.gas_capacity_mw
    }

    /// Fuel heat input with the whole gas fleet at nameplate (MMBTU/h)
    pub fn gas_heat_input_mmbtu_per_hour(&self) -> f64 {
        self.gas_capacity_mw * 1000.0 * self.gas_heat_rate_mmbtu_per_kwh
    }

    /// Re-check every model constraint and non-negativity against `params`
    pub fn verify(&self, params: &PlanParameters, tolerance: f64) -> Result<(), Violation> {
        if self.solar_capacity_mw < 0.0
            || self.battery_capacity_mwh < 0.0
            || self.gas_capacity_mw < 0.0
        {
            return Err(Violation {
                constraint: "Non_Negativity",
            });
        }

        let model = build_model(params);
        match model.first_violation(&self.values(), tolerance) {
            Some(constraint) => Err(Violation { constraint }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::model::DEMAND_FULFILLMENT;

    fn reference_plan() -> CapacityPlan {
        CapacityPlan {
            solar_capacity_mw: 700.0 / 3.0,
            battery_capacity_mwh: 0.0,
            battery_units: 0,
            gas_capacity_mw: 30.0,
            gas_turbines: 3,
            total_cost: 189_366.67,
            gas_heat_rate_mmbtu_per_kwh: 0.0055,
        }
    }

    #[test]
    fn test_reference_plan_verifies() {
        let params = PlanParameters::default();
        let plan = reference_plan();
        assert!(plan.verify(&params, 1e-9).is_ok());
        assert!((plan.renewable_output_mw(&params) - 70.0).abs() < 1e-9);
        assert!((plan.firm_supply_mw(&params) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_gas_heat_input() {
        // 30 MW * 1000 kW/MW * 0.0055 MMBTU/kWh
        assert!((reference_plan().gas_heat_input_mmbtu_per_hour() - 165.0).abs() < 1e-9);
    }

    #[test]
    fn test_verify_detects_shortfall() {
        let mut plan = reference_plan();
        plan.gas_turbines = 2;
        plan.gas_capacity_mw = 20.0;
        let violation = plan.verify(&PlanParameters::default(), 1e-9).unwrap_err();
        assert_eq!(violation.constraint, DEMAND_FULFILLMENT);
        assert!(violation.to_string().contains(DEMAND_FULFILLMENT));
    }

    #[test]
    fn test_verify_detects_negative_capacity() {
        let mut plan = reference_plan();
        plan.solar_capacity_mw = -1.0;
        let violation = plan.verify(&PlanParameters::default(), 1e-9).unwrap_err();
        assert_eq!(violation.constraint, "Non_Negativity");
    }
}
