use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::PlanError;

/// Parameter set for the capacity-planning model.
///
/// Defaults reproduce the reference scenario: a constant 100 MW demand,
/// 30% solar CUF, 88% round-trip battery efficiency and at least 70% of
/// demand served from solar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PlanParameters {
    /// Constant demand (MW)
    #[validate(range(min = 0.0))]
    pub demand_mw: f64,

    /// Solar capacity utilisation factor (fraction of nameplate realised on average)
    #[validate(range(min = 0.0, max = 1.0))]
    pub solar_cuf: f64,

    /// Battery round-trip efficiency
    #[validate(range(min = 0.0, max = 1.0))]
    pub battery_efficiency: f64,

    /// Gas heat rate (MMBTU/kWh)
    #[validate(range(min = 0.0))]
    pub gas_heat_rate_mmbtu_per_kwh: f64,

    /// Solar cost ($ per MW of capacity)
    #[validate(range(min = 0.0))]
    pub solar_cost_per_mw: f64,

    /// Battery cost ($ per unit)
    #[validate(range(min = 0.0))]
    pub battery_cost_per_unit: f64,

    /// Gas cost ($ per turbine)
    #[validate(range(min = 0.0))]
    pub gas_cost_per_turbine: f64,

    /// Storage per battery unit (MWh)
    pub battery_unit_capacity_mwh: f64,

    /// Nameplate per gas turbine (MW)
    pub gas_turbine_capacity_mw: f64,

    /// Minimum share of demand served by solar output
    #[validate(range(min = 0.0, max = 1.0))]
    pub renewable_share: f64,

    #[validate(nested)]
    pub limits: BuildLimits,
}

/// Optional upper bounds on what may be built
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BuildLimits {
    #[validate(range(min = 0.0))]
    pub max_solar_mw: Option<f64>,
    pub max_battery_units: Option<u32>,
    pub max_gas_turbines: Option<u32>,
}

impl Default for PlanParameters {
    fn default() -> Self {
        Self {
            demand_mw: 100.0,
            solar_cuf: 0.3,
            battery_efficiency: 0.88,
            gas_heat_rate_mmbtu_per_kwh: 0.0055,
            solar_cost_per_mw: 800.0,
            battery_cost_per_unit: 141.0,
            gas_cost_per_turbine: 900.0,
            battery_unit_capacity_mwh: 1.0,
            gas_turbine_capacity_mw: 10.0,
            renewable_share: 0.7,
            limits: BuildLimits::default(),
        }
    }
}

impl PlanParameters {
    /// Solar output required by the renewable minimum (MW)
    pub fn renewable_requirement_mw(&self) -> f64 {
        self.renewable_share * self.demand_mw
    }

    /// Reject parameter sets that would produce a meaningless model.
    ///
    /// Range rules come from the `Validate` derive; NaN slips through range
    /// comparisons, so finiteness is checked separately.
    pub fn check(&self) -> Result<(), PlanError> {
        let fields = [
            ("demand_mw", self.demand_mw),
            ("solar_cuf", self.solar_cuf),
            ("battery_efficiency", self.battery_efficiency),
            ("gas_heat_rate_mmbtu_per_kwh", self.gas_heat_rate_mmbtu_per_kwh),
            ("solar_cost_per_mw", self.solar_cost_per_mw),
            ("battery_cost_per_unit", self.battery_cost_per_unit),
            ("gas_cost_per_turbine", self.gas_cost_per_turbine),
            ("battery_unit_capacity_mwh", self.battery_unit_capacity_mwh),
            ("gas_turbine_capacity_mw", self.gas_turbine_capacity_mw),
            ("renewable_share", self.renewable_share),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(PlanError::InvalidParameters(format!(
                    "{} is not finite: {}",
                    name, value
                )));
            }
        }
        if let Some(max_solar) = self.limits.max_solar_mw {
            if !max_solar.is_finite() {
                return Err(PlanError::InvalidParameters(format!(
                    "limits.max_solar_mw is not finite: {}",
                    max_solar
                )));
            }
        }

        self.validate()?;

        // Unit sizes scale integer counts into capacity; zero would decouple them
        if self.battery_unit_capacity_mwh <= 0.0 {
            return Err(PlanError::InvalidParameters(
                "battery_unit_capacity_mwh must be positive".to_string(),
            ));
        }
        if self.gas_turbine_capacity_mw <= 0.0 {
            return Err(PlanError::InvalidParameters(
                "gas_turbine_capacity_mw must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
