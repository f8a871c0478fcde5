use serde::{Deserialize, Serialize};

use crate::domain::CapacityPlan;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Five result lines: capacities to two decimals, counts as integers
pub fn render_text(plan: &CapacityPlan) -> String {
    format!(
        "Optimal Solar Capacity: {:.2} MW\n\
         Optimal Battery Capacity: {:.2} MWh\n\
         Optimal Battery Units: {}\n\
         Optimal Gas Capacity: {:.2} MW\n\
         Optimal Gas Turbines: {}\n",
        plan.solar_capacity_mw,
        plan.battery_capacity_mwh,
        plan.battery_units,
        plan.gas_capacity_mw,
        plan.gas_turbines,
    )
}

pub fn render_json(plan: &CapacityPlan) -> serde_json::Result<String> {
    serde_json::to_string_pretty(plan)
}

pub fn render(plan: &CapacityPlan, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(plan)),
        OutputFormat::Json => render_json(plan).map(|json| json + "\n"),
    }
}
