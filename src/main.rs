use anyhow::{Context, Result};
use energy_mix_planner::{build_and_solve, config, report, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{error, info};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load().context("failed to load configuration")?;
    info!(demand_mw = cfg.parameters.demand_mw, "planning energy mix");

    let plan = build_and_solve(&cfg.parameters).map_err(|e| {
        error!(kind = e.kind(), error = %e, "planning failed");
        e
    })?;

    info!(
        renewable_mw = plan.renewable_output_mw(&cfg.parameters),
        firm_supply_mw = plan.firm_supply_mw(&cfg.parameters),
        gas_heat_input_mmbtu_per_hour = plan.gas_heat_input_mmbtu_per_hour(),
        total_cost = plan.total_cost,
        "plan summary"
    );

    let output = report::render(&plan, cfg.output.format).context("failed to render plan")?;
    print!("{}", output);
    Ok(())
}
