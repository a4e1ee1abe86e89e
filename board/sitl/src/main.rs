use std::time::Duration;

use anyhow::bail;
use app::SitlApp;
use board::SimAhrs;
use hal::StdClock;
use log::info;
use optical_flow::params::DEFAULT_PREFIX;
use optical_flow::FlowParams;
use scenario::Scenario;

mod app;
mod board;
mod config;
mod scenario;

/// Flow sensor polling rate
const UPDATE_RATE_HZ: u64 = 50;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut store = board::param_store()?;
    config::apply_env_overrides(&mut store)?;
    let params = FlowParams::load(&store, DEFAULT_PREFIX)?;
    info!(
        "flow params: enable={} fxscaler={} fyscaler={}",
        params.enabled, params.flow_scaler_x, params.flow_scaler_y
    );

    let ahrs = SimAhrs::default();
    let mut app = SitlApp::new(&ahrs, params, Scenario::default(), StdClock::new());

    let mut interval = tokio::time::interval(Duration::from_millis(1000 / UPDATE_RATE_HZ));
    loop {
        interval.tick().await;
        if !app.step() {
            break;
        }
    }

    if params.is_enabled() && app.stats().healthy_cycles == 0 {
        bail!("optical flow never became healthy");
    }
    Ok(())
}
