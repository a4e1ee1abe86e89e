use hal::{Clock, StdClock};
use log::{info, warn};
use optical_flow::backend::SimFlowBackend;
use optical_flow::{FlowParams, OpticalFlow};

use crate::board::SimAhrs;
use crate::scenario::Scenario;

/// Log one line every this many cycles
const LOG_EVERY: u32 = 25;

pub type SimFlow<'a> = OpticalFlow<'a, SimFlowBackend<StdClock>>;

/// Drives one simulated flow sensor through the scenario
pub struct SitlApp<'a> {
    state: State,
    flow: SimFlow<'a>,
    ahrs: &'a SimAhrs,
    scenario: Scenario,
    clock: StdClock,
    start_ms: u32,
    stats: RunStats,
}

/// Counters reported when the run ends
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub cycles: u32,
    pub healthy_cycles: u32,
    pub health_changes: u32,
}

impl<'a> SitlApp<'a> {
    pub fn new(ahrs: &'a SimAhrs, params: FlowParams, scenario: Scenario, clock: StdClock) -> Self {
        Self {
            state: State::Initializing,
            flow: OpticalFlow::new(ahrs, SimFlowBackend::new(clock), params),
            ahrs,
            scenario,
            clock,
            start_ms: 0,
            stats: RunStats::default(),
        }
    }

    /// Run one scheduler tick; returns false once the run is over
    pub fn step(&mut self) -> bool {
        match self.state {
            State::Initializing => {
                info!("Initializing SITL optical flow");
                if !self.flow.enabled() {
                    warn!("optical flow disabled (FLOW_ENABLE=0), nothing to run");
                    self.state = State::Stopping;
                    return true;
                }
                self.flow.init();
                self.start_ms = self.clock.now_ms();
                self.state = State::Running;
            }
            State::Running => {
                let t_s = self.clock.now_ms().wrapping_sub(self.start_ms) as f32 / 1000.0;
                if t_s >= self.scenario.duration_s() {
                    self.state = State::Stopping;
                    return true;
                }
                self.tick(t_s);
            }
            State::Stopping => {
                let stats = self.stats;
                info!(
                    "SITL finished: {} cycles, {} healthy, {} health changes",
                    stats.cycles, stats.healthy_cycles, stats.health_changes
                );
                self.state = State::Stopped;
            }
            State::Stopped => return false,
        }
        true
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    fn tick(&mut self, t_s: f32) {
        let step = self.scenario.at(t_s);
        self.ahrs.set_body_rate(step.body_rate);
        let backend = self.flow.backend_mut();
        backend.set_truth(step.truth);
        backend.set_fault(step.fault);

        let was_healthy = self.flow.healthy();
        self.flow.update();

        self.stats.cycles += 1;
        if self.flow.healthy() {
            self.stats.healthy_cycles += 1;
        }
        if self.flow.healthy() != was_healthy {
            self.stats.health_changes += 1;
        }

        if self.stats.cycles % LOG_EVERY == 0 {
            let snapshot = self.flow.snapshot();
            info!(
                "t={:5.2}s healthy={} quality={:3} flow=({:+.3}, {:+.3}) body=({:+.3}, {:+.3}) last={}ms",
                t_s,
                snapshot.healthy,
                snapshot.sample.quality,
                snapshot.sample.flow_rate.x,
                snapshot.sample.flow_rate.y,
                snapshot.sample.body_rate.x,
                snapshot.sample.body_rate.y,
                snapshot.sample.timestamp_ms,
            );
        }
    }
}

enum State {
    Initializing,
    Running,
    Stopping,
    Stopped,
}
