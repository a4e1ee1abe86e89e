use hal::{Clock, Vector2f};
use log::debug;

use crate::backend::{OpticalFlowBackend, UpdateContext};
use crate::error::FlowError;
use crate::measurement::FlowSample;

/// Device id reported by the simulated sensor
pub const SIM_DEVICE_ID: u8 = 0x5F;

/// Ground truth the simulated sensor observes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimTruth {
    /// Velocity over ground in the sensor frame (m/s), x forward, y right
    pub velocity: Vector2f,
    /// Distance from the sensor to the imaged surface (m)
    pub height_m: f32,
    /// Surface quality reported while the height is valid
    pub quality: u8,
}

impl Default for SimTruth {
    fn default() -> Self {
        Self {
            velocity: Vector2f::zeros(),
            height_m: 1.0,
            quality: 200,
        }
    }
}

/// Failure modes the simulated sensor can be told to exhibit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimFault {
    /// Reads succeed but never carry new data
    NoData,
    /// Every read fails on the bus
    Bus,
    /// Every read times out
    Timeout,
}

/// Software optical flow sensor for SITL and tests
pub struct SimFlowBackend<C: Clock> {
    clock: C,
    truth: SimTruth,
    fault: Option<SimFault>,
    present: bool,
}

impl<C: Clock> SimFlowBackend<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            truth: SimTruth::default(),
            fault: None,
            present: true,
        }
    }

    /// Simulate a sensor that is not on the bus
    pub fn absent(clock: C) -> Self {
        Self {
            present: false,
            ..Self::new(clock)
        }
    }

    pub fn set_truth(&mut self, truth: SimTruth) {
        self.truth = truth;
    }

    pub fn truth(&self) -> &SimTruth {
        &self.truth
    }

    pub fn set_fault(&mut self, fault: Option<SimFault>) {
        if fault != self.fault {
            debug!("sim flow fault: {:?}", fault);
        }
        self.fault = fault;
    }

    /// Line-of-sight rates for the current truth, before calibration
    ///
    /// Translation over a surface at range h appears as a rotation of
    /// -v_y / h about X and v_x / h about Y; vehicle rotation adds directly.
    fn ideal_flow(&self, body_rate: Vector2f) -> Option<Vector2f> {
        let height = self.truth.height_m;
        if !(height > 0.0) || !height.is_finite() {
            return None;
        }
        Some(Vector2f::new(
            -self.truth.velocity.y / height + body_rate.x,
            self.truth.velocity.x / height + body_rate.y,
        ))
    }
}

impl<C: Clock> OpticalFlowBackend for SimFlowBackend<C> {
    fn init(&mut self) -> Result<u8, FlowError> {
        if !self.present {
            return Err(FlowError::DeviceNotFound);
        }
        Ok(SIM_DEVICE_ID)
    }

    fn update(&mut self, ctx: &UpdateContext<'_>) -> Result<Option<FlowSample>, FlowError> {
        match self.fault {
            Some(SimFault::NoData) => return Ok(None),
            Some(SimFault::Bus) => return Err(FlowError::Bus("simulated bus fault")),
            Some(SimFault::Timeout) => return Err(FlowError::Timeout),
            None => {}
        }

        let body_rate = ctx.body_rate();
        let timestamp_ms = self.clock.now_ms();
        let sample = match self.ideal_flow(body_rate) {
            Some(raw) => FlowSample::new(self.truth.quality, ctx.scale_flow(raw), body_rate, timestamp_ms),
            // nothing to track
            None => FlowSample::new(0, Vector2f::zeros(), body_rate, timestamp_ms),
        };
        Ok(Some(sample))
    }
}
