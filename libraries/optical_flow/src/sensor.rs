// Optical flow frontend
//
// Owns the normalized measurement, health and parameter state of one
// sensor and drives its backend. Consumers only ever see this type.

use hal::{AttitudeReference, Vector2f};
use log::{debug, info, trace, warn};

use crate::backend::{OpticalFlowBackend, UpdateContext};
use crate::error::FlowError;
use crate::measurement::{FlowSample, FlowSnapshot};
use crate::params::{FlowCalibration, FlowParams};
use crate::state::SensorState;

/// Identity fixed by a successful init()
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct FlowIdentity {
    device_id: Option<u8>,
}

/// An optical flow sensor: shared state plus the driver that fills it
///
/// The attitude reference is borrowed for the sensor's whole lifetime and
/// is only ever read.
///
/// `update()` takes `&mut self`, so readers and the updater can never
/// overlap on one instance. Sharing a sensor between execution contexts
/// (an interrupt and a task, two threads) needs an external lock around it;
/// [`OpticalFlow::snapshot`] gives a cheap copy to take inside that lock.
pub struct OpticalFlow<'a, B: OpticalFlowBackend> {
    attitude: &'a dyn AttitudeReference,
    backend: B,
    params: FlowParams,
    calibration: FlowCalibration,
    identity: FlowIdentity,
    sample: FlowSample,
    state: SensorState,
}

impl<'a, B: OpticalFlowBackend> OpticalFlow<'a, B> {
    /// Create a sensor bound to an attitude reference
    ///
    /// `params` should already hold the values from the persistence layer;
    /// [`FlowParams::default`] gives the declaration table defaults.
    pub fn new(attitude: &'a dyn AttitudeReference, backend: B, params: FlowParams) -> Self {
        let state = if params.is_enabled() {
            SensorState::Uninitialized
        } else {
            SensorState::Disabled
        };
        Self {
            attitude,
            backend,
            calibration: params.calibration(),
            params,
            identity: FlowIdentity::default(),
            sample: FlowSample::default(),
            state,
        }
    }

    /// Initialise the sensor
    ///
    /// Safe to call more than once: after a successful bring-up further
    /// calls do nothing, after a failed one they retry.
    pub fn init(&mut self) {
        match self.state {
            SensorState::Disabled => {
                debug!("optical flow disabled, skipping init");
                return;
            }
            SensorState::Unhealthy | SensorState::Healthy => {
                debug!("optical flow already initialised");
                return;
            }
            SensorState::Uninitialized => {}
        }

        match self.backend.init() {
            Ok(device_id) => {
                self.identity.device_id = Some(device_id);
                self.state = SensorState::Unhealthy;
                info!("optical flow initialised, device id 0x{:02x}", device_id);
            }
            Err(err) => {
                warn!("optical flow init failed: {}", err);
            }
        }
    }

    /// Read the latest values from the sensor
    ///
    /// A fresh reading replaces quality, flow rate, body rate and timestamp
    /// together and marks the sensor healthy. Anything else leaves them as
    /// they were and marks it unhealthy.
    pub fn update(&mut self) {
        if !self.state.is_initialized() {
            return;
        }

        let ctx = UpdateContext::new(self.attitude, self.calibration);
        let result = self
            .backend
            .update(&ctx)
            .and_then(|reading| match reading {
                Some(sample) => self.commit(sample).map(|_| true),
                None => Ok(false),
            });

        match result {
            Ok(true) => self.set_healthy(),
            Ok(false) => {
                trace!("optical flow: no new data");
                self.set_unhealthy(None);
            }
            Err(err) => self.set_unhealthy(Some(err)),
        }
    }

    /// Returns true if optical flow is enabled
    pub fn enabled(&self) -> bool {
        self.params.is_enabled()
    }

    /// Returns true if the last update produced a fresh reading
    pub fn healthy(&self) -> bool {
        self.state.is_healthy()
    }

    /// Surface quality as a measure from 0 ~ 255
    pub fn quality(&self) -> u8 {
        self.sample.quality
    }

    /// Optical flow angular rate about the sensor X and Y axes (rad/s)
    pub fn flow_rate(&self) -> Vector2f {
        self.sample.flow_rate
    }

    /// Body angular rate used to compensate the flow rate (rad/s)
    pub fn body_rate(&self) -> Vector2f {
        self.sample.body_rate
    }

    /// Device id assigned by init(), 0 before that
    pub fn device_id(&self) -> u8 {
        self.identity.device_id.unwrap_or(0)
    }

    /// System time in milliseconds of the last successful update
    pub fn last_update(&self) -> u32 {
        self.sample.timestamp_ms
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            enabled: self.enabled(),
            healthy: self.healthy(),
            device_id: self.device_id(),
            sample: self.sample,
        }
    }

    pub fn params(&self) -> &FlowParams {
        &self.params
    }

    pub fn calibration(&self) -> &FlowCalibration {
        &self.calibration
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the driver, e.g. to feed a simulated sensor
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn commit(&mut self, sample: FlowSample) -> Result<(), FlowError> {
        if !sample.is_finite() {
            return Err(FlowError::InvalidReading);
        }
        if sample.timestamp_ms < self.sample.timestamp_ms {
            return Err(FlowError::NonMonotonicTimestamp {
                last: self.sample.timestamp_ms,
                got: sample.timestamp_ms,
            });
        }
        self.sample = sample;
        Ok(())
    }

    fn set_healthy(&mut self) {
        if self.state != SensorState::Healthy {
            info!("optical flow healthy");
        }
        self.state = SensorState::Healthy;
    }

    fn set_unhealthy(&mut self, err: Option<FlowError>) {
        match (self.state, err) {
            (SensorState::Healthy, Some(err)) => warn!("optical flow unhealthy: {}", err),
            (SensorState::Healthy, None) => warn!("optical flow unhealthy: no new data"),
            (_, Some(err)) => debug!("optical flow read failed: {}", err),
            _ => {}
        }
        self.state = SensorState::Unhealthy;
    }
}
