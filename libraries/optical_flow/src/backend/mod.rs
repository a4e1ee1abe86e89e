// Optical flow backend interface
//
// A backend owns the register-level protocol of one sensor chip. It never
// writes the shared measurement state: it hands a complete FlowSample back
// to the frontend, which commits it in one step.

use hal::{AttitudeReference, Vector2f};

use crate::error::FlowError;
use crate::measurement::FlowSample;
use crate::params::FlowCalibration;

pub mod sim;

pub use self::sim::{SimFault, SimFlowBackend, SimTruth, SIM_DEVICE_ID};

/// Interface every optical flow driver implements
///
/// Both methods are required. A driver with nothing to do in one of them
/// must say so explicitly.
pub trait OpticalFlowBackend {
    /// Bring up the sensor hardware
    ///
    /// Returns the device id identifying the sensor type and bus instance.
    fn init(&mut self) -> Result<u8, FlowError>;

    /// Poll the sensor
    ///
    /// Returns `Ok(Some(sample))` when a fresh reading is available,
    /// `Ok(None)` when the sensor has nothing new. Must return within a
    /// bounded time; any timeout policy belongs to the driver.
    fn update(&mut self, ctx: &UpdateContext<'_>) -> Result<Option<FlowSample>, FlowError>;
}

/// Everything a backend needs to turn a raw reading into a sample
pub struct UpdateContext<'a> {
    attitude: &'a dyn AttitudeReference,
    calibration: FlowCalibration,
}

impl<'a> UpdateContext<'a> {
    pub fn new(attitude: &'a dyn AttitudeReference, calibration: FlowCalibration) -> Self {
        Self {
            attitude,
            calibration,
        }
    }

    /// Vehicle angular rate about the X and Y body axes (rad/s)
    pub fn body_rate(&self) -> Vector2f {
        self.attitude.body_rate().xy()
    }

    /// Apply the configured scale factor correction to a raw flow rate
    pub fn scale_flow(&self, raw: Vector2f) -> Vector2f {
        self.calibration.apply(raw)
    }

    pub fn calibration(&self) -> &FlowCalibration {
        &self.calibration
    }
}

impl<B: OpticalFlowBackend + ?Sized> OpticalFlowBackend for &mut B {
    fn init(&mut self) -> Result<u8, FlowError> {
        (**self).init()
    }

    fn update(&mut self, ctx: &UpdateContext<'_>) -> Result<Option<FlowSample>, FlowError> {
        (**self).update(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::Attitude;

    #[test]
    fn test_context_body_rate_drops_yaw() {
        let attitude = Attitude::from_rates(0.3, -0.1, 2.0);
        let ctx = UpdateContext::new(&attitude, FlowCalibration::default());
        assert_eq!(ctx.body_rate(), Vector2f::new(0.3, -0.1));
    }

    #[test]
    fn test_context_scales_flow() {
        let attitude = Attitude::default();
        let ctx = UpdateContext::new(&attitude, FlowCalibration::from_ppt(200, 0));
        let scaled = ctx.scale_flow(Vector2f::new(1.0, 1.0));
        assert!((scaled.x - 1.2).abs() < 1e-6, "got {}", scaled.x);
        assert_eq!(scaled.y, 1.0);
    }
}
