use hal::Vector2f;

/// One flow reading, committed to the frontend as a single unit
///
/// Quality, flow rate, body rate and timestamp always change together so a
/// consumer never sees values from two different reads.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FlowSample {
    /// Image quality; 0 means flow_rate and body_rate are not to be trusted
    pub quality: u8,
    /// Optical flow angular rate in rad/s about the sensor X and Y axes.
    /// A right-hand rotation about a sensor axis produces a positive rate.
    pub flow_rate: Vector2f,
    /// Body inertial angular rate in rad/s about the same axes
    pub body_rate: Vector2f,
    /// Monotonic system time of the read in milliseconds
    pub timestamp_ms: u32,
}

impl FlowSample {
    pub fn new(quality: u8, flow_rate: Vector2f, body_rate: Vector2f, timestamp_ms: u32) -> Self {
        Self {
            quality,
            flow_rate,
            body_rate,
            timestamp_ms,
        }
    }

    /// Check that no rate contains NaN or infinite values
    pub fn is_finite(&self) -> bool {
        self.flow_rate.iter().chain(self.body_rate.iter()).all(|v| v.is_finite())
    }
}

/// Copy of everything a consumer can read from a flow sensor
///
/// Handy when the sensor lives behind a lock: take the snapshot inside the
/// critical section and work on the copy.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FlowSnapshot {
    pub enabled: bool,
    pub healthy: bool,
    pub device_id: u8,
    pub sample: FlowSample,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sample_is_zeroed() {
        let sample = FlowSample::default();
        assert_eq!(sample.quality, 0);
        assert_eq!(sample.flow_rate, Vector2f::zeros());
        assert_eq!(sample.body_rate, Vector2f::zeros());
        assert_eq!(sample.timestamp_ms, 0);
    }

    #[test]
    fn test_is_finite() {
        let good = FlowSample::new(10, Vector2f::new(0.1, 0.2), Vector2f::new(0.0, 0.0), 5);
        assert!(good.is_finite());

        let nan_flow = FlowSample::new(10, Vector2f::new(f32::NAN, 0.2), Vector2f::zeros(), 5);
        assert!(!nan_flow.is_finite(), "NaN flow must be rejected");

        let inf_body = FlowSample::new(10, Vector2f::zeros(), Vector2f::new(0.0, f32::INFINITY), 5);
        assert!(!inf_body.is_finite(), "infinite body rate must be rejected");
    }
}
