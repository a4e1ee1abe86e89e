/// Attitude reference interface
use crate::types::Vector3d;

/// Read-only view of the vehicle attitude solution
///
/// Sensors that need to compensate for vehicle rotation (optical flow,
/// rangefinders on a gimbal) borrow an implementation of this trait.
/// Reads must be cheap and must not block.
pub trait AttitudeReference {
    /// Get the vehicle angular rate about the body axes (in rad/s)
    ///
    /// Right-hand rule positive: x = roll rate, y = pitch rate, z = yaw rate.
    fn body_rate(&self) -> Vector3d;
}

/// Euler attitude and body rates as produced by the attitude estimator
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,

    pub roll_rate: f32,
    pub pitch_rate: f32,
    pub yaw_rate: f32,
}

impl Attitude {
    /// Create an attitude with zero angles and the given body rates
    pub fn from_rates(roll_rate: f32, pitch_rate: f32, yaw_rate: f32) -> Self {
        Attitude {
            roll_rate,
            pitch_rate,
            yaw_rate,
            ..Default::default()
        }
    }
}

impl AttitudeReference for Attitude {
    fn body_rate(&self) -> Vector3d {
        Vector3d::new(self.roll_rate, self.pitch_rate, self.yaw_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_rate_axes() {
        let attitude = Attitude::from_rates(0.1, -0.2, 0.3);
        let rate = attitude.body_rate();
        assert_eq!(rate.x, 0.1, "x should carry roll rate");
        assert_eq!(rate.y, -0.2, "y should carry pitch rate");
        assert_eq!(rate.z, 0.3, "z should carry yaw rate");
    }
}
