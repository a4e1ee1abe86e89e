use core::fmt;

/// Lifecycle state of a flow sensor
///
/// ```text
/// Uninitialized --init--> Unhealthy <--update--> Healthy
/// Disabled (entered at construction when the enable parameter is 0)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    /// init() has not completed successfully
    Uninitialized,
    /// Initialized, but the last update produced no fresh data
    Unhealthy,
    /// The last update committed a fresh sample
    Healthy,
    /// Disabled by configuration; never polled
    Disabled,
}

impl SensorState {
    pub fn is_healthy(self) -> bool {
        self == SensorState::Healthy
    }

    pub fn is_initialized(self) -> bool {
        matches!(self, SensorState::Unhealthy | SensorState::Healthy)
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorState::Uninitialized => write!(f, "uninitialized"),
            SensorState::Unhealthy => write!(f, "unhealthy"),
            SensorState::Healthy => write!(f, "healthy"),
            SensorState::Disabled => write!(f, "disabled"),
        }
    }
}
