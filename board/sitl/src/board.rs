use std::cell::Cell;

use hal::{AttitudeReference, Vector3d};
use optical_flow::params::DEFAULT_PREFIX;
use optical_flow::{MemoryParamStore, ParamResult, ParamValue, VAR_INFO};

/// Attitude source fed by the simulation scenario
///
/// Interior mutability lets the loop change the rates while the flow sensor
/// holds its shared borrow.
#[derive(Debug, Default)]
pub struct SimAhrs {
    body_rate: Cell<Vector3d>,
}

impl SimAhrs {
    pub fn set_body_rate(&self, rate: Vector3d) {
        self.body_rate.set(rate);
    }
}

impl AttitudeReference for SimAhrs {
    fn body_rate(&self) -> Vector3d {
        self.body_rate.get()
    }
}

/// Parameter store with the SITL board presets
///
/// The simulated sensor is always fitted, so the board enables it before the
/// table defaults go in.
pub fn param_store() -> ParamResult<MemoryParamStore> {
    let mut store = MemoryParamStore::new();
    store.register("FLOW_ENABLE", ParamValue::Int8(1))?;
    store.register_defaults(DEFAULT_PREFIX, &VAR_INFO)?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_enables_flow() {
        let store = param_store().unwrap();
        assert_eq!(store.get("FLOW_ENABLE"), Some(ParamValue::Int8(1)));
        assert_eq!(store.get("FLOW_FXSCALER"), Some(ParamValue::Int16(0)));
    }

    #[test]
    fn test_sim_ahrs_rates() {
        let ahrs = SimAhrs::default();
        ahrs.set_body_rate(Vector3d::new(0.1, 0.2, 0.3));
        assert_eq!(ahrs.body_rate(), Vector3d::new(0.1, 0.2, 0.3));
    }
}
