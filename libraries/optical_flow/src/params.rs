//! Optical flow parameter declarations
//!
//! The persistence layer loads and saves these entries by name. Names in
//! [`VAR_INFO`] are relative to the owning group prefix, so with the usual
//! `FLOW` prefix the stored names are:
//!
//! - `FLOW_ENABLE` - enable flag (0 = disabled)
//! - `FLOW_FXSCALER` - X axis flow scale correction, parts per thousand
//! - `FLOW_FYSCALER` - Y axis flow scale correction, parts per thousand

use core::fmt::Write;

use hal::Vector2f;
use heapless::String;

use crate::error::{ParamError, ParamResult};

/// Maximum stored parameter name length (MAVLink param_id width)
pub const PARAM_NAME_LEN: usize = 16;

/// Group prefix used for the flow sensor parameters
pub const DEFAULT_PREFIX: &str = "FLOW";

/// Fully qualified parameter name
pub type ParamName = String<PARAM_NAME_LEN>;

/// Storage type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int8,
    Int16,
    Int32,
    Float,
}

/// Typed parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Float(f32),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Int8(_) => ParamKind::Int8,
            ParamValue::Int16(_) => ParamKind::Int16,
            ParamValue::Int32(_) => ParamKind::Int32,
            ParamValue::Float(_) => ParamKind::Float,
        }
    }
}

/// One entry of a parameter declaration table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamInfo {
    /// Stable index within the group, never reused
    pub index: u8,
    /// Name relative to the group prefix
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: ParamValue,
}

const IDX_ENABLE: u8 = 0;
const IDX_FXSCALER: u8 = 1;
const IDX_FYSCALER: u8 = 2;

/// Parameter declaration table for an optical flow sensor
pub static VAR_INFO: [ParamInfo; 3] = [
    ParamInfo {
        index: IDX_ENABLE,
        name: "_ENABLE",
        kind: ParamKind::Int8,
        default: ParamValue::Int8(0),
    },
    ParamInfo {
        index: IDX_FXSCALER,
        name: "_FXSCALER",
        kind: ParamKind::Int16,
        default: ParamValue::Int16(0),
    },
    ParamInfo {
        index: IDX_FYSCALER,
        name: "_FYSCALER",
        kind: ParamKind::Int16,
        default: ParamValue::Int16(0),
    },
];

/// Build the stored name of a table entry, e.g. `FLOW` + `_ENABLE`
pub fn qualified_name(prefix: &str, info: &ParamInfo) -> ParamResult<ParamName> {
    let mut name = ParamName::new();
    write!(name, "{}{}", prefix, info.name).map_err(|_| ParamError::NameTooLong {
        max: PARAM_NAME_LEN,
    })?;
    Ok(name)
}

/// Read access to a parameter persistence layer
pub trait ParamSource {
    /// Look up a parameter by its fully qualified name
    fn get(&self, name: &str) -> Option<ParamValue>;
}

/// Bound configuration of one flow sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowParams {
    /// Enabled/disabled flag
    pub enabled: i8,
    /// X axis flow scale factor correction - parts per thousand
    pub flow_scaler_x: i16,
    /// Y axis flow scale factor correction - parts per thousand
    pub flow_scaler_y: i16,
}

impl Default for FlowParams {
    fn default() -> Self {
        let mut params = FlowParams {
            enabled: 0,
            flow_scaler_x: 0,
            flow_scaler_y: 0,
        };
        for info in VAR_INFO.iter() {
            params.assign(info, info.default);
        }
        params
    }
}

impl FlowParams {
    /// Bind every table entry present in `source`; missing entries keep defaults
    pub fn load<S: ParamSource + ?Sized>(source: &S, prefix: &str) -> ParamResult<Self> {
        let mut params = Self::default();
        for info in VAR_INFO.iter() {
            let name = qualified_name(prefix, info)?;
            if let Some(value) = source.get(&name) {
                params.set(info.name, value)?;
            }
        }
        Ok(params)
    }

    /// Set one entry by its table name (without prefix)
    pub fn set(&mut self, name: &str, value: ParamValue) -> ParamResult<()> {
        let info = Self::lookup(name)?;
        if value.kind() != info.kind {
            return Err(ParamError::TypeMismatch {
                expected: info.kind,
                found: value.kind(),
            });
        }
        self.assign(info, value);
        Ok(())
    }

    /// Get one entry by its table name (without prefix)
    pub fn get(&self, name: &str) -> ParamResult<ParamValue> {
        let info = Self::lookup(name)?;
        Ok(match info.index {
            IDX_ENABLE => ParamValue::Int8(self.enabled),
            IDX_FXSCALER => ParamValue::Int16(self.flow_scaler_x),
            _ => ParamValue::Int16(self.flow_scaler_y),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled != 0
    }

    pub fn calibration(&self) -> FlowCalibration {
        FlowCalibration::from_ppt(self.flow_scaler_x, self.flow_scaler_y)
    }

    fn lookup(name: &str) -> ParamResult<&'static ParamInfo> {
        VAR_INFO
            .iter()
            .find(|info| info.name == name)
            .ok_or(ParamError::UnknownParameter)
    }

    // kind already checked by the caller
    fn assign(&mut self, info: &ParamInfo, value: ParamValue) {
        match (info.index, value) {
            (IDX_ENABLE, ParamValue::Int8(v)) => self.enabled = v,
            (IDX_FXSCALER, ParamValue::Int16(v)) => self.flow_scaler_x = v,
            (IDX_FYSCALER, ParamValue::Int16(v)) => self.flow_scaler_y = v,
            _ => {}
        }
    }
}

/// Per-axis flow multipliers derived from the scale factor parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowCalibration {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for FlowCalibration {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl FlowCalibration {
    /// Convert parts-per-thousand corrections into multipliers
    pub fn from_ppt(scaler_x: i16, scaler_y: i16) -> Self {
        Self {
            scale_x: 1.0 + 0.001 * scaler_x as f32,
            scale_y: 1.0 + 0.001 * scaler_y as f32,
        }
    }

    /// Apply the correction to a raw flow rate
    pub fn apply(&self, raw: Vector2f) -> Vector2f {
        Vector2f::new(raw.x * self.scale_x, raw.y * self.scale_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Lookup(&'static [(&'static str, ParamValue)]);

    impl ParamSource for Lookup {
        fn get(&self, name: &str) -> Option<ParamValue> {
            self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
        }
    }

    #[test]
    fn test_table_layout() {
        let indices: [u8; 3] = [VAR_INFO[0].index, VAR_INFO[1].index, VAR_INFO[2].index];
        assert_eq!(indices, [0, 1, 2], "table must stay ordered by index");
        for info in VAR_INFO.iter() {
            assert_eq!(info.kind, info.default.kind(), "{} default has wrong kind", info.name);
        }
    }

    #[test]
    fn test_defaults_match_table() {
        let params = FlowParams::default();
        assert!(!params.is_enabled(), "sensor must default to disabled");
        assert_eq!(params.flow_scaler_x, 0);
        assert_eq!(params.flow_scaler_y, 0);
        assert_eq!(params.calibration(), FlowCalibration::default());
    }

    #[test]
    fn test_qualified_name() {
        let name = qualified_name(DEFAULT_PREFIX, &VAR_INFO[1]).unwrap();
        assert_eq!(name.as_str(), "FLOW_FXSCALER");

        let result = qualified_name("A_VERY_LONG_PREFIX", &VAR_INFO[0]);
        assert_eq!(result, Err(ParamError::NameTooLong { max: PARAM_NAME_LEN }));
    }

    #[test]
    fn test_set_and_get() {
        let mut params = FlowParams::default();
        params.set("_ENABLE", ParamValue::Int8(1)).unwrap();
        params.set("_FYSCALER", ParamValue::Int16(-25)).unwrap();

        assert!(params.is_enabled());
        assert_eq!(params.get("_FYSCALER"), Ok(ParamValue::Int16(-25)));
        assert_eq!(params.get("_FXSCALER"), Ok(ParamValue::Int16(0)));
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut params = FlowParams::default();
        assert_eq!(
            params.set("_ORIENT", ParamValue::Int8(1)),
            Err(ParamError::UnknownParameter)
        );
        assert_eq!(
            params.set("_FXSCALER", ParamValue::Int8(5)),
            Err(ParamError::TypeMismatch {
                expected: ParamKind::Int16,
                found: ParamKind::Int8,
            })
        );
        assert_eq!(params, FlowParams::default(), "failed sets must not change values");
    }

    #[test]
    fn test_load_from_source() {
        let source = Lookup(&[
            ("FLOW_ENABLE", ParamValue::Int8(1)),
            ("FLOW_FXSCALER", ParamValue::Int16(50)),
        ]);
        let params = FlowParams::load(&source, DEFAULT_PREFIX).unwrap();
        assert!(params.is_enabled());
        assert_eq!(params.flow_scaler_x, 50);
        assert_eq!(params.flow_scaler_y, 0, "missing entry keeps its default");
    }

    #[test]
    fn test_load_propagates_type_mismatch() {
        let source = Lookup(&[("FLOW_ENABLE", ParamValue::Float(1.0))]);
        let result = FlowParams::load(&source, DEFAULT_PREFIX);
        assert!(matches!(result, Err(ParamError::TypeMismatch { .. })));
    }

    #[test]
    fn test_calibration_scaling() {
        let calibration = FlowCalibration::from_ppt(100, -50);
        assert!((calibration.scale_x - 1.1).abs() < 1e-6);
        assert!((calibration.scale_y - 0.95).abs() < 1e-6);

        let scaled = calibration.apply(Vector2f::new(0.2, 0.4));
        assert!((scaled.x - 0.22).abs() < 1e-6, "got {}", scaled.x);
        assert!((scaled.y - 0.38).abs() < 1e-6, "got {}", scaled.y);
    }
}
