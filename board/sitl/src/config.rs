use std::env;

use anyhow::{bail, Context};
use log::info;
use optical_flow::params::{qualified_name, DEFAULT_PREFIX};
use optical_flow::{MemoryParamStore, ParamKind, ParamValue, VAR_INFO};

/// Override flow parameters from environment variables of the same name
///
/// e.g. `FLOW_FXSCALER=-30 cargo run -p sitl`
pub fn apply_env_overrides(store: &mut MemoryParamStore) -> anyhow::Result<()> {
    for info in VAR_INFO.iter() {
        let name = qualified_name(DEFAULT_PREFIX, info)?;
        let Ok(raw) = env::var(name.as_str()) else {
            continue;
        };
        let value = parse_value(info.kind, &raw).with_context(|| format!("invalid {}", name))?;
        store.set(&name, value)?;
        info!("{} = {:?} (from environment)", name, value);
    }
    Ok(())
}

pub fn parse_value(kind: ParamKind, raw: &str) -> anyhow::Result<ParamValue> {
    let raw = raw.trim();
    Ok(match kind {
        ParamKind::Int8 => ParamValue::Int8(raw.parse()?),
        ParamKind::Int16 => ParamValue::Int16(raw.parse()?),
        ParamKind::Int32 => ParamValue::Int32(raw.parse()?),
        ParamKind::Float => {
            let value: f32 = raw.parse()?;
            if !value.is_finite() {
                bail!("{} is not a finite number", raw);
            }
            ParamValue::Float(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(ParamKind::Int8, "1").unwrap(), ParamValue::Int8(1));
        assert_eq!(parse_value(ParamKind::Int16, " -250 ").unwrap(), ParamValue::Int16(-250));
        assert_eq!(parse_value(ParamKind::Float, "0.5").unwrap(), ParamValue::Float(0.5));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert!(parse_value(ParamKind::Int8, "300").is_err(), "out of range for i8");
        assert!(parse_value(ParamKind::Int16, "abc").is_err());
        assert!(parse_value(ParamKind::Float, "inf").is_err());
    }
}
