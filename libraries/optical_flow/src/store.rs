//! In-memory parameter store
//!
//! Fixed-capacity name/value map standing in for the persistence layer on
//! SITL builds and in tests. Flash-backed stores implement [`ParamSource`]
//! the same way.

use heapless::FnvIndexMap;
use log::debug;

use crate::error::{ParamError, ParamResult};
use crate::params::{qualified_name, ParamInfo, ParamName, ParamSource, ParamValue, PARAM_NAME_LEN};

/// Maximum number of parameters (must be a power of two)
const MAX_PARAMS: usize = 32;

#[derive(Debug, Default)]
pub struct MemoryParamStore {
    params: FnvIndexMap<ParamName, ParamValue, MAX_PARAMS>,
}

impl MemoryParamStore {
    pub fn new() -> Self {
        Self {
            params: FnvIndexMap::new(),
        }
    }

    /// Register a parameter with its default value
    ///
    /// An existing value is kept, so registering after a load does not
    /// clobber what was stored.
    pub fn register(&mut self, name: &str, default: ParamValue) -> ParamResult<()> {
        let key = Self::key(name)?;
        if self.params.contains_key(&key) {
            return Ok(());
        }
        self.params
            .insert(key, default)
            .map_err(|_| ParamError::StoreFull)?;
        Ok(())
    }

    /// Register every entry of a declaration table under `prefix`
    pub fn register_defaults(&mut self, prefix: &str, table: &[ParamInfo]) -> ParamResult<()> {
        for info in table {
            let name = qualified_name(prefix, info)?;
            self.register(&name, info.default)?;
        }
        debug!("registered {} parameters under {}", table.len(), prefix);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        let key = Self::key(name).ok()?;
        self.params.get(&key).copied()
    }

    /// Change a registered parameter, keeping its type
    pub fn set(&mut self, name: &str, value: ParamValue) -> ParamResult<()> {
        let key = Self::key(name)?;
        let slot = self
            .params
            .get_mut(&key)
            .ok_or(ParamError::UnknownParameter)?;
        if slot.kind() != value.kind() {
            return Err(ParamError::TypeMismatch {
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        *slot = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    fn key(name: &str) -> ParamResult<ParamName> {
        let mut key = ParamName::new();
        key.push_str(name)
            .map_err(|_| ParamError::NameTooLong { max: PARAM_NAME_LEN })?;
        Ok(key)
    }
}

impl ParamSource for MemoryParamStore {
    fn get(&self, name: &str) -> Option<ParamValue> {
        MemoryParamStore::get(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FlowParams, ParamKind, DEFAULT_PREFIX, VAR_INFO};

    #[test]
    fn test_register_defaults() {
        let mut store = MemoryParamStore::new();
        store.register_defaults(DEFAULT_PREFIX, &VAR_INFO).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("FLOW_ENABLE"), Some(ParamValue::Int8(0)));
        assert_eq!(store.get("FLOW_FXSCALER"), Some(ParamValue::Int16(0)));
        assert_eq!(store.get("FLOW_FYSCALER"), Some(ParamValue::Int16(0)));
    }

    #[test]
    fn test_register_does_not_overwrite() {
        let mut store = MemoryParamStore::new();
        store.register("FLOW_ENABLE", ParamValue::Int8(1)).unwrap();
        store.register_defaults(DEFAULT_PREFIX, &VAR_INFO).unwrap();
        assert_eq!(store.get("FLOW_ENABLE"), Some(ParamValue::Int8(1)), "stored value must win");
    }

    #[test]
    fn test_set_validation() {
        let mut store = MemoryParamStore::new();
        store.register_defaults(DEFAULT_PREFIX, &VAR_INFO).unwrap();

        store.set("FLOW_FXSCALER", ParamValue::Int16(120)).unwrap();
        assert_eq!(store.get("FLOW_FXSCALER"), Some(ParamValue::Int16(120)));

        assert_eq!(
            store.set("FLOW_MISSING", ParamValue::Int8(1)),
            Err(ParamError::UnknownParameter)
        );
        assert_eq!(
            store.set("FLOW_ENABLE", ParamValue::Float(1.0)),
            Err(ParamError::TypeMismatch {
                expected: ParamKind::Int8,
                found: ParamKind::Float,
            })
        );
        assert_eq!(
            store.set("THIS_NAME_IS_TOO_LONG", ParamValue::Int8(1)),
            Err(ParamError::NameTooLong { max: PARAM_NAME_LEN })
        );
        assert_eq!(store.get("THIS_NAME_IS_TOO_LONG"), None);
    }

    #[test]
    fn test_store_full() {
        let mut store = MemoryParamStore::new();
        for i in 0..MAX_PARAMS {
            let mut name = ParamName::new();
            core::fmt::write(&mut name, format_args!("P{}", i)).unwrap();
            store.register(&name, ParamValue::Int32(i as i32)).unwrap();
        }
        assert_eq!(store.register("OVERFLOW", ParamValue::Int8(0)), Err(ParamError::StoreFull));
    }

    #[test]
    fn test_flow_params_bind_from_store() {
        let mut store = MemoryParamStore::new();
        store.register_defaults(DEFAULT_PREFIX, &VAR_INFO).unwrap();
        store.set("FLOW_ENABLE", ParamValue::Int8(1)).unwrap();
        store.set("FLOW_FYSCALER", ParamValue::Int16(-40)).unwrap();

        let params = FlowParams::load(&store, DEFAULT_PREFIX).unwrap();
        assert!(params.is_enabled());
        assert_eq!(params.flow_scaler_x, 0);
        assert_eq!(params.flow_scaler_y, -40);
    }
}
