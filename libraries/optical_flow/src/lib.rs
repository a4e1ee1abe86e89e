//! # Optical Flow - sensor abstraction for flow-based velocity estimation
//!
//! Every optical flow driver, whatever its chip or bus, is normalized here
//! into one time-stamped, calibration-corrected measurement:
//!
//! - flow rate and body rate about the sensor X/Y axes in rad/s
//! - surface quality 0-255
//! - a health flag and the time of the last good read
//!
//! Drivers implement [`OpticalFlowBackend`]. The [`OpticalFlow`] frontend owns
//! the shared state, applies the enable and scale-factor parameters declared
//! in [`params::VAR_INFO`], and commits each reading as one unit.
//!
//! ```ignore
//! let params = FlowParams::load(&store, params::DEFAULT_PREFIX)?;
//! let mut flow = OpticalFlow::new(&ahrs, backend, params);
//! flow.init();
//! loop {
//!     flow.update();
//!     if flow.healthy() && flow.quality() > 0 {
//!         estimator.fuse_flow(flow.flow_rate(), flow.body_rate(), flow.last_update());
//!     }
//! }
//! ```
//!
//! Errors never reach the consumer: a failed read shows up only as
//! `healthy() == false` with the previous values left in place.
//!
//! ## Platform Support
//!
//! The crate is `no_std`. Enable **std** for desktop and SITL builds.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod backend;
pub mod error;
pub mod measurement;
pub mod params;
pub mod sensor;
pub mod state;
pub mod store;

pub use backend::{OpticalFlowBackend, UpdateContext};
pub use error::{FlowError, ParamError, ParamResult};
pub use measurement::{FlowSample, FlowSnapshot};
pub use params::{FlowCalibration, FlowParams, ParamInfo, ParamKind, ParamSource, ParamValue, VAR_INFO};
pub use sensor::OpticalFlow;
pub use state::SensorState;
pub use store::MemoryParamStore;
