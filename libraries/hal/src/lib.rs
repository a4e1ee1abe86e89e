#![cfg_attr(not(any(test, feature = "std")), no_std)]
extern crate nalgebra;

mod attitude;
mod clock;
mod types;

pub use attitude::*;
pub use clock::*;
pub use types::*;
