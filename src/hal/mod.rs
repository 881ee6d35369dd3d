//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `i2c`: `embedded-hal` I2C adapter, with `/dev/i2c-N` support (requires `linux` feature)
//! - `sht31`: SHT31 temperature/humidity sensor driver

pub mod i2c;
pub mod mock;
pub mod sht31;

pub use i2c::*;
pub use mock::*;
pub use sht31::*;
