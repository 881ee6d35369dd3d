//! Trait definitions for the hardware seams and the screen contract.
//!
//! This module defines the abstractions that let oled-panel:
//! - Run against a real I2C bus or an in-memory mock
//! - Read temperatures from any sensor implementation
//! - Rotate through any set of screens
//!
//! # Submodules
//!
//! - `bus`: Blocking duplex byte channel to a bus device
//! - `sensor`: Temperature source used by the status screen
//! - `screen`: The draw/update contract every screen implements
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`BusDevice`] | Write commands/data to the panel, read sensor words |
//! | [`TemperatureSource`] | One temperature reading per call |
//! | [`Screen`] | Paint into a canvas, refresh internal state |

pub mod bus;
pub mod screen;
pub mod sensor;

pub use bus::*;
pub use screen::*;
pub use sensor::*;
