//! Temperature source abstraction used by the status screen.

use thiserror::Error;

/// Failure to obtain a sensor reading.
///
/// Every variant is non-fatal for the display loop: the status screen keeps
/// showing the last good value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The underlying bus transaction failed.
    #[error("sensor bus error: {0}")]
    Bus(String),

    /// Fewer bytes arrived than the measurement needs.
    #[error("short sensor read: got {got} of {expected} bytes")]
    ShortRead {
        /// Bytes received.
        got: usize,
        /// Bytes expected.
        expected: usize,
    },

    /// A measurement word failed its checksum.
    #[error("sensor checksum mismatch in {word} word")]
    Checksum {
        /// Which word was corrupt ("temperature" or "humidity").
        word: &'static str,
    },

    /// No reading is available (sensor disabled or not yet produced).
    #[error("sensor unavailable")]
    Unavailable,
}

/// Anything that can produce a temperature in degrees Celsius.
///
/// Calls may block on bus I/O but must return; a failed read is reported as
/// an error and never as a made-up value.
pub trait TemperatureSource: Send {
    /// Takes one reading in °C.
    fn read_temperature_c(&mut self) -> Result<f32, SensorError>;
}

impl<T: TemperatureSource + ?Sized> TemperatureSource for Box<T> {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        (**self).read_temperature_c()
    }
}
