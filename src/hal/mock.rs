//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the bus and sensor traits, enabling
//! development and testing on desktop without a panel attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockBus`] | [`BusDevice`] | Records write transactions, queued reads, failure injection |
//! | [`MockSensor`] | [`TemperatureSource`] | Queued readings and errors |
//! | [`SimulatedSensor`] | [`TemperatureSource`] | Slowly drifting temperature for demos |
//!
//! # Example
//!
//! ```rust
//! use oled_panel::hal::MockBus;
//! use oled_panel::panel::{Panel, VccProfile};
//!
//! let mut panel = Panel::new(MockBus::new(), 128, 64, VccProfile::Internal);
//! panel.display_on().unwrap();
//!
//! assert_eq!(panel.bus().writes(), &[vec![0x80, 0xAF]]);
//! ```
//!
//! [`BusDevice`]: crate::traits::BusDevice
//! [`TemperatureSource`]: crate::traits::TemperatureSource

use std::collections::VecDeque;

use thiserror::Error;

use crate::traits::{BusDevice, SensorError, TemperatureSource};

// ============================================================================
// Bus Mock
// ============================================================================

/// Error returned by [`MockBus`] when a failure is injected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("mock bus failure")]
pub struct MockBusError;

/// Mock bus device for testing.
///
/// Every successful `write` is recorded as one transaction. Reads are served
/// from a queue of canned responses.
///
/// # Example
///
/// ```rust
/// use oled_panel::hal::MockBus;
/// use oled_panel::traits::BusDevice;
///
/// let mut bus = MockBus::new().fail_after(1);
/// assert!(bus.write(&[1, 2]).is_ok());
/// assert!(bus.write(&[3]).is_err()); // limit reached
/// assert_eq!(bus.writes(), &[vec![1, 2]]);
///
/// bus.queue_read(&[0xAA, 0xBB]);
/// let mut buf = [0u8; 2];
/// assert_eq!(bus.read(&mut buf), Ok(2));
/// assert_eq!(buf, [0xAA, 0xBB]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockBus {
    writes: Vec<Vec<u8>>,
    reads: VecDeque<Vec<u8>>,
    fail_after: Option<usize>,
    short_writes: bool,
    discard: bool,
    failed_writes: usize,
}

impl MockBus {
    /// Creates a bus that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every write once `n` transactions have been recorded.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Accepts one byte less than written on every transaction.
    pub fn with_short_writes(mut self) -> Self {
        self.short_writes = true;
        self
    }

    /// Accepts writes without recording them, for long-running demos.
    pub fn discarding(mut self) -> Self {
        self.discard = true;
        self
    }

    /// Starts failing every write from now on.
    pub fn fail_from_now(&mut self) {
        self.fail_after = Some(self.writes.len());
    }

    /// Stops injecting failures.
    pub fn recover(&mut self) {
        self.fail_after = None;
    }

    /// Queues the response for the next `read`.
    pub fn queue_read(&mut self, bytes: &[u8]) {
        self.reads.push_back(bytes.to_vec());
    }

    /// Recorded write transactions, oldest first.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Number of writes rejected by failure injection.
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    /// Forgets recorded writes.
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl BusDevice for MockBus {
    type Error = MockBusError;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, MockBusError> {
        if self.fail_after.is_some_and(|limit| self.writes.len() >= limit) {
            self.failed_writes += 1;
            return Err(MockBusError);
        }
        if !self.discard {
            self.writes.push(bytes.to_vec());
        }
        if self.short_writes {
            Ok(bytes.len().saturating_sub(1))
        } else {
            Ok(bytes.len())
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MockBusError> {
        let response = self.reads.pop_front().ok_or(MockBusError)?;
        let n = response.len().min(buf.len());
        buf[..n].copy_from_slice(&response[..n]);
        Ok(n)
    }
}

// ============================================================================
// Sensor Mocks
// ============================================================================

/// Mock temperature source.
///
/// Returns queued results in FIFO order, then the fallback result (by
/// default [`SensorError::Unavailable`]).
///
/// # Example
///
/// ```rust
/// use oled_panel::hal::MockSensor;
/// use oled_panel::traits::{SensorError, TemperatureSource};
///
/// let mut sensor = MockSensor::new();
/// sensor.queue_reading(21.5);
/// sensor.queue_error(SensorError::Checksum { word: "temperature" });
///
/// assert_eq!(sensor.read_temperature_c(), Ok(21.5));
/// assert!(sensor.read_temperature_c().is_err());
/// assert_eq!(sensor.read_temperature_c(), Err(SensorError::Unavailable));
/// assert_eq!(sensor.read_count(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct MockSensor {
    queued: VecDeque<Result<f32, SensorError>>,
    fallback: Result<f32, SensorError>,
    read_count: usize,
}

impl Default for MockSensor {
    fn default() -> Self {
        Self {
            queued: VecDeque::new(),
            fallback: Err(SensorError::Unavailable),
            read_count: 0,
        }
    }
}

impl MockSensor {
    /// Creates a sensor with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sensor that always reads `celsius`.
    pub fn constant(celsius: f32) -> Self {
        Self {
            fallback: Ok(celsius),
            ..Self::default()
        }
    }

    /// Queues a successful reading.
    pub fn queue_reading(&mut self, celsius: f32) {
        self.queued.push_back(Ok(celsius));
    }

    /// Queues a failed reading.
    pub fn queue_error(&mut self, err: SensorError) {
        self.queued.push_back(Err(err));
    }

    /// Number of reads performed.
    pub fn read_count(&self) -> usize {
        self.read_count
    }
}

impl TemperatureSource for MockSensor {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        self.read_count += 1;
        self.queued
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Temperature that drifts along a slow sine wave around a base value.
///
/// Used by the desktop demo so the status screen has something to show.
#[derive(Clone, Debug)]
pub struct SimulatedSensor {
    base: f32,
    amplitude: f32,
    step: u32,
}

impl SimulatedSensor {
    /// Creates a sensor oscillating `amplitude` °C around `base` °C.
    pub fn new(base: f32, amplitude: f32) -> Self {
        Self {
            base,
            amplitude,
            step: 0,
        }
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new(21.0, 1.5)
    }
}

impl TemperatureSource for SimulatedSensor {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        let phase = self.step as f32 * 0.1;
        self.step = self.step.wrapping_add(1);
        Ok(self.base + self.amplitude * phase.sin())
    }
}

// ============================================================================
// Tests
// ============================================================================
