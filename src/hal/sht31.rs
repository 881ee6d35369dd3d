//! SHT31 temperature/humidity sensor driver.
//!
//! Single-shot measurements over a [`BusDevice`]. Every 16-bit word the
//! sensor returns is followed by a CRC-8 byte which is checked before the
//! value is used.
//!
//! # Example
//!
//! ```rust,ignore
//! use oled_panel::hal::{I2cBus, Sht31};
//!
//! let mut sensor = Sht31::new(I2cBus::open(1, Sht31::<()>::DEFAULT_ADDRESS)?);
//! let m = sensor.measure()?;
//! println!("{:.2} °C, {:.2} %RH", m.temperature_c, m.humidity_pct);
//! ```

use std::thread;
use std::time::Duration;

use crate::traits::{BusDevice, SensorError, TemperatureSource};

const MEASURE_HIGH_REPEATABILITY: u16 = 0x2400;
const READ_STATUS: u16 = 0xF32D;
const SOFT_RESET: u16 = 0x30A2;
const HEATER_ENABLE: u16 = 0x306D;
const HEATER_DISABLE: u16 = 0x3066;
const STATUS_HEATER_BIT: u16 = 13;

const MEASUREMENT_DELAY: Duration = Duration::from_millis(20);
const RESET_DELAY: Duration = Duration::from_millis(10);

/// CRC-8 as used by Sensirion sensors (poly 0x31, init 0xFF).
pub fn crc8(data: &[u8]) -> u8 {
    const POLYNOMIAL: u8 = 0x31;
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// One temperature + humidity sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Temperature in °C.
    pub temperature_c: f32,
    /// Relative humidity in %.
    pub humidity_pct: f32,
}

impl Measurement {
    /// Converts raw sensor words using the datasheet formulas in fixed point
    /// (hundredths of a unit).
    pub fn from_raw(raw_temperature: u16, raw_humidity: u16) -> Self {
        let centi_c = ((4375 * i32::from(raw_temperature)) >> 14) - 4500;
        let centi_rh = (625 * u32::from(raw_humidity)) >> 12;
        Self {
            temperature_c: centi_c as f32 / 100.0,
            humidity_pct: centi_rh as f32 / 100.0,
        }
    }
}

/// SHT31 driver.
#[derive(Debug)]
pub struct Sht31<B> {
    bus: B,
    measurement_delay: Duration,
}

impl<B> Sht31<B> {
    /// Default I2C address (ADDR pin low).
    pub const DEFAULT_ADDRESS: u8 = 0x44;
}

impl<B: BusDevice> Sht31<B> {
    /// Wraps a bus device bound to the sensor's address.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            measurement_delay: MEASUREMENT_DELAY,
        }
    }

    /// Overrides the wait between triggering and reading a measurement.
    pub fn with_measurement_delay(mut self, delay: Duration) -> Self {
        self.measurement_delay = delay;
        self
    }

    /// Releases the bus device.
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Triggers a high-repeatability measurement and reads it back.
    pub fn measure(&mut self) -> Result<Measurement, SensorError> {
        self.write_command(MEASURE_HIGH_REPEATABILITY)?;
        thread::sleep(self.measurement_delay);

        let mut buf = [0u8; 6];
        self.read_exact(&mut buf)?;
        let raw_t = checked_word(&buf[0..3], "temperature")?;
        let raw_h = checked_word(&buf[3..6], "humidity")?;
        Ok(Measurement::from_raw(raw_t, raw_h))
    }

    /// Reads the status register.
    pub fn read_status(&mut self) -> Result<u16, SensorError> {
        self.write_command(READ_STATUS)?;
        let mut buf = [0u8; 3];
        self.read_exact(&mut buf)?;
        checked_word(&buf, "status")
    }

    /// Soft-resets the sensor.
    pub fn reset(&mut self) -> Result<(), SensorError> {
        self.write_command(SOFT_RESET)?;
        thread::sleep(RESET_DELAY);
        Ok(())
    }

    /// Switches the on-chip heater.
    pub fn set_heater(&mut self, enabled: bool) -> Result<(), SensorError> {
        self.write_command(if enabled {
            HEATER_ENABLE
        } else {
            HEATER_DISABLE
        })
    }

    /// Returns whether the heater is on, from the status register.
    pub fn heater_enabled(&mut self) -> Result<bool, SensorError> {
        Ok((self.read_status()? >> STATUS_HEATER_BIT) & 1 == 1)
    }

    fn write_command(&mut self, command: u16) -> Result<(), SensorError> {
        self.bus
            .write(&command.to_be_bytes())
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))?;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), SensorError> {
        let got = self
            .bus
            .read(buf)
            .map_err(|e| SensorError::Bus(format!("{:?}", e)))?;
        if got != buf.len() {
            return Err(SensorError::ShortRead {
                got,
                expected: buf.len(),
            });
        }
        Ok(())
    }
}

fn checked_word(bytes: &[u8], word: &'static str) -> Result<u16, SensorError> {
    if crc8(&bytes[..2]) != bytes[2] {
        return Err(SensorError::Checksum { word });
    }
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

impl<B: BusDevice + Send> TemperatureSource for Sht31<B> {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        self.measure().map(|m| m.temperature_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockBus;

    fn sensor_with_response(bytes: &[u8]) -> Sht31<MockBus> {
        let mut bus = MockBus::new();
        bus.queue_read(bytes);
        Sht31::new(bus).with_measurement_delay(Duration::ZERO)
    }

    #[test]
    fn crc_matches_datasheet_example() {
        assert_eq!(crc8(&[0xBE, 0xEF]), 0x92);
    }

    #[test]
    fn measure_converts_raw_words() {
        let mut sensor = sensor_with_response(&[0x66, 0x66, 0x93, 0x80, 0x00, 0xA2]);
        let m = sensor.measure().unwrap();
        assert!((m.temperature_c - 24.99).abs() < 0.001);
        assert!((m.humidity_pct - 50.0).abs() < 0.001);

        let bus = sensor.into_inner();
        assert_eq!(bus.writes(), &[vec![0x24, 0x00]]);
    }

    #[test]
    fn bad_checksum_is_rejected() {
        let mut sensor = sensor_with_response(&[0x66, 0x66, 0x00, 0x80, 0x00, 0xA2]);
        assert_eq!(
            sensor.read_temperature_c(),
            Err(SensorError::Checksum {
                word: "temperature"
            })
        );
    }

    #[test]
    fn short_read_is_rejected() {
        let mut sensor = sensor_with_response(&[0x66, 0x66, 0x93]);
        assert_eq!(
            sensor.measure(),
            Err(SensorError::ShortRead {
                got: 3,
                expected: 6
            })
        );
    }

    #[test]
    fn bus_failure_is_reported() {
        let bus = MockBus::new().fail_after(0);
        let mut sensor = Sht31::new(bus).with_measurement_delay(Duration::ZERO);
        assert!(matches!(sensor.measure(), Err(SensorError::Bus(_))));
    }

    #[test]
    fn heater_bit_from_status() {
        let status: u16 = 1 << 13;
        let [hi, lo] = status.to_be_bytes();
        let mut sensor = sensor_with_response(&[hi, lo, crc8(&[hi, lo])]);
        assert!(sensor.heater_enabled().unwrap());
    }

    #[test]
    fn extreme_raw_values() {
        let cold = Measurement::from_raw(0, 0);
        assert_eq!(cold.temperature_c, -45.0);
        assert_eq!(cold.humidity_pct, 0.0);

        let hot = Measurement::from_raw(0xFFFF, 0xFFFF);
        assert!((hot.temperature_c - 129.99).abs() < 0.01);
        assert!((hot.humidity_pct - 99.99).abs() < 0.01);
    }
}
