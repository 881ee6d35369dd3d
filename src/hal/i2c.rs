//! I2C bus adapter.
//!
//! Binds any `embedded-hal` 1.0 I2C controller to one device address so it
//! can be used as a [`BusDevice`]. On Linux (`linux` feature) the adapter can
//! open `/dev/i2c-N` directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use oled_panel::hal::I2cBus;
//!
//! // Panel at 0x3C on /dev/i2c-1
//! let bus = I2cBus::open(1, 0x3C)?;
//! ```

use embedded_hal::i2c::I2c;

use crate::traits::BusDevice;

/// An I2C controller bound to one 7-bit device address.
#[derive(Debug)]
pub struct I2cBus<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2cBus<I> {
    /// Binds `i2c` to `address`.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Releases the controller.
    pub fn into_inner(self) -> I {
        self.i2c
    }
}

impl<I: I2c> BusDevice for I2cBus<I> {
    type Error = I::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.i2c.write(self.address, bytes)?;
        Ok(bytes.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.read(self.address, buf)?;
        Ok(buf.len())
    }
}

/// Failure to open a Linux I2C character device.
#[cfg(feature = "linux")]
#[derive(Debug, thiserror::Error)]
#[error("failed to open {path}: {reason}")]
pub struct OpenError {
    /// Device path that was tried.
    pub path: String,
    /// OS error description.
    pub reason: String,
}

/// I2C bus on a Linux `/dev/i2c-N` device.
#[cfg(feature = "linux")]
pub type LinuxI2cBus = I2cBus<linux_embedded_hal::I2cdev>;

#[cfg(feature = "linux")]
impl I2cBus<linux_embedded_hal::I2cdev> {
    /// Opens `/dev/i2c-{bus}` and binds it to `address`.
    pub fn open(bus: u8, address: u8) -> Result<Self, OpenError> {
        let path = format!("/dev/i2c-{}", bus);
        let dev = linux_embedded_hal::I2cdev::new(&path).map_err(|e| OpenError {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        log::debug!("opened {} for device 0x{:02X}", path, address);
        Ok(Self::new(dev, address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::i2c::{ErrorType, Operation};

    #[derive(Default)]
    struct RecordingI2c {
        log: Vec<(u8, Vec<u8>)>,
        response: Vec<u8>,
    }

    impl ErrorType for RecordingI2c {
        type Error = Infallible;
    }

    impl I2c for RecordingI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Infallible> {
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.log.push((address, bytes.to_vec())),
                    Operation::Read(buf) => {
                        let n = buf.len().min(self.response.len());
                        buf[..n].copy_from_slice(&self.response[..n]);
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn writes_go_to_bound_address() {
        let mut bus = I2cBus::new(RecordingI2c::default(), 0x3C);
        assert_eq!(bus.write(&[0x80, 0xAF]), Ok(2));
        assert_eq!(bus.into_inner().log, vec![(0x3C, vec![0x80, 0xAF])]);
    }

    #[test]
    fn reads_fill_buffer() {
        let i2c = RecordingI2c {
            response: vec![1, 2, 3],
            ..Default::default()
        };
        let mut bus = I2cBus::new(i2c, 0x44);
        let mut buf = [0u8; 3];
        assert_eq!(bus.read(&mut buf), Ok(3));
        assert_eq!(buf, [1, 2, 3]);
    }
}
