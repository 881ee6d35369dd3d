//! Bus device abstraction.
//!
//! A [`BusDevice`] is one addressed device on a shared serial bus, opened
//! once and then used as an opaque blocking byte channel. Closing happens on
//! drop.
//!
//! # Implementations
//!
//! - [`crate::hal::I2cBus`]: any `embedded_hal::i2c::I2c` bound to an address
//! - [`crate::hal::MockBus`]: records transactions for tests

/// Blocking duplex byte channel to one device on the bus.
///
/// Each `write` call is one bus transaction. Implementations block for as
/// long as the underlying transport does; there is no timeout policy at
/// this level.
///
/// # Example Implementation
///
/// ```rust
/// use oled_panel::traits::BusDevice;
///
/// struct Loopback(Vec<u8>);
///
/// impl BusDevice for Loopback {
///     type Error = ();
///
///     fn write(&mut self, bytes: &[u8]) -> Result<usize, ()> {
///         self.0.extend_from_slice(bytes);
///         Ok(bytes.len())
///     }
///
///     fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
///         let n = buf.len().min(self.0.len());
///         buf[..n].copy_from_slice(&self.0[..n]);
///         self.0.drain(..n);
///         Ok(n)
///     }
/// }
/// ```
pub trait BusDevice {
    /// Transport error type.
    type Error: core::fmt::Debug;

    /// Writes `bytes` as one transaction and returns how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    /// Reads into `buf` and returns how many bytes arrived.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<B: BusDevice + ?Sized> BusDevice for &mut B {
    type Error = B::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(bytes)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}
