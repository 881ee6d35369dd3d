//! Device protocol for SSD1306-family page-addressed panels.
//!
//! - [`commands`]: command bytes, supply profiles and the power-up sequence
//! - [`encode`]: canvas to page-addressed frame conversion
//! - [`Panel`]: drives a panel over a [`BusDevice`]
//!
//! # Wire Format
//!
//! Every byte sent to the panel is preceded by a control byte: a command byte
//! by [`COMMAND_MARKER`], a data byte by [`DATA_MARKER`]. Commands go out one
//! per bus transaction; frame data goes out [`DATA_CHUNK`] payload bytes per
//! transaction.
//!
//! ```text
//! command:  [0x80, cmd]
//! data:     [0xC0, d0, 0xC0, d1, ... 0xC0, d63]
//! ```

pub mod commands;
mod encode;

use core::fmt;

use log::{debug, error, info};
use thiserror::Error;

use crate::frame::Frame;
use crate::traits::BusDevice;

pub use commands::{
    init_sequence, VccProfile, COMMAND_MARKER, DATA_CHUNK, DATA_MARKER, INIT_SEQUENCE_LEN,
};
pub use encode::encode;

/// What was being sent when a bus write failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// A command byte.
    Command,
    /// A chunk of frame data.
    Data,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Command => "command",
            Stage::Data => "frame data",
        })
    }
}

/// Panel protocol error.
#[derive(Debug, Error)]
pub enum PanelError<E: fmt::Debug> {
    /// The bus rejected a transaction.
    #[error("bus write failed while sending {stage}: {error:?}")]
    Bus {
        /// What was being sent.
        stage: Stage,
        /// Transport error.
        error: E,
    },

    /// The bus accepted fewer bytes than were written.
    #[error("short write while sending {stage}: {written} of {expected} bytes")]
    ShortWrite {
        /// What was being sent.
        stage: Stage,
        /// Bytes accepted.
        written: usize,
        /// Bytes in the transaction.
        expected: usize,
    },

    /// The frame was encoded for a different panel size.
    #[error("frame is {frame_width}x{frame_height}, panel is {width}x{height}")]
    GeometryMismatch {
        /// Frame width.
        frame_width: u32,
        /// Frame height.
        frame_height: u32,
        /// Panel width.
        width: u32,
        /// Panel height.
        height: u32,
    },
}

/// A page-addressed 1-bit panel on a bus.
///
/// # Example
///
/// ```rust
/// use oled_panel::hal::MockBus;
/// use oled_panel::panel::{encode, Panel, VccProfile};
/// use oled_panel::canvas::Canvas;
///
/// let mut panel = Panel::new(MockBus::new(), 128, 64, VccProfile::Internal);
/// panel.initialize().unwrap();
///
/// let frame = encode(&Canvas::new(128, 64));
/// panel.transmit(&frame).unwrap();
/// ```
#[derive(Debug)]
pub struct Panel<B> {
    bus: B,
    width: u32,
    height: u32,
    vcc: VccProfile,
}

impl<B: BusDevice> Panel<B> {
    /// Wraps a bus device. Nothing is sent until [`initialize`](Self::initialize).
    pub fn new(bus: B, width: u32, height: u32, vcc: VccProfile) -> Self {
        Self {
            bus,
            width,
            height,
            vcc,
        }
    }

    /// Panel width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Panel height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Supply profile in use.
    pub fn vcc(&self) -> VccProfile {
        self.vcc
    }

    /// The underlying bus device.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the underlying bus device.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Releases the bus device.
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Sends the power-up sequence, ending with display-on.
    ///
    /// Stops at the first command the bus rejects; a failure is logged
    /// before it is returned.
    pub fn initialize(&mut self) -> Result<(), PanelError<B::Error>> {
        info!(
            "initializing {}x{} panel ({:?} supply)",
            self.width, self.height, self.vcc
        );
        let sequence = init_sequence(self.height, self.vcc);
        self.send_commands(&sequence).map_err(|e| {
            error!("panel initialization failed: {}", e);
            e
        })
    }

    /// Turns the panel on.
    pub fn display_on(&mut self) -> Result<(), PanelError<B::Error>> {
        self.write_command(commands::DISPLAY_ON)
    }

    /// Turns the panel off. RAM content is kept.
    pub fn display_off(&mut self) -> Result<(), PanelError<B::Error>> {
        self.write_command(commands::DISPLAY_OFF)
    }

    /// Sets the contrast byte.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), PanelError<B::Error>> {
        self.send_commands(&[commands::SET_CONTRAST, contrast])
    }

    /// Inverts (or restores) the pixel polarity.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), PanelError<B::Error>> {
        self.write_command(if inverted {
            commands::INVERT_DISPLAY
        } else {
            commands::NORMAL_DISPLAY
        })
    }

    /// Streams a full frame into panel RAM.
    ///
    /// Sets the column and page windows to the whole panel, then writes the
    /// payload in [`DATA_CHUNK`]-byte transactions. The first failing
    /// transaction aborts the rest of the frame.
    pub fn transmit(&mut self, frame: &Frame) -> Result<(), PanelError<B::Error>> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(PanelError::GeometryMismatch {
                frame_width: frame.width(),
                frame_height: frame.height(),
                width: self.width,
                height: self.height,
            });
        }

        let last_column = self.width.saturating_sub(1) as u8;
        let last_page = (self.height / 8).saturating_sub(1) as u8;
        self.send_commands(&[
            commands::COLUMN_ADDRESS,
            0,
            last_column,
            commands::PAGE_ADDRESS,
            0,
            last_page,
        ])?;

        let mut wire = Vec::with_capacity(DATA_CHUNK * 2);
        for chunk in frame.as_bytes().chunks(DATA_CHUNK) {
            wire.clear();
            for &byte in chunk {
                wire.push(DATA_MARKER);
                wire.push(byte);
            }
            self.write_transaction(&wire, Stage::Data)?;
        }
        debug!("transmitted {} byte frame", frame.len());
        Ok(())
    }

    fn send_commands(&mut self, cmds: &[u8]) -> Result<(), PanelError<B::Error>> {
        for &cmd in cmds {
            self.write_command(cmd)?;
        }
        Ok(())
    }

    fn write_command(&mut self, cmd: u8) -> Result<(), PanelError<B::Error>> {
        self.write_transaction(&[COMMAND_MARKER, cmd], Stage::Command)
    }

    fn write_transaction(&mut self, bytes: &[u8], stage: Stage) -> Result<(), PanelError<B::Error>> {
        let written = self
            .bus
            .write(bytes)
            .map_err(|error| PanelError::Bus { stage, error })?;
        if written < bytes.len() {
            return Err(PanelError::ShortWrite {
                stage,
                written,
                expected: bytes.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::hal::MockBus;
    use embedded_graphics::pixelcolor::{Gray8, GrayColor};

    fn command_bytes(writes: &[Vec<u8>]) -> Vec<u8> {
        writes
            .iter()
            .map(|w| {
                assert_eq!(w.len(), 2);
                assert_eq!(w[0], COMMAND_MARKER);
                w[1]
            })
            .collect()
    }

    #[test]
    fn initialize_sends_each_command_in_order() {
        let mut panel = Panel::new(MockBus::new(), 128, 64, VccProfile::External);
        panel.initialize().unwrap();
        let sent = command_bytes(panel.bus().writes());
        assert_eq!(sent, init_sequence(64, VccProfile::External).to_vec());
    }

    #[test]
    fn initialize_stops_at_first_rejected_command() {
        let bus = MockBus::new().fail_after(3);
        let mut panel = Panel::new(bus, 128, 64, VccProfile::Internal);
        let err = panel.initialize().unwrap_err();
        assert!(matches!(err, PanelError::Bus { stage: Stage::Command, .. }));
        assert_eq!(
            command_bytes(panel.bus().writes()),
            init_sequence(64, VccProfile::Internal)[..3].to_vec()
        );
        assert_eq!(panel.bus().failed_writes(), 1);
    }

    #[test]
    fn initialize_reports_short_write() {
        let bus = MockBus::new().with_short_writes();
        let mut panel = Panel::new(bus, 128, 64, VccProfile::Internal);
        assert!(matches!(
            panel.initialize(),
            Err(PanelError::ShortWrite {
                stage: Stage::Command,
                ..
            })
        ));
    }

    #[test]
    fn transmit_partial_page_panel() {
        let mut panel = Panel::new(MockBus::new(), 8, 12, VccProfile::Internal);
        let mut canvas = Canvas::new(8, 12);
        canvas.clear(Gray8::WHITE);
        panel.transmit(&encode(&canvas)).unwrap();

        let writes = panel.bus().writes();
        assert_eq!(command_bytes(&writes[..6]), vec![0x21, 0, 7, 0x22, 0, 0]);
        assert_eq!(writes[6..].len(), 1);
        assert_eq!(writes[6], [DATA_MARKER, 0xFF].repeat(8));
    }

    #[test]
    fn display_on_off_are_single_commands() {
        let mut panel = Panel::new(MockBus::new(), 128, 64, VccProfile::Internal);
        panel.display_off().unwrap();
        panel.display_on().unwrap();
        assert_eq!(
            panel.bus().writes(),
            &[vec![0x80, 0xAE], vec![0x80, 0xAF]]
        );
    }

    #[test]
    fn transmit_sets_windows_then_chunks() {
        let mut panel = Panel::new(MockBus::new(), 128, 64, VccProfile::Internal);
        let mut canvas = Canvas::new(128, 64);
        canvas.clear(Gray8::WHITE);
        panel.transmit(&encode(&canvas)).unwrap();

        let writes = panel.bus().writes();
        assert_eq!(
            command_bytes(&writes[..6]),
            vec![0x21, 0, 127, 0x22, 0, 7]
        );
        let data = &writes[6..];
        assert_eq!(data.len(), 1024 / DATA_CHUNK);
        for chunk in data {
            assert_eq!(chunk.len(), DATA_CHUNK * 2);
            for pair in chunk.chunks(2) {
                assert_eq!(pair, &[DATA_MARKER, 0xFF]);
            }
        }
    }

    #[test]
    fn transmit_aborts_on_first_failed_chunk() {
        // 6 window commands succeed, then the second data chunk fails
        let bus = MockBus::new().fail_after(7);
        let mut panel = Panel::new(bus, 128, 64, VccProfile::Internal);
        let err = panel
            .transmit(&Frame::blank(128, 64))
            .unwrap_err();
        assert!(matches!(err, PanelError::Bus { stage: Stage::Data, .. }));
        assert_eq!(panel.bus().writes().len(), 7);
    }

    #[test]
    fn transmit_rejects_wrong_geometry() {
        let mut panel = Panel::new(MockBus::new(), 128, 64, VccProfile::Internal);
        let err = panel.transmit(&Frame::blank(64, 32)).unwrap_err();
        assert!(matches!(err, PanelError::GeometryMismatch { .. }));
        assert!(panel.bus().writes().is_empty());
    }

    #[test]
    fn short_write_is_an_error() {
        let bus = MockBus::new().with_short_writes();
        let mut panel = Panel::new(bus, 128, 64, VccProfile::Internal);
        let err = panel.display_on().unwrap_err();
        assert!(matches!(
            err,
            PanelError::ShortWrite {
                written: 1,
                expected: 2,
                ..
            }
        ));
    }
}
