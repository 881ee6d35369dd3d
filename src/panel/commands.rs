//! SSD1306-family command set and the power-up sequence.

/// Control byte preceding a command byte (continuation set, command mode).
pub const COMMAND_MARKER: u8 = 0x80;
/// Control byte preceding a data byte (continuation set, data mode).
pub const DATA_MARKER: u8 = 0xC0;

/// Payload bytes per bus transaction during a frame transfer.
pub const DATA_CHUNK: usize = 64;

/// Panel off (sleep).
pub const DISPLAY_OFF: u8 = 0xAE;
/// Panel on.
pub const DISPLAY_ON: u8 = 0xAF;
/// Display clock divide ratio / oscillator frequency.
pub const SET_CLOCK_DIV: u8 = 0xD5;
/// Multiplex ratio, followed by `rows - 1`.
pub const SET_MULTIPLEX: u8 = 0xA8;
/// Vertical display offset.
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
/// Display start line, OR-ed with the line number.
pub const SET_START_LINE: u8 = 0x40;
/// Charge pump setting.
pub const CHARGE_PUMP: u8 = 0x8D;
/// Memory addressing mode.
pub const MEMORY_MODE: u8 = 0x20;
/// Segment remap; bit 0 maps column 127 to SEG0.
pub const SEG_REMAP: u8 = 0xA0;
/// COM output scan direction, remapped.
pub const COM_SCAN_DEC: u8 = 0xC8;
/// COM pins hardware configuration.
pub const SET_COM_PINS: u8 = 0xDA;
/// Contrast control.
pub const SET_CONTRAST: u8 = 0x81;
/// Precharge period.
pub const SET_PRECHARGE: u8 = 0xD9;
/// VCOMH deselect level.
pub const SET_VCOM_DETECT: u8 = 0xDB;
/// Output follows RAM content.
pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
/// Lit bit = lit pixel.
pub const NORMAL_DISPLAY: u8 = 0xA6;
/// Lit bit = dark pixel.
pub const INVERT_DISPLAY: u8 = 0xA7;
/// Column address window, followed by start and end column.
pub const COLUMN_ADDRESS: u8 = 0x21;
/// Page address window, followed by start and end page.
pub const PAGE_ADDRESS: u8 = 0x22;

/// Suggested oscillator/divide ratio.
const CLOCK_DIV_RATIO: u8 = 0x80;
/// Horizontal addressing: the column/page window wraps page by page, so a
/// whole frame streams in one pass.
const ADDRESSING_HORIZONTAL: u8 = 0x00;
const VCOM_DESELECT: u8 = 0x40;

/// Length of the sequence produced by [`init_sequence`].
pub const INIT_SEQUENCE_LEN: usize = 25;

/// Panel supply rail.
///
/// Selects the charge-pump, contrast and precharge bytes of the power-up
/// sequence. Everything else in the sequence is identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VccProfile {
    /// Panel powered from an external VCC rail.
    External,
    /// Panel powered through its internal charge pump.
    #[default]
    Internal,
}

impl VccProfile {
    /// Charge pump setting byte.
    pub const fn charge_pump(self) -> u8 {
        match self {
            VccProfile::External => 0x10,
            VccProfile::Internal => 0x14,
        }
    }

    /// Default contrast byte.
    pub const fn contrast(self) -> u8 {
        match self {
            VccProfile::External => 0x9F,
            VccProfile::Internal => 0xCF,
        }
    }

    /// Precharge period byte.
    pub const fn precharge(self) -> u8 {
        match self {
            VccProfile::External => 0x22,
            VccProfile::Internal => 0xF1,
        }
    }
}

/// COM pin hardware configuration for a panel height.
const fn com_pins(height: u32) -> u8 {
    if height <= 32 {
        0x02
    } else {
        0x12
    }
}

/// Builds the power-up command sequence.
///
/// The order is fixed; the panel does not come up correctly if any command
/// is moved or dropped.
pub fn init_sequence(height: u32, vcc: VccProfile) -> [u8; INIT_SEQUENCE_LEN] {
    let multiplex = height.saturating_sub(1) as u8;
    [
        DISPLAY_OFF,
        SET_CLOCK_DIV,
        CLOCK_DIV_RATIO,
        SET_MULTIPLEX,
        multiplex,
        SET_DISPLAY_OFFSET,
        0x00,
        SET_START_LINE,
        CHARGE_PUMP,
        vcc.charge_pump(),
        MEMORY_MODE,
        ADDRESSING_HORIZONTAL,
        SEG_REMAP | 0x01,
        COM_SCAN_DEC,
        SET_COM_PINS,
        com_pins(height),
        SET_CONTRAST,
        vcc.contrast(),
        SET_PRECHARGE,
        vcc.precharge(),
        SET_VCOM_DETECT,
        VCOM_DESELECT,
        DISPLAY_ALL_ON_RESUME,
        NORMAL_DISPLAY,
        DISPLAY_ON,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_profile_sequence() {
        let seq = init_sequence(64, VccProfile::Internal);
        assert_eq!(
            seq,
            [
                0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1,
                0xC8, 0xDA, 0x12, 0x81, 0xCF, 0xD9, 0xF1, 0xDB, 0x40, 0xA4, 0xA6, 0xAF,
            ]
        );
    }

    #[test]
    fn profiles_differ_only_in_supply_bytes() {
        let internal = init_sequence(64, VccProfile::Internal);
        let external = init_sequence(64, VccProfile::External);
        let differing: Vec<usize> = (0..INIT_SEQUENCE_LEN)
            .filter(|&i| internal[i] != external[i])
            .collect();
        assert_eq!(differing, vec![9, 17, 19]);
        assert_eq!(
            (external[9], external[17], external[19]),
            (0x10, 0x9F, 0x22)
        );
    }

    #[test]
    fn sequence_starts_off_and_ends_on() {
        let seq = init_sequence(32, VccProfile::Internal);
        assert_eq!(seq[0], DISPLAY_OFF);
        assert_eq!(seq[INIT_SEQUENCE_LEN - 1], DISPLAY_ON);
        assert_eq!(seq[4], 31);
        assert_eq!(seq[15], 0x02);
    }
}
