//! Static logo screen and 1-bit bitmaps.
//!
//! Bitmaps are stored the way binary PBM (`P4`) files store them: row-major,
//! one bit per pixel, most significant bit first, each row padded to a whole
//! byte. A set bit is a lit pixel.

use std::fs;
use std::path::Path;

use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::pixelcolor::{BinaryColor, Gray8};
use embedded_graphics::prelude::*;
use log::debug;
use thiserror::Error;

use crate::canvas::{drawn, Canvas};
use crate::traits::{Publisher, Screen};

static BUILTIN_LOGO: &[u8] = include_bytes!("../../assets/logo.pbm");

// ============================================================================
// Bitmap
// ============================================================================

/// Failure to load a PBM bitmap.
#[derive(Debug, Error)]
pub enum BitmapError {
    /// The file could not be read.
    #[error("failed to read bitmap: {0}")]
    Io(#[from] std::io::Error),

    /// The data does not start with `P4`.
    #[error("not a binary PBM file (expected P4 magic)")]
    BadMagic,

    /// A header field is missing or not a number.
    #[error("malformed PBM header: bad {0}")]
    BadHeader(&'static str),

    /// Width or height is zero.
    #[error("bitmap has zero size")]
    ZeroSize,

    /// The raster is shorter than the header promises.
    #[error("truncated raster: got {got} of {expected} bytes")]
    Truncated {
        /// Raster bytes present.
        got: usize,
        /// Raster bytes required.
        expected: usize,
    },
}

/// A 1-bit image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Bytes per padded row.
    pub const fn stride(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    /// Wraps packed row data. Returns `None` if the length does not match.
    pub fn from_packed(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (width > 0 && height > 0 && data.len() == Self::stride(width) * height as usize)
            .then_some(Self {
                width,
                height,
                data,
            })
    }

    /// Parses binary PBM (`P4`) data.
    ///
    /// ```rust
    /// use oled_panel::screens::Bitmap;
    ///
    /// let bmp = Bitmap::from_pbm(b"P4\n# two rows\n3 2\n\xA0\x40").unwrap();
    /// assert_eq!((bmp.width(), bmp.height()), (3, 2));
    /// assert!(bmp.is_set(0, 0) && bmp.is_set(2, 0) && bmp.is_set(1, 1));
    /// ```
    pub fn from_pbm(bytes: &[u8]) -> Result<Self, BitmapError> {
        let mut header = PbmHeader { bytes, pos: 0 };
        if header.bytes.get(..2) != Some(b"P4".as_slice()) {
            return Err(BitmapError::BadMagic);
        }
        header.pos = 2;

        let width = header.number("width")?;
        let height = header.number("height")?;
        // exactly one whitespace byte separates the header from the raster
        if !header.bytes.get(header.pos).is_some_and(u8::is_ascii_whitespace) {
            return Err(BitmapError::BadHeader("raster separator"));
        }
        header.pos += 1;

        if width == 0 || height == 0 {
            return Err(BitmapError::ZeroSize);
        }
        let expected = Self::stride(width) * height as usize;
        let raster = &bytes[header.pos..];
        if raster.len() < expected {
            return Err(BitmapError::Truncated {
                got: raster.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            data: raster[..expected].to_vec(),
        })
    }

    /// Reads and parses a PBM file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BitmapError> {
        let path = path.as_ref();
        let bitmap = Self::from_pbm(&fs::read(path)?)?;
        debug!(
            "loaded {}x{} logo from {}",
            bitmap.width,
            bitmap.height,
            path.display()
        );
        Ok(bitmap)
    }

    /// The logo shipped with the crate.
    pub fn builtin() -> Self {
        // the embedded asset is known to be well-formed
        Self::from_pbm(BUILTIN_LOGO).unwrap_or_else(|_| Self {
            width: 1,
            height: 1,
            data: vec![0],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `true` if the pixel at (`x`, `y`) is set.
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y as usize * Self::stride(self.width) + x as usize / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    fn raw(&self) -> ImageRaw<'_, BinaryColor> {
        ImageRaw::new(&self.data, self.width)
    }
}

struct PbmHeader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl PbmHeader<'_> {
    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'#' {
                while self.bytes.get(self.pos).is_some_and(|&c| c != b'\n') {
                    self.pos += 1;
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn number(&mut self, field: &'static str) -> Result<u32, BitmapError> {
        self.skip_separators();
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        core::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(BitmapError::BadHeader(field))
    }
}

// ============================================================================
// Screen
// ============================================================================

/// Shows a fixed bitmap centered on a dark background.
#[derive(Debug)]
pub struct LogoScreen {
    bitmap: Bitmap,
}

impl LogoScreen {
    /// Creates a screen showing `bitmap`.
    pub fn new(bitmap: Bitmap) -> Self {
        Self { bitmap }
    }

    /// The bitmap being shown.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

impl Default for LogoScreen {
    fn default() -> Self {
        Self::new(Bitmap::builtin())
    }
}

impl Screen for LogoScreen {
    fn name(&self) -> &str {
        "logo"
    }

    fn update(&self, publisher: &Publisher<'_>) {
        publisher.publish();
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.clear(Gray8::BLACK);
        let top_left = Point::new(
            (canvas.width() as i32 - self.bitmap.width as i32) / 2,
            (canvas.height() as i32 - self.bitmap.height as i32) / 2,
        );
        let raw = self.bitmap.raw();
        drawn(Image::new(&raw, top_left).draw(&mut canvas.color_converted()));
    }
}
