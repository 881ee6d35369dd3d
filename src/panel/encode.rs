//! Canvas to wire-format conversion.

use embedded_graphics::prelude::Point;

use crate::canvas::Canvas;
use crate::frame::Frame;

/// Packs a canvas into the panel's page-addressed format.
///
/// The canvas is split into pages of 8 rows. For every page and column one
/// byte is produced: bit 0 is the page's top row, bit 7 its bottom row. A
/// bit is set when the pixel's luminance is above
/// [`LIT_THRESHOLD`](crate::canvas::LIT_THRESHOLD). The byte for
/// `(page, column)` lands at index `page * width + column`.
///
/// Rows past the last complete page are not encoded.
///
/// ```rust
/// use oled_panel::{canvas::Canvas, panel::encode};
/// use embedded_graphics::{pixelcolor::Gray8, prelude::*};
///
/// let mut canvas = Canvas::new(8, 8);
/// canvas.set_pixel(Point::new(2, 0), Gray8::WHITE);
/// canvas.set_pixel(Point::new(2, 7), Gray8::WHITE);
///
/// let frame = encode(&canvas);
/// assert_eq!(frame.as_bytes()[2], 0b1000_0001);
/// ```
pub fn encode(canvas: &Canvas) -> Frame {
    let width = canvas.width();
    let height = canvas.height();
    let mut bytes = vec![0u8; Frame::byte_len(width, height)];

    for page in 0..height / 8 {
        for x in 0..width {
            let mut bits = 0u8;
            for bit in 0..8 {
                let y = page * 8 + bit;
                if canvas.is_lit_at(Point::new(x as i32, y as i32)) {
                    bits |= 1 << bit;
                }
            }
            bytes[(page * width + x) as usize] = bits;
        }
    }

    Frame::from_encoded(width, height, bytes)
}
