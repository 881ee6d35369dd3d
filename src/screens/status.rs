//! Live sensor readout.

use core::fmt::Write;
use std::sync::{Mutex, PoisonError, RwLock};

use embedded_graphics::mono_font::ascii::FONT_8X13_BOLD;
use embedded_graphics::mono_font::iso_8859_1::FONT_7X13;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::String;
use log::{debug, warn};

use crate::canvas::{drawn, Canvas};
use crate::traits::{Publisher, Screen, TemperatureSource};

/// Maximum title length in bytes; longer titles are cut.
pub const TITLE_CAPACITY: usize = 24;

/// Capacity of the formatted value line. Holds any `f32` at two decimals.
pub const VALUE_CAPACITY: usize = 64;

const TEXT_LEFT: i32 = 16;

/// Framed title plus the last good temperature reading.
///
/// Until the first successful read the value is shown as `--`, never as a
/// made-up number. A failed read keeps the previous value.
pub struct StatusScreen {
    title: String<TITLE_CAPACITY>,
    sensor: Mutex<Box<dyn TemperatureSource>>,
    reading: RwLock<Option<f32>>,
}

impl StatusScreen {
    /// Creates a status screen reading from `sensor`.
    pub fn new(title: &str, sensor: Box<dyn TemperatureSource>) -> Self {
        let mut t = String::new();
        for c in title.chars() {
            if t.push(c).is_err() {
                break;
            }
        }
        Self {
            title: t,
            sensor: Mutex::new(sensor),
            reading: RwLock::new(None),
        }
    }

    /// Title text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Last good reading in °C, if any.
    pub fn reading(&self) -> Option<f32> {
        *self.reading.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// The value line as drawn.
    pub fn value_line(reading: Option<f32>) -> String<VALUE_CAPACITY> {
        let mut line = String::new();
        let written = match reading {
            Some(t) => write!(line, "Temp: {:.2} °C", t),
            None => write!(line, "Temp: -- °C"),
        };
        debug_assert!(written.is_ok(), "value line exceeds {} bytes", VALUE_CAPACITY);
        line
    }
}

impl core::fmt::Debug for StatusScreen {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StatusScreen")
            .field("title", &self.title)
            .field("reading", &self.reading())
            .finish_non_exhaustive()
    }
}

impl Screen for StatusScreen {
    fn name(&self) -> &str {
        "status"
    }

    fn update(&self, publisher: &Publisher<'_>) {
        let mut reading = self.reading.write().unwrap_or_else(PoisonError::into_inner);
        let result = self
            .sensor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .read_temperature_c();

        match result {
            Ok(t) => {
                debug!("{}: {:.2} °C", self.title, t);
                *reading = Some(t);
                publisher.publish();
            }
            Err(e) => warn!("{}: sensor read failed, keeping last value: {}", self.title, e),
        }
    }

    fn draw(&self, canvas: &mut Canvas) {
        let reading = *self.reading.read().unwrap_or_else(PoisonError::into_inner);

        let right = canvas.width() as i32 - 1;
        let bottom = canvas.height() as i32 - 1;
        let h = canvas.height() as i32;

        canvas.clear(Gray8::BLACK);
        canvas.draw_line(Point::new(0, 0), Point::new(right, 0), Gray8::WHITE);
        canvas.draw_line(Point::new(right, 0), Point::new(right, bottom), Gray8::WHITE);
        canvas.draw_line(Point::new(right, bottom), Point::new(0, bottom), Gray8::WHITE);
        canvas.draw_line(Point::new(0, bottom), Point::new(0, 0), Gray8::WHITE);

        let title_style = MonoTextStyle::new(&FONT_8X13_BOLD, Gray8::WHITE);
        let value_style = MonoTextStyle::new(&FONT_7X13, Gray8::WHITE);
        let value = Self::value_line(reading);

        drawn(Text::new(&self.title, Point::new(TEXT_LEFT, h * 3 / 8), title_style).draw(canvas));
        drawn(Text::new(&value, Point::new(TEXT_LEFT, h * 3 / 4), value_style).draw(canvas));
    }
}
