//! The built-in screens.
//!
//! | Screen | State | Update |
//! |--------|-------|--------|
//! | [`ClockScreen`] | hand angle | advances the hand by 6° |
//! | [`LogoScreen`] | none (fixed bitmap) | republishes the mirror |
//! | [`StatusScreen`] | last temperature | reads the sensor |
//!
//! Every screen repaints the whole canvas on each draw.

mod clock;
mod logo;
mod status;

pub use clock::ClockScreen;
pub use logo::{Bitmap, BitmapError, LogoScreen};
pub use status::{StatusScreen, TITLE_CAPACITY, VALUE_CAPACITY};

use std::sync::Arc;

use crate::config::ScreensConfig;
use crate::traits::{Screen, TemperatureSource};

/// The standard rotation: logo, clock, then the sensor readout.
///
/// The logo comes from `config.logo_path` if set, else the built-in one.
/// Without a sensor the status screen is left out.
pub fn rotation(
    config: &ScreensConfig,
    sensor: Option<Box<dyn TemperatureSource>>,
) -> Result<Vec<Arc<dyn Screen>>, BitmapError> {
    let logo = match config.logo_path() {
        Some(path) => Bitmap::load(path)?,
        None => Bitmap::builtin(),
    };
    let mut screens: Vec<Arc<dyn Screen>> = vec![
        Arc::new(LogoScreen::new(logo)),
        Arc::new(ClockScreen::new()),
    ];
    if let Some(sensor) = sensor {
        screens.push(Arc::new(StatusScreen::new(&config.status_title, sensor)));
    }
    Ok(screens)
}
