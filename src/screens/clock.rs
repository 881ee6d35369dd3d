//! Analog clock face with a single sweeping hand.

use std::sync::{PoisonError, RwLock};

use embedded_graphics::pixelcolor::{Gray8, GrayColor};
use log::trace;

use crate::canvas::{circle_point, Canvas};
use crate::traits::{Publisher, Screen};

/// Degrees the hand advances per update (one revolution per 60 updates).
pub const DEGREES_PER_TICK: f64 = 6.0;

const TICK_SPACING_DEG: f64 = 30.0;
const TICK_LENGTH: i32 = 10;

/// Round face with twelve tick marks and one hand.
#[derive(Debug, Default)]
pub struct ClockScreen {
    angle: RwLock<f64>,
}

impl ClockScreen {
    /// Creates a clock with the hand pointing right (0°).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock with the hand at `angle_deg`.
    pub fn with_angle(angle_deg: f64) -> Self {
        Self {
            angle: RwLock::new(angle_deg.rem_euclid(360.0)),
        }
    }

    /// Current hand angle in degrees, in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        *self.angle.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Screen for ClockScreen {
    fn name(&self) -> &str {
        "clock"
    }

    fn update(&self, publisher: &Publisher<'_>) {
        let mut angle = self.angle.write().unwrap_or_else(PoisonError::into_inner);
        *angle = (*angle + DEGREES_PER_TICK).rem_euclid(360.0);
        trace!("clock hand at {}°", *angle);
        publisher.publish();
    }

    fn draw(&self, canvas: &mut Canvas) {
        let angle = *self.angle.read().unwrap_or_else(PoisonError::into_inner);

        let center = canvas.center();
        let radius = (canvas.width().min(canvas.height()) / 2) as i32 - 1;

        canvas.clear(Gray8::BLACK);
        for i in 0..12 {
            let edge = circle_point(center, radius, f64::from(i) * TICK_SPACING_DEG);
            canvas.draw_ray(edge, center, TICK_LENGTH, Gray8::WHITE);
        }
        canvas.draw_circle(center, radius, Gray8::WHITE);
        canvas.draw_line(center, circle_point(center, radius, angle), Gray8::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Frame, FrameMirror};
    use embedded_graphics::prelude::Point;

    #[test]
    fn update_advances_six_degrees_and_wraps() {
        let clock = ClockScreen::with_angle(354.0);
        let mirror = FrameMirror::new(8, 8);
        let frame = Frame::blank(8, 8);
        clock.update(&Publisher::new(&mirror, &frame));
        assert_eq!(clock.angle(), 0.0);
        clock.update(&Publisher::new(&mirror, &frame));
        assert_eq!(clock.angle(), 6.0);
    }

    #[test]
    fn sixty_updates_make_a_revolution() {
        let clock = ClockScreen::new();
        let mirror = FrameMirror::new(8, 8);
        let frame = Frame::blank(8, 8);
        for _ in 0..60 {
            clock.update(&Publisher::new(&mirror, &frame));
        }
        assert!(clock.angle().abs() < 1e-9 || (360.0 - clock.angle()) < 1e-9);
    }

    #[test]
    fn draw_paints_face_and_hand() {
        let mut canvas = Canvas::new(128, 64);
        ClockScreen::new().draw(&mut canvas);

        let center = Point::new(64, 32);
        // hand at 0° runs right from the center to the rim
        assert!(canvas.is_lit_at(center));
        assert!(canvas.is_lit_at(Point::new(80, 32)));
        assert!(canvas.is_lit_at(Point::new(95, 32)));
        // rim at the top and bottom
        assert!(canvas.is_lit_at(Point::new(64, 1)));
        assert!(canvas.is_lit_at(Point::new(64, 63)));
        // outside the face stays dark
        assert!(!canvas.is_lit_at(Point::new(0, 0)));
        assert!(!canvas.is_lit_at(Point::new(127, 32)));
    }

    #[test]
    fn draw_fully_repaints() {
        let clock = ClockScreen::with_angle(90.0);
        let mut fresh = Canvas::new(128, 64);
        clock.draw(&mut fresh);

        let mut dirty = Canvas::new(128, 64);
        dirty.clear(Gray8::WHITE);
        clock.draw(&mut dirty);

        assert_eq!(fresh, dirty);
    }
}
