//! Pixel canvas and integer drawing primitives.
//!
//! The [`Canvas`] is the in-memory image a screen paints into during one
//! render cycle. Every primitive is bounds-checked: writes that fall outside
//! the canvas are silently dropped, never reported as errors.
//!
//! Pixels are stored as [`Gray8`] luminance values so that anything from the
//! `embedded-graphics` ecosystem (mono fonts, raw images, styled primitives)
//! can draw into the canvas through its [`DrawTarget`] implementation. The
//! panel encoder later reduces each pixel to one bit with [`is_lit`].
//!
//! # Example
//!
//! ```rust
//! use oled_panel::canvas::{Canvas, circle_point};
//! use embedded_graphics::{pixelcolor::Gray8, prelude::*};
//!
//! let mut canvas = Canvas::new(128, 64);
//! let center = Point::new(64, 32);
//! let tip = circle_point(center, 31, 90.0);
//! canvas.draw_line(center, tip, Gray8::WHITE);
//!
//! assert!(canvas.is_lit_at(Point::new(64, 63)));
//! ```

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{Gray8, GrayColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size};

/// Luminance above which a pixel counts as lit (0-255 scale).
pub const LIT_THRESHOLD: u8 = 127;

/// Returns `true` if the color is bright enough to light a panel pixel.
#[inline]
pub fn is_lit(color: Gray8) -> bool {
    color.luma() > LIT_THRESHOLD
}

/// Unwraps the result of drawing into a [`Canvas`], which cannot fail.
#[inline]
pub fn drawn<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Projects a point on a circle.
///
/// `angle_deg` is measured in degrees, clockwise from the positive x axis
/// (screen coordinates grow downwards). The projected offsets are truncated
/// towards zero.
///
/// ```rust
/// use oled_panel::canvas::circle_point;
/// use embedded_graphics::prelude::Point;
///
/// let c = Point::new(64, 64);
/// assert_eq!(circle_point(c, 63, 0.0), Point::new(127, 64));
/// assert_eq!(circle_point(c, 63, 90.0), Point::new(64, 127));
/// ```
pub fn circle_point(center: Point, radius: i32, angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    let r = f64::from(radius);
    Point::new(
        center.x + (r * rad.cos()) as i32,
        center.y + (r * rad.sin()) as i32,
    )
}

/// Bresenham stepping from `start` towards `target`.
///
/// Yields the current position, then advances by the error recurrence. The
/// iterator never ends on its own: callers stop at the target (lines) or
/// after a fixed number of pixels (rays), in which case stepping simply
/// carries on past the target in the same direction.
#[derive(Clone, Debug)]
pub struct BresenhamSteps {
    current: Point,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
}

impl BresenhamSteps {
    /// Creates a stepper from `start` towards `target`.
    pub fn new(start: Point, target: Point) -> Self {
        let dx = (target.x - start.x).abs();
        let dy = (target.y - start.y).abs();
        Self {
            current: start,
            dx,
            dy,
            sx: if start.x < target.x { 1 } else { -1 },
            sy: if start.y < target.y { 1 } else { -1 },
            err: dx - dy,
        }
    }
}

impl Iterator for BresenhamSteps {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let here = self.current;
        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.current.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.current.y += self.sy;
        }
        Some(here)
    }
}

/// In-memory pixel grid for a single render cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Gray8>,
}

impl Canvas {
    /// Creates a black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Gray8::BLACK; (width as usize) * (height as usize)],
        }
    }

    /// Canvas width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Center of the canvas, rounded down.
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 {
            return None;
        }
        let (x, y) = (p.x as u32, p.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Fills the whole canvas with one color.
    pub fn clear(&mut self, color: Gray8) {
        self.pixels.fill(color);
    }

    /// Sets one pixel. Out-of-bounds positions are ignored.
    #[inline]
    pub fn set_pixel(&mut self, p: Point, color: Gray8) {
        if let Some(i) = self.index(p) {
            self.pixels[i] = color;
        }
    }

    /// Returns the pixel at `p`, or `None` outside the canvas.
    pub fn pixel(&self, p: Point) -> Option<Gray8> {
        self.index(p).map(|i| self.pixels[i])
    }

    /// Returns `true` if the pixel at `p` exists and is lit.
    pub fn is_lit_at(&self, p: Point) -> bool {
        self.pixel(p).is_some_and(is_lit)
    }

    /// All lit pixel positions in row-major order.
    pub fn lit_points(&self) -> Vec<Point> {
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, c)| is_lit(**c))
            .map(|(i, _)| {
                let w = self.width as usize;
                Point::new((i % w) as i32, (i / w) as i32)
            })
            .collect()
    }

    /// Draws a line from `p0` to `p1`, both ends inclusive.
    pub fn draw_line(&mut self, p0: Point, p1: Point, color: Gray8) {
        for p in BresenhamSteps::new(p0, p1) {
            self.set_pixel(p, color);
            if p == p1 {
                break;
            }
        }
    }

    /// Draws exactly `max_steps` pixels from `origin` heading towards `towards`.
    ///
    /// Used for tick marks and vectors of a fixed visual length. A
    /// non-positive `max_steps` draws nothing.
    pub fn draw_ray(&mut self, origin: Point, towards: Point, max_steps: i32, color: Gray8) {
        if max_steps <= 0 {
            return;
        }
        for p in BresenhamSteps::new(origin, towards).take(max_steps as usize) {
            self.set_pixel(p, color);
        }
    }

    /// Draws a circle outline (midpoint algorithm).
    pub fn draw_circle(&mut self, center: Point, radius: i32, color: Gray8) {
        if radius < 0 {
            return;
        }
        let (mut x, mut y) = (radius, 0);
        let mut d = 1 - radius;
        while x >= y {
            for (ox, oy) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.set_pixel(center + Point::new(ox, oy), color);
            }
            y += 1;
            if d <= 0 {
                d += 2 * y + 1;
            } else {
                x -= 1;
                d += 2 * (y - x) + 1;
            }
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            self.set_pixel(p, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(list: &[(i32, i32)]) -> Vec<Point> {
        list.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn line_degenerate_sets_single_pixel() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw_line(Point::zero(), Point::zero(), Gray8::WHITE);
        assert_eq!(canvas.lit_points(), pts(&[(0, 0)]));
    }

    #[test]
    fn line_follows_error_recurrence() {
        let steps: Vec<Point> = BresenhamSteps::new(Point::new(0, 0), Point::new(4, 2))
            .take(5)
            .collect();
        assert_eq!(steps, pts(&[(0, 0), (1, 0), (2, 1), (3, 1), (4, 2)]));

        let mut canvas = Canvas::new(8, 8);
        canvas.draw_line(Point::new(0, 0), Point::new(4, 2), Gray8::WHITE);
        assert_eq!(canvas.lit_points().len(), 5);
    }

    #[test]
    fn line_reversed_direction() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw_line(Point::new(5, 5), Point::new(5, 1), Gray8::WHITE);
        assert_eq!(
            canvas.lit_points(),
            pts(&[(5, 1), (5, 2), (5, 3), (5, 4), (5, 5)])
        );
    }

    #[test]
    fn line_partially_outside_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_line(Point::new(-2, 1), Point::new(6, 1), Gray8::WHITE);
        assert_eq!(canvas.lit_points(), pts(&[(0, 1), (1, 1), (2, 1), (3, 1)]));
    }

    #[test]
    fn ray_stops_after_max_steps() {
        let mut canvas = Canvas::new(16, 4);
        canvas.draw_ray(Point::zero(), Point::new(10, 0), 3, Gray8::WHITE);
        assert_eq!(canvas.lit_points(), pts(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn ray_continues_past_target() {
        let mut canvas = Canvas::new(16, 4);
        canvas.draw_ray(Point::zero(), Point::new(2, 0), 5, Gray8::WHITE);
        assert_eq!(
            canvas.lit_points(),
            pts(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)])
        );
    }

    #[test]
    fn ray_with_non_positive_steps_draws_nothing() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw_ray(Point::zero(), Point::new(7, 7), 0, Gray8::WHITE);
        canvas.draw_ray(Point::zero(), Point::new(7, 7), -4, Gray8::WHITE);
        assert!(canvas.lit_points().is_empty());
    }

    #[test]
    fn set_pixel_out_of_bounds_is_ignored() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set_pixel(Point::new(-1, 0), Gray8::WHITE);
        canvas.set_pixel(Point::new(4, 0), Gray8::WHITE);
        canvas.set_pixel(Point::new(0, 4), Gray8::WHITE);
        assert!(canvas.lit_points().is_empty());
        assert_eq!(canvas.pixel(Point::new(4, 0)), None);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut canvas = Canvas::new(3, 2);
        canvas.clear(Gray8::WHITE);
        assert_eq!(canvas.lit_points().len(), 6);
        canvas.clear(Gray8::BLACK);
        assert!(canvas.lit_points().is_empty());
    }

    #[test]
    fn threshold_is_strictly_above_127() {
        assert!(!is_lit(Gray8::new(127)));
        assert!(is_lit(Gray8::new(128)));
    }

    #[test]
    fn circle_point_cardinal_angles() {
        let c = Point::new(64, 64);
        assert_eq!(circle_point(c, 63, 0.0), Point::new(127, 64));
        assert_eq!(circle_point(c, 63, 90.0), Point::new(64, 127));
        assert_eq!(circle_point(c, 63, 180.0), Point::new(1, 64));
        assert_eq!(circle_point(c, 63, 270.0), Point::new(64, 1));
    }

    #[test]
    fn circle_outline_hits_extremes() {
        let mut canvas = Canvas::new(32, 32);
        let c = Point::new(16, 16);
        canvas.draw_circle(c, 10, Gray8::WHITE);
        for p in [(26, 16), (6, 16), (16, 26), (16, 6)] {
            assert!(canvas.is_lit_at(Point::new(p.0, p.1)), "{:?} not lit", p);
        }
        assert!(!canvas.is_lit_at(c));
    }

    #[test]
    fn draw_target_clips_like_set_pixel() {
        let mut canvas = Canvas::new(2, 2);
        canvas
            .draw_iter([
                Pixel(Point::new(1, 1), Gray8::WHITE),
                Pixel(Point::new(5, 5), Gray8::WHITE),
            ])
            .unwrap();
        assert_eq!(canvas.lit_points(), pts(&[(1, 1)]));
    }
}
