//! The screen contract.
//!
//! A screen is one interchangeable page of content. The scheduler renders the
//! active screen continuously and periodically asks every screen to refresh
//! its state.

use crate::canvas::Canvas;
use crate::frame::{Frame, FrameMirror};

/// Hands the latest rendered frame to the shared mirror.
///
/// Passed to [`Screen::update`] so each screen republishes the mirror as part
/// of its own update path, under the mirror's lock.
#[derive(Clone, Copy, Debug)]
pub struct Publisher<'a> {
    mirror: &'a FrameMirror,
    frame: &'a Frame,
}

impl<'a> Publisher<'a> {
    /// Creates a publisher that writes `frame` into `mirror`.
    pub fn new(mirror: &'a FrameMirror, frame: &'a Frame) -> Self {
        Self { mirror, frame }
    }

    /// Copies the frame into the mirror.
    pub fn publish(&self) {
        self.mirror.publish(self.frame);
    }

    /// The frame that would be published.
    pub fn frame(&self) -> &Frame {
        self.frame
    }
}

/// One page of panel content.
///
/// Implementations keep their mutable state behind their own read/write
/// lock: [`draw`](Self::draw) takes the read side, [`update`](Self::update)
/// the write side. That lets the render thread draw while another thread
/// updates without ever observing a half-written state.
///
/// # Example Implementation
///
/// ```rust
/// use std::sync::RwLock;
/// use oled_panel::canvas::Canvas;
/// use oled_panel::traits::{Publisher, Screen};
/// use embedded_graphics::{pixelcolor::Gray8, prelude::*};
///
/// struct Blink(RwLock<bool>);
///
/// impl Screen for Blink {
///     fn name(&self) -> &str {
///         "blink"
///     }
///
///     fn update(&self, publisher: &Publisher<'_>) {
///         let mut on = self.0.write().unwrap();
///         *on = !*on;
///         publisher.publish();
///     }
///
///     fn draw(&self, canvas: &mut Canvas) {
///         let on = self.0.read().unwrap();
///         canvas.clear(if *on { Gray8::WHITE } else { Gray8::BLACK });
///     }
/// }
/// ```
pub trait Screen: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Refreshes internal state and republishes the mirror.
    ///
    /// May perform blocking I/O. Failures are handled inside the screen.
    fn update(&self, publisher: &Publisher<'_>);

    /// Paints the current state onto `canvas`.
    ///
    /// Must fully repaint: the canvas content from the previous cycle is not
    /// meaningful. Drawing the same state twice yields the same pixels.
    fn draw(&self, canvas: &mut Canvas);
}
