//! Ordered screen rotation.

use std::sync::Arc;

use log::{debug, trace};
use thiserror::Error;

use crate::traits::{Publisher, Screen};

/// Error building a [`ScreenManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// The screen list was empty.
    #[error("a screen manager needs at least one screen")]
    NoScreens,
}

/// A non-empty list of screens with one active index.
///
/// `next` and `previous` wrap around, so the index is always in range.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use oled_panel::manager::ScreenManager;
/// use oled_panel::screens::{ClockScreen, LogoScreen};
///
/// let mut manager = ScreenManager::new(vec![
///     Arc::new(LogoScreen::default()),
///     Arc::new(ClockScreen::new()),
/// ])
/// .unwrap();
///
/// manager.next();
/// manager.next();
/// assert_eq!(manager.current_index(), 0);
/// ```
pub struct ScreenManager {
    screens: Vec<Arc<dyn Screen>>,
    current: usize,
}

impl ScreenManager {
    /// Creates a manager with the first screen active.
    pub fn new(screens: Vec<Arc<dyn Screen>>) -> Result<Self, ManagerError> {
        if screens.is_empty() {
            return Err(ManagerError::NoScreens);
        }
        Ok(Self {
            screens,
            current: 0,
        })
    }

    /// The active screen.
    pub fn current(&self) -> &Arc<dyn Screen> {
        &self.screens[self.current]
    }

    /// Index of the active screen.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of screens (at least 1).
    pub fn len(&self) -> usize {
        self.screens.len()
    }

    /// Always `false`; a manager is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All screens in rotation order.
    pub fn screens(&self) -> &[Arc<dyn Screen>] {
        &self.screens
    }

    /// Activates the next screen, wrapping to the first.
    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.screens.len();
        debug!("switched to screen {} ({})", self.current, self.current().name());
    }

    /// Activates the previous screen, wrapping to the last.
    pub fn previous(&mut self) {
        let n = self.screens.len();
        self.current = (self.current + n - 1) % n;
        debug!("switched to screen {} ({})", self.current, self.current().name());
    }

    /// Runs `update` on every screen in order. The active index is unchanged.
    pub fn update_all(&self, publisher: &Publisher<'_>) {
        trace!("updating {} screens", self.screens.len());
        for screen in &self.screens {
            screen.update(publisher);
        }
    }
}

impl core::fmt::Debug for ScreenManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self.screens.iter().map(|s| s.name()).collect();
        f.debug_struct("ScreenManager")
            .field("screens", &names)
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::{ClockScreen, LogoScreen};

    fn three() -> ScreenManager {
        ScreenManager::new(vec![
            Arc::new(LogoScreen::default()),
            Arc::new(ClockScreen::new()),
            Arc::new(ClockScreen::new()),
        ])
        .unwrap()
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(ScreenManager::new(Vec::new()).unwrap_err(), ManagerError::NoScreens);
    }

    #[test]
    fn next_wraps_at_end() {
        let mut m = three();
        m.next();
        m.next();
        assert_eq!(m.current_index(), 2);
        m.next();
        assert_eq!(m.current_index(), 0);
    }

    #[test]
    fn previous_wraps_at_start() {
        let mut m = three();
        m.previous();
        assert_eq!(m.current_index(), 2);
        assert_eq!(m.current().name(), "clock");
    }

    #[test]
    fn single_screen_stays_put() {
        let mut m = ScreenManager::new(vec![Arc::new(ClockScreen::new())]).unwrap();
        m.next();
        m.previous();
        assert_eq!(m.current_index(), 0);
        assert_eq!(m.len(), 1);
    }
}
