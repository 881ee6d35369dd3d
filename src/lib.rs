//! # oled-panel
//!
//! A screen rotation engine for small 1-bit, page-addressed OLED panels
//! (SSD1306 family) on an I2C bus, with a live web mirror of the panel
//! contents.
//!
//! ## Features
//!
//! - **Canvas primitives**: bounds-checked pixels, Bresenham lines and rays, circles
//! - **Interchangeable screens**: clock face, logo bitmap, live sensor readout
//! - **Device protocol**: power-up sequence, page-addressed encoding, chunked transfer
//! - **Scheduling**: periodic update and switch events, best-effort continuous rendering
//! - **Monitoring**: the last published frame served as JSON over HTTP
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Bus, sensor and screen abstractions
//! - `canvas` - The pixel grid screens draw into
//! - `screens` - Clock, logo and status screens
//! - `panel` - Encoder and panel driver
//! - `frame` - Encoded frames and the shared mirror
//! - `manager` / `scheduler` - Screen rotation and the control loop
//! - `hal` - Concrete implementations (mock for testing, I2C and SHT31 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use oled_panel::{
//!     hal::{MockBus, MockSensor},
//!     scheduler::{event_channel, Event, Scheduler, Step},
//!     screens::{ClockScreen, StatusScreen},
//!     FrameMirror, Panel, ScreenManager, VccProfile,
//! };
//!
//! let mut panel = Panel::new(MockBus::new(), 128, 64, VccProfile::Internal);
//! panel.initialize().unwrap();
//!
//! let manager = ScreenManager::new(vec![
//!     Arc::new(ClockScreen::new()),
//!     Arc::new(StatusScreen::new("Sensor", Box::new(MockSensor::constant(21.0)))),
//! ])
//! .unwrap();
//!
//! let mirror = Arc::new(FrameMirror::new(128, 64));
//! let (events, intake) = event_channel();
//! let mut scheduler = Scheduler::new(manager, panel, mirror, intake, Duration::from_millis(16));
//!
//! assert_eq!(scheduler.step(), Step::Rendered);
//! events.post(Event::Switch);
//! assert_eq!(scheduler.step(), Step::Switched);
//! assert_eq!(scheduler.manager().current_index(), 1);
//! ```

#![warn(missing_docs)]

/// Pixel canvas and integer drawing primitives.
pub mod canvas;
/// Application configuration with JSON loading.
pub mod config;
/// Encoded frames and the shared frame mirror.
pub mod frame;
/// Hardware abstraction layer: mocks, I2C adapter and sensor driver.
pub mod hal;
/// Ordered screen rotation.
pub mod manager;
/// Device protocol for page-addressed panels.
pub mod panel;
/// Event timers and the render/update control loop.
pub mod scheduler;
/// Clock, logo and status screens.
pub mod screens;
/// Core traits for the bus, the sensor and screens.
pub mod traits;

/// Network services for monitoring (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use canvas::Canvas;
pub use config::{
    Config, ConfigError, PanelConfig, SchedulerConfig, ScreensConfig, SensorConfig, WebConfig,
};
pub use frame::{Frame, FrameMirror};
pub use manager::{ManagerError, ScreenManager};
pub use panel::{encode, Panel, PanelError, VccProfile};
pub use scheduler::{event_channel, Event, EventIntake, EventSender, Scheduler, Step};
pub use traits::{BusDevice, Publisher, Screen, SensorError, TemperatureSource};
