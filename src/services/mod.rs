//! Network services for monitoring the panel.
//!
//! - `web` feature: Axum-based HTTP server exposing the frame mirror
//!
//! The server shares the process-wide [`FrameMirror`](crate::frame::FrameMirror)
//! with the scheduler through an `Arc`:
//!
//! ```ignore
//! use std::sync::Arc;
//! use oled_panel::frame::FrameMirror;
//! use oled_panel::services::{run_server, WebServerConfig};
//!
//! let mirror = Arc::new(FrameMirror::new(128, 64));
//! tokio::spawn(run_server(Arc::clone(&mirror), WebServerConfig::default()));
//! ```

pub mod api;
pub mod web;

pub use api::*;
pub use web::*;
