//! Response types for the monitoring API.

use serde::{Deserialize, Serialize};

use crate::frame::FrameMirror;

/// Panel geometry, so clients can lay out the `/buffer` bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryResponse {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Number of 8-row pages
    pub pages: u32,
}

impl From<&FrameMirror> for GeometryResponse {
    fn from(mirror: &FrameMirror) -> Self {
        Self {
            width: mirror.width(),
            height: mirror.height(),
            pages: mirror.height() / 8,
        }
    }
}

/// Error body for unknown routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl ErrorResponse {
    /// Create an error body
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_from_mirror() {
        let g = GeometryResponse::from(&FrameMirror::new(128, 64));
        assert_eq!(
            g,
            GeometryResponse {
                width: 128,
                height: 64,
                pages: 8
            }
        );
        assert_eq!(
            serde_json::to_string(&g).unwrap(),
            r#"{"width":128,"height":64,"pages":8}"#
        );
    }
}
