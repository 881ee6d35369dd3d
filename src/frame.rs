//! Encoded frames and the shared frame mirror.
//!
//! A [`Frame`] is the page-addressed, bit-packed image the panel expects on
//! the wire. The [`FrameMirror`] holds the most recently published frame for
//! external readers (the monitoring web endpoint).

use std::sync::{Mutex, PoisonError};

use log::warn;

/// Page-addressed frame bytes, `width * height / 8` long.
///
/// Byte `page * width + column` holds the 8 pixels of that column within
/// the page; bit 0 is the top row of the page and bit 7 the bottom row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    bytes: Box<[u8]>,
}

impl Frame {
    /// Number of frame bytes for a panel of the given size: one byte per
    /// column in each full 8-row page. Rows below the last full page are
    /// not addressable.
    #[inline]
    pub const fn byte_len(width: u32, height: u32) -> usize {
        (height / 8) as usize * width as usize
    }

    /// An all-dark frame.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bytes: vec![0; Self::byte_len(width, height)].into_boxed_slice(),
        }
    }

    /// Wraps already-encoded bytes.
    ///
    /// Returns `None` if `bytes` does not have the exact length for the
    /// geometry.
    pub fn from_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        (bytes.len() == Self::byte_len(width, height)).then(|| Self {
            width,
            height,
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub(crate) fn from_encoded(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), Self::byte_len(width, height));
        Self {
            width,
            height,
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Panel width the frame was encoded for.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Panel height the frame was encoded for.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of 8-row pages.
    pub fn pages(&self) -> u32 {
        self.height / 8
    }

    /// Raw frame bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes of one page, or `None` past the last page.
    pub fn page(&self, page: u32) -> Option<&[u8]> {
        if page >= self.pages() {
            return None;
        }
        let w = self.width as usize;
        let start = page as usize * w;
        Some(&self.bytes[start..start + w])
    }

    /// Frame length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for a zero-sized panel.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Most recently published frame, shared between the screens' update path
/// and external readers.
///
/// Constructed once at startup and handed around as `Arc<FrameMirror>`.
/// Writers overwrite the whole buffer under a single lock; the last writer
/// wins and readers always see a complete frame.
#[derive(Debug)]
pub struct FrameMirror {
    width: u32,
    height: u32,
    buffer: Mutex<Vec<u8>>,
}

impl FrameMirror {
    /// Creates a mirror holding an all-dark frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: Mutex::new(vec![0; Frame::byte_len(width, height)]),
        }
    }

    /// Panel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Panel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Overwrites the mirror with `frame`.
    ///
    /// A frame for a different geometry is rejected so the mirror length
    /// never changes.
    pub fn publish(&self, frame: &Frame) {
        if frame.width() != self.width || frame.height() != self.height {
            warn!(
                "mirror rejected {}x{} frame (mirror is {}x{})",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            );
            return;
        }
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.copy_from_slice(frame.as_bytes());
    }

    /// Copies out the current mirror contents.
    pub fn snapshot(&self) -> Vec<u8> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_from_bytes_checks_length() {
        assert!(Frame::from_bytes(8, 8, vec![0; 8]).is_some());
        assert!(Frame::from_bytes(8, 8, vec![0; 7]).is_none());
    }

    #[test]
    fn partial_page_rows_are_not_counted() {
        assert_eq!(Frame::byte_len(8, 12), 8);
        assert_eq!(Frame::byte_len(5, 7), 0);
        let frame = Frame::blank(8, 12);
        assert_eq!(frame.len(), 8);
        assert_eq!(frame.pages(), 1);
        assert!(frame.page(1).is_none());
    }

    #[test]
    fn frame_pages() {
        let bytes: Vec<u8> = (0..32).collect();
        let frame = Frame::from_bytes(16, 16, bytes).unwrap();
        assert_eq!(frame.pages(), 2);
        assert_eq!(frame.page(1).unwrap()[0], 16);
        assert!(frame.page(2).is_none());
    }

    #[test]
    fn mirror_starts_dark() {
        let mirror = FrameMirror::new(128, 64);
        let snap = mirror.snapshot();
        assert_eq!(snap.len(), 1024);
        assert!(snap.iter().all(|&b| b == 0));
    }

    #[test]
    fn mirror_last_writer_wins() {
        let mirror = FrameMirror::new(8, 8);
        mirror.publish(&Frame::from_bytes(8, 8, vec![1; 8]).unwrap());
        mirror.publish(&Frame::from_bytes(8, 8, vec![2; 8]).unwrap());
        assert_eq!(mirror.snapshot(), vec![2; 8]);
    }

    #[test]
    fn mirror_rejects_other_geometry() {
        let mirror = FrameMirror::new(8, 8);
        mirror.publish(&Frame::from_bytes(16, 8, vec![0xFF; 16]).unwrap());
        assert_eq!(mirror.snapshot(), vec![0; 8]);
    }
}
