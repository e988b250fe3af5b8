//! Media-capture collaborator
//!
//! Camera/microphone and screen captures are requested on demand and must
//! be released explicitly. A screen capture can also be ended from outside
//! (the host revokes the shared source); its `ended` receiver fires then.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureId(pub u64);

impl CaptureId {
    /// Process-unique id for a new capture
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        CaptureId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Camera with microphone
    Camera,
    Screen,
}

/// A live source that can be attached to a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureHandle {
    pub id: CaptureId,
    pub kind: CaptureKind,
}

impl CaptureHandle {
    pub fn new(kind: CaptureKind) -> Self {
        Self {
            id: CaptureId::next(),
            kind,
        }
    }
}

/// A granted screen capture
#[derive(Debug)]
pub struct ScreenCapture {
    pub handle: CaptureHandle,
    /// Fires when the capture ends outside the room's control
    pub ended: oneshot::Receiver<()>,
}

#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Ask for camera and microphone access
    async fn start_camera(&self) -> Result<CaptureHandle>;

    /// Ask the user to pick a screen or window to share
    async fn start_screen_capture(&self) -> Result<ScreenCapture>;

    /// Stop a capture and free the device
    fn release(&self, handle: CaptureHandle);
}

/// Headless backend: every request is denied
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMedia;

#[async_trait]
impl MediaBackend for NoMedia {
    async fn start_camera(&self) -> Result<CaptureHandle> {
        Err(Error::Media("no camera available".into()))
    }

    async fn start_screen_capture(&self) -> Result<ScreenCapture> {
        Err(Error::Media("screen capture not supported".into()))
    }

    fn release(&self, _handle: CaptureHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_ids_are_unique() {
        let a = CaptureHandle::new(CaptureKind::Camera);
        let b = CaptureHandle::new(CaptureKind::Screen);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_no_media_denies() {
        assert!(matches!(NoMedia.start_camera().await, Err(Error::Media(_))));
        assert!(NoMedia.start_screen_capture().await.is_err());
    }
}
