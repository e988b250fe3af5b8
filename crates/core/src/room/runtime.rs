//! Async driver for a session room
//!
//! Assistant and media calls run as tokio tasks; their outcomes come back as
//! [`RoomEvent`]s on one queue and are applied in arrival order.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use super::state::{ContentTab, RequestId, SessionRoom, ShareToggle, Submission};
use crate::assistant::Assistant;
use crate::error::Result;
use crate::media::{CaptureHandle, CaptureId, MediaBackend, ScreenCapture};

/// Completed background work for the room
#[derive(Debug)]
pub enum RoomEvent {
    AdviceResolved {
        request_id: RequestId,
        result: Result<String>,
    },
    /// A screen capture ended outside the room's control
    CaptureEnded(CaptureId),
}

pub struct RoomRuntime {
    room: SessionRoom,
    assistant: Arc<dyn Assistant>,
    media: Arc<dyn MediaBackend>,
    event_tx: mpsc::Sender<RoomEvent>,
    event_rx: mpsc::Receiver<RoomEvent>,
    screen: Option<CaptureHandle>,
    camera: Option<CaptureHandle>,
}

impl RoomRuntime {
    pub fn new(room: SessionRoom, assistant: Arc<dyn Assistant>, media: Arc<dyn MediaBackend>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(64);
        info!(meeting_id = %room.meeting().id, host = room.is_host(), "Entered room");
        Self {
            room,
            assistant,
            media,
            event_tx,
            event_rx,
            screen: None,
            camera: None,
        }
    }

    pub fn room(&self) -> &SessionRoom {
        &self.room
    }

    /// Direct access for synchronous edits such as drawing
    pub fn room_mut(&mut self) -> &mut SessionRoom {
        &mut self.room
    }

    /// Post chat text; `/ai` questions are sent to the assistant in the
    /// background
    pub fn submit(&mut self, text: &str) -> Submission {
        let submission = self.room.submit(text);
        if let Submission::Advice { request_id, query } = &submission {
            let assistant = self.assistant.clone();
            let tx = self.event_tx.clone();
            let request_id = *request_id;
            let query = query.clone();
            tokio::spawn(async move {
                let result = assistant.advise(&query).await;
                if tx
                    .send(RoomEvent::AdviceResolved { request_id, result })
                    .await
                    .is_err()
                {
                    debug!(request = request_id.0, "Room gone, advice dropped");
                }
            });
        }
        submission
    }

    /// Switch between whiteboard and camera view. Leaving the shared screen
    /// stops the capture.
    pub fn select_tab(&mut self, tab: ContentTab) -> bool {
        let changed = self.room.select_tab(tab);
        if changed {
            self.release_screen();
        }
        changed
    }

    /// Start or stop sharing the host's screen. Returns the active tab.
    #[instrument(skip(self))]
    pub async fn toggle_screen_share(&mut self) -> ContentTab {
        match self.room.toggle_screen_share() {
            ShareToggle::Denied => {}
            ShareToggle::Stopped => self.release_screen(),
            ShareToggle::Start => match self.media.start_screen_capture().await {
                Ok(capture) => self.attach_screen(capture),
                Err(e) => warn!(error = %e, "Screen share error"),
            },
        }
        self.room.tab()
    }

    /// Flip the host camera. A denied capture turns the flag back off.
    #[instrument(skip(self))]
    pub async fn toggle_camera(&mut self) -> Option<bool> {
        let on = self.room.toggle_camera()?;
        if on {
            match self.media.start_camera().await {
                Ok(handle) => self.camera = Some(handle),
                Err(e) => {
                    warn!(error = %e, "Could not access camera");
                    self.room.set_camera(false);
                }
            }
        } else if let Some(handle) = self.camera.take() {
            self.media.release(handle);
        }
        Some(self.room.camera_on())
    }

    pub fn toggle_mic(&mut self) -> Option<bool> {
        self.room.toggle_mic()
    }

    /// Wait for the next background result and apply it.
    ///
    /// Returns whether the room changed; stale results do not.
    pub async fn next_event(&mut self) -> bool {
        match self.event_rx.recv().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    /// Apply every result that is already queued, without waiting
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Leave the room and free every capture
    pub fn leave(&mut self) {
        self.room.leave();
        self.release_screen();
        if let Some(handle) = self.camera.take() {
            self.media.release(handle);
        }
        info!(meeting_id = %self.room.meeting().id, "Left room");
    }

    fn apply(&mut self, event: RoomEvent) -> bool {
        match event {
            RoomEvent::AdviceResolved { request_id, result } => {
                self.room.resolve_advice(request_id, result)
            }
            RoomEvent::CaptureEnded(id) => {
                if self.screen.map(|h| h.id) != Some(id) {
                    debug!(capture = id.0, "Ignoring end of old capture");
                    return false;
                }
                self.release_screen();
                self.room.end_screen_share()
            }
        }
    }

    fn attach_screen(&mut self, capture: ScreenCapture) {
        let ScreenCapture { handle, ended } = capture;
        if !self.room.begin_screen_share() {
            self.media.release(handle);
            return;
        }
        self.screen = Some(handle);
        self.watch_capture(handle.id, ended);
    }

    fn watch_capture(&self, id: CaptureId, ended: oneshot::Receiver<()>) {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            // Err means the sender was dropped on release, not an external end
            if ended.await.is_ok() {
                let _ = tx.send(RoomEvent::CaptureEnded(id)).await;
            }
        });
    }

    fn release_screen(&mut self) {
        if let Some(handle) = self.screen.take() {
            self.media.release(handle);
        }
    }
}

impl Drop for RoomRuntime {
    fn drop(&mut self) {
        self.release_screen();
        if let Some(handle) = self.camera.take() {
            self.media.release(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{OfflineAssistant, SessionDraft};
    use crate::error::Error;
    use crate::media::CaptureKind;
    use crate::models::{Meeting, MeetingStatus, Sender, StartTime, User};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct EchoAssistant;

    #[async_trait]
    impl Assistant for EchoAssistant {
        async fn draft_session(&self, _topic: &str) -> Result<SessionDraft> {
            Err(Error::Assistant("unused".into()))
        }

        async fn advise(&self, query: &str) -> Result<String> {
            Ok(format!("re: {query}"))
        }
    }

    /// Answers only once the gate is opened
    struct GatedAssistant {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl Assistant for GatedAssistant {
        async fn draft_session(&self, _topic: &str) -> Result<SessionDraft> {
            Err(Error::Assistant("unused".into()))
        }

        async fn advise(&self, query: &str) -> Result<String> {
            self.gate.notified().await;
            Ok(format!("re: {query}"))
        }
    }

    #[derive(Default)]
    struct FakeMedia {
        deny: bool,
        requests: AtomicUsize,
        released: Mutex<Vec<CaptureId>>,
        end_screen: Mutex<Option<oneshot::Sender<()>>>,
    }

    impl FakeMedia {
        fn denying() -> Self {
            Self {
                deny: true,
                ..Default::default()
            }
        }

        /// The OS stops the shared screen
        fn revoke_screen(&self) {
            if let Some(tx) = self.end_screen.lock().unwrap().take() {
                let _ = tx.send(());
            }
        }

        fn released(&self) -> usize {
            self.released.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MediaBackend for FakeMedia {
        async fn start_camera(&self) -> Result<CaptureHandle> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if self.deny {
                return Err(Error::Media("permission denied".into()));
            }
            Ok(CaptureHandle::new(CaptureKind::Camera))
        }

        async fn start_screen_capture(&self) -> Result<ScreenCapture> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if self.deny {
                return Err(Error::Media("permission denied".into()));
            }
            let (tx, rx) = oneshot::channel();
            *self.end_screen.lock().unwrap() = Some(tx);
            Ok(ScreenCapture {
                handle: CaptureHandle::new(CaptureKind::Screen),
                ended: rx,
            })
        }

        fn release(&self, handle: CaptureHandle) {
            self.released.lock().unwrap().push(handle.id);
        }
    }

    fn meeting() -> Meeting {
        Meeting {
            id: "live-0".to_string(),
            title: "LIVE: Forensics".to_string(),
            description: String::new(),
            host: "GhostRoot".to_string(),
            host_id: "u1".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 3, 10).unwrap(),
            start_time: StartTime::Now,
            max_slots: 15,
            booked_slots: 12,
            tags: Vec::new(),
            status: MeetingStatus::Live,
        }
    }

    fn viewer(id: &str) -> User {
        let mut u = User::new(format!("node-{id}"), "Node".to_string());
        u.id = id.to_string();
        u
    }

    fn runtime(
        viewer_id: &str,
        assistant: Arc<dyn Assistant>,
        media: Arc<FakeMedia>,
    ) -> RoomRuntime {
        RoomRuntime::new(SessionRoom::open(meeting(), viewer(viewer_id)), assistant, media)
    }

    #[tokio::test]
    async fn test_ai_reply_arrives_after_request() {
        let mut rt = runtime("u2", Arc::new(EchoAssistant), Arc::new(FakeMedia::default()));

        let submission = rt.submit("/ai What is a buffer overflow?");
        assert!(matches!(submission, Submission::Advice { .. }));
        assert_eq!(rt.room().messages().len(), 2);
        assert!(rt.room().is_thinking());

        assert!(rt.next_event().await);
        let messages = rt.room().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::You);
        assert_eq!(messages[2].sender, Sender::Assistant);
        assert_eq!(messages[2].text, "re: What is a buffer overflow?");
        assert!(!rt.room().is_thinking());
    }

    #[tokio::test]
    async fn test_ai_failure_leaves_only_request() {
        let mut rt = runtime("u2", Arc::new(OfflineAssistant), Arc::new(FakeMedia::default()));
        rt.submit("/ai What is a buffer overflow?");

        assert!(rt.next_event().await);
        let messages = rt.room().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, Sender::You);
        assert!(!rt.room().is_thinking());
    }

    #[tokio::test]
    async fn test_reply_interleaves_with_later_messages() {
        let gate = Arc::new(Notify::new());
        let assistant = Arc::new(GatedAssistant { gate: gate.clone() });
        let mut rt = runtime("u2", assistant, Arc::new(FakeMedia::default()));

        rt.submit("/ai first");
        rt.submit("second");
        gate.notify_one();
        assert!(rt.next_event().await);

        let texts: Vec<&str> = rt.room().messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(&texts[1..], &["/ai first", "second", "re: first"]);
    }

    #[tokio::test]
    async fn test_reply_after_leaving_is_discarded() {
        let gate = Arc::new(Notify::new());
        let assistant = Arc::new(GatedAssistant { gate: gate.clone() });
        let mut rt = runtime("u2", assistant, Arc::new(FakeMedia::default()));

        rt.submit("/ai late question");
        rt.leave();
        gate.notify_one();

        assert!(!rt.next_event().await);
        assert_eq!(rt.room().messages().len(), 2);
    }

    #[tokio::test]
    async fn test_non_host_screen_share_is_noop() {
        let media = Arc::new(FakeMedia::default());
        let mut rt = runtime("u2", Arc::new(OfflineAssistant), media.clone());

        assert_eq!(rt.toggle_screen_share().await, ContentTab::Whiteboard);
        assert_eq!(media.requests.load(Ordering::SeqCst), 0);
        assert_eq!(rt.toggle_camera().await, None);
    }

    #[tokio::test]
    async fn test_host_screen_share_toggle() {
        let media = Arc::new(FakeMedia::default());
        let mut rt = runtime("u1", Arc::new(OfflineAssistant), media.clone());

        assert_eq!(rt.toggle_screen_share().await, ContentTab::ScreenShare);
        assert_eq!(media.released(), 0);

        assert_eq!(rt.toggle_screen_share().await, ContentTab::Whiteboard);
        assert_eq!(media.released(), 1);
    }

    #[tokio::test]
    async fn test_external_capture_end_returns_to_whiteboard() {
        let media = Arc::new(FakeMedia::default());
        let mut rt = runtime("u1", Arc::new(OfflineAssistant), media.clone());

        rt.toggle_screen_share().await;
        media.revoke_screen();

        assert!(rt.next_event().await);
        assert_eq!(rt.room().tab(), ContentTab::Whiteboard);
        assert_eq!(media.released(), 1);
    }

    #[tokio::test]
    async fn test_denied_screen_capture_changes_nothing() {
        let media = Arc::new(FakeMedia::denying());
        let mut rt = runtime("u1", Arc::new(OfflineAssistant), media.clone());

        assert_eq!(rt.toggle_screen_share().await, ContentTab::Whiteboard);
        assert_eq!(media.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_selecting_another_tab_stops_sharing() {
        let media = Arc::new(FakeMedia::default());
        let mut rt = runtime("u1", Arc::new(OfflineAssistant), media.clone());

        rt.toggle_screen_share().await;
        assert!(rt.select_tab(ContentTab::Camera));
        assert_eq!(media.released(), 1);
        assert_eq!(rt.room().tab(), ContentTab::Camera);
    }

    #[tokio::test]
    async fn test_camera_toggle() {
        let media = Arc::new(FakeMedia::default());
        let mut rt = runtime("u1", Arc::new(OfflineAssistant), media.clone());

        assert_eq!(rt.toggle_camera().await, Some(true));
        assert_eq!(rt.toggle_camera().await, Some(false));
        assert_eq!(media.released(), 1);
    }

    #[tokio::test]
    async fn test_denied_camera_reverts_flag() {
        let media = Arc::new(FakeMedia::denying());
        let mut rt = runtime("u1", Arc::new(OfflineAssistant), media);

        assert_eq!(rt.toggle_camera().await, Some(false));
        assert!(!rt.room().camera_on());
    }

    #[tokio::test]
    async fn test_process_pending_drains_queue() {
        let mut rt = runtime("u2", Arc::new(EchoAssistant), Arc::new(FakeMedia::default()));
        rt.submit("/ai one");
        rt.submit("/ai two");

        // Let both tasks finish
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(rt.process_pending(), 2);
        assert_eq!(rt.room().messages().len(), 5);
        assert!(!rt.room().is_thinking());
    }

    #[tokio::test]
    async fn test_leave_releases_captures() {
        let media = Arc::new(FakeMedia::default());
        let mut rt = runtime("u1", Arc::new(OfflineAssistant), media.clone());

        rt.toggle_camera().await;
        rt.toggle_screen_share().await;
        rt.leave();
        assert_eq!(media.released(), 2);
        assert!(!rt.room().is_open());
    }
}
