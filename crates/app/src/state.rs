//! Application state management

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use talks_core::{assistant, lifecycle};
use talks_core::{
    Accounts, AppConfig, Assistant, DashboardQuery, Database, Directory, MediaBackend,
    MeetingStore, NoMedia, PermissionMatrix, PlatformAction, Result, RoomRuntime, SessionRoom,
    User,
};
use tracing::{debug, info};

/// One SQLite connection shared by every store
pub type SharedDb = Arc<Mutex<Database>>;

/// Main application state
pub struct AppState {
    pub db: SharedDb,
    pub meetings: MeetingStore<SharedDb>,
    pub directory: Directory<SharedDb>,
    pub accounts: Accounts<SharedDb>,
    pub assistant: Arc<dyn Assistant>,
    pub media: Arc<dyn MediaBackend>,
    data_dir: PathBuf,
}

impl AppState {
    /// Open the database under the configured data dir and load every store
    pub fn new(config: &AppConfig, today: NaiveDate) -> Result<Self> {
        let data_dir = config.data_dir()?;
        std::fs::create_dir_all(&data_dir)?;

        let db = Database::open(config.database_path()?)?;
        Self::with_database(db, config, today, data_dir)
    }

    /// Build on an already opened database
    pub fn with_database(
        db: Database,
        config: &AppConfig,
        today: NaiveDate,
        data_dir: PathBuf,
    ) -> Result<Self> {
        debug!(schema = db.schema_version(), "Database ready");
        let db = Arc::new(Mutex::new(db));

        let meetings = MeetingStore::initialize(db.clone(), today, &mut rand::thread_rng());
        let directory = Directory::initialize(db.clone(), &config.admin)?;
        let accounts = Accounts::restore(db.clone());
        let assistant = assistant::from_config(&config.assistant)?;

        info!(
            meetings = meetings.len(),
            users = directory.len(),
            signed_in = accounts.is_signed_in(),
            "Application state loaded"
        );

        Ok(Self {
            db,
            meetings,
            directory,
            accounts,
            assistant,
            media: Arc::new(NoMedia),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn current_user(&self) -> Option<&User> {
        self.accounts.current()
    }

    /// Fresh dashboard navigation for the current viewer
    pub fn dashboard_query(&self) -> DashboardQuery {
        DashboardQuery::new(self.accounts.is_signed_in())
    }

    /// Book a slot for the signed-in user on an upcoming meeting with room
    pub fn book(&mut self, meeting_id: &str) -> bool {
        if !PermissionMatrix::can_access(self.current_user(), PlatformAction::BookSlot) {
            debug!("Booking needs a signed-in user");
            return false;
        }
        match self.meetings.find(meeting_id) {
            Some(m) if lifecycle::can_book(m) => {}
            Some(m) => {
                debug!(meeting_id, status = %m.status, "Meeting is not open for booking");
                return false;
            }
            None => return false,
        }
        self.meetings.book_slot(meeting_id)
    }

    /// Enter a meeting's room as the signed-in user
    pub fn open_room(&self, meeting_id: &str) -> Option<RoomRuntime> {
        let viewer = self.current_user()?.clone();
        let meeting = self.meetings.find(meeting_id)?.clone();
        let room = SessionRoom::open(meeting, viewer);
        Some(RoomRuntime::new(
            room,
            self.assistant.clone(),
            self.media.clone(),
        ))
    }
}
