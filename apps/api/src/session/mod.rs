//! Per-session context: who is signed in, which page they are on, and what
//! they have accumulated. Each session sits behind its own async mutex inside
//! one process-wide map keyed by the `session_id` cookie.

pub mod controller;
pub mod credentials;
pub mod env_file;
pub mod extract;
pub mod handlers;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ParsedResume;
use crate::models::user::SignedInUser;
use controller::Page;
use credentials::CredentialStore;

pub const SESSION_COOKIE: &str = "session_id";

/// A file produced for this session and offered back for download.
#[derive(Debug, Clone)]
pub struct Download {
    pub path: PathBuf,
    pub file_name: String,
    pub media_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadHandle {
    pub download_id: Uuid,
    pub file_name: String,
    pub url: String,
}

#[derive(Debug)]
pub struct SessionState {
    pub id: Uuid,
    pub user: Option<SignedInUser>,
    /// Session-scoped copy of the seeded credentials; admin additions land here.
    pub users: CredentialStore,
    pub tokens: Vec<String>,
    pub page: Page,
    pub resumes: Vec<ParsedResume>,
    pub downloads: HashMap<Uuid, Download>,
}

impl SessionState {
    pub fn new(id: Uuid, users: CredentialStore) -> Self {
        Self {
            id,
            user: None,
            users,
            tokens: Vec::new(),
            page: Page::LoggedOut,
            resumes: Vec::new(),
            downloads: HashMap::new(),
        }
    }

    pub fn sign_in(&mut self, user: SignedInUser) {
        self.user = Some(user);
        self.page = Page::Welcome;
    }

    /// Clears the identity and everything accumulated under it. The
    /// session's credential copy and tokens survive.
    pub fn sign_out(&mut self) {
        self.user = None;
        self.page = Page::LoggedOut;
        self.resumes.clear();
        self.downloads.clear();
        debug!("Session {} signed out", self.id);
    }

    pub fn navigate(&mut self, target: Page) -> Result<Page, AppError> {
        let page = controller::transition(self.user.as_ref(), target)?;
        self.page = page;
        Ok(page)
    }

    pub fn register_download(&mut self, download: Download) -> DownloadHandle {
        let download_id = Uuid::new_v4();
        let handle = DownloadHandle {
            download_id,
            file_name: download.file_name.clone(),
            url: format!("/api/v1/downloads/{download_id}"),
        };
        self.downloads.insert(download_id, download);
        handle
    }

    pub fn find_resume(&self, id: Uuid) -> Option<&ParsedResume> {
        self.resumes.iter().find(|r| r.id == id)
    }
}

pub type SessionHandle = Arc<Mutex<SessionState>>;

struct Slot {
    handle: SessionHandle,
    last_seen: Instant,
}

/// Process-wide session map. A session untouched for `idle_ttl` is dropped
/// on its next lookup or by `evict_idle`, whichever comes first.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Slot>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Looks up a live session and marks it as seen.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let slot = sessions.get_mut(&id)?;
        if now.duration_since(slot.last_seen) >= self.idle_ttl {
            sessions.remove(&id);
            debug!("Session {id} expired");
            return None;
        }
        slot.last_seen = now;
        Some(slot.handle.clone())
    }

    /// Starts a session with its own copy of the seeded credentials.
    pub async fn create(&self, seed_users: &CredentialStore) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(SessionState::new(id, seed_users.clone())));
        let slot = Slot {
            handle: handle.clone(),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, slot);
        debug!("Session {id} created");
        (id, handle)
    }

    /// Drops every session idle for at least `idle_ttl`. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| now.duration_since(slot.last_seen) < self.idle_ttl);
        before - sessions.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Sweeps idle sessions every `period` for the life of the process.
pub fn spawn_sweeper(store: Arc<SessionStore>, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle().await;
            if evicted > 0 {
                info!("Evicted {evicted} idle sessions");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeRecord;
    use crate::models::user::Role;

    fn recruiter() -> SignedInUser {
        SignedInUser {
            username: "manish".to_string(),
            role: Role::Recruiter,
        }
    }

    const IDLE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(IDLE);
        let seed = CredentialStore::default();
        let (a, handle_a) = store.create(&seed).await;
        let (b, _) = store.create(&seed).await;
        assert_ne!(a, b);

        handle_a
            .lock()
            .await
            .resumes
            .push(ParsedResume::new("a.pdf", ResumeRecord::default()));

        let handle_b = store.get(b).await.unwrap();
        assert!(handle_b.lock().await.resumes.is_empty());
        assert_eq!(store.get(a).await.unwrap().lock().await.resumes.len(), 1);
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire_on_lookup() {
        let store = SessionStore::new(IDLE);
        let (id, _) = store.create(&CredentialStore::default()).await;

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(store.get(id).await.is_some());
        // The lookup above refreshed it.
        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(store.get(id).await.is_some());

        tokio::time::advance(IDLE).await;
        assert!(store.get(id).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_idle_bounds_the_store() {
        let store = SessionStore::new(IDLE);
        let seed = CredentialStore::default();
        for _ in 0..1000 {
            store.create(&seed).await;
        }
        tokio::time::advance(Duration::from_secs(30)).await;
        let (kept, _) = store.create(&seed).await;
        assert_eq!(store.len().await, 1001);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.evict_idle().await, 1000);
        assert_eq!(store.len().await, 1);
        assert!(store.get(kept).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_in_background() {
        let store = Arc::new(SessionStore::new(IDLE));
        store.create(&CredentialStore::default()).await;
        let sweeper = spawn_sweeper(store.clone(), Duration::from_secs(10));

        tokio::time::sleep(IDLE + Duration::from_secs(15)).await;
        assert_eq!(store.len().await, 0);
        sweeper.abort();
    }

    #[test]
    fn test_sign_in_then_out() {
        let mut state = SessionState::new(Uuid::new_v4(), CredentialStore::default());
        assert_eq!(state.page, Page::LoggedOut);

        state.sign_in(recruiter());
        assert_eq!(state.page, Page::Welcome);
        assert_eq!(state.navigate(Page::CvToCsv).unwrap(), Page::CvToCsv);
        state.tokens.push("Bearer t".to_string());

        state.sign_out();
        assert!(state.user.is_none());
        assert_eq!(state.page, Page::LoggedOut);
        assert_eq!(state.tokens.len(), 1);
    }

    #[test]
    fn test_failed_navigation_keeps_page() {
        let mut state = SessionState::new(Uuid::new_v4(), CredentialStore::default());
        state.sign_in(recruiter());
        state.navigate(Page::SalesAgent).unwrap();
        assert!(state.navigate(Page::Admin).is_err());
        assert_eq!(state.page, Page::SalesAgent);
    }

    #[test]
    fn test_register_download_builds_url() {
        let mut state = SessionState::new(Uuid::new_v4(), CredentialStore::default());
        let handle = state.register_download(Download {
            path: PathBuf::from("/tmp/x.csv"),
            file_name: "x.csv".to_string(),
            media_type: "text/csv",
        });
        assert_eq!(handle.url, format!("/api/v1/downloads/{}", handle.download_id));
        assert!(state.downloads.contains_key(&handle.download_id));
    }
}
