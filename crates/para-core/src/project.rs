//! Project location and the optional "current project" capability
//!
//! A collaborating tool may know which WinCC OA project the user is working
//! on. It is modelled as a [`ProjectSource`]: a current value plus change
//! notifications. When no collaborator exists, discovery falls back to a
//! one-time static lookup.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

/// Directory of the SQLite stores, relative to the project directory
pub const SQLITE_DIR: [&str; 3] = ["db", "wincc_oa", "sqlite"];
/// Identity store (types, elements, datapoints, display metadata)
pub const IDENT_DB: &str = "ident.sqlite";
/// Configuration store (address, alerting, archiving, ...)
pub const CONFIG_DB: &str = "config.sqlite";
/// Last-value store
pub const LAST_VALUE_DB: &str = "last_value.sqlite";

/// `<project>/db/wincc_oa/sqlite`
pub fn sqlite_dir(project: &Path) -> PathBuf {
    SQLITE_DIR.iter().fold(project.to_path_buf(), |p, s| p.join(s))
}

/// True if `dir` contains the identity store
pub fn is_project_dir(dir: &Path) -> bool {
    sqlite_dir(dir).join(IDENT_DB).is_file()
}

/// Callback invoked with the new project directory (or `None` when cleared)
pub type ProjectChangeHandler = Box<dyn Fn(Option<&Path>) + Send + Sync>;

/// External source of the "current project"
pub trait ProjectSource: Send + Sync {
    /// Project selected right now, if any
    fn current_project(&self) -> Option<PathBuf>;

    /// Register for change notifications until the subscription is dropped
    fn on_project_changed(&self, handler: ProjectChangeHandler) -> Subscription;
}

/// Handle for a registered handler; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

type SharedHandler = Arc<dyn Fn(Option<&Path>) + Send + Sync>;

#[derive(Default)]
struct ChannelInner {
    current: Mutex<Option<PathBuf>>,
    handlers: Mutex<Vec<(u64, SharedHandler)>>,
    next_id: AtomicU64,
}

/// In-process [`ProjectSource`] that a host can drive directly
#[derive(Clone, Default)]
pub struct ProjectChannel {
    inner: Arc<ChannelInner>,
}

impl ProjectChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the current project and notify every subscriber
    pub fn set_project(&self, project: Option<PathBuf>) {
        *self.inner.current.lock() = project.clone();

        // Handlers run outside the lock so they may call back into the channel
        let handlers: Vec<SharedHandler> = self
            .inner
            .handlers
            .lock()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        debug!(
            project = ?project,
            subscribers = handlers.len(),
            "Project changed"
        );
        for handler in handlers {
            handler(project.as_deref());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.lock().len()
    }
}

impl ProjectSource for ProjectChannel {
    fn current_project(&self) -> Option<PathBuf> {
        self.inner.current.lock().clone()
    }

    fn on_project_changed(&self, handler: ProjectChangeHandler) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.handlers.lock().push((id, Arc::from(handler)));

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.handlers.lock().retain(|(h, _)| *h != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_sqlite_dir() {
        let dir = sqlite_dir(Path::new("/proj"));
        assert_eq!(dir, PathBuf::from("/proj/db/wincc_oa/sqlite"));
    }

    #[test]
    fn test_channel_notifies_until_dropped() {
        let channel = ProjectChannel::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let sub = channel.on_project_changed(Box::new(move |p| {
            assert_eq!(p, Some(Path::new("/a")));
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(channel.subscriber_count(), 1);

        channel.set_project(Some(PathBuf::from("/a")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(channel.current_project(), Some(PathBuf::from("/a")));

        drop(sub);
        assert_eq!(channel.subscriber_count(), 0);
        channel.set_project(None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(channel.current_project(), None);
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let channel = ProjectChannel::new();
        let sub = channel.on_project_changed(Box::new(|_| {}));
        let _other = channel.on_project_changed(Box::new(|_| {}));
        sub.unsubscribe();
        assert_eq!(channel.subscriber_count(), 1);
    }

    #[test]
    fn test_is_project_dir() {
        assert!(!is_project_dir(Path::new("/nonexistent/project")));
    }
}
