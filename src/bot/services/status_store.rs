//! Site status flag storage.
//!
//! The remote backend is tried first on every read and write; any failure
//! degrades to a process-wide in-memory cell. Callers never see an error.
//! Once a write has landed in memory, reads serve memory until the next
//! remote write succeeds, so a read always reflects the last write.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use smartstring::alias::String as SmartString;
use strum_macros::Display;
use tracing::{debug, warn};

/// Opaque concurrency token handed out by the remote backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(pub SmartString);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusSource {
    Remote,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteStatus {
    pub active: bool,
    pub source: StatusSource,
    pub revision: Option<Revision>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub ok: bool,
    pub source: StatusSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStatus {
    pub active: bool,
    pub revision: Revision,
}

#[derive(Debug)]
pub enum BackendError {
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    /// The stored revision no longer matches the precondition.
    Conflict,
    Malformed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Http(err) => write!(f, "remote status request failed: {err}"),
            BackendError::Status(code) => write!(f, "remote status backend answered {code}"),
            BackendError::Conflict => write!(f, "remote status revision changed"),
            BackendError::Malformed(reason) => write!(f, "malformed status document: {reason}"),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackendError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Http(err)
    }
}

/// Remote document holding the flag. `store` must reject the write when the
/// document's revision differs from `precondition`.
pub trait StatusBackend: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<RemoteStatus, BackendError>> + Send;

    fn store(
        &self,
        active: bool,
        precondition: &Revision,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Shared fallback flag. Clones point at the same cell.
#[derive(Debug, Clone)]
pub struct MemoryCell(Arc<AtomicBool>);

impl MemoryCell {
    pub fn new(initial: bool) -> Self {
        Self(Arc::new(AtomicBool::new(initial)))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::SeqCst);
    }
}

pub struct StatusStore<B> {
    backend: Option<B>,
    memory: MemoryCell,
    /// Set while memory holds a newer value than the remote document.
    diverged: AtomicBool,
}

impl<B: StatusBackend> StatusStore<B> {
    pub fn new(backend: Option<B>, memory: MemoryCell) -> Self {
        Self {
            backend,
            memory,
            diverged: AtomicBool::new(false),
        }
    }

    pub fn memory_only(memory: MemoryCell) -> Self {
        Self::new(None, memory)
    }

    fn memory_status(&self) -> SiteStatus {
        SiteStatus {
            active: self.memory.get(),
            source: StatusSource::Memory,
            revision: None,
        }
    }

    async fn fetch_remote(&self) -> Option<RemoteStatus> {
        let backend = self.backend.as_ref()?;

        match backend.fetch().await {
            Ok(v) => Some(v),
            Err(err) => {
                warn!("Reading remote site status failed, using memory: {err}");
                None
            }
        }
    }

    pub async fn read(&self) -> SiteStatus {
        if self.diverged.load(Ordering::SeqCst) {
            debug!("Remote site status is behind memory, serving memory");
            return self.memory_status();
        }

        match self.fetch_remote().await {
            Some(remote) => SiteStatus {
                active: remote.active,
                source: StatusSource::Remote,
                revision: Some(remote.revision),
            },
            None => self.memory_status(),
        }
    }

    /// Replaces either the remote document or the memory cell, never both.
    pub async fn write(&self, active: bool) -> WriteOutcome {
        if let (Some(backend), Some(current)) = (self.backend.as_ref(), self.fetch_remote().await) {
            match backend.store(active, &current.revision).await {
                Ok(()) => {
                    self.diverged.store(false, Ordering::SeqCst);
                    debug!("Site status set to {active} remotely");
                    return WriteOutcome {
                        ok: true,
                        source: StatusSource::Remote,
                    };
                }
                Err(err) => warn!("Writing remote site status failed, using memory: {err}"),
            }
        }

        self.memory.set(active);
        if self.backend.is_some() {
            self.diverged.store(true, Ordering::SeqCst);
        }
        debug!("Site status set to {active} in memory");

        WriteOutcome {
            ok: true,
            source: StatusSource::Memory,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeBackend;
    use super::*;

    #[tokio::test]
    async fn memory_only_store() {
        let store: StatusStore<FakeBackend> = StatusStore::memory_only(MemoryCell::new(true));

        let status = store.read().await;
        assert!(status.active);
        assert_eq!(status.source, StatusSource::Memory);
        assert!(status.revision.is_none());

        let outcome = store.write(false).await;
        assert_eq!(
            outcome,
            WriteOutcome {
                ok: true,
                source: StatusSource::Memory
            }
        );
        assert!(!store.read().await.active);
    }

    #[tokio::test]
    async fn remote_read_carries_revision() {
        let store = StatusStore::new(Some(FakeBackend::new(true)), MemoryCell::new(false));

        let status = store.read().await;
        assert!(status.active);
        assert_eq!(status.source, StatusSource::Remote);
        assert_eq!(status.revision, Some(Revision("1".into())));
    }

    #[tokio::test]
    async fn remote_write_leaves_memory_untouched() {
        let memory = MemoryCell::new(true);
        let store = StatusStore::new(Some(FakeBackend::new(true)), memory.clone());

        let outcome = store.write(false).await;

        assert_eq!(outcome.source, StatusSource::Remote);
        assert!(outcome.ok);
        assert!(memory.get());
        let status = store.read().await;
        assert!(!status.active);
        assert_eq!(status.source, StatusSource::Remote);
    }

    #[tokio::test]
    async fn read_after_write_matches_last_value_and_source() {
        for backend in [None, Some(FakeBackend::new(false))] {
            let store = StatusStore::new(backend, MemoryCell::new(false));

            for value in [true, false, false, true, true] {
                let outcome = store.write(value).await;
                let status = store.read().await;

                assert_eq!(status.active, value);
                assert_eq!(status.source, outcome.source);
            }
        }
    }

    #[tokio::test]
    async fn repeated_write_is_idempotent() {
        let store = StatusStore::new(Some(FakeBackend::new(false)), MemoryCell::new(false));

        assert!(store.write(true).await.ok);
        assert!(store.read().await.active);
        assert!(store.write(true).await.ok);
        assert!(store.read().await.active);
    }

    #[tokio::test]
    async fn failing_remote_degrades_to_memory() {
        let store = StatusStore::new(Some(FakeBackend::failing()), MemoryCell::new(false));

        let outcome = store.write(true).await;
        assert_eq!(outcome.source, StatusSource::Memory);
        assert!(outcome.ok);

        let status = store.read().await;
        assert!(status.active);
        assert_eq!(status.source, StatusSource::Memory);
    }

    #[tokio::test]
    async fn conflicting_write_falls_back_without_touching_remote() {
        let backend = FakeBackend::new(false);
        backend.race_writes.store(true, Ordering::SeqCst);
        let memory = MemoryCell::new(false);
        let store = StatusStore::new(Some(backend), memory.clone());

        let outcome = store.write(true).await;

        assert_eq!(outcome.source, StatusSource::Memory);
        assert!(memory.get());
        assert!(!store.backend.as_ref().unwrap().active());
    }

    #[tokio::test]
    async fn rejected_remote_write_is_still_read_back() {
        let backend = FakeBackend::new(false);
        backend.fail_writes.store(true, Ordering::SeqCst);
        let store = StatusStore::new(Some(backend), MemoryCell::new(false));

        let outcome = store.write(true).await;
        assert_eq!(outcome.source, StatusSource::Memory);

        let status = store.read().await;
        assert!(status.active);
        assert_eq!(status.source, StatusSource::Memory);

        let backend = store.backend.as_ref().unwrap();
        assert!(!backend.active());
        backend.fail_writes.store(false, Ordering::SeqCst);

        let outcome = store.write(false).await;
        assert_eq!(outcome.source, StatusSource::Remote);

        let status = store.read().await;
        assert!(!status.active);
        assert_eq!(status.source, StatusSource::Remote);
    }

    #[test]
    fn memory_cell_clones_share_state() {
        let a = MemoryCell::new(false);
        let b = a.clone();

        b.set(true);

        assert!(a.get());
    }

    #[test]
    fn source_display() {
        assert_eq!(StatusSource::Remote.to_string(), "remote");
        assert_eq!(StatusSource::Memory.to_string(), "memory");
    }
}
