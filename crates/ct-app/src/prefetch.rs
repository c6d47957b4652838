//! Prefetch cache
//! 预取缓存
//!
//! Speculatively fetches one random candidate in the background so that the
//! next "random/next" navigation can swap instantly.
//!
//! ## Behavior / 行为
//! - Single slot: a new [`PrefetchCache::prefetch`] aborts and discards any
//!   uncollected entry.
//! - Best-effort: every failure is logged and swallowed at the task boundary.
//! - [`PrefetchCache::take`] never waits: a pending entry is a miss.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ct_core::ports::{FetchPriority, ProjectCatalogPort, ResourceHintPort};
use ct_core::{FeedError, Locale, Project, ProjectId, ViewRoute};
use tokio::task::AbortHandle;
use tracing::{debug, info_span, warn, Instrument};

enum PrefetchEntry {
    Pending { task: AbortHandle },
    Ready { project: Arc<Project> },
}

struct Slot {
    generation: u64,
    entry: Option<PrefetchEntry>,
}

impl Slot {
    fn discard(&mut self) {
        if let Some(PrefetchEntry::Pending { task }) = self.entry.take() {
            task.abort();
        }
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct PrefetchCache {
    catalog: Arc<dyn ProjectCatalogPort>,
    hints: Option<Arc<dyn ResourceHintPort>>,
    locale: Locale,
    slot: Arc<Mutex<Slot>>,
}

impl PrefetchCache {
    pub fn new(
        catalog: Arc<dyn ProjectCatalogPort>,
        hints: Option<Arc<dyn ResourceHintPort>>,
        locale: Locale,
    ) -> Self {
        Self {
            catalog,
            hints,
            locale,
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                entry: None,
            })),
        }
    }

    /// Begin a low-priority fetch for a random candidate.
    ///
    /// Fire-and-forget: returns immediately. Requires a Tokio runtime; without
    /// one the request is skipped.
    pub fn prefetch(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime available; skipping prefetch");
            return;
        };

        let mut slot = lock(&self.slot);
        slot.discard();
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;

        let job = PrefetchJob {
            catalog: Arc::clone(&self.catalog),
            hints: self.hints.clone(),
            locale: self.locale,
            slot: Arc::clone(&self.slot),
            generation,
        };
        let span = info_span!("usecase.prefetch", generation);
        let handle = runtime.spawn(job.run().instrument(span));
        slot.entry = Some(PrefetchEntry::Pending {
            task: handle.abort_handle(),
        });
    }

    /// Take the cached candidate.
    ///
    /// With `id`, only an entry for that project counts; a mismatching entry
    /// stays in place.
    pub fn take(&self, id: Option<&ProjectId>) -> Option<Arc<Project>> {
        let mut slot = lock(&self.slot);
        let matches = match &slot.entry {
            Some(PrefetchEntry::Ready { project }) => id.map_or(true, |id| project.id() == id),
            _ => false,
        };
        if !matches {
            return None;
        }
        match slot.entry.take() {
            Some(PrefetchEntry::Ready { project }) => Some(project),
            _ => None,
        }
    }

    /// Id of the ready candidate, if any.
    pub fn peek_id(&self) -> Option<ProjectId> {
        match &lock(&self.slot).entry {
            Some(PrefetchEntry::Ready { project }) => Some(project.id().clone()),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(lock(&self.slot).entry, Some(PrefetchEntry::Pending { .. }))
    }

    /// Abort pending work and drop any entry (view teardown).
    pub fn clear(&self) {
        let mut slot = lock(&self.slot);
        slot.discard();
        slot.generation = slot.generation.wrapping_add(1);
    }
}

impl Drop for PrefetchCache {
    fn drop(&mut self) {
        lock(&self.slot).discard();
    }
}

struct PrefetchJob {
    catalog: Arc<dyn ProjectCatalogPort>,
    hints: Option<Arc<dyn ResourceHintPort>>,
    locale: Locale,
    slot: Arc<Mutex<Slot>>,
    generation: u64,
}

impl PrefetchJob {
    async fn run(self) {
        // Let foreground work scheduled in the same tick go first.
        tokio::task::yield_now().await;

        match self.fetch().await {
            Ok(project) => {
                let path = ViewRoute::Project(project.id().clone()).path(self.locale);
                {
                    let mut slot = lock(&self.slot);
                    if slot.generation != self.generation {
                        debug!("Prefetch result superseded; discarding");
                        return;
                    }
                    debug!(project_id = %project.id(), "Prefetched candidate ready");
                    slot.entry = Some(PrefetchEntry::Ready { project });
                }
                self.hint(&path).await;
            }
            Err(err) => {
                warn!(error = %err, "Error prefetching next project");
                let mut slot = lock(&self.slot);
                if slot.generation == self.generation {
                    slot.entry = None;
                }
            }
        }
    }

    async fn fetch(&self) -> Result<Arc<Project>, FeedError> {
        let payload = self
            .catalog
            .fetch_random(FetchPriority::Low)
            .await
            .map_err(prefetch_failure)?;
        let mut project = Project::from_payload(payload).map_err(prefetch_failure)?;
        if !project.is_complete() {
            let contents = self
                .catalog
                .fetch_file_contents(project.id(), FetchPriority::Low)
                .await
                .map_err(prefetch_failure)?;
            project = project.with_contents(contents);
        }
        if !project.is_complete() {
            return Err(FeedError::PrefetchFailure {
                reason: format!(
                    "candidate {} is missing contents for {:?}",
                    project.id(),
                    project.missing_files()
                ),
            });
        }
        Ok(Arc::new(project))
    }

    async fn hint(&self, path: &str) {
        let Some(hints) = &self.hints else {
            return;
        };
        if let Err(err) = hints.hint(path).await {
            debug!(error = %err, path, "Resource hint failed; ignoring");
        }
    }
}

fn prefetch_failure(err: impl std::fmt::Display) -> FeedError {
    FeedError::PrefetchFailure {
        reason: err.to_string(),
    }
}
