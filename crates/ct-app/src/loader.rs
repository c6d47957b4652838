//! Progressive project loader
//! 渐进式作品加载器
//!
//! Owns the fetch lifecycle for the current project and publishes every
//! [`LoadState`] change through a `watch` channel.
//!
//! ## Ordering / 顺序
//! At most one load is live. Starting a new one cancels the previous
//! request and bumps a generation counter; a result carrying a stale
//! generation is dropped as [`LoadError::Superseded`] and never touches state.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ct_core::load::LoadTarget;
use ct_core::ports::{CatalogError, FetchPriority, ProjectCatalogPort};
use ct_core::{LoadError, LoadEvent, LoadState, LoadStateMachine, Project, ProjectId, ProjectPayload};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::prefetch::PrefetchCache;

/// What the view renders: the load state plus the project it refers to.
/// 视图快照：加载状态与对应作品。
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderSnapshot {
    pub state: LoadState,
    pub project: Option<Arc<Project>>,
}

impl LoaderSnapshot {
    fn idle() -> Self {
        Self {
            state: LoadState::Idle,
            project: None,
        }
    }
}

/// How a failed attempt leaves the loader.
#[derive(Debug, Clone, Copy)]
enum Recovery {
    /// Enter `Failed` (direct loads).
    Fail,
    /// Return to the last settled snapshot (random navigation).
    Restore,
}

struct Attempt {
    generation: u64,
    token: CancellationToken,
}

struct LoadControl {
    generation: u64,
    cancel: CancellationToken,
    closed: bool,
    last_settled: LoaderSnapshot,
}

pub struct ProgressiveProjectLoader {
    catalog: Arc<dyn ProjectCatalogPort>,
    prefetch: Option<Arc<PrefetchCache>>,
    control: Mutex<LoadControl>,
    snapshot: watch::Sender<LoaderSnapshot>,
}

impl ProgressiveProjectLoader {
    pub fn new(
        catalog: Arc<dyn ProjectCatalogPort>,
        prefetch: Option<Arc<PrefetchCache>>,
    ) -> Self {
        let (snapshot, _) = watch::channel(LoaderSnapshot::idle());
        Self {
            catalog,
            prefetch,
            control: Mutex::new(LoadControl {
                generation: 0,
                cancel: CancellationToken::new(),
                closed: false,
                last_settled: LoaderSnapshot::idle(),
            }),
            snapshot,
        }
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoaderSnapshot> {
        self.snapshot.subscribe()
    }

    /// Load one project by id.
    ///
    /// `NotFound` is reported distinctly; any other failure ends in
    /// [`LoadState::Failed`].
    pub async fn load(&self, id: &ProjectId) -> Result<Arc<Project>, LoadError> {
        let span = info_span!("usecase.load_project", project_id = %id);

        async {
            let attempt = self.begin(LoadTarget::Project(id.clone()))?;
            let fetched = self
                .guarded(&attempt, self.catalog.fetch_project(id, FetchPriority::Normal))
                .await?;

            match fetched {
                Ok(payload) => self.settle(&attempt, payload, Recovery::Fail).await,
                Err(CatalogError::NotFound) => {
                    info!("Project not found");
                    Err(self.abandon(
                        &attempt,
                        LoadError::NotFound {
                            project_id: id.clone(),
                        },
                        Recovery::Fail,
                    ))
                }
                Err(err) => Err(self.abandon(&attempt, catalog_failure(err), Recovery::Fail)),
            }
        }
        .instrument(span)
        .await
    }

    /// Load a backend-chosen project.
    ///
    /// On failure the previously settled snapshot is restored and the error
    /// is returned for a transient notice.
    pub async fn load_random(&self) -> Result<Arc<Project>, LoadError> {
        let span = info_span!("usecase.load_random");

        async {
            let attempt = self.begin(LoadTarget::Random)?;
            let fetched = self
                .guarded(&attempt, self.catalog.fetch_random(FetchPriority::Normal))
                .await?;

            match fetched {
                Ok(payload) => self.settle(&attempt, payload, Recovery::Restore).await,
                Err(err) => Err(self.abandon(&attempt, catalog_failure(err), Recovery::Restore)),
            }
        }
        .instrument(span)
        .await
    }

    /// Install an already complete project (a prefetch hit).
    pub fn adopt(&self, project: Arc<Project>) -> Result<Arc<Project>, LoadError> {
        let _span = info_span!("usecase.adopt_project", project_id = %project.id()).entered();

        let attempt = self.begin(LoadTarget::Random)?;
        if !project.is_complete() {
            return Err(self.abandon(
                &attempt,
                failure(format!("project {} is incomplete", project.id())),
                Recovery::Restore,
            ));
        }
        self.ready(&attempt, project)
    }

    /// Run `f` while `project` is still the ready project on screen.
    ///
    /// Holds the load lock for the duration of `f`, so no newer attempt can
    /// start or settle in between. Returns `None` once another attempt took
    /// over.
    /// 仅当该作品仍是当前就绪作品时执行 `f`（持有加载锁）。
    pub fn while_ready<R>(&self, project: &Arc<Project>, f: impl FnOnce() -> R) -> Option<R> {
        let control = self.lock_control();
        let current = !control.closed && {
            let snapshot = self.snapshot.borrow();
            matches!(&snapshot.state, LoadState::Ready { project_id } if project_id == project.id())
                && snapshot
                    .project
                    .as_ref()
                    .is_some_and(|shown| Arc::ptr_eq(shown, project))
        };
        let result = current.then(f);
        drop(control);
        result
    }

    /// Run `f` while the loader still shows `error` as its failed state.
    pub fn while_failed<R>(&self, error: &LoadError, f: impl FnOnce() -> R) -> Option<R> {
        let control = self.lock_control();
        let current = !control.closed
            && matches!(&self.snapshot.borrow().state, LoadState::Failed { error: shown } if shown == error);
        let result = current.then(f);
        drop(control);
        result
    }

    /// Cancel any in-flight load and refuse new ones (view teardown).
    pub fn shutdown(&self) {
        let mut control = self.lock_control();
        control.closed = true;
        control.cancel.cancel();
        control.generation = control.generation.wrapping_add(1);
        debug!("Loader shut down");
    }

    async fn settle(
        &self,
        attempt: &Attempt,
        payload: ProjectPayload,
        recovery: Recovery,
    ) -> Result<Arc<Project>, LoadError> {
        let project = match Project::from_payload(payload) {
            Ok(project) => project,
            Err(err) => {
                return Err(self.abandon(attempt, failure(err), recovery))
            }
        };

        if project.is_complete() {
            return self.ready(attempt, Arc::new(project));
        }

        let project = Arc::new(project);
        let project_id = project.id().clone();
        self.commit(
            attempt,
            LoadEvent::MetadataArrived {
                project_id: project_id.clone(),
            },
            Some(Arc::clone(&project)),
        )?;
        debug!(missing = ?project.missing_files(), "Metadata ready; fetching contents");

        let contents = self
            .guarded(
                attempt,
                self.catalog
                    .fetch_file_contents(&project_id, FetchPriority::Normal),
            )
            .await?;

        let error = match contents {
            Ok(contents) => {
                let complete = project.with_contents(contents);
                if complete.is_complete() {
                    return self.ready(attempt, Arc::new(complete));
                }
                failure(format!("contents missing for {:?}", complete.missing_files()))
            }
            Err(err) => catalog_failure(err),
        };
        Err(self.abandon(attempt, error, recovery))
    }

    fn ready(&self, attempt: &Attempt, project: Arc<Project>) -> Result<Arc<Project>, LoadError> {
        self.commit(
            attempt,
            LoadEvent::ContentArrived {
                project_id: project.id().clone(),
            },
            Some(Arc::clone(&project)),
        )?;
        info!(project_id = %project.id(), "Project ready");

        if let Some(prefetch) = &self.prefetch {
            prefetch.prefetch();
        }
        Ok(project)
    }

    /// Record a failed attempt and hand back the error to report.
    fn abandon(&self, attempt: &Attempt, error: LoadError, recovery: Recovery) -> LoadError {
        let committed = match recovery {
            Recovery::Fail => self.commit(
                attempt,
                LoadEvent::Fail {
                    error: error.clone(),
                },
                None,
            ),
            Recovery::Restore => {
                let previous = self.lock_control().last_settled.clone();
                self.commit(
                    attempt,
                    LoadEvent::Restore {
                        previous: Box::new(previous.state),
                    },
                    previous.project,
                )
            }
        };

        match committed {
            Ok(()) => {
                warn!(error = %error, ?recovery, "Load failed");
                error
            }
            Err(superseded) => superseded,
        }
    }

    fn begin(&self, target: LoadTarget) -> Result<Attempt, LoadError> {
        let mut control = self.lock_control();
        if control.closed {
            return Err(LoadError::Superseded);
        }

        control.cancel.cancel();
        control.generation = control.generation.wrapping_add(1);
        control.cancel = CancellationToken::new();

        let current = self.snapshot.borrow().clone();
        // Random navigation keeps the current project on screen until the
        // replacement is known.
        let project = match target {
            LoadTarget::Random => current.project,
            LoadTarget::Project(_) => None,
        };
        let state = LoadStateMachine::transition(current.state, LoadEvent::Start { target })
            .map_err(failure)?;
        self.snapshot.send_replace(LoaderSnapshot { state, project });

        Ok(Attempt {
            generation: control.generation,
            token: control.cancel.clone(),
        })
    }

    fn commit(
        &self,
        attempt: &Attempt,
        event: LoadEvent,
        project: Option<Arc<Project>>,
    ) -> Result<(), LoadError> {
        let mut control = self.lock_control();
        if control.closed || control.generation != attempt.generation {
            debug!("Dropping stale load result");
            return Err(LoadError::Superseded);
        }

        let current = self.snapshot.borrow().state.clone();
        let state = LoadStateMachine::transition(current, event).map_err(|err| {
            warn!(error = %err, "Rejected load transition");
            failure(err)
        })?;

        let snapshot = LoaderSnapshot { state, project };
        if snapshot.state.is_terminal() || snapshot.state == LoadState::Idle {
            control.last_settled = snapshot.clone();
        }
        self.snapshot.send_replace(snapshot);
        Ok(())
    }

    async fn guarded<F, T>(&self, attempt: &Attempt, fut: F) -> Result<T, LoadError>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = attempt.token.cancelled() => Err(LoadError::Superseded),
            out = fut => Ok(out),
        }
    }

    fn lock_control(&self) -> MutexGuard<'_, LoadControl> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn failure(reason: impl std::fmt::Display) -> LoadError {
    LoadError::Failure {
        reason: reason.to_string(),
        status: None,
    }
}

fn catalog_failure(err: CatalogError) -> LoadError {
    let status = match err {
        CatalogError::Status(code) => Some(code),
        _ => None,
    };
    LoadError::Failure {
        reason: err.to_string(),
        status,
    }
}

impl Drop for ProgressiveProjectLoader {
    fn drop(&mut self) {
        self.lock_control().cancel.cancel();
    }
}
