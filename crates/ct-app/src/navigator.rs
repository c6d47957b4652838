//! Feed navigator
//! 信息流导航器
//!
//! Drives which project is current. Combines the loader snapshot with the
//! UI-local cursor (`selected_file`, `frame_visible`) and maps gestures to
//! navigation.
//!
//! Only `NotFound` and `LoadFailure` change what the top-level view renders;
//! a failed random navigation leaves everything in place and raises a notice.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ct_core::ports::{FeedUiPort, HistoryPort};
use ct_core::project::SelectionError;
use ct_core::{
    FeedError, FeedIntent, FileSelection, LoadError, LoadState, Locale, Message, PreviewArtifact,
    Project, ProjectId, SwipeGesture, ViewRoute,
};
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::loader::{LoaderSnapshot, ProgressiveProjectLoader};
use crate::prefetch::PrefetchCache;
use crate::preview_compiler::PreviewCompiler;

/// Dependencies for [`FeedNavigator`].
/// 导航器依赖。
pub struct FeedNavigatorDeps {
    pub loader: Arc<ProgressiveProjectLoader>,
    pub prefetch: Option<Arc<PrefetchCache>>,
    pub preview: Arc<PreviewCompiler>,
    pub history: Arc<dyn HistoryPort>,
    pub ui: Arc<dyn FeedUiPort>,
    pub locale: Locale,
    pub swipe_threshold: f64,
}

/// Result of a navigation request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The named project is now current.
    Applied(ProjectId),
    /// A newer navigation took over; nothing was applied.
    Superseded,
    /// The input did not map to any navigation.
    Unchanged,
}

/// Everything the shell renders.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedView {
    pub project: Option<Arc<Project>>,
    pub load_state: LoadState,
    /// Always a file of `project`; `None` only without a project.
    pub selected_file: Option<String>,
    pub frame_visible: bool,
    /// Inline error panel (load failure only).
    pub inline_error: Option<FeedError>,
}

struct LocalState {
    selection: Option<FileSelection>,
    frame_visible: bool,
    inline_error: Option<FeedError>,
}

pub struct FeedNavigator {
    loader: Arc<ProgressiveProjectLoader>,
    prefetch: Option<Arc<PrefetchCache>>,
    preview: Arc<PreviewCompiler>,
    history: Arc<dyn HistoryPort>,
    ui: Arc<dyn FeedUiPort>,
    locale: Locale,
    swipe_threshold: f64,
    local: Mutex<LocalState>,
}

impl FeedNavigator {
    pub fn new(deps: FeedNavigatorDeps) -> Self {
        Self {
            loader: deps.loader,
            prefetch: deps.prefetch,
            preview: deps.preview,
            history: deps.history,
            ui: deps.ui,
            locale: deps.locale,
            swipe_threshold: deps.swipe_threshold,
            local: Mutex::new(LocalState {
                selection: None,
                frame_visible: true,
                inline_error: None,
            }),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Open a project by id (direct link).
    ///
    /// A missing project redirects to the not-found view; any other failure
    /// is kept as an inline error with a way back home.
    pub async fn open(&self, id: &ProjectId) -> Result<NavigationOutcome, FeedError> {
        let span = info_span!("usecase.feed.open", project_id = %id);

        async {
            self.lock_local().inline_error = None;

            match self.loader.load(id).await {
                Ok(project) => Ok(self.settle(&project, false)),
                Err(LoadError::Superseded) => Ok(NavigationOutcome::Superseded),
                Err(LoadError::NotFound { project_id }) => {
                    let path = ViewRoute::NotFound.path(self.locale);
                    info!(%path, "Project missing; redirecting");
                    if let Err(err) = self.ui.redirect(&path).await {
                        warn!(error = %err, "Redirect failed");
                    }
                    Err(FeedError::NotFound { project_id })
                }
                Err(err @ LoadError::Failure { .. }) => {
                    warn!(error = %err, "Project load failed");
                    // A rejected request points at a bad link; anything else is generic.
                    let rejected = matches!(err, LoadError::Failure { status: Some(_), .. });
                    let message = if rejected {
                        Message::LoadFailed
                    } else {
                        Message::LoadFailedGeneric
                    };
                    let error = FeedError::LoadFailure {
                        message: message.text(self.locale).to_string(),
                        escape: ViewRoute::Home,
                    };
                    let shown = self.loader.while_failed(&err, || {
                        self.lock_local().inline_error = Some(error.clone());
                    });
                    if shown.is_none() {
                        debug!("Load failure superseded; not shown");
                        return Ok(NavigationOutcome::Superseded);
                    }
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Replace the current project with a random candidate.
    ///
    /// Consults the prefetch cache first. On failure the view stays as it was
    /// and a localized notice is raised.
    pub async fn select_random(&self) -> Result<NavigationOutcome, FeedError> {
        let span = info_span!("usecase.feed.select_random");

        async {
            let prefetched = self.prefetch.as_ref().and_then(|cache| cache.take(None));
            let result = match prefetched {
                Some(project) => {
                    debug!(project_id = %project.id(), "Using prefetched project");
                    self.loader.adopt(project)
                }
                None => self.loader.load_random().await,
            };

            match result {
                Ok(project) => Ok(self.settle(&project, true)),
                Err(LoadError::Superseded) => Ok(NavigationOutcome::Superseded),
                Err(err) => {
                    warn!(error = %err, "Random navigation failed");
                    let message = Message::RandomFailed.text(self.locale).to_string();
                    if let Err(err) = self.ui.notify(&message).await {
                        warn!(error = %err, "Failed to show notice");
                    }
                    Err(FeedError::RandomNavigationFailure { message })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Same as [`Self::select_random`]: the feed has a single random source.
    pub async fn select_next(&self) -> Result<NavigationOutcome, FeedError> {
        self.select_random().await
    }

    /// Point the cursor at another file of the current project.
    pub fn select_file(&self, name: &str) -> Result<(), SelectionError> {
        let snapshot = self.loader.snapshot();
        let Some(project) = snapshot.project else {
            return Err(SelectionError::UnknownFile(name.to_string()));
        };

        let mut local = self.lock_local();
        let selection = local
            .selection
            .get_or_insert_with(|| FileSelection::for_project(&project));
        if selection.project_id() != project.id() {
            *selection = FileSelection::for_project(&project);
        }
        selection.select(&project, name)
    }

    /// Show or hide the preview frame. Returns the new visibility.
    pub fn toggle_frame(&self) -> bool {
        let mut local = self.lock_local();
        local.frame_visible = !local.frame_visible;
        local.frame_visible
    }

    pub async fn handle_swipe(
        &self,
        gesture: SwipeGesture,
    ) -> Result<NavigationOutcome, FeedError> {
        match gesture.intent(self.swipe_threshold) {
            Some(FeedIntent::Next) => self.select_next().await,
            Some(FeedIntent::Random) => self.select_random().await,
            None => Ok(NavigationOutcome::Unchanged),
        }
    }

    pub fn view(&self) -> FeedView {
        let LoaderSnapshot { state, project } = self.loader.snapshot();
        let local = self.lock_local();

        let selected_file = project.as_ref().map(|project| {
            match &local.selection {
                Some(selection) if selection.project_id() == project.id() => {
                    selection.file().to_string()
                }
                _ => project.main_file().to_string(),
            }
        });

        FeedView {
            project,
            load_state: state,
            selected_file,
            frame_visible: local.frame_visible,
            inline_error: local.inline_error.clone(),
        }
    }

    /// Preview for the selected file, without waiting on compilation.
    ///
    /// `None` while there is no project or the file's content has not arrived.
    pub fn preview_now(&self) -> Option<PreviewArtifact> {
        let (project, file, frame_visible) = self.preview_input()?;
        let content = project.content(&file)?;
        Some(self.preview.render_now(&file, content, frame_visible))
    }

    /// Final preview for the selected file, compiling when needed.
    pub async fn preview(&self) -> Option<PreviewArtifact> {
        let (project, file, frame_visible) = self.preview_input()?;
        let content = project.content(&file)?;
        Some(self.preview.render(&file, content, frame_visible).await)
    }

    pub fn subscribe(&self) -> watch::Receiver<LoaderSnapshot> {
        self.loader.subscribe()
    }

    /// Abort everything in flight for this view.
    pub fn teardown(&self) {
        self.loader.shutdown();
        if let Some(prefetch) = &self.prefetch {
            prefetch.clear();
        }
        info!("Feed view torn down");
    }

    fn preview_input(&self) -> Option<(Arc<Project>, String, bool)> {
        let view = self.view();
        let project = view.project?;
        let file = view.selected_file?;
        Some((project, file, view.frame_visible))
    }

    /// Apply a loaded project to local state (and history) while it is still
    /// the one on screen. History and view change together or not at all.
    fn settle(&self, project: &Arc<Project>, push_history: bool) -> NavigationOutcome {
        let applied = self.loader.while_ready(project, || {
            {
                let mut local = self.lock_local();
                local.selection = Some(FileSelection::for_project(project));
                local.inline_error = None;
            }
            if push_history {
                self.history
                    .push(&ViewRoute::Project(project.id().clone()).path(self.locale));
            }
        });
        match applied {
            Some(()) => NavigationOutcome::Applied(project.id().clone()),
            None => {
                debug!(project_id = %project.id(), "Navigation superseded before it applied");
                NavigationOutcome::Superseded
            }
        }
    }

    fn lock_local(&self) -> MutexGuard<'_, LocalState> {
        self.local.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
