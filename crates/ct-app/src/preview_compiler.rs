//! Preview compiler use case
//! 预览编译用例
//!
//! Turns one file's raw text into a [`PreviewArtifact`]:
//! - markup: passthrough or synthesized document, or a direct external reference
//! - component source: compiled off the interaction path, memoized per
//!   `(filename, content)`
//! - everything else: read-only source

use std::sync::Arc;

use ct_core::classify::{classify, FileCategory};
use ct_core::ports::ComponentCompilerPort;
use ct_core::preview::document::{data_url, ensure_document, remote_reference};
use ct_core::preview::{CompileError, PreviewArtifact, SandboxPolicy, SourceView};
use ct_core::{FeedError, Locale, Message, MimeType};
use tracing::{debug, info_span, warn, Instrument};

use crate::compile_cache::{CompileCache, CompileKey};

/// First step of rendering: either a finished artifact or a compile job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewPlan {
    Ready(PreviewArtifact),
    Compile { source: SourceView },
}

pub struct PreviewCompiler {
    compiler: Arc<dyn ComponentCompilerPort>,
    cache: Arc<CompileCache>,
    sandbox: SandboxPolicy,
    locale: Locale,
}

impl PreviewCompiler {
    pub fn new(
        compiler: Arc<dyn ComponentCompilerPort>,
        cache: Arc<CompileCache>,
        locale: Locale,
    ) -> Self {
        Self {
            compiler,
            cache,
            sandbox: SandboxPolicy::preview(),
            locale,
        }
    }

    /// Decide how a file is shown without doing any expensive work.
    ///
    /// With the frame hidden, markup falls back to its source; component
    /// source is always compiled since the code view mounts it above the text.
    pub fn plan(&self, filename: &str, content: &str, frame_visible: bool) -> PreviewPlan {
        let source = SourceView::new(filename, content);
        match classify(filename).category {
            FileCategory::Markup if frame_visible => {
                PreviewPlan::Ready(self.markup_artifact(filename, content))
            }
            FileCategory::ComponentSource => PreviewPlan::Compile { source },
            _ => PreviewPlan::Ready(PreviewArtifact::SourceOnly {
                source,
                compile_error: None,
            }),
        }
    }

    /// Artifact to show right away: compile jobs show a pending preview region.
    pub fn render_now(&self, filename: &str, content: &str, frame_visible: bool) -> PreviewArtifact {
        match self.plan(filename, content, frame_visible) {
            PreviewPlan::Ready(artifact) => artifact,
            PreviewPlan::Compile { source } => PreviewArtifact::CompilePending { source },
        }
    }

    /// Final artifact, compiling when needed.
    pub async fn render(&self, filename: &str, content: &str, frame_visible: bool) -> PreviewArtifact {
        match self.plan(filename, content, frame_visible) {
            PreviewPlan::Ready(artifact) => artifact,
            PreviewPlan::Compile { source } => self.compile(source).await,
        }
    }

    fn markup_artifact(&self, filename: &str, content: &str) -> PreviewArtifact {
        if let Some(url) = remote_reference(content) {
            return PreviewArtifact::ExternalReference {
                url: url.to_string(),
                sandbox: self.sandbox.clone(),
            };
        }
        let document = ensure_document(content, filename);
        PreviewArtifact::SandboxedDocument {
            url: data_url(&MimeType::text_html(), &document),
            sandbox: self.sandbox.clone(),
        }
    }

    async fn compile(&self, source: SourceView) -> PreviewArtifact {
        let span = info_span!("usecase.preview.compile", file = %source.filename);

        async {
            let key = CompileKey::new(&source.filename, &source.content);
            let compiler = Arc::clone(&self.compiler);
            let filename = source.filename.clone();
            let content = source.content.clone();
            let outcome = self
                .cache
                .get_or_compile(key, || async move {
                    debug!("Compiling component");
                    tokio::task::spawn_blocking(move || compiler.compile(&filename, &content))
                        .await
                        .unwrap_or_else(|join_err| {
                            Err(CompileError::Internal(join_err.to_string()))
                        })
                        .map(Arc::new)
                })
                .await;

            match outcome {
                Ok(compiled) => PreviewArtifact::MountedComponent {
                    entry: compiled.entry.clone(),
                    mount_url: compiled.mount_url(),
                    sandbox: self.sandbox.clone(),
                    source,
                },
                Err(err) => {
                    let failure = FeedError::CompileFailure {
                        filename: source.filename.clone(),
                        reason: err.to_string(),
                    };
                    warn!(error = %failure, "Showing source only");
                    PreviewArtifact::SourceOnly {
                        source,
                        compile_error: Some(format!(
                            "{} ({err})",
                            Message::CompileFailed.text(self.locale)
                        )),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }
}
