//! Text and file output for feed views and preview artifacts.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use ct_app::FeedView;
use ct_core::preview::document::{decode_data_url, escape_html};
use ct_core::preview::SourceView;
use ct_core::{FeedError, LoadState, Locale, Message, PreviewArtifact, SandboxPolicy};

/// Human-readable summary of what the feed currently shows.
pub fn describe(view: &FeedView, locale: Locale) -> String {
    let mut out = String::new();

    if let Some(FeedError::LoadFailure { message, escape }) = &view.inline_error {
        let _ = writeln!(out, "{}: {message}", Message::ErrorTitle.text(locale));
        let _ = writeln!(
            out,
            "  {} -> {}",
            Message::BackToHome.text(locale),
            escape.path(locale)
        );
        return out;
    }

    let Some(project) = &view.project else {
        if view.load_state.blocks_view() {
            let _ = writeln!(out, "{}", Message::Loading.text(locale));
        }
        return out;
    };

    let _ = writeln!(out, "{}", project.title().unwrap_or(project.id().as_str()));
    if let Some(description) = project.description() {
        let _ = writeln!(out, "  {description}");
    }
    let mut facts = vec![format!("id {}", project.id())];
    if let Some(views) = project.views() {
        facts.push(format!("{views} views"));
    }
    if let Some(created_at) = project.created_at() {
        facts.push(
            created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string(),
        );
    }
    let _ = writeln!(out, "  {}", facts.join(" · "));

    if project.offers_file_picker() {
        let _ = writeln!(out, "{}:", Message::Files.text(locale));
        for file in project.files() {
            let marker = if view.selected_file.as_deref() == Some(file.as_str()) {
                '*'
            } else {
                ' '
            };
            let _ = writeln!(out, "  {marker} {file}");
        }
    }

    match &view.load_state {
        LoadState::PartiallyReady { .. } | LoadState::Fetching { .. } => {
            let _ = writeln!(out, "{}", Message::Loading.text(locale));
        }
        _ => {}
    }
    let _ = writeln!(
        out,
        "frame: {}",
        if view.frame_visible { "visible" } else { "hidden" }
    );
    out
}

/// One-line status for a load state change.
pub fn phase_line(state: &LoadState) -> Option<String> {
    match state {
        LoadState::Idle => None,
        LoadState::Fetching { .. } => Some("fetching".to_string()),
        LoadState::PartiallyReady { project_id } => {
            Some(format!("metadata ready for {project_id}, loading files"))
        }
        LoadState::Ready { project_id } => Some(format!("{project_id} ready")),
        LoadState::Failed { error } => Some(format!("failed: {error}")),
    }
}

/// Host page embedding `url` in a frame restricted to `sandbox`.
pub fn frame_host(title: &str, url: &str, sandbox: &SandboxPolicy) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>html,body,iframe{{margin:0;border:0;width:100%;height:100%;}}</style>
</head>
<body>
<iframe sandbox="{sandbox}" src="{url}"></iframe>
</body>
</html>
"#,
        title = escape_html(title),
        sandbox = escape_html(&sandbox.attribute()),
        url = escape_html(url),
    )
}

/// Write a preview artifact under `out`, returning the files created.
///
/// Frames are written as a host page plus the framed document; source views
/// are written as plain files next to them.
pub fn write_artifact(artifact: &PreviewArtifact, out: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;
    let mut written = Vec::new();

    match artifact {
        PreviewArtifact::SandboxedDocument { url, sandbox } => {
            if let Some(document) = decode_data_url(url) {
                written.push(write_file(out, "document.html", &document)?);
            }
            written.push(write_file(out, "frame.html", &frame_host("preview", url, sandbox))?);
        }
        PreviewArtifact::ExternalReference { url, sandbox } => {
            written.push(write_file(out, "frame.html", &frame_host(url, url, sandbox))?);
        }
        PreviewArtifact::MountedComponent {
            entry,
            mount_url,
            sandbox,
            source,
        } => {
            if let Some(document) = decode_data_url(mount_url) {
                written.push(write_file(out, "component.html", &document)?);
            }
            written.push(write_file(
                out,
                "frame.html",
                &frame_host(entry, mount_url, sandbox),
            )?);
            written.push(write_source(out, source)?);
        }
        PreviewArtifact::SourceOnly {
            source,
            compile_error,
        } => {
            written.push(write_source(out, source)?);
            if let Some(error) = compile_error {
                written.push(write_file(out, "compile-error.txt", error)?);
            }
        }
        PreviewArtifact::CompilePending { .. } => {}
    }

    let summary =
        serde_json::to_string_pretty(artifact).context("Failed to serialize preview artifact")?;
    written.push(write_file(out, "preview.json", &summary)?);
    Ok(written)
}

/// Header line for the code view, e.g. `App.tsx - JavaScript [TSX]`.
pub fn source_header(source: &SourceView) -> String {
    match source.badge() {
        Some(badge) => format!("{} [{badge}]", source.header()),
        None => source.header(),
    }
}

fn write_source(out: &Path, source: &SourceView) -> anyhow::Result<PathBuf> {
    // Project filenames are untrusted: keep only the final component.
    let name = Path::new(&source.filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "source.txt".to_string());
    let dir = out.join("source");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    write_file(&dir, &name, &source.content)
}

fn write_file(dir: &Path, name: &str, content: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
