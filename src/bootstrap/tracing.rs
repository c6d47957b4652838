//! Tracing configuration for CodeTok
//!
//! ## Behavior / 行为
//!
//! - **Development**: debug level for the feed crates, output to stderr and file
//! - **Production**: info level, output to stderr and file
//! - **Environment filter**: `RUST_LOG` overrides the defaults
//!
//! Logs go to stderr so that stdout stays reserved for command output.

use std::{fs, io, path::PathBuf, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_NAME: &str = "codetok.log";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
///
/// ## Behavior / 行为
/// - **Development**: debug for the app crates
/// - **Production**: info for the app crates
/// - HTTP client internals are capped at warn in both
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        "rustls=warn".to_string(),
        format!("ct_app={level}"),
        format!("ct_infra={level}"),
        format!("codetok_lib={level}"),
    ]
}

/// Initialize the tracing subscriber with appropriate configuration
///
/// Call once from `main` before any work starts.
///
/// ## Errors / 错误
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let is_dev = is_development();

    // Step 1: Build environment filter
    let filter_directives = build_filter_directives(is_dev);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    // Step 2: Create writers
    let stderr_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = match build_file_writer() {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
            None
        }
    };

    // Step 3: Create fmt layers
    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stderr_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(
                "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            ))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    // Step 4: Register the global subscriber
    let subscriber = registry().with(env_filter).with(stderr_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

/// `<data_local_dir>/codetok/logs`
fn logs_dir() -> anyhow::Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("codetok").join("logs"))
        .ok_or_else(|| anyhow::anyhow!("no local data directory on this platform"))
}

fn build_file_writer() -> anyhow::Result<NonBlocking> {
    let logs_dir = logs_dir()?;
    fs::create_dir_all(&logs_dir)?;

    let file_appender = tracing_appender::rolling::never(&logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_directives() {
        let dev_directives = build_filter_directives(true);
        assert!(dev_directives.contains(&"debug".to_string()));
        assert!(dev_directives.contains(&"ct_app=debug".to_string()));
        assert!(dev_directives.contains(&"ct_infra=debug".to_string()));
        assert!(dev_directives.contains(&"reqwest=warn".to_string()));

        let prod_directives = build_filter_directives(false);
        assert!(prod_directives.contains(&"info".to_string()));
        assert!(prod_directives.contains(&"ct_app=info".to_string()));
        assert!(prod_directives.contains(&"hyper=warn".to_string()));
    }

    #[test]
    fn test_directives_parse_as_env_filter() {
        let directives = build_filter_directives(true).join(",");
        assert!(tracing_subscriber::EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_logs_dir_is_namespaced() {
        if let Ok(dir) = logs_dir() {
            assert!(dir.ends_with("codetok/logs"));
        }
    }
}
