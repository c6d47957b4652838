//! Subcommand handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;
use ct_app::{FeedNavigator, LoaderSnapshot, NavigationOutcome};
use ct_core::{FeedError, ProjectId, SwipeGesture};
use ct_infra::InMemoryHistory;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::render::{describe, phase_line, source_header, write_artifact};
use super::terminal::TerminalUi;
use super::{Cli, Command};
use crate::bootstrap::config::{load_config_or_default, resolve_config};
use crate::bootstrap::wiring::{wire_feed, ShellPorts};

/// One line of input in the interactive feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedCommand {
    Next,
    Random,
    File(String),
    ToggleFrame,
    Swipe { start_y: f64, end_y: f64 },
    Preview,
    Show,
    Help,
    Quit,
}

const FEED_HELP: &str = "n next | r random | f <name> select file | t toggle frame | \
s <y0> <y1> swipe | p write preview | l show | q quit";

pub fn parse_feed_command(line: &str) -> Result<FeedCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(FeedCommand::Show);
    };
    let rest: Vec<&str> = parts.collect();

    match (head, rest.as_slice()) {
        ("n", []) => Ok(FeedCommand::Next),
        ("r", []) => Ok(FeedCommand::Random),
        ("t", []) => Ok(FeedCommand::ToggleFrame),
        ("p", []) => Ok(FeedCommand::Preview),
        ("l", []) => Ok(FeedCommand::Show),
        ("h" | "?", []) => Ok(FeedCommand::Help),
        ("q", []) => Ok(FeedCommand::Quit),
        ("f", [_, ..]) => Ok(FeedCommand::File(rest.join(" "))),
        ("s", [start, end]) => {
            let start_y = start
                .parse()
                .map_err(|_| format!("not a number: {start}"))?;
            let end_y = end.parse().map_err(|_| format!("not a number: {end}"))?;
            Ok(FeedCommand::Swipe { start_y, end_y })
        }
        _ => Err(format!("unknown command `{}`; {FEED_HELP}", line.trim())),
    }
}

/// Entry point for a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config_or_default(cli.config.as_deref())?;
    let config = resolve_config(config, cli.locale)?;

    let ui = Arc::new(TerminalUi::new());
    let navigator = wire_feed(
        &config,
        ShellPorts {
            ui,
            history: Arc::new(InMemoryHistory::new()),
        },
    )?;

    let result = match cli.command {
        Command::Open { id, out } => open_project(&navigator, &id, out.as_deref())
            .await
            .map(|_| ()),
        Command::Random { out } => random_project(&navigator, out.as_deref())
            .await
            .map(|_| ()),
        Command::Feed { out } => run_feed(&navigator, out.as_deref()).await,
    };

    navigator.teardown();
    result
}

/// Open `id`, print it and write its preview under `out`.
pub async fn open_project(
    navigator: &FeedNavigator,
    id: &str,
    out: Option<&Path>,
) -> anyhow::Result<Vec<PathBuf>> {
    let progress = spawn_progress(navigator.subscribe());
    let outcome = navigator.open(&ProjectId::from(id)).await;
    progress.abort();

    match outcome {
        Ok(NavigationOutcome::Applied(_)) => show(navigator, out).await,
        Ok(_) => Ok(Vec::new()),
        Err(err @ FeedError::LoadFailure { .. }) => {
            print!("{}", describe(&navigator.view(), navigator.locale()));
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Pick a random project, print it and write its preview under `out`.
pub async fn random_project(
    navigator: &FeedNavigator,
    out: Option<&Path>,
) -> anyhow::Result<Vec<PathBuf>> {
    let progress = spawn_progress(navigator.subscribe());
    let outcome = navigator.select_random().await;
    progress.abort();

    match outcome {
        Ok(NavigationOutcome::Applied(_)) => show(navigator, out).await,
        Ok(_) => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

async fn run_feed(navigator: &FeedNavigator, out: Option<&Path>) -> anyhow::Result<()> {
    let progress = spawn_progress(navigator.subscribe());
    eprintln!("{FEED_HELP}");
    report(navigator, navigator.select_random().await, None).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_feed_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        if command == FeedCommand::Quit {
            break;
        }
        if let Err(err) = apply(navigator, command, out).await {
            eprintln!("{err:#}");
        }
    }

    progress.abort();
    Ok(())
}

async fn apply(
    navigator: &FeedNavigator,
    command: FeedCommand,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    match command {
        FeedCommand::Next => report(navigator, navigator.select_next().await, None).await,
        FeedCommand::Random => report(navigator, navigator.select_random().await, None).await,
        FeedCommand::Swipe { start_y, end_y } => {
            let outcome = navigator
                .handle_swipe(SwipeGesture::vertical(start_y, end_y))
                .await;
            report(navigator, outcome, None).await
        }
        FeedCommand::File(name) => {
            navigator.select_file(&name)?;
            show(navigator, None).await.map(|_| ())
        }
        FeedCommand::ToggleFrame => {
            let visible = navigator.toggle_frame();
            println!("frame: {}", if visible { "visible" } else { "hidden" });
            Ok(())
        }
        FeedCommand::Preview => {
            let Some(out) = out else {
                bail!("no output directory; start the feed with --out DIR");
            };
            show(navigator, Some(out)).await.map(|_| ())
        }
        FeedCommand::Show => show(navigator, None).await.map(|_| ()),
        FeedCommand::Help => {
            eprintln!("{FEED_HELP}");
            Ok(())
        }
        FeedCommand::Quit => Ok(()),
    }
}

async fn report(
    navigator: &FeedNavigator,
    outcome: Result<NavigationOutcome, FeedError>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    match outcome {
        Ok(NavigationOutcome::Applied(id)) => {
            debug!(project_id = %id, "Navigation applied");
            show(navigator, out).await.map(|_| ())
        }
        Ok(NavigationOutcome::Superseded | NavigationOutcome::Unchanged) => Ok(()),
        // Already shown as a notice; the current project stays on screen.
        Err(FeedError::RandomNavigationFailure { .. }) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

async fn show(navigator: &FeedNavigator, out: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
    let view = navigator.view();
    print!("{}", describe(&view, navigator.locale()));

    let Some(artifact) = navigator.preview().await else {
        return Ok(Vec::new());
    };
    if let Some(source) = artifact.source() {
        println!("{}", source_header(source));
    }
    if let Some(error) = artifact.compile_error() {
        println!("{error}");
    }

    let Some(out) = out else {
        return Ok(Vec::new());
    };
    let written = write_artifact(&artifact, out)?;
    for path in &written {
        println!("wrote {}", path.display());
    }
    Ok(written)
}

fn spawn_progress(mut snapshots: watch::Receiver<LoaderSnapshot>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let line = phase_line(&snapshots.borrow_and_update().state);
            if let Some(line) = line {
                eprintln!("{line}");
            }
        }
    })
}
