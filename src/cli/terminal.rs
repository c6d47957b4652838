//! Terminal implementation of [`FeedUiPort`].

use std::sync::Mutex;

use async_trait::async_trait;
use ct_core::ports::FeedUiPort;
use tracing::debug;

/// Prints redirects and notices and remembers the last redirect target.
#[derive(Debug, Default)]
pub struct TerminalUi {
    last_redirect: Mutex<Option<String>>,
    quiet: bool,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record without printing.
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    pub fn last_redirect(&self) -> Option<String> {
        self.last_redirect
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl FeedUiPort for TerminalUi {
    async fn redirect(&self, path: &str) -> anyhow::Result<()> {
        debug!(path, "Redirecting");
        *self
            .last_redirect
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(path.to_string());
        if !self.quiet {
            println!("-> {path}");
        }
        Ok(())
    }

    async fn notify(&self, message: &str) -> anyhow::Result<()> {
        if !self.quiet {
            eprintln!("! {message}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_redirect_is_remembered() {
        let ui = TerminalUi::quiet();
        assert_eq!(ui.last_redirect(), None);

        ui.redirect("/en/404").await.unwrap();

        assert_eq!(ui.last_redirect().as_deref(), Some("/en/404"));
    }
}
