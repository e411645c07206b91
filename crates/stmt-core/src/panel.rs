//! Expandable source-code panels
//!
//! A panel shows the file behind an `is_implemented_by` entry. Contents are
//! fetched the first time the panel is expanded and never again; dropping
//! the panel cancels a fetch still in flight.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use stmt_dispatch::{ImplementationDirective, SourceLanguage};
use stmt_services::{CodeSource, FetchError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Contents of a source panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    /// Not expanded yet
    Collapsed,
    /// Fetch in flight
    Loading,
    /// File contents
    Loaded(String),
    /// Fetch failed
    Failed(FetchError),
    /// Directive has no fetchable source
    NotApplicable,
}

/// Lazily fetched source panel
pub struct SourcePanel {
    directive: ImplementationDirective,
    source: Arc<dyn CodeSource>,
    state: Arc<watch::Sender<PanelState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for SourcePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePanel")
            .field("directive", &self.directive)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SourcePanel {
    /// Create collapsed panel
    #[must_use]
    pub fn new(directive: ImplementationDirective, source: Arc<dyn CodeSource>) -> Self {
        let initial = if directive.lazy_url().is_some() {
            PanelState::Collapsed
        } else {
            PanelState::NotApplicable
        };
        let (state, _) = watch::channel(initial);
        Self {
            directive,
            source,
            state: Arc::new(state),
            task: Mutex::new(None),
        }
    }

    /// Language of the panel's file
    #[must_use]
    pub fn language(&self) -> Option<SourceLanguage> {
        match &self.directive {
            ImplementationDirective::SourceCode { language, .. } => Some(*language),
            _ => None,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Expand the panel, starting the fetch on first expansion
    ///
    /// Must be called from within a tokio runtime. Later calls only
    /// subscribe to the existing state.
    pub fn expand(&self) -> watch::Receiver<PanelState> {
        let Some(url) = self.directive.lazy_url().map(str::to_string) else {
            return self.state.subscribe();
        };

        let mut task = self.task.lock();
        if task.is_some() {
            return self.state.subscribe();
        }

        // Subscribe after `Loading` so the receiver starts with it seen.
        self.state.send_replace(PanelState::Loading);
        let receiver = self.state.subscribe();
        tracing::debug!(%url, "fetching implementation source");

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        *task = Some(tokio::spawn(async move {
            let next = match source.fetch_source(&url).await {
                Ok(text) => PanelState::Loaded(text),
                Err(err) => {
                    tracing::warn!(error = %err, "implementation source unavailable");
                    PanelState::Failed(err)
                }
            };
            state.send_replace(next);
        }));

        receiver
    }
}

impl Drop for SourcePanel {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use stmt_test_utils::FakeCodeSource;

    const URL: &str = "https://example.org/code/fit.py";

    fn source_code() -> ImplementationDirective {
        ImplementationDirective::SourceCode {
            url: URL.to_string(),
            language: SourceLanguage::Python,
        }
    }

    async fn loaded(mut rx: watch::Receiver<PanelState>) -> PanelState {
        let state = rx
            .wait_for(|s| matches!(s, PanelState::Loaded(_) | PanelState::Failed(_)))
            .await
            .unwrap()
            .clone();
        state
    }

    #[tokio::test]
    async fn fetches_once_on_first_expand() {
        let files = Arc::new(FakeCodeSource::new().with_file(URL, "print('fit')"));
        let panel = SourcePanel::new(source_code(), Arc::clone(&files) as _);

        assert_eq!(panel.state(), PanelState::Collapsed);
        assert_eq!(files.call_count(), 0);

        let first = loaded(panel.expand()).await;
        let second = loaded(panel.expand()).await;

        assert_eq!(first, PanelState::Loaded("print('fit')".into()));
        assert_eq!(second, first);
        assert_eq!(files.call_count(), 1);
        assert_eq!(panel.language(), Some(SourceLanguage::Python));
    }

    #[tokio::test]
    async fn missing_file_fails() {
        let panel = SourcePanel::new(source_code(), Arc::new(FakeCodeSource::new()));
        assert!(matches!(
            loaded(panel.expand()).await,
            PanelState::Failed(FetchError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn links_are_not_fetched() {
        let files = Arc::new(FakeCodeSource::new());
        let panel = SourcePanel::new(
            ImplementationDirective::Link {
                label: None,
                url: "https://example.org/about".into(),
            },
            Arc::clone(&files) as _,
        );

        let rx = panel.expand();
        assert_eq!(*rx.borrow(), PanelState::NotApplicable);
        assert_eq!(files.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_in_flight_fetch() {
        let files = Arc::new(
            FakeCodeSource::new()
                .with_file(URL, "x <- 1")
                .with_delay(Duration::from_millis(500)),
        );
        let panel = SourcePanel::new(source_code(), Arc::clone(&files) as _);
        let mut rx = panel.expand();
        assert!(!rx.has_changed().unwrap());
        tokio::task::yield_now().await;
        drop(panel);

        assert!(rx.changed().await.is_err());
        assert_eq!(*rx.borrow(), PanelState::Loading);
    }

    #[tokio::test(start_paused = true)]
    async fn expanding_receiver_starts_at_loading() {
        let files = Arc::new(
            FakeCodeSource::new()
                .with_file(URL, "x <- 1")
                .with_delay(Duration::from_millis(500)),
        );
        let panel = SourcePanel::new(source_code(), Arc::clone(&files) as _);
        let mut rx = panel.expand();
        assert_eq!(*rx.borrow_and_update(), PanelState::Loading);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), PanelState::Loaded("x <- 1".into()));
    }
}
