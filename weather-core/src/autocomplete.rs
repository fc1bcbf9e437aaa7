//! Debounced place-name suggestions.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

use crate::{
    model::LocationSuggestion,
    provider::{DEFAULT_SUGGESTION_LIMIT, LocationSearch},
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AutocompleteState {
    #[default]
    Idle,
    Debouncing(String),
    Searching(String),
    Showing(Vec<LocationSuggestion>),
}

impl AutocompleteState {
    pub fn suggestions(&self) -> &[LocationSuggestion] {
        match self {
            Self::Showing(list) => list,
            _ => &[],
        }
    }

    pub fn is_showing(&self) -> bool {
        matches!(self, Self::Showing(_))
    }
}

#[derive(Debug)]
struct Inner {
    search: Arc<dyn LocationSearch>,
    debounce: Duration,
    limit: usize,
    /// Bumped on every keystroke, selection and close. A scheduled search
    /// may only touch state while its generation is still the latest.
    generation: AtomicU64,
    state: watch::Sender<AutocompleteState>,
    last_error: Mutex<Option<String>>,
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run(&self, generation: u64, query: String) {
        tokio::time::sleep(self.debounce).await;
        if !self.is_current(generation) {
            return;
        }

        tracing::debug!(%query, "searching suggestions");
        self.state.send_replace(AutocompleteState::Searching(query.clone()));
        let result = self.search.search(&query, self.limit).await;

        if !self.is_current(generation) {
            tracing::debug!(%query, "discarding stale suggestions");
            return;
        }

        let (next, error) = match result {
            Ok(list) if !list.is_empty() => {
                tracing::debug!(%query, count = list.len(), "suggestions found");
                (AutocompleteState::Showing(list), None)
            }
            Ok(_) => (AutocompleteState::Idle, None),
            Err(e) => {
                tracing::warn!(%query, error = %e, "suggestion search failed");
                (AutocompleteState::Idle, Some(e.to_string()))
            }
        };
        *self.last_error.lock().unwrap_or_else(|p| p.into_inner()) = error;
        self.state.send_replace(next);
    }
}

/// Turns keystrokes into at most one geocoding call per quiet period.
#[derive(Debug)]
pub struct AutocompleteController {
    inner: Arc<Inner>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl AutocompleteController {
    pub fn new(search: Arc<dyn LocationSearch>) -> Self {
        Self::with_settings(search, DEFAULT_DEBOUNCE, DEFAULT_SUGGESTION_LIMIT)
    }

    pub fn with_settings(search: Arc<dyn LocationSearch>, debounce: Duration, limit: usize) -> Self {
        let (state, _) = watch::channel(AutocompleteState::Idle);
        Self {
            inner: Arc::new(Inner {
                search,
                debounce,
                limit,
                generation: AtomicU64::new(0),
                state,
                last_error: Mutex::new(None),
            }),
            pending: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AutocompleteState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> AutocompleteState {
        self.inner.state.borrow().clone()
    }

    /// Most recent search failure, kept for diagnostics only.
    pub fn last_error(&self) -> Option<String> {
        self.inner
            .last_error
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Feed the current contents of the search box. Must be called from
    /// within a tokio runtime.
    pub fn on_input(&self, text: &str) {
        let generation = self.invalidate();

        let query = text.trim();
        if query.is_empty() {
            self.inner.state.send_replace(AutocompleteState::Idle);
            return;
        }

        let query = query.to_string();
        self.inner
            .state
            .send_replace(AutocompleteState::Debouncing(query.clone()));

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.run(generation, query).await });
        *self.pending.lock().unwrap_or_else(|p| p.into_inner()) = Some(handle);
    }

    /// Pick a shown suggestion. Hides the list and returns the choice.
    pub fn select(&self, index: usize) -> Option<LocationSuggestion> {
        let chosen = self.inner.state.borrow().suggestions().get(index).cloned()?;
        self.close();
        Some(chosen)
    }

    /// Cancel any pending search and hide suggestions.
    pub fn close(&self) {
        self.invalidate();
        self.inner.state.send_replace(AutocompleteState::Idle);
    }

    /// Abort the scheduled search, if any, and return the new generation.
    fn invalidate(&self) -> u64 {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(handle) = self.pending.lock().unwrap_or_else(|p| p.into_inner()).take() {
            handle.abort();
        }
        generation
    }
}

impl Drop for AutocompleteController {
    fn drop(&mut self) {
        self.invalidate();
    }
}
