//! Open/close sequence of the settings panel.
//!
//! Closing waits for the panel's transition to end, but never longer than
//! [`CLOSE_FALLBACK`]: whichever comes first completes the close.

use std::future::Future;
use std::time::Duration;

/// Upper bound on how long a close waits for the transition-end signal.
pub const CLOSE_FALLBACK: Duration = Duration::from_millis(400);

/// Delay before the first input is focused after opening.
pub const FOCUS_DELAY: Duration = Duration::from_millis(260);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open,
    Closing,
}

/// How a close completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    TransitionEnded,
    TimedOut,
    /// The panel was not open; nothing happened.
    AlreadyClosed,
}

#[derive(Debug)]
pub struct SettingsPanel {
    state: PanelState,
    aria_expanded: bool,
}

impl Default for SettingsPanel {
    fn default() -> Self {
        Self { state: PanelState::Closed, aria_expanded: false }
    }
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Whether the overlay is hidden.
    pub fn is_hidden(&self) -> bool {
        self.state == PanelState::Closed
    }

    /// Value of the hamburger button's `aria-expanded` attribute.
    pub fn aria_expanded(&self) -> bool {
        self.aria_expanded
    }

    /// Reveal the panel.
    ///
    /// Returns the delay after which the first input should take focus, or
    /// `None` if the panel was already open.
    pub fn open(&mut self) -> Option<Duration> {
        if self.state == PanelState::Open {
            return None;
        }
        self.state = PanelState::Open;
        self.aria_expanded = true;
        tracing::debug!("settings panel opened");
        Some(FOCUS_DELAY)
    }

    /// Whether a key press should close the panel.
    pub fn closes_on_key(&self, key: &str) -> bool {
        self.state == PanelState::Open && key == "Escape"
    }

    /// Hide the panel once `transition_end` fires or the fallback elapses.
    pub async fn close<F>(&mut self, transition_end: F) -> CloseOutcome
    where
        F: Future<Output = ()>,
    {
        if self.state != PanelState::Open {
            return CloseOutcome::AlreadyClosed;
        }
        self.state = PanelState::Closing;
        self.aria_expanded = false;

        let outcome = tokio::select! {
            _ = transition_end => CloseOutcome::TransitionEnded,
            _ = tokio::time::sleep(CLOSE_FALLBACK) => CloseOutcome::TimedOut,
        };

        self.state = PanelState::Closed;
        tracing::debug!(?outcome, "settings panel closed");
        outcome
    }

    /// Open when hidden, close otherwise.
    pub async fn toggle<F>(&mut self, transition_end: F) -> PanelState
    where
        F: Future<Output = ()>,
    {
        if self.is_hidden() {
            self.open();
        } else {
            self.close(transition_end).await;
        }
        self.state
    }
}
