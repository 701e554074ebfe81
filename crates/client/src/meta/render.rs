//! Rendering surface for metadata targets.

use super::target::Target;
use amble_core::UNKNOWN;

/// Text shown while a target waits on the network.
pub const LOADING_TEXT: &str = "Loading…";

/// Visual state of a target's text region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    Ready,
    Stale,
    /// No slug, or nothing known about it.
    Unknown,
}

/// What a target's text region should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub state: DisplayState,
    pub text: String,
}

impl ViewModel {
    pub fn loading() -> Self {
        Self { state: DisplayState::Loading, text: LOADING_TEXT.to_string() }
    }

    /// `"Version: — • Downloads: —"`.
    pub fn unknown() -> Self {
        Self { state: DisplayState::Unknown, text: status_line(UNKNOWN, None) }
    }

    pub fn ready(version_label: &str, downloads: Option<u64>) -> Self {
        Self { state: DisplayState::Ready, text: status_line(version_label, downloads) }
    }

    pub fn stale(version_label: &str, downloads: Option<u64>) -> Self {
        Self { state: DisplayState::Stale, text: format!("{} (stale)", status_line(version_label, downloads)) }
    }
}

/// Where resolved metadata is displayed.
///
/// Implementations own the presentation; the fetcher only ever talks to a
/// target through these calls.
pub trait Renderer: Send {
    /// Replace the target's text region and visual state.
    fn render(&mut self, target: &Target, view: &ViewModel);

    /// Point the target's icon region at `uri`.
    fn set_icon(&mut self, target: &Target, uri: &str);

    /// Show or hide the transient indicator over the target while its icon loads.
    fn set_loading_indicator(&mut self, target: &Target, visible: bool);
}

/// `"Version: {label} • Downloads: {count}"`.
pub fn status_line(version_label: &str, downloads: Option<u64>) -> String {
    format!("Version: {} • Downloads: {}", version_label, format_count(downloads))
}

/// Group digits in threes with `,`; absent counts render as the unknown sentinel.
pub fn format_count(count: Option<u64>) -> String {
    let Some(count) = count else {
        return UNKNOWN.to_string();
    };

    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
