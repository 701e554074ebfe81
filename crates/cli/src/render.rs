//! Terminal rendering surface for the metadata fetcher.

use amble_client::{DisplayState, Renderer, Target, ViewModel};
use std::io::Write;

/// Prints one line per rendered target.
///
/// Loading states and icon indicators go to the log rather than the
/// output, so each target ends up with a single status line.
pub struct TerminalRenderer<W> {
    out: W,
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(line).and_then(|_| self.out.write_all(b"\n")) {
            tracing::warn!(error = %e, "failed to write output");
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&mut self, target: &Target, view: &ViewModel) {
        let marker = match view.state {
            DisplayState::Loading => {
                tracing::debug!(name = %target.label(), "loading");
                return;
            }
            DisplayState::Ready => " ",
            DisplayState::Stale => "~",
            DisplayState::Unknown => "?",
        };
        self.line(format_args!("{marker} {:<28} {}", target.label(), view.text));
    }

    fn set_icon(&mut self, target: &Target, uri: &str) {
        self.line(format_args!("  {:<28} icon: {uri}", target.label()));
    }

    fn set_loading_indicator(&mut self, target: &Target, visible: bool) {
        tracing::trace!(name = %target.label(), visible, "icon loading indicator");
    }
}
