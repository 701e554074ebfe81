//! Settings command - show or change stored preferences.

use super::open_store;
use crate::cli::{SettingsAction, SettingsArgs};
use amble_core::panel::SettingsPanel;
use amble_core::settings::PARTY_WARNING;
use amble_core::{AppConfig, KeyValueStore, Preference, Settings};
use anyhow::{Result, bail};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Execute the settings command
pub async fn execute(args: SettingsArgs, config: &AppConfig) -> Result<()> {
    let store = open_store(config).await?;
    let mut out = std::io::stdout();
    let input = BufReader::new(tokio::io::stdin());
    run(args.action.unwrap_or(SettingsAction::Show), &store, input, &mut out).await
}

/// Map a typed line to the key it stands for.
fn key_for(line: &str) -> &str {
    match line.trim() {
        "" | "q" | "esc" | "\u{1b}" => "Escape",
        other => other,
    }
}

/// Drive the settings panel from line input until Escape or end of input.
///
/// Each line names a preference to flip. Turning party mode on asks for a
/// typed `yes` first.
async fn panel_session<S, R, W>(store: &S, input: R, out: &mut W) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut settings = Settings::load(store).await?;
    let mut panel = SettingsPanel::new();
    if let Some(delay) = panel.open() {
        tracing::debug!(?delay, "focus first preference");
    }

    show(&settings, out)?;
    writeln!(out, "\nType tilt, saturn or party to flip it; q or an empty line closes.")?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let key = key_for(&line);
        if panel.closes_on_key(key) {
            break;
        }

        let pref = match key.parse::<Preference>() {
            Ok(pref) => pref,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        let enabled = !settings.get(pref);
        if pref.requires_confirmation(enabled) {
            writeln!(out, "{PARTY_WARNING}\nType yes to continue.")?;
            let answer = lines.next_line().await?.unwrap_or_default();
            if !answer.trim().eq_ignore_ascii_case("yes") {
                writeln!(out, "{pref}: {}", on_off(settings.get(pref)))?;
                continue;
            }
        }

        settings.set(store, pref, enabled).await?;
        writeln!(out, "{pref}: {}", on_off(enabled))?;
    }

    // No transition to wait for in a terminal.
    let outcome = panel.close(std::future::ready(())).await;
    tracing::debug!(?outcome, hidden = panel.is_hidden(), "settings panel session ended");
    Ok(())
}

async fn run<S, R, W>(action: SettingsAction, store: &S, input: R, out: &mut W) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut settings = Settings::load(store).await?;

    match action {
        SettingsAction::Show => show(&settings, out)?,
        SettingsAction::Set { preference, state, yes } => {
            let pref = Preference::from(preference);
            let enabled = state.enabled();
            if pref.requires_confirmation(enabled) && !yes {
                writeln!(out, "{PARTY_WARNING}")?;
                bail!("{pref} left unchanged: re-run with --yes to confirm");
            }
            settings.set(store, pref, enabled).await?;
            writeln!(out, "{pref}: {}", on_off(enabled))?;
        }
        SettingsAction::ToggleTilt => {
            settings.toggle_tilt(store).await?;
            writeln!(out, "{}", settings.tilt_label())?;
        }
        SettingsAction::Panel => panel_session(store, input, out).await?,
    }

    Ok(())
}

fn show<W: Write>(settings: &Settings, out: &mut W) -> Result<()> {
    for pref in Preference::ALL {
        writeln!(out, "{:<8} {:<4} ({})", pref.to_string(), on_off(settings.get(pref)), pref.key())?;
    }
    writeln!(out)?;
    writeln!(out, "root classes: {}", join_or_none(&settings.root_classes()))?;
    writeln!(out, "body classes: {}", join_or_none(&settings.body_classes()))?;
    writeln!(out, "stylesheets:  {}", join_or_none(&settings.stylesheets()))?;
    writeln!(out, "toggle:       {}", settings.tilt_label())?;
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() { "(none)".to_string() } else { items.join(" ") }
}
