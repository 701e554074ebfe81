//! Tilt command - print the frame for a pointer position over a card.

use super::open_store;
use crate::cli::TiltArgs;
use amble_core::tilt::{Rect, TiltFrame, pointer_frame};
use amble_core::{AppConfig, Settings};
use anyhow::Result;

/// Execute the tilt command
pub async fn execute(args: TiltArgs, config: &AppConfig) -> Result<()> {
    let store = open_store(config).await?;
    let settings = Settings::load(&store).await?;
    let reduced_motion = args.reduced_motion || config.reduced_motion;

    match frame_for(&args, settings.tilt_enabled, reduced_motion) {
        Some(frame) => print!("{}", describe(&frame)),
        None => println!("Tilt is disabled ({}).", settings.tilt_label()),
    }
    Ok(())
}

fn frame_for(args: &TiltArgs, tilt_enabled: bool, reduced_motion: bool) -> Option<TiltFrame> {
    if args.leave {
        return Some(TiltFrame::neutral());
    }
    let rect = Rect { left: 0.0, top: 0.0, width: args.width, height: args.height };
    pointer_frame(tilt_enabled, rect, args.x, args.y, reduced_motion)
}

fn describe(frame: &TiltFrame) -> String {
    let mut text = format!("transform: {}\ntransition: {}\n", frame.transform(), frame.transition);
    for (name, value) in frame.css_vars() {
        text.push_str(&format!("{name}: {value}\n"));
    }
    text
}
