//! Pointer-driven tilt effect for cards.
//!
//! Maps a pointer position over a card to a rotation, scale, moving sheen
//! and drop shadows. Output is expressed as a CSS `transform` plus custom
//! properties so any presentation layer can apply it.

use serde::Serialize;

/// Maximum rotation in degrees at the card edge.
pub const MAX_ROTATION: f64 = 28.0;

/// Scale while tilting with full motion.
pub const TILT_SCALE: f64 = 1.18;

/// Fraction of [`MAX_ROTATION`] used when reduced motion is requested.
pub const REDUCED_FACTOR: f64 = 0.6;

pub const TRANSITION_IN: &str = "transform 220ms cubic-bezier(.03,.98,.52,.99)";
const TRANSITION_MOVE: &str = "transform 48ms linear";
const TRANSITION_REDUCED: &str = "transform 120ms linear";

pub const REST_CARD_SHADOW: &str = "0 6px 18px rgba(0,0,0,0.22)";
pub const REST_AVATAR_SHADOW: &str = "0 6px 10px rgba(0,0,0,0.12)";

/// Card bounding box in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Moving highlight across the card face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheen {
    /// Percent across the card.
    pub x: f64,
    pub y: f64,
    pub shine_opacity: f64,
    pub streak_opacity: f64,
    /// Degrees.
    pub streak_rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shadow {
    pub offset_x: i64,
    pub offset_y: i64,
    pub blur: i64,
    pub opacity: f64,
}

impl Shadow {
    pub fn css(&self) -> String {
        format!("{}px {}px {}px rgba(0,0,0,{})", self.offset_x, self.offset_y, self.blur, self.opacity)
    }
}

/// Everything needed to paint one tilt state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TiltFrame {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub scale: f64,
    pub transition: &'static str,
    pub sheen: Option<Sheen>,
    pub card_shadow: Option<Shadow>,
    pub avatar_shadow: Option<Shadow>,
}

/// Pointer offset from the card centre, each axis clamped to [-1, 1].
pub fn normalized_offset(rect: Rect, pointer_x: f64, pointer_y: f64) -> (f64, f64) {
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    let axis = |delta: f64, half: f64| {
        if half > 0.0 { (delta / half).clamp(-1.0, 1.0) } else { 0.0 }
    };
    (axis(pointer_x - (rect.left + half_w), half_w), axis(pointer_y - (rect.top + half_h), half_h))
}

fn round(value: f64) -> i64 {
    // Math.round semantics: halves go towards +infinity.
    (value + 0.5).floor() as i64
}

/// Drops the sign of a zero so it formats as `0`, not `-0`.
fn unsigned_zero(value: f64) -> f64 {
    value + 0.0
}

impl TiltFrame {
    /// Frame for a pointer at (`pointer_x`, `pointer_y`) over `rect`.
    pub fn from_pointer(rect: Rect, pointer_x: f64, pointer_y: f64, reduced_motion: bool) -> Self {
        let (px, py) = normalized_offset(rect, pointer_x, pointer_y);

        if reduced_motion {
            let max = MAX_ROTATION * REDUCED_FACTOR;
            return Self {
                rotate_x: unsigned_zero(-py * max),
                rotate_y: unsigned_zero(px * max),
                scale: 1.01,
                transition: TRANSITION_REDUCED,
                sheen: None,
                card_shadow: None,
                avatar_shadow: None,
            };
        }

        let rotate_y = unsigned_zero(px * MAX_ROTATION);
        let rotate_x = unsigned_zero(-py * MAX_ROTATION);
        let magnitude = px.abs().max(py.abs());

        let sheen_x = 50.0 - px * 18.0;
        let sheen_y = 50.0 - py * 18.0;

        Self {
            rotate_x,
            rotate_y,
            scale: TILT_SCALE,
            transition: TRANSITION_MOVE,
            sheen: Some(Sheen {
                x: sheen_x,
                y: sheen_y,
                shine_opacity: (0.15 + magnitude * 0.85).min(0.9),
                streak_opacity: (magnitude * 0.6).min(0.6),
                streak_rotation: unsigned_zero(-rotate_y * 1.8),
            }),
            card_shadow: Some(Shadow {
                offset_x: round(-px * 28.0),
                offset_y: round(py * 28.0),
                blur: 24 + round(magnitude * 48.0),
                opacity: (0.28 + magnitude * 0.6).min(0.95),
            }),
            avatar_shadow: Some(Shadow {
                offset_x: round(-px * 12.0),
                offset_y: round(py * 14.0),
                blur: 12 + round(magnitude * 24.0),
                opacity: (0.18 + magnitude * 0.6).min(0.9),
            }),
        }
    }

    /// Resting frame applied when the pointer leaves the card.
    pub fn neutral() -> Self {
        Self {
            rotate_x: 0.0,
            rotate_y: 0.0,
            scale: 1.0,
            transition: TRANSITION_IN,
            sheen: None,
            card_shadow: None,
            avatar_shadow: None,
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "perspective(1000px) rotateX({}deg) rotateY({}deg) scale({})",
            self.rotate_x, self.rotate_y, self.scale
        )
    }

    /// CSS custom properties for this frame.
    ///
    /// Reduced-motion frames set none; the neutral frame resets sheen
    /// opacity and both shadows.
    pub fn css_vars(&self) -> Vec<(&'static str, String)> {
        let mut vars = Vec::new();
        match &self.sheen {
            Some(sheen) => {
                vars.push(("--shine-x", format!("{}%", sheen.x)));
                vars.push(("--shine-y", format!("{}%", sheen.y)));
                vars.push(("--shine-opacity", sheen.shine_opacity.to_string()));
                vars.push(("--streak-x", format!("{}%", sheen.x)));
                vars.push(("--streak-y", format!("{}%", sheen.y)));
                vars.push(("--streak-opacity", sheen.streak_opacity.to_string()));
                vars.push(("--streak-rot", format!("{}deg", sheen.streak_rotation)));
            }
            None if self.transition == TRANSITION_IN => {
                vars.push(("--shine-opacity", "0".to_string()));
                vars.push(("--streak-opacity", "0".to_string()));
                vars.push(("--card-shadow", REST_CARD_SHADOW.to_string()));
                vars.push(("--avatar-shadow", REST_AVATAR_SHADOW.to_string()));
            }
            None => {}
        }
        if let Some(shadow) = &self.card_shadow {
            vars.push(("--card-shadow", shadow.css()));
        }
        if let Some(shadow) = &self.avatar_shadow {
            vars.push(("--avatar-shadow", shadow.css()));
        }
        vars
    }
}

/// Frame for a pointer move, or `None` when tilt is turned off.
pub fn pointer_frame(
    tilt_enabled: bool, rect: Rect, pointer_x: f64, pointer_y: f64, reduced_motion: bool,
) -> Option<TiltFrame> {
    tilt_enabled.then(|| TiltFrame::from_pointer(rect, pointer_x, pointer_y, reduced_motion))
}
