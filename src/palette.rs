//! Category colours used by the presentation layer.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Category rendered with a rainbow gradient and dark text.
pub const RESONANCE: &str = "공명";

/// Colour for categories missing from the palette.
pub const FALLBACK_COLOR: &str = "#78716c";

/// Header background when a character's category cannot be recovered.
pub const UNKNOWN_HEADER_COLOR: &str = "#000";

const LIGHT_TEXT: &str = "#fff";
const DARK_TEXT: &str = "#333";

static TYPE_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("냉정", "#2563eb"),
        ("광기", "#dc2626"),
        ("활발", "#eab308"),
        ("우울", "#9333ea"),
        ("순수", "#16a34a"),
        ("기타", "#78716c"),
        (
            RESONANCE,
            "linear-gradient(90deg, #ffadad, #ffd6a5, #fdffb6, #caffbf, #9bf6ff, #a0c4ff, #bdb2ff, #ffc6ff)",
        ),
    ])
});

/// Background and text colour for one category badge or header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Swatch {
    pub background: &'static str,
    pub text: &'static str,
}

pub fn category_color(category: &str) -> &'static str {
    TYPE_COLORS.get(category).copied().unwrap_or(FALLBACK_COLOR)
}

pub fn swatch(category: &str) -> Swatch {
    Swatch {
        background: category_color(category),
        text: if category == RESONANCE {
            DARK_TEXT
        } else {
            LIGHT_TEXT
        },
    }
}

/// Swatch for a character header; `None` means the category is unknown.
pub fn header_swatch(category: Option<&str>) -> Swatch {
    match category {
        Some(c) => swatch(c),
        None => Swatch {
            background: UNKNOWN_HEADER_COLOR,
            text: LIGHT_TEXT,
        },
    }
}
