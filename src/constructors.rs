// src/constructors.rs

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Upstream constructor id → short team code. Rebrands of one team share a code
/// (`toro_rosso`, `alpha_tauri` and `rb` are all `VRB`).
static ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("red_bull", "RED"),
        ("mercedes", "MER"),
        ("ferrari", "FER"),
        ("mclaren", "MCL"),
        ("aston_martin", "AST"),
        ("alpine", "ALP"),
        ("haas", "HAA"),
        ("williams", "WIL"),
        ("rb", "VRB"),
        ("toro_rosso", "VRB"),
        ("alpha_tauri", "VRB"),
        ("sauber", "KCK"),
        ("alfa", "KCK"),
        ("alfa_romeo", "KCK"),
    ])
});

/// Short code for a constructor id, or `""` when the id is unknown.
pub fn abbreviate(constructor_id: &str) -> &'static str {
    ABBREVIATIONS
        .get(constructor_id.trim())
        .copied()
        .unwrap_or("")
}
