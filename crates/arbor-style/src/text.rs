//! Text style inheritance.

use crate::style::{Style, StyleMap};

/// Properties a text node inherits from its container's style.
pub const TEXT_STYLE_KEYS: [&str; 14] = [
    "color",
    "fontFamily",
    "fontSize",
    "fontStyle",
    "fontWeight",
    "letterSpacing",
    "lineHeight",
    "textAlign",
    "textDecorationLine",
    "textDecorationStyle",
    "textDecorationColor",
    "textShadowColor",
    "textShadowOffset",
    "textShadowRadius",
];

/// Keep only the text properties of `style`.
///
/// A missing style is passed through unchanged. Properties the style does not set
/// are omitted rather than defaulted.
pub fn filter_text_styles(style: Option<&Style>) -> Option<Style> {
    let style = style?;
    let map: StyleMap = TEXT_STYLE_KEYS
        .iter()
        .filter_map(|&key| style.get(key).map(|value| (key.to_owned(), value)))
        .collect();
    Some(Style::from_map(map))
}
