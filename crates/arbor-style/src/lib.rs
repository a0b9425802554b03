//! Style engine for Arbor.
//!
//! Styles are immutable nested mappings of property names to values. Nested mappings
//! describe state-based variants (`hover`, `pressed`, ...) and are combined with
//! [`merge_styles`] and [`cross_merge_styles`].
//!
//! # Example
//!
//! ```
//! use arbor_style::{cross_merge_styles, merge_styles, style};
//!
//! let base = style! { color: "red", hover: style! { color: "blue" } };
//! let hovered = cross_merge_styles(Some(&base), &["hover"]);
//! assert_eq!(hovered.get("color").unwrap().as_str(), Some("blue"));
//!
//! let merged = merge_styles([style! { a: 1 }, style! { b: 2 }]);
//! assert_eq!(merged, style! { a: 1, b: 2 });
//! ```

pub mod merge;
pub mod sheet;
pub mod style;
pub mod text;
pub mod value;

pub use merge::{cross_merge_styles, merge_styles};
pub use sheet::{StyleSheet, create_style_sheet, create_style_sheet_with};
pub use style::{Style, StyleMap};
pub use text::{TEXT_STYLE_KEYS, filter_text_styles};
pub use value::StyleValue;
