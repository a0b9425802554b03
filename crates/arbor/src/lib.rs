//! Arbor - imperative editing of declarative UI trees
//!
//! Arbor wraps trees of declarative, immutable-by-convention elements in mutable
//! visitor nodes, and provides a style engine for composing nested, state-based
//! styles:
//!
//! - **Styles**: lazy nested merging, state cross-merging, text style filtering and
//!   platform-aware style sheets
//! - **Visitors**: child insertion, moves, removal and replacement kept in sync with
//!   the element props, plus a tree-wide key index
//! - **Helpers**: appending styles and chaining ref callbacks
//!
//! # Quick Start
//!
//! ```
//! use arbor::prelude::*;
//!
//! let sheet = create_style_sheet([
//!     ("card", style! { padding: 8, pressed: style! { opacity: 0.5 } }),
//! ]);
//!
//! let wrapper = wrap_visitor();
//! let tree = Element::builder("View")
//!     .child(Element::builder("Text").key("label").text("Tap me").build())
//!     .build();
//! let root = wrapper.wrap(&tree).unwrap();
//!
//! let card = sheet.get("card").cloned();
//! let pressed = cross_merge_styles(card.as_ref(), &["pressed"]);
//! append_styles(Some(&root), [pressed]).unwrap();
//!
//! assert_eq!(root.style().and_then(|s| s.get("opacity")), Some(0.5.into()));
//! assert!(root.get("label").is_some());
//! ```

// Re-export core types
pub use arbor_core as core;
pub use arbor_core::{Config, Platform, logging, profiling};

pub use arbor_style as style;
pub use arbor_style::{
    Style, StyleMap, StyleSheet, StyleValue, TEXT_STYLE_KEYS, create_style_sheet,
    create_style_sheet_with, cross_merge_styles, filter_text_styles, merge_styles,
};

#[cfg(feature = "visitor")]
pub use arbor_visitor as visitor;
#[cfg(feature = "visitor")]
pub use arbor_visitor::{
    Element, ElementBuilder, TreeWrapper, Visitor, VisitorChildren, VisitorError, VisitorRegistry,
    VisitorResult, WrapTarget, append_content_container_styles, append_ref_handler, append_styles,
    freeze, wrap_visitor,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use arbor_core::{Config, Platform};

    // Style engine
    pub use arbor_style::{
        Style, StyleSheet, StyleValue, create_style_sheet, create_style_sheet_with,
        cross_merge_styles, filter_text_styles, merge_styles, style,
    };

    // Visitors
    #[cfg(feature = "visitor")]
    pub use arbor_visitor::{
        Element, ListItemInfo, Visitor, VisitorChildren, VisitorError, VisitorResult, WrapTarget,
        append_content_container_styles, append_ref_handler, append_styles, wrap_visitor,
    };
}
