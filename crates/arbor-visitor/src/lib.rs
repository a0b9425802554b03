//! Mutable visitor trees over declarative UI elements.
//!
//! Elements describe UI declaratively and are treated as immutable by their host.
//! Wrapping an element tree yields a tree of [`Visitor`] nodes that can be edited
//! imperatively (insert, move, remove, replace children; change styles) while keeping
//! the elements' props in sync, and that index keyed descendants for direct lookup.
//!
//! ```
//! use arbor_visitor::{Element, wrap_visitor};
//!
//! let wrapper = wrap_visitor();
//! let tree = Element::builder("View")
//!     .child(Element::builder("Text").key("first").text("a").build())
//!     .child(Element::builder("Text").key("last").text("c").build())
//!     .build();
//! let root = wrapper.wrap(&tree).unwrap();
//!
//! let last = root.get("last").unwrap();
//! root.add_child_before(Element::builder("Text").text("b").build(), &last)
//!     .unwrap();
//! assert_eq!(root.children().nodes().len(), 3);
//! assert_eq!(root.child_index(&last), Some(2));
//! ```

pub mod element;
pub mod error;
pub mod freeze;
pub mod helpers;
pub mod visitor;
pub mod wrapper;

pub use element::{
    Children, Element, ElementBuilder, ElementId, ElementType, ListItemInfo, PropValue, Props,
    RefCallback, RenderItem, StyleSlot,
};
pub use error::{VisitorError, VisitorResult};
pub use freeze::FreezeSuspension;
pub use helpers::{append_content_container_styles, append_ref_handler, append_styles};
pub use visitor::{Visitor, VisitorChildren, WeakVisitor};
pub use wrapper::{TreeWrapper, VisitorRegistry, WrapTarget, wrap_visitor};
