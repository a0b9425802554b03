//! Wrapping element trees into visitors.
//!
//! A [`VisitorRegistry`] remembers the visitor created for each element, so wrapping
//! the same element again returns the same visitor. Entries are never evicted; a
//! registry lives as long as a handle to it does.
//!
//! # Example
//!
//! ```
//! use arbor_visitor::{Element, wrap_visitor};
//!
//! let wrapper = wrap_visitor();
//! let tree = Element::builder("View")
//!     .child(Element::builder("Text").key("title").text("Hello").build())
//!     .build();
//! let root = wrapper.wrap(&tree).unwrap();
//!
//! let title = root.get("title").unwrap();
//! assert_eq!(title.children().as_text(), Some("Hello"));
//! assert_eq!(title.parent(), Some(root.clone()));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use arbor_core::alloc::HashMap;
use arbor_core::profiling::profile_function;
use arbor_style::Style;

use crate::element::{Children, Element, ElementId, ListItemInfo, RenderItem, StyleSlot};
use crate::freeze::FreezeSuspension;
use crate::visitor::Visitor;

/// Something that can be wrapped or inserted as a child.
#[derive(Debug, Clone)]
pub enum WrapTarget {
    Element(Element),
    Visitor(Visitor),
    /// Nothing to wrap (a null or primitive node).
    Empty,
}

impl From<Element> for WrapTarget {
    fn from(element: Element) -> Self {
        WrapTarget::Element(element)
    }
}

impl From<&Element> for WrapTarget {
    fn from(element: &Element) -> Self {
        WrapTarget::Element(element.clone())
    }
}

impl From<Visitor> for WrapTarget {
    fn from(visitor: Visitor) -> Self {
        WrapTarget::Visitor(visitor)
    }
}

impl From<&Visitor> for WrapTarget {
    fn from(visitor: &Visitor) -> Self {
        WrapTarget::Visitor(visitor.clone())
    }
}

impl<T: Into<WrapTarget>> From<Option<T>> for WrapTarget {
    fn from(target: Option<T>) -> Self {
        target.map_or(WrapTarget::Empty, Into::into)
    }
}

#[derive(Default)]
pub(crate) struct RegistryInner {
    visitors: RefCell<HashMap<ElementId, Visitor>>,
}

/// Side table mapping elements to their visitors.
#[derive(Clone, Default)]
pub struct VisitorRegistry {
    inner: Rc<RegistryInner>,
}

thread_local! {
    static GLOBAL_REGISTRY: VisitorRegistry = VisitorRegistry::new();
}

impl VisitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry used by [`wrap_visitor`] on this thread.
    pub fn global() -> Self {
        GLOBAL_REGISTRY.with(Clone::clone)
    }

    pub(crate) fn from_weak(weak: &Weak<RegistryInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Start a wrap. Freeze enforcement is suspended until [`TreeWrapper::wrap`]
    /// returns, so elements built in between stay editable.
    pub fn wrapper(&self) -> TreeWrapper {
        TreeWrapper {
            registry: self.clone(),
            _suspension: FreezeSuspension::new(),
        }
    }

    /// The visitor already created for `element`, if any.
    pub fn get(&self, element: &Element) -> Option<Visitor> {
        self.inner.visitors.borrow().get(&element.id()).cloned()
    }

    pub fn contains(&self, element: &Element) -> bool {
        self.inner.visitors.borrow().contains_key(&element.id())
    }

    /// Number of wrapped elements.
    pub fn len(&self) -> usize {
        self.inner.visitors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.visitors.borrow().is_empty()
    }

    /// The visitor for `element`, wrapping it as a parentless root if it has none yet.
    pub(crate) fn resolve(&self, element: &Element) -> Visitor {
        match self.get(element) {
            Some(visitor) => visitor,
            None => {
                let _suspension = FreezeSuspension::new();
                self.wrap_element(element, None)
            }
        }
    }

    fn wrap_target(&self, target: WrapTarget, parent: Option<&Visitor>) -> Option<Visitor> {
        match target {
            WrapTarget::Empty => None,
            WrapTarget::Visitor(visitor) => {
                if parent.is_some() {
                    visitor.set_parent(parent);
                }
                Some(visitor)
            }
            WrapTarget::Element(element) => {
                let visitor = self.wrap_element(&element, parent);
                if parent.is_none() {
                    if let Some(ancestor) = visitor.parent() {
                        ancestor.index_upward(visitor.key_entries());
                    }
                }
                Some(visitor)
            }
        }
    }

    fn wrap_element(&self, element: &Element, parent: Option<&Visitor>) -> Visitor {
        profile_function!();

        let (visitor, previous) = match self.get(element) {
            Some(visitor) => {
                if parent.is_some() {
                    visitor.set_parent(parent);
                }
                let previous = visitor.children().nodes().to_vec();
                visitor.reset_child_slots();
                tracing::trace!(node_type = visitor.node_type(), "visitor reused");
                (visitor, previous)
            }
            None => {
                default_empty_style(element);
                let visitor = Visitor::new(element.clone(), Rc::downgrade(&self.inner));
                visitor.set_parent(parent);
                self.inner
                    .visitors
                    .borrow_mut()
                    .insert(element.id(), visitor.clone());
                tracing::trace!(node_type = visitor.node_type(), "visitor created");
                (visitor, Vec::new())
            }
        };

        visitor.index_own_key();

        let child_elements = element.props().children.as_ref().and_then(Children::nodes);
        match child_elements {
            Some(nodes) => {
                for (index, child) in nodes.iter().enumerate() {
                    let child_visitor = self.wrap_element(child, Some(&visitor));
                    visitor.index_keys(child_visitor.key_entries());
                    visitor.place_child(index, child_visitor);
                }
            }
            None => {
                if element.props().render_item.is_some() {
                    self.install_row_hook(&visitor);
                }
            }
        }

        for stale in previous.iter().filter(|child| !visitor.has_child(child)) {
            visitor.release_child(stale);
        }

        visitor
    }

    /// Route rows rendered by a list's `render_item` through the wrapper, so they
    /// join the list's children and key index when the host renders them.
    fn install_row_hook(&self, list: &Visitor) {
        let Some(original) = list.props().render_item.clone() else {
            return;
        };
        if !list.claim_row_hook() {
            return;
        }

        let list_handle = list.downgrade();
        let registry = Rc::downgrade(&self.inner);
        let hooked: RenderItem = Rc::new(move |info: &ListItemInfo| {
            let rendered = original(info);
            if let (Some(row), Some(list)) = (rendered.as_ref(), list_handle.upgrade()) {
                let registry = VisitorRegistry::from_weak(&registry).unwrap_or_default();
                let _suspension = FreezeSuspension::new();
                let row_visitor = registry.wrap_element(row, Some(&list));
                let previous = list.child_at(info.index);
                list.place_child(info.index, row_visitor.clone());
                if let Some(previous) = previous.filter(|previous| !list.has_child(previous)) {
                    list.release_child(&previous);
                }
                list.index_upward(row_visitor.key_entries());
                tracing::trace!(node_type = list.node_type(), index = info.index, "row wrapped");
            }
            rendered
        });

        match list.props_mut() {
            Ok(mut props) => props.render_item = Some(hooked),
            Err(err) => tracing::warn!(%err, "cannot hook list rows"),
        }
    }
}

fn default_empty_style(element: &Element) {
    if !matches!(element.props().style, StyleSlot::Unset) {
        return;
    }
    match element.props_mut() {
        Ok(mut props) => props.style = StyleSlot::Set(Style::new()),
        Err(err) => tracing::warn!(%err, "cannot default empty style"),
    }
}

/// A single-use wrapping function.
///
/// Holds a [`FreezeSuspension`] from creation until [`TreeWrapper::wrap`] returns.
#[must_use = "a wrapper does nothing until `wrap` is called"]
pub struct TreeWrapper {
    registry: VisitorRegistry,
    _suspension: FreezeSuspension,
}

impl TreeWrapper {
    /// Wrap `target` and its subtree, returning the root visitor.
    ///
    /// Returns `None` for [`WrapTarget::Empty`]. Wrapping an element that was
    /// wrapped before returns the same visitor with its children re-synchronized:
    /// children no longer listed in its props are detached, and new descendant keys
    /// reach every ancestor.
    ///
    /// A visitor or memoized element that already has a parent keeps it; wrapping at
    /// the top level never orphans a node its parent still lists as a child.
    pub fn wrap(self, target: impl Into<WrapTarget>) -> Option<Visitor> {
        profile_function!();
        let root = self.registry.wrap_target(target.into(), None);
        if let Some(root) = &root {
            tracing::debug!(node_type = root.node_type(), wrapped = self.registry.len(), "tree wrapped");
        }
        root
    }

    pub fn registry(&self) -> &VisitorRegistry {
        &self.registry
    }
}

/// Start a wrap against this thread's [`VisitorRegistry::global`] registry.
pub fn wrap_visitor() -> TreeWrapper {
    VisitorRegistry::global().wrapper()
}
