//! Mutable visitor nodes over declarative elements.
//!
//! A [`Visitor`] wraps exactly one [`Element`]. Reads and writes of key, props, style
//! and children go through to the element, and child edits keep the visitor's child
//! list, the element's `children` prop and the tree-wide key index in sync.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use arbor_core::alloc::IndexMap;
use arbor_core::profiling::profile_function;
use arbor_style::Style;

use crate::element::{Children, Element, Props, StyleSlot};
use crate::error::{VisitorError, VisitorResult};
use crate::wrapper::{RegistryInner, VisitorRegistry, WrapTarget};

type KeyEntries = Vec<(String, Weak<VisitorInner>)>;

/// Child list of a visitor.
///
/// Rows of lazily rendered lists are recorded at their row index, so a list that has
/// rendered rows out of order has empty slots.
#[derive(Clone)]
enum ChildSlots {
    Text(String),
    Nodes(Vec<Option<Visitor>>),
}

struct VisitorState {
    children: ChildSlots,
    parent: Weak<VisitorInner>,
    key_dict: IndexMap<String, Weak<VisitorInner>>,
    row_hook_installed: bool,
}

pub(crate) struct VisitorInner {
    element: Element,
    registry: Weak<RegistryInner>,
    state: RefCell<VisitorState>,
}

/// Snapshot of a visitor's children.
#[derive(Debug, Clone, PartialEq)]
pub enum VisitorChildren {
    /// The node is a text leaf.
    Text(String),
    /// Child visitors in order (empty row slots are skipped).
    Nodes(Vec<Visitor>),
}

impl VisitorChildren {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            VisitorChildren::Text(text) => Some(text),
            VisitorChildren::Nodes(_) => None,
        }
    }

    pub fn nodes(&self) -> &[Visitor] {
        match self {
            VisitorChildren::Text(_) => &[],
            VisitorChildren::Nodes(nodes) => nodes,
        }
    }
}

/// Mutable facade over one declarative element.
///
/// Cloning yields another handle to the same visitor; equality is identity.
#[derive(Clone)]
pub struct Visitor {
    inner: Rc<VisitorInner>,
}

/// Non-owning handle to a [`Visitor`].
#[derive(Clone, Default)]
pub struct WeakVisitor {
    inner: Weak<VisitorInner>,
}

impl WeakVisitor {
    pub fn upgrade(&self) -> Option<Visitor> {
        self.inner.upgrade().map(|inner| Visitor { inner })
    }
}

impl Visitor {
    pub(crate) fn new(element: Element, registry: Weak<RegistryInner>) -> Self {
        let children = match &element.props().children {
            Some(Children::Text(text)) => ChildSlots::Text(text.clone()),
            _ => ChildSlots::Nodes(Vec::new()),
        };
        Self {
            inner: Rc::new(VisitorInner {
                element,
                registry,
                state: RefCell::new(VisitorState {
                    children,
                    parent: Weak::new(),
                    key_dict: IndexMap::default(),
                    row_hook_installed: false,
                }),
            }),
        }
    }

    fn from_inner(inner: Rc<VisitorInner>) -> Self {
        Self { inner }
    }

    /// The wrapped element.
    pub fn node(&self) -> &Element {
        &self.inner.element
    }

    pub fn key(&self) -> Option<String> {
        self.inner.element.key()
    }

    /// Set the element's key. The key index is not re-keyed.
    pub fn set_key(&self, key: Option<String>) -> VisitorResult<()> {
        self.inner.element.set_key(key)
    }

    /// Display name of the element type.
    pub fn node_type(&self) -> &str {
        self.inner.element.element_type().display_name()
    }

    pub fn props(&self) -> Ref<'_, Props> {
        self.inner.element.props()
    }

    pub fn props_mut(&self) -> VisitorResult<RefMut<'_, Props>> {
        self.inner.element.props_mut()
    }

    pub fn set_props(&self, props: Props) -> VisitorResult<()> {
        *self.inner.element.props_mut()? = props;
        Ok(())
    }

    pub fn style(&self) -> Option<Style> {
        self.props().style.style().cloned()
    }

    pub fn set_style(&self, style: Option<Style>) -> VisitorResult<()> {
        self.props_mut()?.style = match style {
            Some(style) => StyleSlot::Set(style),
            None => StyleSlot::Unset,
        };
        Ok(())
    }

    pub fn children(&self) -> VisitorChildren {
        match &self.inner.state.borrow().children {
            ChildSlots::Text(text) => VisitorChildren::Text(text.clone()),
            ChildSlots::Nodes(slots) => VisitorChildren::Nodes(slots.iter().flatten().cloned().collect()),
        }
    }

    /// Replace the children.
    ///
    /// Text turns the node into a leaf. A node list is written to the element with a
    /// lone child collapsed; listed visitors are moved under this node and previous
    /// children that are not listed are detached.
    pub fn set_children(&self, children: VisitorChildren) -> VisitorResult<()> {
        profile_function!();
        self.node().ensure_writable()?;

        let nodes = match &children {
            VisitorChildren::Text(_) => Vec::new(),
            VisitorChildren::Nodes(nodes) => nodes.clone(),
        };
        for node in &nodes {
            self.check_not_ancestor(node)?;
            if let Some(parent) = node.parent().filter(|parent| !parent.ptr_eq(self)) {
                parent.remove_child(node)?;
            }
        }

        let previous = self.children();
        let element_children = match &children {
            VisitorChildren::Text(text) => Children::Text(text.clone()),
            VisitorChildren::Nodes(nodes) => {
                Children::collapse(nodes.iter().map(|node| node.node().clone()).collect())
            }
        };
        self.props_mut()?.children = Some(element_children);

        for old in previous.nodes() {
            if !nodes.iter().any(|node| node.ptr_eq(old)) {
                old.set_parent(None);
                self.unindex_subtree(old);
            }
        }

        self.inner.state.borrow_mut().children = match children {
            VisitorChildren::Text(text) => ChildSlots::Text(text),
            VisitorChildren::Nodes(nodes) => ChildSlots::Nodes(nodes.into_iter().map(Some).collect()),
        };
        for node in &nodes {
            node.set_parent(Some(self));
            self.index_upward(node.key_entries());
        }
        tracing::debug!(node_type = self.node_type(), count = nodes.len(), "children replaced");
        Ok(())
    }

    pub fn parent(&self) -> Option<Visitor> {
        self.inner.state.borrow().parent.upgrade().map(Visitor::from_inner)
    }

    /// Keyed descendants of this node (including itself), by key.
    pub fn key_dict(&self) -> IndexMap<String, Visitor> {
        self.inner
            .state
            .borrow()
            .key_dict
            .iter()
            .filter_map(|(key, weak)| weak.upgrade().map(|inner| (key.clone(), Visitor::from_inner(inner))))
            .collect()
    }

    /// Look up a keyed descendant (or this node) by key.
    pub fn get(&self, key: &str) -> Option<Visitor> {
        let weak = self.inner.state.borrow().key_dict.get(key).cloned()?;
        weak.upgrade().map(Visitor::from_inner)
    }

    pub fn downgrade(&self) -> WeakVisitor {
        WeakVisitor {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Visitor) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn has_child(&self, child: &Visitor) -> bool {
        self.child_index(child).is_some()
    }

    /// Index of `child`, or `None` if it is not a child or this node is a text leaf.
    pub fn child_index(&self, child: &Visitor) -> Option<usize> {
        match &self.inner.state.borrow().children {
            ChildSlots::Text(_) => None,
            ChildSlots::Nodes(slots) => slots
                .iter()
                .position(|slot| slot.as_ref().is_some_and(|node| node.ptr_eq(child))),
        }
    }

    pub fn child_at(&self, index: usize) -> Option<Visitor> {
        match &self.inner.state.borrow().children {
            ChildSlots::Text(_) => None,
            ChildSlots::Nodes(slots) => slots.get(index).cloned().flatten(),
        }
    }

    /// Append a child. See [`Visitor::add_child_at`].
    pub fn add_child(&self, child: impl Into<WrapTarget>) -> VisitorResult<Option<Visitor>> {
        self.add_child_at(child, usize::MAX)
    }

    /// Insert a child at `index` (clamped to the child count).
    ///
    /// Elements are wrapped first. A child that already has a parent is moved. Returns
    /// the inserted visitor, or `None` for an empty target. Fails with
    /// [`VisitorError::InvalidOperation`] if this node is a text leaf.
    pub fn add_child_at(&self, child: impl Into<WrapTarget>, index: usize) -> VisitorResult<Option<Visitor>> {
        profile_function!();

        let target = child.into();
        if matches!(target, WrapTarget::Empty) {
            return Ok(None);
        }
        if self.is_text_leaf() {
            tracing::warn!(node_type = self.node_type(), "add child to text node");
            return Err(VisitorError::InvalidOperation {
                node_type: self.node_type().to_owned(),
            });
        }
        self.node().ensure_writable()?;

        let visitor = match target {
            WrapTarget::Visitor(visitor) => visitor,
            WrapTarget::Element(element) => self.registry().resolve(&element),
            WrapTarget::Empty => return Ok(None),
        };
        self.check_not_ancestor(&visitor)?;

        if let Some(parent) = visitor.parent() {
            parent.remove_child(&visitor)?;
        }

        let mut elements = self.element_children();
        let element_index = index.min(elements.len());
        elements.insert(element_index, visitor.node().clone());
        self.props_mut()?.children = Some(Children::collapse(elements));

        let index = match &mut self.inner.state.borrow_mut().children {
            ChildSlots::Nodes(slots) => {
                let index = index.min(slots.len());
                slots.insert(index, Some(visitor.clone()));
                index
            }
            ChildSlots::Text(_) => index,
        };

        visitor.set_parent(Some(self));
        self.index_upward(visitor.key_entries());
        tracing::debug!(node_type = self.node_type(), child = visitor.node_type(), index, "child added");
        Ok(Some(visitor))
    }

    /// Insert a child right before `reference`.
    pub fn add_child_before(&self, child: impl Into<WrapTarget>, reference: &Visitor) -> VisitorResult<Option<Visitor>> {
        let index = self.reference_index(reference)?;
        self.add_child_at(child, index)
    }

    /// Insert a child right after `reference`.
    pub fn add_child_after(&self, child: impl Into<WrapTarget>, reference: &Visitor) -> VisitorResult<Option<Visitor>> {
        let index = self.reference_index(reference)?;
        self.add_child_at(child, index + 1)
    }

    /// Detach this node from its parent. Returns `None` for a root.
    pub fn remove(&self) -> VisitorResult<Option<Visitor>> {
        match self.parent() {
            Some(parent) => parent.remove_child(self),
            None => Ok(None),
        }
    }

    pub fn remove_child(&self, child: &Visitor) -> VisitorResult<Option<Visitor>> {
        match self.child_index(child) {
            Some(index) => self.remove_child_at(index),
            None => Ok(None),
        }
    }

    /// Remove the child at `index`. The removed visitor stays usable as a root.
    pub fn remove_child_at(&self, index: usize) -> VisitorResult<Option<Visitor>> {
        profile_function!();

        let Some(child) = self.child_at(index) else {
            return Ok(None);
        };
        self.node().ensure_writable()?;

        let mut elements = self.element_children();
        if let Some(position) = elements.iter().position(|element| element.ptr_eq(child.node())) {
            elements.remove(position);
            self.props_mut()?.children = Some(Children::collapse(elements));
        }

        if let ChildSlots::Nodes(slots) = &mut self.inner.state.borrow_mut().children {
            slots.remove(index);
        }

        child.set_parent(None);
        self.unindex_subtree(&child);
        tracing::debug!(node_type = self.node_type(), child = child.node_type(), index, "child removed");
        Ok(Some(child))
    }

    /// Remove every child, returning them in their previous order.
    pub fn remove_children(&self) -> VisitorResult<Vec<Visitor>> {
        let snapshot = self.children();
        let mut removed = Vec::with_capacity(snapshot.nodes().len());
        for child in snapshot.nodes() {
            if let Some(child) = self.remove_child(child)? {
                removed.push(child);
            }
        }
        Ok(removed)
    }

    /// Put `child` in place of `reference`.
    ///
    /// `reference` is removed only if the insertion succeeded.
    pub fn replace(&self, child: impl Into<WrapTarget>, reference: &Visitor) -> VisitorResult<Option<Visitor>> {
        let inserted = self.add_child_before(child, reference)?;
        if inserted.is_some() {
            self.remove_child(reference)?;
        }
        Ok(inserted)
    }

    pub(crate) fn set_parent(&self, parent: Option<&Visitor>) {
        self.inner.state.borrow_mut().parent = parent.map_or_else(Weak::new, |parent| Rc::downgrade(&parent.inner));
    }

    /// Mark the row hook as installed. Returns false if it already was.
    pub(crate) fn claim_row_hook(&self) -> bool {
        let mut state = self.inner.state.borrow_mut();
        !std::mem::replace(&mut state.row_hook_installed, true)
    }

    /// Rebuild the child slots from the element's `children` prop. Lists without a
    /// `children` prop keep their recorded rows.
    pub(crate) fn reset_child_slots(&self) {
        let slots = match &self.props().children {
            Some(Children::Text(text)) => ChildSlots::Text(text.clone()),
            Some(children) => ChildSlots::Nodes(vec![None; children.nodes().map_or(0, |nodes| nodes.len())]),
            None => return,
        };
        self.inner.state.borrow_mut().children = slots;
    }

    /// Record `child` at `index`, growing the slot list as needed.
    pub(crate) fn place_child(&self, index: usize, child: Visitor) {
        if let ChildSlots::Nodes(slots) = &mut self.inner.state.borrow_mut().children {
            if slots.len() <= index {
                slots.resize(index + 1, None);
            }
            slots[index] = Some(child);
        }
    }

    pub(crate) fn index_own_key(&self) {
        if let Some(key) = self.key() {
            let weak = Rc::downgrade(&self.inner);
            self.inner.state.borrow_mut().key_dict.insert(key, weak);
        }
    }

    pub(crate) fn key_entries(&self) -> KeyEntries {
        self.inner
            .state
            .borrow()
            .key_dict
            .iter()
            .map(|(key, weak)| (key.clone(), weak.clone()))
            .collect()
    }

    /// Merge `entries` into this node's key index only.
    pub(crate) fn index_keys(&self, entries: KeyEntries) {
        self.inner.state.borrow_mut().key_dict.extend(entries);
    }

    /// Merge `entries` into this node's key index and every ancestor's.
    pub(crate) fn index_upward(&self, entries: KeyEntries) {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            node.index_keys(entries.clone());
            current = node.parent();
        }
    }

    /// Detach `child` if it still points at this node, dropping its subtree's keys from
    /// this node and every ancestor.
    pub(crate) fn release_child(&self, child: &Visitor) {
        if child.parent().is_some_and(|parent| parent.ptr_eq(self)) {
            child.set_parent(None);
            self.unindex_subtree(child);
        }
    }

    /// Drop the entries that resolve into `removed`'s subtree from this node and its
    /// ancestors.
    fn unindex_subtree(&self, removed: &Visitor) {
        let entries = removed.key_entries();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            {
                let mut state = node.inner.state.borrow_mut();
                for (key, weak) in &entries {
                    if state.key_dict.get(key).is_some_and(|stored| stored.ptr_eq(weak)) {
                        state.key_dict.shift_remove(key);
                    }
                }
            }
            current = node.parent();
        }
    }

    fn is_text_leaf(&self) -> bool {
        matches!(self.inner.state.borrow().children, ChildSlots::Text(_))
    }

    fn element_children(&self) -> Vec<Element> {
        self.props()
            .children
            .as_ref()
            .and_then(Children::nodes)
            .unwrap_or_default()
    }

    fn reference_index(&self, reference: &Visitor) -> VisitorResult<usize> {
        self.child_index(reference).ok_or_else(|| {
            tracing::warn!(node_type = self.node_type(), reference = reference.node_type(), "reference child not found");
            VisitorError::ReferenceNotFound {
                node_type: self.node_type().to_owned(),
            }
        })
    }

    fn check_not_ancestor(&self, candidate: &Visitor) -> VisitorResult<()> {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.ptr_eq(candidate) {
                tracing::warn!(node_type = candidate.node_type(), "insert would create a cycle");
                return Err(VisitorError::WouldCycle {
                    node_type: candidate.node_type().to_owned(),
                });
            }
            current = node.parent();
        }
        Ok(())
    }

    fn registry(&self) -> VisitorRegistry {
        VisitorRegistry::from_weak(&self.inner.registry).unwrap_or_default()
    }
}

impl PartialEq for Visitor {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Visitor {}

impl fmt::Debug for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        let children = match &state.children {
            ChildSlots::Text(text) => format!("{:?}", text),
            ChildSlots::Nodes(slots) => format!("{} nodes", slots.iter().flatten().count()),
        };
        f.debug_struct("Visitor")
            .field("type", &self.node_type())
            .field("key", &self.key())
            .field("children", &children)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for WeakVisitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(visitor) => f.debug_tuple("WeakVisitor").field(&visitor).finish(),
            None => f.write_str("WeakVisitor(<dropped>)"),
        }
    }
}
