//! Declarative elements, as produced by the host framework.
//!
//! An [`Element`] describes a UI node: a type, an optional key and a set of props.
//! Elements are shared handles; the host treats them as immutable once created and
//! may freeze them (see [`crate::freeze`]).

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use arbor_core::alloc::IndexMap;
use arbor_style::Style;

use crate::error::{VisitorError, VisitorResult};
use crate::freeze;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an element, stable for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

/// The type of an element, identified by its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementType {
    display_name: Rc<str>,
}

impl ElementType {
    pub fn new(display_name: &str) -> Self {
        Self {
            display_name: Rc::from(display_name),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl From<&str> for ElementType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ElementType {
    fn from(name: String) -> Self {
        Self {
            display_name: Rc::from(name),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// The `children` prop.
///
/// A lone child is stored as [`Children::Single`] rather than a one-element list.
#[derive(Debug, Clone)]
pub enum Children {
    /// Text content; the element is a leaf.
    Text(String),
    Single(Element),
    Many(Vec<Element>),
}

impl Children {
    /// Store a child list, collapsing a single child into [`Children::Single`].
    pub fn collapse(nodes: Vec<Element>) -> Self {
        match <[Element; 1]>::try_from(nodes) {
            Ok([only]) => Children::Single(only),
            Err(nodes) => Children::Many(nodes),
        }
    }

    /// Child elements in order, or `None` for text content.
    pub fn nodes(&self) -> Option<Vec<Element>> {
        match self {
            Children::Text(_) => None,
            Children::Single(element) => Some(vec![element.clone()]),
            Children::Many(elements) => Some(elements.clone()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Children::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Children {
    fn from(text: &str) -> Self {
        Children::Text(text.to_owned())
    }
}

impl From<Vec<Element>> for Children {
    fn from(nodes: Vec<Element>) -> Self {
        Children::collapse(nodes)
    }
}

/// The `style` prop.
#[derive(Debug, Clone, Default)]
pub enum StyleSlot {
    /// The element has no style prop.
    #[default]
    Undeclared,
    /// The element declares a style prop without a value.
    Unset,
    Set(Style),
}

impl StyleSlot {
    pub fn style(&self) -> Option<&Style> {
        match self {
            StyleSlot::Set(style) => Some(style),
            _ => None,
        }
    }

    pub fn is_declared(&self) -> bool {
        !matches!(self, StyleSlot::Undeclared)
    }
}

/// Any other prop value.
#[derive(Clone)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    String(String),
    Style(Style),
    /// Host-specific values the toolkit passes through untouched.
    Any(Rc<dyn Any>),
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            PropValue::Number(value) => f.debug_tuple("Number").field(value).finish(),
            PropValue::String(value) => f.debug_tuple("String").field(value).finish(),
            PropValue::Style(value) => f.debug_tuple("Style").field(value).finish(),
            PropValue::Any(_) => f.write_str("Any(..)"),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_owned())
    }
}

impl From<Style> for PropValue {
    fn from(value: Style) -> Self {
        PropValue::Style(value)
    }
}

/// Row descriptor handed to a list's row renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemInfo {
    pub index: usize,
    pub key: Option<String>,
}

impl ListItemInfo {
    pub fn new(index: usize) -> Self {
        Self { index, key: None }
    }

    pub fn with_key(index: usize, key: impl Into<String>) -> Self {
        Self {
            index,
            key: Some(key.into()),
        }
    }
}

/// Renders one row of a virtualized list.
pub type RenderItem = Rc<dyn Fn(&ListItemInfo) -> Option<Element>>;

/// Receives the host's resolved reference for an element (`None` on unmount).
pub type RefCallback = Rc<dyn Fn(Option<&(dyn Any + 'static)>)>;

/// Properties of an element.
#[derive(Clone, Default)]
pub struct Props {
    pub children: Option<Children>,
    pub style: StyleSlot,
    /// Style of the inner content container of scrolling elements.
    pub content_container_style: Option<Style>,
    /// Row renderer of list elements that render rows lazily.
    pub render_item: Option<RenderItem>,
    pub attributes: IndexMap<String, PropValue>,
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("children", &self.children)
            .field("style", &self.style)
            .field("content_container_style", &self.content_container_style)
            .field("render_item", &self.render_item.as_ref().map(|_| ".."))
            .field("attributes", &self.attributes)
            .finish()
    }
}

struct ElementInner {
    id: ElementId,
    element_type: ElementType,
    key: RefCell<Option<String>>,
    props: RefCell<Props>,
    ref_callback: RefCell<Option<RefCallback>>,
    frozen: bool,
}

/// A declarative element.
///
/// Cloning yields another handle to the same element; equality is identity.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

impl Element {
    /// Create an element. It is frozen if enforcement is active.
    pub fn create(element_type: impl Into<ElementType>, key: Option<String>, props: Props) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                id: ElementId::next(),
                element_type: element_type.into(),
                key: RefCell::new(key),
                props: RefCell::new(props),
                ref_callback: RefCell::new(None),
                frozen: freeze::is_active(),
            }),
        }
    }

    pub fn builder(element_type: impl Into<ElementType>) -> ElementBuilder {
        ElementBuilder::new(element_type.into())
    }

    pub fn id(&self) -> ElementId {
        self.inner.id
    }

    pub fn element_type(&self) -> &ElementType {
        &self.inner.element_type
    }

    pub fn key(&self) -> Option<String> {
        self.inner.key.borrow().clone()
    }

    pub fn props(&self) -> Ref<'_, Props> {
        self.inner.props.borrow()
    }

    /// Whether writes to this element are currently rejected.
    pub fn is_frozen(&self) -> bool {
        self.inner.frozen && freeze::is_active()
    }

    pub fn ensure_writable(&self) -> VisitorResult<()> {
        if self.is_frozen() {
            tracing::warn!(element_type = %self.inner.element_type, "write to frozen element");
            return Err(VisitorError::Frozen {
                node_type: self.inner.element_type.display_name().to_owned(),
            });
        }
        Ok(())
    }

    pub fn set_key(&self, key: Option<String>) -> VisitorResult<()> {
        self.ensure_writable()?;
        *self.inner.key.borrow_mut() = key;
        Ok(())
    }

    pub fn props_mut(&self) -> VisitorResult<RefMut<'_, Props>> {
        self.ensure_writable()?;
        Ok(self.inner.props.borrow_mut())
    }

    pub fn ref_callback(&self) -> Option<RefCallback> {
        self.inner.ref_callback.borrow().clone()
    }

    pub fn set_ref_callback(&self, callback: Option<RefCallback>) -> VisitorResult<()> {
        self.ensure_writable()?;
        *self.inner.ref_callback.borrow_mut() = callback;
        Ok(())
    }

    /// Render one row through the `render_item` prop, as the host list would.
    pub fn render_row(&self, info: &ListItemInfo) -> Option<Element> {
        let render_item = self.inner.props.borrow().render_item.clone()?;
        render_item(info)
    }

    /// Deliver the host's resolved reference to the ref callback.
    pub fn resolve_ref(&self, value: Option<&(dyn Any + 'static)>) {
        let callback = self.inner.ref_callback.borrow().clone();
        if let Some(callback) = callback {
            callback(value);
        }
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id.0)
            .field("type", &self.inner.element_type.display_name())
            .field("key", &self.inner.key.borrow())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Element`].
pub struct ElementBuilder {
    element_type: ElementType,
    key: Option<String>,
    props: Props,
    children: Vec<Element>,
    ref_callback: Option<RefCallback>,
}

impl ElementBuilder {
    fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            key: None,
            props: Props::default(),
            children: Vec::new(),
            ref_callback: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.props.style = StyleSlot::Set(style);
        self
    }

    /// Declare a style prop without giving it a value.
    pub fn unset_style(mut self) -> Self {
        self.props.style = StyleSlot::Unset;
        self
    }

    pub fn content_container_style(mut self, style: Style) -> Self {
        self.props.content_container_style = Some(style);
        self
    }

    /// Make this a text leaf.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.props.children = Some(Children::Text(text.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn render_item(mut self, render: impl Fn(&ListItemInfo) -> Option<Element> + 'static) -> Self {
        self.props.render_item = Some(Rc::new(render));
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.attributes.insert(name.into(), value.into());
        self
    }

    pub fn ref_callback(mut self, callback: impl Fn(Option<&(dyn Any + 'static)>) + 'static) -> Self {
        self.ref_callback = Some(Rc::new(callback));
        self
    }

    pub fn build(mut self) -> Element {
        if !self.children.is_empty() {
            self.props.children = Some(Children::collapse(self.children));
        }
        let element = Element::create(self.element_type, self.key, self.props);
        *element.inner.ref_callback.borrow_mut() = self.ref_callback;
        element
    }
}
