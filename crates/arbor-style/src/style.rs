//! The immutable [`Style`] mapping.

use std::fmt;
use std::rc::Rc;

use arbor_core::alloc::IndexMap;

use crate::merge::merge_styles;
use crate::value::StyleValue;

/// Plain, insertion-ordered property map used to build styles.
pub type StyleMap = IndexMap<String, StyleValue>;

/// How a property is stored in a [`Style`].
#[derive(Debug, Clone)]
pub(crate) enum Entry {
    /// Stored eagerly and enumerable.
    Value(StyleValue),
    /// Stored eagerly but skipped by `keys`/`iter` and by the eager tier of a merge.
    Hidden(StyleValue),
    /// Several merged layers define a nested style here; merged on read.
    Deferred,
}

#[derive(Default)]
struct StyleData {
    entries: IndexMap<String, Entry>,
    /// Inputs of the merge that produced this style, consulted by deferred lookups.
    layers: Vec<Style>,
}

/// An immutable style object.
///
/// Reads go through a two-tier lookup: properties resolved when the style was built
/// are returned directly, everything else falls back to the layers the style was
/// merged from, merging nested styles on demand.
///
/// Cloning is cheap; clones share the same storage.
#[derive(Clone, Default)]
pub struct Style {
    data: Rc<StyleData>,
}

impl Style {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a style from a property map.
    pub fn from_map(map: StyleMap) -> Self {
        let entries = map
            .into_iter()
            .map(|(key, value)| (key, Entry::Value(value)))
            .collect();
        Self::from_entries(entries, Vec::new())
    }

    pub(crate) fn from_entries(entries: IndexMap<String, Entry>, layers: Vec<Style>) -> Self {
        Self {
            data: Rc::new(StyleData { entries, layers }),
        }
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.data.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Read a property, resolving deferred nested merges.
    pub fn get(&self, key: &str) -> Option<StyleValue> {
        match self.data.entries.get(key) {
            Some(Entry::Value(value) | Entry::Hidden(value)) => Some(value.clone()),
            Some(Entry::Deferred) => self.resolve_from_layers(key),
            None if !self.data.layers.is_empty() => self.resolve_from_layers(key),
            None => None,
        }
    }

    /// Read a nested style property.
    pub fn get_style(&self, key: &str) -> Option<Style> {
        match self.get(key)? {
            StyleValue::Style(style) => Some(style),
            _ => None,
        }
    }

    /// Whether the property can be read, including hidden and deferred properties.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.entries.contains_key(key)
            || self.data.layers.iter().any(|layer| layer.contains_key(key))
    }

    /// Enumerable property names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data
            .entries
            .iter()
            .filter(|(_, entry)| !matches!(entry, Entry::Hidden(_)))
            .map(|(key, _)| key.as_str())
    }

    /// Enumerable properties with their resolved values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, StyleValue)> + '_ {
        self.data.entries.iter().filter_map(|(key, entry)| match entry {
            Entry::Value(value) => Some((key.as_str(), value.clone())),
            Entry::Hidden(_) => None,
            Entry::Deferred => self.resolve_from_layers(key).map(|value| (key.as_str(), value)),
        })
    }

    /// Number of enumerable properties.
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve every enumerable property into a plain map.
    pub fn to_map(&self) -> StyleMap {
        self.iter().map(|(key, value)| (key.to_owned(), value)).collect()
    }

    /// A copy of this style with one property replaced.
    pub fn with(&self, key: impl Into<String>, value: impl Into<StyleValue>) -> Style {
        let mut map = self.to_map();
        map.insert(key.into(), value.into());
        Style::from_map(map)
    }

    /// Whether both handles share the same storage.
    pub fn ptr_eq(&self, other: &Style) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    // Nested styles after the last scalar override are merged; a trailing scalar wins.
    fn resolve_from_layers(&self, key: &str) -> Option<StyleValue> {
        let values: Vec<StyleValue> = self
            .data
            .layers
            .iter()
            .filter_map(|layer| layer.get(key))
            .collect();

        let start = values
            .iter()
            .rposition(|value| !value.is_style())
            .map_or(0, |index| index + 1);

        if start == values.len() {
            return values.last().cloned();
        }

        let mut nested: Vec<Style> = values[start..]
            .iter()
            .filter_map(|value| value.as_style().cloned())
            .collect();

        if nested.len() == 1 {
            nested.pop().map(StyleValue::Style)
        } else {
            Some(StyleValue::Style(merge_styles(nested)))
        }
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.to_map() == other.to_map()
    }
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl From<StyleMap> for Style {
    fn from(map: StyleMap) -> Self {
        Style::from_map(map)
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for Style {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Style::from_map(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Build a [`Style`] from `property: value` pairs.
///
/// Property names are written as identifiers and stored verbatim, so camel-cased
/// names such as `fontSize` keep their casing.
///
/// ```
/// use arbor_style::style;
///
/// let title = style! {
///     fontSize: 18,
///     color: "#333",
///     pressed: style! { color: "#000" },
/// };
/// assert_eq!(title.get("fontSize").unwrap().as_number(), Some(18.0));
/// ```
#[macro_export]
macro_rules! style {
    () => {
        $crate::Style::new()
    };
    ($($key:ident : $value:expr),+ $(,)?) => {{
        let mut map = $crate::StyleMap::default();
        $(
            map.insert(
                ::std::string::String::from(stringify!($key)),
                $crate::StyleValue::from($value),
            );
        )+
        $crate::Style::from_map(map)
    }};
}
