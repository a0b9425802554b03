//! Values stored in a [`Style`].

use crate::style::{Style, StyleMap};

/// A single style property value.
///
/// Scalars map directly to platform style values; [`StyleValue::Style`] holds a
/// nested style, used for state variants and composite properties such as
/// `shadowOffset`.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Bool(bool),
    Number(f64),
    String(String),
    /// Ordered values such as `transform` lists
    List(Vec<StyleValue>),
    /// A nested style mapping
    Style(Style),
}

impl StyleValue {
    /// Returns true if this value is a nested style.
    pub fn is_style(&self) -> bool {
        matches!(self, Self::Style(_))
    }

    pub fn as_style(&self) -> Option<&Style> {
        match self {
            Self::Style(style) => Some(style),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[StyleValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Style> for StyleValue {
    fn from(value: Style) -> Self {
        Self::Style(value)
    }
}

impl From<StyleMap> for StyleValue {
    fn from(value: StyleMap) -> Self {
        Self::Style(Style::from_map(value))
    }
}

impl From<Vec<StyleValue>> for StyleValue {
    fn from(value: Vec<StyleValue>) -> Self {
        Self::List(value)
    }
}
