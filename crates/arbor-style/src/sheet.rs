//! Nested style sheets.

use arbor_core::alloc::IndexMap;
use arbor_core::profiling::profile_function;
use arbor_core::{Config, Platform};

use crate::merge::merge_styles;
use crate::style::{Entry, Style};
use crate::value::StyleValue;

/// Nested properties that stay enumerable after preparation.
const ENUMERABLE_NESTED: &[&str] = &["shadowOffset"];

/// A registered table of named, immutable styles.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: IndexMap<String, Style>,
}

impl StyleSheet {
    fn register(styles: IndexMap<String, Style>, platform: Platform) -> Self {
        tracing::debug!(count = styles.len(), %platform, "registered style sheet");
        Self { styles }
    }

    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Style)> {
        self.styles.iter().map(|(name, style)| (name.as_str(), style))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Create a style sheet for the build target platform.
///
/// See [`create_style_sheet_with`].
pub fn create_style_sheet<I, K>(styles: I) -> StyleSheet
where
    I: IntoIterator<Item = (K, Style)>,
    K: Into<String>,
{
    create_style_sheet_with(styles, &Config::default())
}

/// Create a style sheet whose styles support nested, state-based sub-styles.
///
/// Every nested style is prepared recursively and hidden from enumeration (it stays
/// readable through [`Style::get`]), except lists and `shadowOffset`, which the
/// platform reads directly. On platforms that need it, any style setting
/// `fontWeight` without a `fontFamily` gets an empty `fontFamily`.
///
/// ```
/// use arbor_core::{Config, Platform};
/// use arbor_style::{create_style_sheet_with, style};
///
/// let sheet = create_style_sheet_with(
///     [("title", style! { fontWeight: "bold", hover: style! { color: "red" } })],
///     &Config::for_platform(Platform::Android),
/// );
/// let title = sheet.get("title").unwrap();
/// assert_eq!(title.get("fontFamily").unwrap().as_str(), Some(""));
/// assert_eq!(title.keys().collect::<Vec<_>>(), ["fontWeight", "fontFamily"]);
/// assert!(title.get_style("hover").is_some());
/// ```
pub fn create_style_sheet_with<I, K>(styles: I, config: &Config) -> StyleSheet
where
    I: IntoIterator<Item = (K, Style)>,
    K: Into<String>,
{
    profile_function!();

    let prepared = styles
        .into_iter()
        .map(|(name, style)| (name.into(), prepare_style(&style, config.platform)))
        .collect();
    StyleSheet::register(prepared, config.platform)
}

fn prepare_style(style: &Style, platform: Platform) -> Style {
    let mut entries: IndexMap<String, Entry> = IndexMap::default();
    let mut needs_font_family = false;

    for (name, entry) in style.entries() {
        let value = match entry {
            Entry::Value(value) | Entry::Hidden(value) => value.clone(),
            Entry::Deferred => match style.get(name) {
                Some(value) => value,
                None => continue,
            },
        };

        if name == "fontWeight"
            && platform.requires_explicit_font_family()
            && !style.contains_key("fontFamily")
        {
            needs_font_family = true;
        }

        let entry = match value {
            StyleValue::Style(nested) => {
                let nested = StyleValue::Style(prepare_style(&nested, platform));
                if ENUMERABLE_NESTED.contains(&name) {
                    Entry::Value(nested)
                } else {
                    Entry::Hidden(nested)
                }
            }
            StyleValue::List(values) => Entry::Value(StyleValue::List(
                values.iter().map(|value| prepare_value(value, platform)).collect(),
            )),
            scalar => Entry::Value(scalar),
        };
        entries.insert(name.to_owned(), entry);
    }

    if needs_font_family {
        entries.insert(
            "fontFamily".to_owned(),
            Entry::Value(StyleValue::String(String::new())),
        );
    }

    merge_styles([Style::from_entries(entries, Vec::new())])
}

fn prepare_value(value: &StyleValue, platform: Platform) -> StyleValue {
    match value {
        StyleValue::Style(nested) => StyleValue::Style(prepare_style(nested, platform)),
        other => other.clone(),
    }
}
