//! Style merging and state flattening.

use arbor_core::alloc::IndexMap;
use arbor_core::profiling::profile_function;

use crate::style::{Entry, Style};
use crate::value::StyleValue;

/// Shallow-merge state for one property while walking the layers.
struct Candidate {
    winner: Entry,
    /// Nested styles seen since the last scalar override.
    nested_run: usize,
}

/// Merge styles left to right.
///
/// Missing inputs (`None`) are skipped. Scalar properties of later styles override
/// earlier ones. When several inputs define the same property as a nested style, the
/// merged result resolves that property lazily, merging the nested styles with the
/// same rules the first time it is read.
///
/// ```
/// use arbor_style::{merge_styles, style};
///
/// let merged = merge_styles([style! { a: style! { x: 1 } }, style! { a: style! { y: 2 } }]);
/// assert_eq!(merged.get_style("a"), Some(style! { x: 1, y: 2 }));
/// ```
pub fn merge_styles<I>(styles: I) -> Style
where
    I: IntoIterator,
    I::Item: Into<Option<Style>>,
{
    profile_function!();

    let layers: Vec<Style> = styles.into_iter().filter_map(Into::into).collect();

    let mut candidates: IndexMap<String, Candidate> = IndexMap::default();
    for layer in &layers {
        for (key, entry) in layer.entries() {
            let (winner, nested) = match entry {
                Entry::Hidden(_) => continue,
                Entry::Value(value) => (Entry::Value(value.clone()), value.is_style()),
                Entry::Deferred => (Entry::Deferred, true),
            };

            let candidate = candidates.entry(key.to_owned()).or_insert(Candidate {
                winner: Entry::Deferred,
                nested_run: 0,
            });
            candidate.nested_run = if nested { candidate.nested_run + 1 } else { 0 };
            candidate.winner = winner;
        }
    }

    let entries = candidates
        .into_iter()
        .map(|(key, candidate)| {
            let entry = match candidate.winner {
                Entry::Value(StyleValue::Style(_)) if candidate.nested_run > 1 => Entry::Deferred,
                other => other,
            };
            (key, entry)
        })
        .collect();

    tracing::trace!(layers = layers.len(), "merged styles");
    Style::from_entries(entries, layers)
}

/// Merge a style with its state variants.
///
/// Starting from `style`, every state name that resolves to a nested style is
/// flattened recursively (depth first, against the full state list) and the
/// collected styles are merged with [`merge_styles`]. Empty state names are ignored.
///
/// ```
/// use arbor_style::{cross_merge_styles, style};
///
/// let button = style! { color: "r", hover: style! { color: "b" } };
/// let hovered = cross_merge_styles(Some(&button), &["hover"]);
/// assert_eq!(hovered.get("color").unwrap().as_str(), Some("b"));
///
/// let idle = cross_merge_styles(Some(&button), &[] as &[&str]);
/// assert_eq!(idle.get("color").unwrap().as_str(), Some("r"));
/// ```
pub fn cross_merge_styles<S: AsRef<str>>(style: Option<&Style>, states: &[S]) -> Style {
    let mut layers = Vec::new();
    flatten_style(style, states, &mut layers);
    merge_styles(layers)
}

fn flatten_style<S: AsRef<str>>(style: Option<&Style>, states: &[S], out: &mut Vec<Style>) {
    let Some(style) = style else {
        return;
    };
    out.push(style.clone());

    for state in states {
        let state = state.as_ref();
        if state.is_empty() {
            continue;
        }
        if let Some(sub_style) = style.get_style(state) {
            flatten_style(Some(&sub_style), states, out);
        }
    }
}
