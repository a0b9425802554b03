//! End-to-end use of styles and visitors through the umbrella crate.

use arbor::prelude::*;
use arbor::{Config, Platform};

#[test]
fn test_restyle_wrapped_tree_from_sheet() {
    let sheet = create_style_sheet_with(
        [
            ("row", style! { flexDirection: "row", pressed: style! { opacity: 0.6 } }),
            ("title", style! { fontWeight: "bold", width: 120 }),
        ],
        &Config::for_platform(Platform::Android),
    );

    let wrapper = wrap_visitor();
    let tree = Element::builder("View")
        .key("row")
        .unset_style()
        .child(Element::builder("Text").key("title").text("Inbox").build())
        .build();
    let root = wrapper.wrap(&tree).expect("root");

    let row = sheet.get("row").cloned();
    append_styles(Some(&root), [cross_merge_styles(row.as_ref(), &["pressed"])]).unwrap();
    let title = root.get("title").expect("title");
    append_styles(Some(&title), [filter_text_styles(sheet.get("title"))]).unwrap();

    let root_style = root.style().expect("root style");
    assert_eq!(root_style.get("flexDirection"), Some("row".into()));
    assert_eq!(root_style.get("opacity"), Some(0.6.into()));

    let title_style = title.style().expect("title style");
    assert_eq!(title_style.get("fontWeight"), Some("bold".into()));
    assert_eq!(title_style.get("fontFamily"), Some("".into()));
    assert!(title_style.get("width").is_none());
}

#[test]
fn test_rebuild_list_of_children() {
    let wrapper = wrap_visitor();
    let tree = Element::builder("View")
        .children((0..4).map(|i| Element::builder("Text").key(format!("item-{}", i)).text("x").build()))
        .build();
    let root = wrapper.wrap(&tree).expect("root");

    let removed = root.remove_children().unwrap();
    for child in removed.iter().rev() {
        root.add_child(child).unwrap();
    }

    let order: Vec<_> = root
        .children()
        .nodes()
        .iter()
        .filter_map(|child| child.key())
        .collect();
    assert_eq!(order, ["item-3", "item-2", "item-1", "item-0"]);
    assert_eq!(root.get("item-0"), removed.first().cloned());
}
