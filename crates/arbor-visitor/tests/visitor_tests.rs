//! Child mutation and key index behaviour of visitor nodes.

use arbor_style::style;
use arbor_visitor::{
    Children, Element, Visitor, VisitorChildren, VisitorError, VisitorRegistry, freeze,
};

fn leaf(key: &str) -> Element {
    Element::builder("Text").key(key).text(key).build()
}

fn wrap(element: &Element) -> Visitor {
    VisitorRegistry::new().wrapper().wrap(element).expect("element wraps")
}

/// A `View` with children keyed `a`, `b` and `c`.
fn abc() -> (Visitor, Visitor, Visitor, Visitor) {
    let root = wrap(
        &Element::builder("View")
            .children([leaf("a"), leaf("b"), leaf("c")])
            .build(),
    );
    let a = root.get("a").expect("a");
    let b = root.get("b").expect("b");
    let c = root.get("c").expect("c");
    (root, a, b, c)
}

fn keys(node: &Visitor) -> Vec<String> {
    node.children()
        .nodes()
        .iter()
        .map(|child| child.key().unwrap_or_default())
        .collect()
}

fn element_keys(node: &Visitor) -> Vec<String> {
    node.props()
        .children
        .as_ref()
        .and_then(Children::nodes)
        .unwrap_or_default()
        .iter()
        .map(|element| element.key().unwrap_or_default())
        .collect()
}

#[test]
fn test_add_child_at_index() {
    let (root, _, _, _) = abc();

    let x = root.add_child_at(leaf("x"), 1).unwrap().expect("inserted");

    assert_eq!(keys(&root), ["a", "x", "b", "c"]);
    assert_eq!(element_keys(&root), ["a", "x", "b", "c"]);
    assert_eq!(root.child_index(&x), Some(1));
    assert_eq!(x.parent(), Some(root.clone()));
    assert!(root.has_child(&x));
}

#[test]
fn test_add_child_clamps_index() {
    let (root, _, _, _) = abc();

    root.add_child_at(leaf("x"), 99).unwrap();
    root.add_child(leaf("y")).unwrap();

    assert_eq!(keys(&root), ["a", "b", "c", "x", "y"]);
}

#[test]
fn test_add_empty_child_is_noop() {
    let (root, _, _, _) = abc();

    assert_eq!(root.add_child(None::<Element>), Ok(None));
    assert_eq!(keys(&root), ["a", "b", "c"]);
}

#[test]
fn test_add_child_to_text_leaf_fails() {
    let node = wrap(&Element::builder("Text").text("hello").build());

    let result = node.add_child(leaf("x"));

    assert!(matches!(result, Err(VisitorError::InvalidOperation { .. })));
    assert_eq!(node.children().as_text(), Some("hello"));
    assert_eq!(node.props().children.as_ref().and_then(Children::as_text), Some("hello"));
}

#[test]
fn test_add_before_and_after() {
    let (root, a, b, c) = abc();

    root.add_child_before(leaf("x"), &a).unwrap();
    root.add_child_after(leaf("y"), &b).unwrap();
    root.add_child_after(leaf("z"), &c).unwrap();

    assert_eq!(keys(&root), ["x", "a", "b", "y", "c", "z"]);
}

#[test]
fn test_add_before_unknown_reference_fails() {
    let (root, _, _, _) = abc();
    let stranger = wrap(&leaf("stranger"));

    let result = root.add_child_before(leaf("x"), &stranger);

    assert!(matches!(result, Err(VisitorError::ReferenceNotFound { .. })));
    assert_eq!(keys(&root), ["a", "b", "c"]);
}

#[test]
fn test_remove_child() {
    let (root, a, b, c) = abc();

    let removed = root.remove_child(&b).unwrap().expect("removed");

    assert_eq!(removed, b);
    assert_eq!(removed.parent(), None);
    assert_eq!(root.children().nodes(), [a, c]);
    assert_eq!(element_keys(&root), ["a", "c"]);
}

#[test]
fn test_remove_missing_child() {
    let (root, _, _, _) = abc();
    let stranger = wrap(&leaf("stranger"));

    assert_eq!(root.remove_child(&stranger), Ok(None));
    assert_eq!(root.remove_child_at(7), Ok(None));
    assert_eq!(keys(&root), ["a", "b", "c"]);
}

#[test]
fn test_remove_self() {
    let (root, a, _, _) = abc();

    assert_eq!(a.remove(), Ok(Some(a.clone())));
    assert_eq!(keys(&root), ["b", "c"]);
    assert_eq!(root.remove(), Ok(None));
}

#[test]
fn test_removing_down_to_one_child_collapses() {
    let (root, a, b, c) = abc();

    root.remove_child(&a).unwrap();
    root.remove_child(&b).unwrap();

    let props = root.props();
    assert!(matches!(&props.children, Some(Children::Single(only)) if only.ptr_eq(c.node())));
}

#[test]
fn test_remove_children() {
    let (root, a, b, c) = abc();

    let removed = root.remove_children().unwrap();

    assert_eq!(removed, [a.clone(), b, c]);
    assert!(root.children().nodes().is_empty());
    assert!(element_keys(&root).is_empty());
    assert_eq!(a.parent(), None);

    let text = wrap(&Element::builder("Text").text("hi").build());
    assert_eq!(text.remove_children(), Ok(Vec::new()));
}

#[test]
fn test_replace() {
    let (root, _, b, _) = abc();

    let x = root.replace(leaf("x"), &b).unwrap().expect("inserted");

    assert_eq!(keys(&root), ["a", "x", "c"]);
    assert_eq!(b.parent(), None);
    assert_eq!(x.parent(), Some(root.clone()));
}

#[test]
fn test_replace_unknown_reference_leaves_tree_untouched() {
    let (root, _, _, _) = abc();
    let stranger = wrap(&leaf("stranger"));

    let result = root.replace(leaf("x"), &stranger);

    assert!(matches!(result, Err(VisitorError::ReferenceNotFound { .. })));
    assert_eq!(keys(&root), ["a", "b", "c"]);
}

#[test]
fn test_move_between_parents() {
    let registry = VisitorRegistry::new();
    let p = registry
        .wrapper()
        .wrap(Element::builder("View").child(leaf("x")).build())
        .expect("p");
    let q = registry.wrapper().wrap(Element::builder("View").build()).expect("q");
    let x = p.get("x").expect("x");

    q.add_child(&x).unwrap();

    assert!(!p.has_child(&x));
    assert!(element_keys(&p).is_empty());
    assert_eq!(x.parent(), Some(q.clone()));
    assert_eq!(q.children().nodes(), [x.clone()]);
    assert!(p.get("x").is_none());
    assert_eq!(q.get("x"), Some(x));
}

#[test]
fn test_move_within_same_parent() {
    let (root, a, _, _) = abc();

    root.add_child(&a).unwrap();

    assert_eq!(keys(&root), ["b", "c", "a"]);
    assert_eq!(root.get("a"), Some(a));
}

#[test]
fn test_inserting_ancestor_fails() {
    let registry = VisitorRegistry::new();
    let root = registry
        .wrapper()
        .wrap(
            Element::builder("View")
                .child(Element::builder("View").key("inner").build())
                .build(),
        )
        .expect("root");
    let inner = root.get("inner").expect("inner");

    assert!(matches!(inner.add_child(&root), Err(VisitorError::WouldCycle { .. })));
    assert!(matches!(inner.add_child(&inner), Err(VisitorError::WouldCycle { .. })));
    assert_eq!(inner.parent(), Some(root));
}

#[test]
fn test_key_lookup_reaches_descendants() {
    let root = wrap(
        &Element::builder("View")
            .child(
                Element::builder("View")
                    .child(Element::builder("Text").key("title").text("Hi").build())
                    .build(),
            )
            .build(),
    );

    let title = root.get("title").expect("title");

    assert_eq!(root.key_dict().get("title"), Some(&title));
    assert_eq!(title.children().as_text(), Some("Hi"));
    assert_eq!(title.node_type(), "Text");
    assert!(root.get("missing").is_none());
}

#[test]
fn test_key_index_follows_edits() {
    let (root, _, b, _) = abc();
    let subtree = Element::builder("View")
        .key("panel")
        .child(leaf("deep"))
        .build();

    let panel = root.add_child(subtree).unwrap().expect("panel");
    let deep = panel.get("deep").expect("deep");
    assert_eq!(root.get("deep"), Some(deep));

    root.remove_child(&panel).unwrap();
    assert!(root.get("deep").is_none());
    assert!(root.get("panel").is_none());
    assert!(panel.get("deep").is_some());

    root.remove_child(&b).unwrap();
    assert!(root.get("b").is_none());
}

#[test]
fn test_set_children_reparents() {
    let (root, a, b, c) = abc();
    let other = wrap(&Element::builder("View").child(leaf("x")).build());
    let x = other.get("x").expect("x");

    root.set_children(VisitorChildren::Nodes(vec![c.clone(), x.clone()])).unwrap();

    assert_eq!(keys(&root), ["c", "x"]);
    assert_eq!(element_keys(&root), ["c", "x"]);
    assert_eq!(x.parent(), Some(root.clone()));
    assert!(!other.has_child(&x));
    assert_eq!(a.parent(), None);
    assert_eq!(b.parent(), None);
    assert!(root.get("a").is_none());
    assert_eq!(root.get("x"), Some(x));
}

#[test]
fn test_set_children_to_text() {
    let (root, a, _, _) = abc();

    root.set_children(VisitorChildren::Text("done".into())).unwrap();

    assert_eq!(root.children().as_text(), Some("done"));
    assert_eq!(a.parent(), None);
    assert!(matches!(root.add_child(leaf("x")), Err(VisitorError::InvalidOperation { .. })));
}

#[test]
fn test_style_and_key_write_through() {
    let root = wrap(&Element::builder("View").key("old").style(style! { flex: 1 }).build());

    root.set_style(Some(style! { flex: 2 })).unwrap();
    root.set_key(Some("new".into())).unwrap();

    assert_eq!(root.node().props().style.style(), Some(&style! { flex: 2 }));
    assert_eq!(root.node().key().as_deref(), Some("new"));
}

#[test]
fn test_frozen_elements_reject_writes() {
    freeze::set_enforced(true);

    let frozen = Element::builder("View").build();
    let registry = VisitorRegistry::new();
    let wrapper = registry.wrapper();
    let editable = Element::builder("View").build();
    let editable = wrapper.wrap(&editable).expect("editable");
    let frozen = registry.wrapper().wrap(&frozen).expect("frozen");

    let refused = frozen.add_child(Element::builder("Text").text("x").build());
    let accepted = editable.add_child(Element::builder("Text").text("x").build());
    let restyled = frozen.set_style(Some(style! { flex: 1 }));

    freeze::set_enforced(false);

    assert!(matches!(refused, Err(VisitorError::Frozen { .. })));
    assert!(matches!(restyled, Err(VisitorError::Frozen { .. })));
    assert!(accepted.is_ok());
    assert!(frozen.children().nodes().is_empty());
    assert_eq!(editable.children().nodes().len(), 1);
}
