//! Convenience helpers for styles and ref callbacks on visitor nodes.

use std::any::Any;
use std::rc::Rc;

use arbor_style::{Style, merge_styles};

use crate::element::RefCallback;
use crate::error::VisitorResult;
use crate::visitor::Visitor;

/// Merge `styles` after `target`'s current style and store the result as its style.
///
/// Returns `Ok(None)` when there is no target, otherwise the new style.
///
/// ```
/// use arbor_style::style;
/// use arbor_visitor::{Element, append_styles, wrap_visitor};
///
/// let wrapper = wrap_visitor();
/// let root = wrapper
///     .wrap(Element::builder("View").style(style! { flex: 1 }).build())
///     .unwrap();
/// let merged = append_styles(Some(&root), [style! { margin: 4 }]).unwrap();
/// assert_eq!(merged, Some(style! { flex: 1, margin: 4 }));
/// assert_eq!(root.style(), merged);
/// ```
pub fn append_styles<I>(target: Option<&Visitor>, styles: I) -> VisitorResult<Option<Style>>
where
    I: IntoIterator,
    I::Item: Into<Option<Style>>,
{
    let Some(target) = target else {
        return Ok(None);
    };
    let merged = merge_after(target.style(), styles);
    target.set_style(Some(merged.clone()))?;
    tracing::debug!(node_type = target.node_type(), "styles appended");
    Ok(Some(merged))
}

/// Like [`append_styles`], for the content container style of scrolling nodes.
pub fn append_content_container_styles<I>(target: Option<&Visitor>, styles: I) -> VisitorResult<Option<Style>>
where
    I: IntoIterator,
    I::Item: Into<Option<Style>>,
{
    let Some(target) = target else {
        return Ok(None);
    };
    let current = target.props().content_container_style.clone();
    let merged = merge_after(current, styles);
    target.props_mut()?.content_container_style = Some(merged.clone());
    tracing::debug!(node_type = target.node_type(), "content container styles appended");
    Ok(Some(merged))
}

fn merge_after<I>(current: Option<Style>, styles: I) -> Style
where
    I: IntoIterator,
    I::Item: Into<Option<Style>>,
{
    merge_styles(std::iter::once(current).chain(styles.into_iter().map(Into::into)))
}

/// Chain `handler` in front of `target`'s ref callback.
///
/// When the host resolves the reference, `handler` runs first, then the callback that
/// was installed before, both with the same value.
pub fn append_ref_handler(
    target: &Visitor,
    handler: impl Fn(Option<&(dyn Any + 'static)>) + 'static,
) -> VisitorResult<()> {
    let previous = target.node().ref_callback();
    let chained: RefCallback = Rc::new(move |value: Option<&(dyn Any + 'static)>| {
        handler(value);
        if let Some(previous) = &previous {
            previous(value);
        }
    });
    target.node().set_ref_callback(Some(chained))?;
    tracing::debug!(node_type = target.node_type(), "ref handler appended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use arbor_style::style;

    use super::*;
    use crate::element::Element;
    use crate::wrapper::VisitorRegistry;

    fn wrap(element: Element) -> Visitor {
        VisitorRegistry::new().wrapper().wrap(element).expect("element wraps")
    }

    #[test]
    fn test_append_styles_without_target() {
        assert_eq!(append_styles(None, [style! { flex: 1 }]), Ok(None));
        assert_eq!(append_content_container_styles(None, [style! { flex: 1 }]), Ok(None));
    }

    #[test]
    fn test_append_styles_to_unstyled_node() {
        let node = wrap(Element::builder("View").build());
        let merged = append_styles(Some(&node), [style! { width: 10 }, style! { height: 5 }]).unwrap();
        assert_eq!(merged, Some(style! { width: 10, height: 5 }));
        assert_eq!(node.style(), merged);
    }

    #[test]
    fn test_later_styles_override() {
        let node = wrap(Element::builder("View").style(style! { color: "red", flex: 1 }).build());
        let merged = append_styles(Some(&node), [style! { color: "blue" }]).unwrap().unwrap();
        assert_eq!(merged.get("color"), Some("blue".into()));
        assert_eq!(merged.get("flex"), Some(1.into()));
    }

    #[test]
    fn test_append_content_container_styles() {
        let node = wrap(
            Element::builder("ScrollView")
                .content_container_style(style! { padding: 8 })
                .build(),
        );
        append_content_container_styles(Some(&node), [style! { gap: 2 }]).unwrap();
        assert_eq!(
            node.props().content_container_style,
            Some(style! { padding: 8, gap: 2 })
        );
        assert_eq!(node.style(), None);
    }

    #[test]
    fn test_ref_handlers_run_newest_first() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let log = calls.clone();
        let node = wrap(
            Element::builder("View")
                .ref_callback(move |_| log.borrow_mut().push("original"))
                .build(),
        );

        let log = calls.clone();
        append_ref_handler(&node, move |value| {
            let value = value.and_then(|value| value.downcast_ref::<u32>()).copied();
            assert_eq!(value, Some(7));
            log.borrow_mut().push("appended");
        })
        .unwrap();

        node.node().resolve_ref(Some(&7u32 as &dyn Any));
        assert_eq!(*calls.borrow(), ["appended", "original"]);
    }

    #[test]
    fn test_ref_handler_without_previous_callback() {
        let seen = Rc::new(RefCell::new(0));
        let counter = seen.clone();
        let node = wrap(Element::builder("View").build());
        append_ref_handler(&node, move |_| *counter.borrow_mut() += 1).unwrap();
        node.node().resolve_ref(None);
        assert_eq!(*seen.borrow(), 1);
    }
}
