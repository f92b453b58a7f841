//! Page surface seam: the handful of DOM operations the helpers need.
//!
//! SYSTEM CONTEXT
//! ==============
//! Alerts, the loading marker, header population, the logout confirm dialog
//! and redirects all go through [`PageSurface`], so the logic above it runs
//! unchanged against the live DOM (`DomSurface`, hydrate builds) or a
//! recording double in tests.

/// Browser navigation.
pub trait Navigator {
    /// Leave the current page for `path`.
    fn navigate(&self, path: &str);
}

/// Opaque handle to a node inserted by [`PageSurface::insert_alert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

pub trait PageSurface: Navigator {
    /// Insert `<div class="{class_name}">{text}</div>` as the first child of
    /// the `.content` container, or of `<body>` when there is none.
    fn insert_alert(&self, class_name: &str, text: &str) -> Option<NodeId>;

    /// Detach a node previously returned by `insert_alert`. Removing a node
    /// that is already gone is a no-op.
    fn remove_node(&self, node: NodeId);

    /// Replace the markup of `#element_id`. Returns `false` if no such
    /// element exists.
    fn set_inner_html(&self, element_id: &str, html: &str) -> bool;

    /// Replace the text of `#element_id`. Returns `false` if no such element
    /// exists.
    fn set_text_content(&self, element_id: &str, text: &str) -> bool;

    /// Show a blocking yes/no dialog.
    fn confirm(&self, message: &str) -> bool;
}

// =============================================================================
// BROWSER
// =============================================================================

#[cfg(feature = "hydrate")]
pub use dom::DomSurface;

#[cfg(feature = "hydrate")]
mod dom {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use wasm_bindgen::JsCast;

    use super::{Navigator, NodeId, PageSurface};

    const ALERT_CONTAINER_SELECTOR: &str = ".content";

    /// The live document. Inserted alert nodes are tracked by id so they can
    /// be removed later without holding `web_sys` types outside this module.
    #[derive(Default)]
    pub struct DomSurface {
        next_id: Cell<u64>,
        nodes: RefCell<HashMap<NodeId, web_sys::Element>>,
    }

    impl DomSurface {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn document() -> Option<web_sys::Document> {
            web_sys::window().and_then(|w| w.document())
        }

        fn element(id: &str) -> Option<web_sys::HtmlElement> {
            Self::document()?
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        }
    }

    impl Navigator for DomSurface {
        fn navigate(&self, path: &str) {
            if let Some(window) = web_sys::window() {
                if window.location().set_href(path).is_err() {
                    log::warn!("navigation to {path} rejected");
                }
            }
        }
    }

    impl PageSurface for DomSurface {
        fn insert_alert(&self, class_name: &str, text: &str) -> Option<NodeId> {
            let doc = Self::document()?;
            let alert = doc.create_element("div").ok()?;
            alert.set_class_name(class_name);
            alert.set_text_content(Some(text));

            let container: web_sys::Element = match doc.query_selector(ALERT_CONTAINER_SELECTOR).ok().flatten() {
                Some(el) => el,
                None => doc.body()?.into(),
            };
            let first = container.first_child();
            container.insert_before(&alert, first.as_ref()).ok()?;

            let id = NodeId(self.next_id.get());
            self.next_id.set(id.0 + 1);
            self.nodes.borrow_mut().insert(id, alert);
            Some(id)
        }

        fn remove_node(&self, node: NodeId) {
            if let Some(el) = self.nodes.borrow_mut().remove(&node) {
                el.remove();
            }
        }

        fn set_inner_html(&self, element_id: &str, html: &str) -> bool {
            match Self::element(element_id) {
                Some(el) => {
                    el.set_inner_html(html);
                    true
                }
                None => false,
            }
        }

        fn set_text_content(&self, element_id: &str, text: &str) -> bool {
            match Self::element(element_id) {
                Some(el) => {
                    el.set_text_content(Some(text));
                    true
                }
                None => false,
            }
        }

        fn confirm(&self, message: &str) -> bool {
            web_sys::window()
                .and_then(|w| w.confirm_with_message(message).ok())
                .unwrap_or(false)
        }
    }
}
