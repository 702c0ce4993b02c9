//! Page capability interface.
//!
//! The loader never touches a concrete page; it only sees a [`Page`]. The
//! in-memory [`Document`] is the provider shipped with this crate.

mod document;

pub use document::Document;

/// Handle to a node owned by a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Callback fired at most once when an image resource fails to load.
pub type FailureHandler = Box<dyn FnOnce(&mut dyn Page) + Send>;

pub trait Page {
    /// The gallery container, if the page has one.
    fn container(&self) -> Option<NodeId>;

    fn create_element(&mut self, tag: &str) -> NodeId;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Replaces the node's content with plain text. Never parsed as markup.
    fn set_text(&mut self, node: NodeId, text: &str);

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Replaces every child of `node` with `children` in one step.
    fn set_content(&mut self, node: NodeId, children: Vec<NodeId>);

    fn on_load_failure(&mut self, image: NodeId, handler: FailureHandler);
}

/// Creates `<tag class="class">`.
pub fn element(page: &mut dyn Page, tag: &str, class: &str) -> NodeId {
    let node = page.create_element(tag);
    page.set_attribute(node, "class", class);
    node
}

/// Creates `<tag class="class">text</tag>`.
pub fn text_element(page: &mut dyn Page, tag: &str, class: &str, text: &str) -> NodeId {
    let node = element(page, tag, class);
    page.set_text(node, text);
    node
}
