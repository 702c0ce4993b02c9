use std::collections::BTreeMap;

use askama::Template;
use askama_escape::{escape, Html};
use tracing::{debug, trace, warn};

use super::{FailureHandler, NodeId, Page};
use crate::error::GalleryError;

const VOID_TAGS: &[&str] = &["img", "br", "hr", "meta", "input"];

struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_owned(),
            attributes: vec![],
            text: None,
            children: vec![],
            parent: None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    body: &'a str,
}

/// In-memory page: an arena of elements under a `body` root that holds the
/// gallery container.
///
/// Ids handed out by another document are ignored by every mutation and
/// yield `None` from the queries.
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
    container_id: String,
    handlers: BTreeMap<NodeId, FailureHandler>,
}

impl Document {
    pub fn new(container_id: &str) -> Self {
        let mut doc = Document::empty();
        let container = doc.create_element("div");
        doc.set_attribute(container, "id", container_id);
        doc.append_child(doc.root, container);
        doc.container_id = container_id.to_owned();
        doc
    }

    /// A page with no container at all.
    pub fn empty() -> Self {
        Document {
            nodes: vec![Element::new("body")],
            root: NodeId(0),
            container_id: String::new(),
            handlers: BTreeMap::new(),
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|e| e.tag.as_str())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node.0)?.attribute(name)
    }

    pub fn text_of(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0)?.text.as_deref()
    }

    pub fn children(&self, node: NodeId) -> Option<&[NodeId]> {
        self.nodes.get(node.0).map(|e| e.children.as_slice())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.attribute(node, "style")
            .map(|s| s.contains("display: none"))
            .unwrap_or(false)
    }

    /// Attached nodes carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    /// Attached images whose failure handler has not fired yet, with their `src`.
    pub fn pending_images(&self) -> Vec<(NodeId, String)> {
        self.handlers
            .keys()
            .filter(|n| self.is_attached(**n))
            .map(|n| (*n, self.attribute(*n, "src").unwrap_or("").to_owned()))
            .collect()
    }

    /// The image loaded; its fallback will never be needed.
    pub fn image_loaded(&mut self, image: NodeId) {
        self.handlers.remove(&image);
    }

    /// Fires the image's failure handler. Returns false when none was pending.
    pub fn image_failed(&mut self, image: NodeId) -> bool {
        match self.handlers.remove(&image) {
            Some(handler) => {
                debug!(node = image.0, "running image failure handler");
                handler(self);
                true
            }
            None => false,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(&mut out, self.root);
        out
    }

    pub fn render_page(&self, title: &str) -> Result<String, GalleryError> {
        let body = self.to_html();
        let page = PageTemplate { title, body: &body }.render()?;
        Ok(page)
    }

    fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    fn kids(&self, node: NodeId) -> &[NodeId] {
        self.children(node).unwrap_or(&[])
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut stack: Vec<NodeId> = self.kids(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.kids(next).iter().rev().copied());
        }
        out
    }

    /// Walks `node` and its ancestors up to the root. Terminates because
    /// `append_child` never links a node below its own descendant.
    fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.nodes.get(n.0).and_then(|e| e.parent);
        }
        false
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.is_descendant_of(node, self.root)
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != child);
        }
    }

    fn replace_children(&mut self, node: NodeId, children: Vec<NodeId>) {
        let previous = std::mem::take(&mut self.nodes[node.0].children);
        for old in &previous {
            self.nodes[old.0].parent = None;
        }
        for child in children {
            self.append_child(node, child);
        }

        // images under the removed subtrees can no longer fail visibly
        for old in previous {
            if self.is_attached(old) {
                continue;
            }
            let mut stale = self.descendants(old);
            stale.push(old);
            for n in stale {
                if self.handlers.remove(&n).is_some() {
                    trace!(node = n.0, "dropped handler of detached image");
                }
            }
        }
    }

    fn write_node(&self, out: &mut String, node: NodeId) {
        let element = &self.nodes[node.0];
        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape(value, Html)));
        }
        out.push('>');
        if VOID_TAGS.contains(&element.tag.as_str()) {
            return;
        }
        if let Some(text) = &element.text {
            out.push_str(&escape(text, Html).to_string());
        }
        for child in &element.children {
            self.write_node(out, *child);
        }
        out.push_str(&format!("</{}>", element.tag));
    }
}

impl Page for Document {
    fn container(&self) -> Option<NodeId> {
        if self.container_id.is_empty() {
            return None;
        }
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.attribute(*n, "id") == Some(self.container_id.as_str()))
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.nodes.get_mut(node.0) else {
            warn!(node = node.0, "set_attribute on unknown node");
            return;
        };
        match element.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(attr) => attr.1 = value.to_owned(),
            None => element.attributes.push((name.to_owned(), value.to_owned())),
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if !self.contains(node) {
            warn!(node = node.0, "set_text on unknown node");
            return;
        }
        self.replace_children(node, vec![]);
        self.nodes[node.0].text = Some(text.to_owned());
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            warn!(parent = parent.0, child = child.0, "append_child on unknown node");
            return;
        }
        if self.is_descendant_of(parent, child) {
            warn!(parent = parent.0, child = child.0, "refusing to append a node below itself");
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn set_content(&mut self, node: NodeId, children: Vec<NodeId>) {
        if !self.contains(node) {
            warn!(node = node.0, "set_content on unknown node");
            return;
        }
        self.replace_children(node, children);
        self.nodes[node.0].text = None;
    }

    fn on_load_failure(&mut self, image: NodeId, handler: FailureHandler) {
        if !self.contains(image) {
            warn!(node = image.0, "on_load_failure on unknown node");
            return;
        }
        self.handlers.insert(image, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::text_element;

    #[test]
    fn new_document_has_container() {
        let doc = Document::new("gallery-container");
        let container = doc.container().unwrap();
        assert_eq!(doc.attribute(container, "id"), Some("gallery-container"));
        assert!(Document::empty().container().is_none());
    }

    #[test]
    fn set_content_detaches_previous_children() {
        let mut doc = Document::new("c");
        let container = doc.container().unwrap();
        let first = text_element(&mut doc, "div", "old", "first");
        doc.set_content(container, vec![first]);
        let second = text_element(&mut doc, "div", "new", "second");
        doc.set_content(container, vec![second]);

        assert_eq!(doc.children(container), Some(&[second][..]));
        assert!(doc.find_by_class("old").is_empty());
        assert_eq!(doc.find_by_class("new"), vec![second]);
    }

    #[test]
    fn handlers_of_detached_images_are_dropped() {
        let mut doc = Document::new("c");
        let container = doc.container().unwrap();
        let img = doc.create_element("img");
        doc.set_attribute(img, "src", "/a.png");
        doc.on_load_failure(img, Box::new(|_: &mut dyn Page| {}));
        doc.set_content(container, vec![img]);
        assert_eq!(doc.pending_images(), vec![(img, "/a.png".to_owned())]);

        doc.set_content(container, vec![]);
        assert!(doc.pending_images().is_empty());
        assert!(!doc.image_failed(img));
    }

    #[test]
    fn failure_handler_fires_once() {
        let mut doc = Document::new("c");
        let container = doc.container().unwrap();
        let img = doc.create_element("img");
        doc.set_content(container, vec![img]);
        doc.on_load_failure(
            img,
            Box::new(move |page: &mut dyn Page| page.set_attribute(img, "style", "display: none")),
        );

        assert!(doc.image_failed(img));
        assert!(doc.is_hidden(img));
        assert!(!doc.image_failed(img));
    }

    #[test]
    fn loaded_image_discards_handler() {
        let mut doc = Document::new("c");
        let container = doc.container().unwrap();
        let img = doc.create_element("img");
        doc.set_content(container, vec![img]);
        doc.on_load_failure(img, Box::new(|_: &mut dyn Page| panic!("must not run")));

        doc.image_loaded(img);
        assert!(!doc.image_failed(img));
    }

    #[test]
    fn html_escapes_text_and_attributes() {
        let mut doc = Document::new("c");
        let container = doc.container().unwrap();
        let node = text_element(&mut doc, "div", "error", "<script>\"x\" & y</script>");
        let img = doc.create_element("img");
        doc.set_attribute(img, "alt", "a\"b");
        doc.set_content(container, vec![node, img]);

        assert_eq!(
            doc.to_html(),
            "<body><div id=\"c\"><div class=\"error\">&lt;script&gt;&quot;x&quot; &amp; y&lt;/script&gt;</div><img alt=\"a&quot;b\"></div></body>"
        );
    }

    #[test]
    fn render_page_wraps_body() {
        let doc = Document::new("c");
        let page = doc.render_page("Cats & <Dogs>").unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Cats &amp; &lt;Dogs&gt;</title>"));
        assert!(page.contains("<body><div id=\"c\"></div></body>"));
    }

    #[test]
    fn appending_an_ancestor_is_refused() {
        let mut doc = Document::new("c");
        let container = doc.container().unwrap();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner);
        doc.set_content(container, vec![outer]);

        doc.append_child(inner, outer);
        doc.append_child(inner, inner);

        assert_eq!(doc.children(inner), Some(&[][..]));
        assert_eq!(doc.children(container), Some(&[outer][..]));
        assert_eq!(doc.find_by_class("missing"), vec![]);
        assert_eq!(doc.to_html(), "<body><div id=\"c\"><div><div></div></div></div></body>");
    }

    #[test]
    fn foreign_node_ids_are_ignored() {
        let mut big = Document::new("c");
        for _ in 0..5 {
            big.create_element("span");
        }
        let foreign = big.create_element("img");

        let mut doc = Document::new("c");
        let container = doc.container().unwrap();
        assert_eq!(doc.tag(foreign), None);
        assert_eq!(doc.children(foreign), None);
        assert_eq!(doc.attribute(foreign, "src"), None);
        assert_eq!(doc.text_of(foreign), None);

        doc.set_attribute(foreign, "src", "/a.png");
        doc.set_text(foreign, "x");
        doc.append_child(container, foreign);
        doc.set_content(foreign, vec![container]);
        doc.on_load_failure(foreign, Box::new(|_: &mut dyn Page| {}));

        assert_eq!(doc.children(container), Some(&[][..]));
        assert_eq!(doc.tag(container), Some("div"));
        assert!(doc.pending_images().is_empty());
        assert!(!doc.image_failed(foreign));
    }
}
