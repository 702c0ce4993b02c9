use crate::dom::NodeId;
use crate::model::FilePath;

/// One rendered tile: the item node, its image and the name label.
///
/// Only valid for the render pass that produced it; the next `load()`
/// detaches these nodes from the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItemView {
    pub(crate) path: FilePath,
    pub(crate) name: String,
    pub(crate) src: String,
    pub(crate) node: NodeId,
    pub(crate) image: NodeId,
    pub(crate) label: NodeId,
}

impl GalleryItemView {
    pub fn path(&self) -> &FilePath {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn image(&self) -> NodeId {
        self.image
    }

    pub fn label(&self) -> NodeId {
        self.label
    }
}
