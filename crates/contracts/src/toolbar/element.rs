use serde::{Deserialize, Serialize};

/// A single markup node: tag name plus the attributes selectors can test.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Lowercase tag name (e.g., "ul")
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

impl NodeInfo {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Effective element of a selection, as produced by the editing core.
///
/// `ancestors` lists the element's own ancestors nearest first and stops
/// before the editable root, so ancestor tests never escape the editable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementInfo {
    #[serde(flatten)]
    pub node: NodeInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<NodeInfo>,
}

impl ElementInfo {
    pub fn new(tag: &str) -> Self {
        Self {
            node: NodeInfo::new(tag),
            ancestors: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.node = self.node.with_id(id);
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.node = self.node.with_class(class);
        self
    }

    /// Adds the next ancestor outward from the element.
    pub fn within(mut self, ancestor: NodeInfo) -> Self {
        self.ancestors.push(ancestor);
        self
    }

    pub fn tag(&self) -> &str {
        &self.node.tag
    }

    /// The element followed by its ancestors, innermost first.
    pub fn chain(&self) -> impl Iterator<Item = &NodeInfo> {
        std::iter::once(&self.node).chain(self.ancestors.iter())
    }
}
