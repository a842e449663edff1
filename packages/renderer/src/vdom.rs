use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Stable identity for keyed reconciliation (block id)
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Text node, escaped on output
    Text { content: String },

    /// Trusted markup produced by the rich text editor
    Html { content: String },

    /// Comment node
    Comment { content: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            key: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn html(content: impl Into<String>) -> Self {
        VNode::Html {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        VNode::Comment {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Append to the `class` attribute
    pub fn with_class(mut self, class: &str) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes
                .entry("class".to_string())
                .and_modify(|existing| {
                    existing.push(' ');
                    existing.push_str(class);
                })
                .or_insert_with(|| class.to_string());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(VNode::text(content))
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if let VNode::Element {
            key: ref mut node_key,
            ..
        } = self
        {
            *node_key = Some(key.into());
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Concatenated text of this subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Text { content } | VNode::Html { content } => out.push_str(content),
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            VNode::Comment { .. } => {}
        }
    }

    /// Depth-first search for the first element with `name="value"`
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<&VNode> {
        if self.attr(name) == Some(value) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_by_attr(name, value))
    }

    /// Every element carrying attribute `name`, in document order
    pub fn find_all_with_attr<'a>(&'a self, name: &str, out: &mut Vec<&'a VNode>) {
        if self.attr(name).is_some() {
            out.push(self);
        }
        for child in self.children() {
            child.find_all_with_attr(name, out);
        }
    }
}

/// One top-level block as rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedBlock {
    pub block_id: String,
    pub node: VNode,
}
