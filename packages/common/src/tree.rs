use crate::error::TreeError;
use crate::result::TreeResult;
use serde::{Deserialize, Serialize};

/// Name of the synthetic element holding a list of top-level nodes
pub const FRAGMENT_NAME: &str = "#document-fragment";

/// A single `name="value"` pair, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Markup tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Element with ordered attributes and children
    Element {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attributes: Vec<Attribute>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Node>,
    },

    /// Raw text
    Text { content: String },
}

/// Borrowed view of an element's parts
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    pub name: &'a str,
    pub attributes: &'a [Attribute],
    pub children: &'a [Node],
}

impl Node {
    pub fn element(name: impl Into<String>) -> Self {
        Node::Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Root element wrapping a list of top-level nodes.
    pub fn fragment(children: Vec<Node>) -> Self {
        Node::element(FRAGMENT_NAME).with_children(children)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.push(Attribute::new(name, value));
        }
        self
    }

    pub fn with_attributes(mut self, new_attributes: Vec<Attribute>) -> Self {
        if let Node::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.extend(new_attributes);
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Node::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<Node>) -> Self {
        if let Node::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element { .. })
    }

    pub fn is_fragment(&self) -> bool {
        self.name() == Some(FRAGMENT_NAME)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            Node::Text { .. } => None,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Node::Element { attributes, .. } => attributes,
            Node::Text { .. } => &[],
        }
    }

    /// First attribute with the given name (case-insensitive).
    pub fn attr(&self, name: &str) -> Option<&str> {
        find_attribute(self.attributes(), name)
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            Node::Text { .. } => &[],
        }
    }

    /// Element parts, or an error for text nodes.
    pub fn as_element(&self) -> TreeResult<ElementRef<'_>> {
        match self {
            Node::Element {
                name,
                attributes,
                children,
            } => Ok(ElementRef {
                name,
                attributes,
                children,
            }),
            Node::Text { content } => Err(TreeError::not_an_element(content)),
        }
    }

    /// Append a child. Text nodes are left untouched.
    pub fn push_child(&mut self, child: Node) {
        if let Node::Element { children, .. } = self {
            children.push(child);
        }
    }

    /// Append text, merging it into a trailing text child.
    pub fn push_text(&mut self, text: &str) {
        if let Node::Element { children, .. } = self {
            match children.last_mut() {
                Some(Node::Text { content }) => content.push_str(text),
                _ => children.push(Node::text(text)),
            }
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Node::Text { content } => out.push_str(content),
                Node::Element { children, .. } => pending.extend(children.iter().rev()),
            }
        }
        out
    }

    /// Detach the children of an element. Text nodes have none.
    pub fn into_children(mut self) -> Vec<Node> {
        match &mut self {
            Node::Element { children, .. } => std::mem::take(children),
            Node::Text { .. } => Vec::new(),
        }
    }
}

// Descendants are dropped from a heap stack, not one stack frame per level.
impl Drop for Node {
    fn drop(&mut self) {
        let Node::Element { children, .. } = self else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut node) = pending.pop() {
            if let Node::Element { children, .. } = &mut node {
                pending.append(children);
            }
        }
    }
}

/// First attribute with the given name (case-insensitive).
pub fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name.eq_ignore_ascii_case(name))
        .map(|attr| attr.value.as_str())
}
