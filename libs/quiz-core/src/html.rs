//! Minimal owned HTML tree.
//!
//! The parser pipeline restructures question fragments by moving, wrapping and
//! unwrapping nodes here instead of splicing serialized HTML strings.

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text is kept apart from their neighbours in
/// [`Element::block_text`].
const BLOCK_ELEMENTS: &[&str] = &[
    "blockquote", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ol", "p", "pre", "ul",
];

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Pre-rendered HTML passed through verbatim (inline HTML in markdown).
    Raw(String),
}

/// An element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Concatenated text of all descendants. Line breaks count as newlines.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Text content with a space between nested block elements, so a
    /// sub-list reads `a sub` rather than `asub`.
    pub fn block_text(&self) -> String {
        let mut out = String::new();
        collect_block_text(&self.children, &mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Whether this node is an element with the given tag.
    pub fn is_element(&self, tag: &str) -> bool {
        self.as_element().map_or(false, |el| el.is(tag))
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(std::slice::from_ref(self), &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Element(el) => el.write_html(out),
            Self::Text(text) => out.push_str(&escape_text(text)),
            Self::Raw(html) => out.push_str(html),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.is("br") => out.push('\n'),
            Node::Element(el) => collect_text(&el.children, out),
            Node::Raw(_) => {}
        }
    }
}

fn collect_block_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.tag.as_str()) => {
                if out.chars().last().is_some_and(|c| !c.is_whitespace()) {
                    out.push(' ');
                }
                collect_block_text(&el.children, out);
            }
            Node::Element(el) if el.is("br") => out.push('\n'),
            Node::Element(el) => collect_block_text(&el.children, out),
            Node::Text(text) => out.push_str(text),
            Node::Raw(_) => {}
        }
    }
}

/// Serialize a sequence of sibling nodes.
pub fn render(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Visit every element in document order (pre-order).
pub fn visit_elements_mut<F>(nodes: &mut [Node], f: &mut F)
where
    F: FnMut(&mut Element),
{
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            f(el);
            visit_elements_mut(&mut el.children, f);
        }
    }
}

/// Wrap every `code` element that is not already inside a `pre` in a new `pre`.
pub fn wrap_bare_code(nodes: &mut [Node]) {
    wrap_bare_code_inner(nodes, false);
}

fn wrap_bare_code_inner(nodes: &mut [Node], inside_pre: bool) {
    for node in nodes.iter_mut() {
        if !inside_pre && node.is_element("code") {
            let code = std::mem::replace(node, Node::Text(String::new()));
            *node = Element::new("pre").with_children(vec![code]).into();
        } else if let Node::Element(el) = node {
            let in_pre = inside_pre || el.is("pre");
            wrap_bare_code_inner(&mut el.children, in_pre);
        }
    }
}

/// Replace every element with the given tag by its children, at any depth.
pub fn unwrap_tag(nodes: Vec<Node>, tag: &str) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(mut el) => {
                let children = unwrap_tag(std::mem::take(&mut el.children), tag);
                if el.is(tag) {
                    out.extend(children);
                } else {
                    el.children = children;
                    out.push(Node::Element(el));
                }
            }
            other => out.push(other),
        }
    }
    out
}
