//! A small structured view tree, serializable to HTML or indented text.

use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element {
        tag: &'static str,
        class: Option<&'static str>,
        attrs: Vec<(&'static str, String)>,
        children: Vec<Node>,
    },
    Text(String),
}

impl Node {
    pub fn element(tag: &'static str) -> Self {
        Node::Element {
            tag,
            class: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn class(mut self, name: &'static str) -> Self {
        if let Node::Element { class, .. } = &mut self {
            *class = Some(name);
        }
        self
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        if let Node::Element { attrs, .. } = &mut self {
            attrs.push((key, value.into()));
        }
        self
    }

    pub fn child(mut self, node: Node) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    /// Element with a single text child, e.g. `<p>text</p>`.
    pub fn with_text(tag: &'static str, text: impl Into<String>) -> Self {
        Node::element(tag).child(Node::text(text))
    }

    /// Value of an attribute, for elements that carry it.
    pub fn attr_value(&self, key: &str) -> Option<&str> {
        match self {
            Node::Element { attrs, .. } => {
                attrs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
            }
            Node::Text(_) => None,
        }
    }

    pub fn child_nodes(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            Node::Text(_) => &[],
        }
    }

    /// Depth-first search for every element with class `name`.
    pub fn find_by_class<'a>(&'a self, name: &str, out: &mut Vec<&'a Node>) {
        if matches!(self, Node::Element { class: Some(c), .. } if *c == name) {
            out.push(self);
        }
        for child in self.child_nodes() {
            child.find_by_class(name, out);
        }
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Element { children, .. } => {
                children.iter().map(Node::text_content).collect::<Vec<_>>().join(" ")
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&html_escape::encode_text(t)),
            Node::Element { tag, class, attrs, children } => {
                out.push('<');
                out.push_str(tag);
                if let Some(c) = class {
                    let _ = write!(out, " class=\"{c}\"");
                }
                for (k, v) in attrs {
                    let value = html_escape::encode_double_quoted_attribute(v);
                    let _ = write!(out, " {k}=\"{value}\"");
                }
                out.push('>');

                if is_void(tag) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    /// Plain-text rendering for terminals: one line per text-bearing element.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            Node::Element { tag, children, .. } if *tag != "img" => {
                for child in children {
                    child.write_text(0, &mut out);
                }
            }
            _ => self.write_text(0, &mut out),
        }
        out
    }

    fn write_text(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self {
            Node::Text(t) => {
                let _ = writeln!(out, "{indent}{t}");
            }
            Node::Element { tag: "img", attrs, .. } => {
                let src = attrs.iter().find(|(k, _)| *k == "src").map(|(_, v)| v.as_str());
                if let Some(src) = src {
                    let _ = writeln!(out, "{indent}[{src}]");
                }
            }
            Node::Element { children, .. } => {
                let only_text = children.iter().all(|c| matches!(c, Node::Text(_)));
                if only_text && !children.is_empty() {
                    let line = children
                        .iter()
                        .map(Node::text_content)
                        .collect::<Vec<_>>()
                        .join(" ");
                    let _ = writeln!(out, "{indent}{line}");
                } else {
                    for child in children {
                        child.write_text(depth + 1, out);
                    }
                }
            }
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr")
}
