//! Builds a [`ViewDocument`] from HTML markup and serializes it back.
//!
//! Only elements are kept; text nodes are outside the converter's concern.
//! The inline `style` attribute is split into declarations and stored
//! through the document's style processor; `class` becomes the class set.

use ego_tree::NodeRef;
use scraper::{Html, Node};
use tracing::debug;

use super::{ViewDocument, ViewElementId};
use crate::css::StyleProcessor;
use crate::error::{Error, Result};

/// Parses an HTML fragment into a view document.
pub fn view_from_html(html: &str, processor: StyleProcessor) -> Result<ViewDocument> {
    let fragment = Html::parse_fragment(html);
    let mut view = ViewDocument::new(processor);
    let root = fragment.root_element();
    for child in root.children() {
        convert_node(&mut view, child, None)?;
    }
    if !fragment.errors.is_empty() {
        debug!(errors = fragment.errors.len(), "html fragment parsed with recoverable errors");
    }
    if view.is_empty() && !html.trim().is_empty() {
        return Err(Error::Html("markup contains no elements".to_string()));
    }
    Ok(view)
}

fn convert_node(
    view: &mut ViewDocument,
    node: NodeRef<'_, Node>,
    parent: Option<ViewElementId>,
) -> Result<()> {
    let Node::Element(element) = node.value() else {
        return Ok(());
    };
    let id = view.create_element(element.name(), parent)?;
    for (key, value) in element.attrs() {
        match key {
            "class" => {
                for class in value.split_whitespace() {
                    view.add_class(id, class)?;
                }
            }
            "style" => {
                for (name, value) in split_declarations(value) {
                    view.set_style(id, &name, &value)?;
                }
            }
            _ => view.set_attribute(id, key, value)?,
        }
    }
    for child in node.children() {
        convert_node(view, child, Some(id))?;
    }
    Ok(())
}

/// Splits an inline style attribute into `(name, value)` pairs. Semicolons
/// inside parentheses do not end a declaration.
pub fn split_declarations(style: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut push = |chunk: &str| {
        if let Some((name, value)) = chunk.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if !name.is_empty() && !value.is_empty() {
                declarations.push((name, value.to_string()));
            }
        }
    };
    for ch in style.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ';' if depth == 0 => {
                push(&current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    push(&current);
    declarations
}

/// Serializes the view back to markup. Styles are written as longhands in
/// key order, classes and attributes sorted.
pub fn view_to_html(view: &ViewDocument) -> String {
    let mut out = String::new();
    for root in view.roots() {
        write_element(view, *root, &mut out);
    }
    out
}

fn write_element(view: &ViewDocument, id: ViewElementId, out: &mut String) {
    let Some(element) = view.element(id) else {
        return;
    };
    out.push('<');
    out.push_str(element.name());
    let classes = element.classes().collect::<Vec<_>>();
    if !classes.is_empty() {
        push_attribute(out, "class", &classes.join(" "));
    }
    let style = element
        .styles()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>();
    if !style.is_empty() {
        push_attribute(out, "style", &style.join(";"));
    }
    for (key, value) in element.attributes() {
        push_attribute(out, key, value);
    }
    out.push('>');
    for child in element.children() {
        write_element(view, *child, out);
    }
    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
}

fn push_attribute(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
