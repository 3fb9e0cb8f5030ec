//! Presentation tree: elements with longhand styles, classes and raw
//! attributes.

pub mod html;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conversion::ViewMutation;
use crate::css::{self, StyleProcessor, StyleValue};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewElementId(usize);

impl ViewElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ViewElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewElement {
    id: ViewElementId,
    name: String,
    #[serde(default)]
    styles: BTreeMap<String, String>,
    #[serde(default)]
    classes: BTreeSet<String>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<ViewElementId>,
    #[serde(default)]
    children: Vec<ViewElementId>,
}

impl ViewElement {
    pub fn id(&self) -> ViewElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn parent(&self) -> Option<ViewElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewElementId] {
        &self.children
    }

    /// Raw longhand value.
    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    /// CSS text for `name`, rebuilt from longhands for box styles.
    pub fn style_text(&self, name: &str) -> Option<String> {
        self.normalized_style(name)
            .map(|value| value.to_css_string())
            .filter(|text| !text.is_empty())
    }

    /// True when the style itself or any of its longhands is set.
    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(name)
            || css::longhands_of(name)
                .iter()
                .any(|longhand| self.styles.contains_key(longhand))
    }

    pub fn normalized_style(&self, name: &str) -> Option<StyleValue> {
        css::normalized_style(&self.styles, name)
    }

    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.styles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Raw attributes in key order. `class` and `style` are not included.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Arena of view elements with the style processor used to store styles.
#[derive(Debug, Clone, Default)]
pub struct ViewDocument {
    elements: Vec<ViewElement>,
    roots: Vec<ViewElementId>,
    processor: StyleProcessor,
}

impl ViewDocument {
    pub fn new(processor: StyleProcessor) -> Self {
        Self {
            elements: Vec::new(),
            roots: Vec::new(),
            processor,
        }
    }

    pub fn processor(&self) -> &StyleProcessor {
        &self.processor
    }

    pub fn roots(&self) -> &[ViewElementId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn create_element(
        &mut self,
        name: impl Into<String>,
        parent: Option<ViewElementId>,
    ) -> Result<ViewElementId> {
        let id = ViewElementId(self.elements.len());
        match parent {
            Some(parent) => self.get_mut(parent)?.children.push(id),
            None => self.roots.push(id),
        }
        self.elements.push(ViewElement {
            id,
            name: name.into().to_ascii_lowercase(),
            styles: BTreeMap::new(),
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            parent,
            children: Vec::new(),
        });
        Ok(id)
    }

    pub fn element(&self, id: ViewElementId) -> Option<&ViewElement> {
        self.elements.get(id.0)
    }

    pub fn get(&self, id: ViewElementId) -> Result<&ViewElement> {
        self.element(id).ok_or(Error::UnknownViewElement(id))
    }

    fn get_mut(&mut self, id: ViewElementId) -> Result<&mut ViewElement> {
        self.elements
            .get_mut(id.0)
            .ok_or(Error::UnknownViewElement(id))
    }

    pub fn elements(&self) -> impl Iterator<Item = &ViewElement> {
        self.elements.iter()
    }

    /// Elements in post-order: children before their parent, siblings in
    /// document order.
    pub fn post_order(&self) -> Vec<ViewElementId> {
        fn visit(doc: &ViewDocument, id: ViewElementId, out: &mut Vec<ViewElementId>) {
            if let Some(element) = doc.element(id) {
                for child in &element.children {
                    visit(doc, *child, out);
                }
                out.push(id);
            }
        }
        let mut out = Vec::with_capacity(self.elements.len());
        for root in &self.roots {
            visit(self, *root, &mut out);
        }
        out
    }

    /// Sets a style, expanding shorthands of the enabled families.
    pub fn set_style(&mut self, id: ViewElementId, name: &str, value: &str) -> Result<()> {
        let expanded = self.processor.expand(name, value);
        let element = self.get_mut(id)?;
        for (key, value) in expanded {
            element.styles.insert(key, value);
        }
        Ok(())
    }

    /// Removes a style together with all its longhands.
    pub fn remove_style(&mut self, id: ViewElementId, name: &str) -> Result<()> {
        let element = self.get_mut(id)?;
        element.styles.remove(name);
        for longhand in css::longhands_of(name) {
            element.styles.remove(&longhand);
        }
        Ok(())
    }

    pub fn add_class(&mut self, id: ViewElementId, class: &str) -> Result<()> {
        self.get_mut(id)?.classes.insert(class.to_string());
        Ok(())
    }

    pub fn remove_class(&mut self, id: ViewElementId, class: &str) -> Result<()> {
        self.get_mut(id)?.classes.remove(class);
        Ok(())
    }

    pub fn set_attribute(&mut self, id: ViewElementId, key: &str, value: &str) -> Result<()> {
        self.get_mut(id)?
            .attributes
            .insert(key.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: ViewElementId, key: &str) -> Result<()> {
        self.get_mut(id)?.attributes.remove(key);
        Ok(())
    }

    pub fn apply(&mut self, mutation: &ViewMutation) -> Result<()> {
        match mutation {
            ViewMutation::AddClass { element, class } => self.add_class(*element, class),
            ViewMutation::RemoveClass { element, class } => self.remove_class(*element, class),
            ViewMutation::SetStyle {
                element,
                name,
                value,
            } => self.set_style(*element, name, value),
            ViewMutation::RemoveStyle { element, name } => self.remove_style(*element, name),
            ViewMutation::SetAttribute {
                element,
                key,
                value,
            } => self.set_attribute(*element, key, value),
            ViewMutation::RemoveAttribute { element, key } => self.remove_attribute(*element, key),
        }
    }

    /// Wrapping container for `id`: the first `wrapper_name` child of the
    /// parent (top-level siblings when `id` is a root).
    ///
    /// The parent itself is checked first. Markup built from HTML nests the
    /// table inside its wrapper, so for those trees the wrapper is the
    /// parent rather than a sibling; the sibling search covers trees where
    /// both hang off a common container.
    pub fn find_wrapper(&self, id: ViewElementId, wrapper_name: &str) -> Option<ViewElementId> {
        let element = self.element(id)?;
        let siblings = match element.parent {
            Some(parent) => {
                let parent = self.element(parent)?;
                if parent.is(wrapper_name) {
                    return Some(parent.id);
                }
                &parent.children
            }
            None => &self.roots,
        };
        siblings
            .iter()
            .copied()
            .find(|sibling| self.element(*sibling).is_some_and(|el| el.is(wrapper_name)))
    }

    /// True when `id`'s parent is a `wrapper_name` element.
    pub fn is_wrapped(&self, id: ViewElementId, wrapper_name: &str) -> bool {
        self.element(id)
            .and_then(|el| el.parent)
            .and_then(|parent| self.element(parent))
            .is_some_and(|parent| parent.is(wrapper_name))
    }
}
