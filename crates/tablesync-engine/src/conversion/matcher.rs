use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::view::ViewElement;

static ANY_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\S]+").expect("valid any-value regex"));

/// Name or value matcher: an exact string or a compiled pattern.
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact(String),
    Pattern(Regex),
}

impl Matcher {
    pub fn exact(value: impl Into<String>) -> Self {
        Matcher::Exact(value.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Matcher::Pattern(Regex::new(pattern)?))
    }

    /// Matches any non-empty value.
    pub fn any() -> Self {
        Matcher::Pattern(ANY_VALUE_RE.clone())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Matcher::Exact(value) => value == candidate,
            Matcher::Pattern(regex) => regex.is_match(candidate),
        }
    }

    /// The exact name, if this matcher names a single value.
    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Matcher::Exact(value) => Some(value),
            Matcher::Pattern(_) => None,
        }
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Matcher::exact(value)
    }
}

impl From<Regex> for Matcher {
    fn from(value: Regex) -> Self {
        Matcher::Pattern(value)
    }
}

/// Description of the parts of a view element a rule wants to claim: the
/// element name, styles, classes and raw attributes. Every listed part must be
/// present (and match its value matcher, if any) for the pattern to match.
#[derive(Debug, Clone, Default)]
pub struct MatcherPattern {
    pub name: Option<Matcher>,
    pub styles: Vec<(String, Option<Matcher>)>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, Option<Matcher>)>,
}

impl MatcherPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<Matcher>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn style(mut self, name: impl Into<String>) -> Self {
        self.styles.push((name.into(), None));
        self
    }

    pub fn style_value(mut self, name: impl Into<String>, value: impl Into<Matcher>) -> Self {
        self.styles.push((name.into(), Some(value.into())));
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<String>) -> Self {
        self.attributes.push((key.into(), None));
        self
    }

    pub fn attribute_value(mut self, key: impl Into<String>, value: impl Into<Matcher>) -> Self {
        self.attributes.push((key.into(), Some(value.into())));
        self
    }

    pub fn matches(&self, element: &ViewElement) -> bool {
        if let Some(name) = &self.name {
            if !name.matches(element.name()) {
                return false;
            }
        }
        let styles_match = self.styles.iter().all(|(name, value)| {
            if !element.has_style(name) {
                return false;
            }
            match value {
                Some(matcher) => element
                    .style_text(name)
                    .is_some_and(|text| matcher.matches(&text)),
                None => true,
            }
        });
        let attributes_match = self.attributes.iter().all(|(key, value)| {
            match (element.attribute(key), value) {
                (Some(actual), Some(matcher)) => matcher.matches(actual),
                (Some(_), None) => true,
                (None, _) => false,
            }
        });
        styles_match
            && attributes_match
            && self.classes.iter().all(|class| element.has_class(class))
    }
}
