use csscolorparser::Color as CssColor;
use std::str::FromStr;

use super::box_sides::Side;

const BORDER_STYLE_KEYWORDS: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const BORDER_WIDTH_KEYWORDS: &[&str] = &["thin", "medium", "thick"];

/// Border sub-properties, in the order used for longhand names.
pub const BORDER_PARTS: [&str; 3] = ["width", "color", "style"];

/// Splits a declaration value on whitespace that is not nested inside
/// parentheses, so `rgb(0, 0, 0) solid` yields two tokens.
pub fn split_tokens(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in value.trim().chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

pub fn is_border_style(token: &str) -> bool {
    BORDER_STYLE_KEYWORDS.contains(&token.to_ascii_lowercase().as_str())
}

pub fn is_length(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    if BORDER_WIDTH_KEYWORDS.contains(&lower.as_str()) || lower.starts_with("calc(") {
        return true;
    }
    let mut chars = lower.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() || c == '.' => true,
        Some('+') | Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

pub fn is_color(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    lower == "currentcolor" || lower.starts_with("var(") || CssColor::from_str(token).is_ok()
}

/// Parts of a `border` / `border-<side>` shorthand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorderShorthand {
    pub width: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
}

impl BorderShorthand {
    pub fn parse(value: &str) -> Self {
        let mut out = Self::default();
        for token in split_tokens(value) {
            if out.style.is_none() && is_border_style(&token) {
                out.style = Some(token);
            } else if out.width.is_none() && is_length(&token) {
                out.width = Some(token);
            } else if out.color.is_none() {
                out.color = Some(token);
            }
        }
        out
    }

    pub fn part(&self, name: &str) -> Option<&str> {
        match name {
            "width" => self.width.as_deref(),
            "color" => self.color.as_deref(),
            "style" => self.style.as_deref(),
            _ => None,
        }
    }
}

/// `border-<side>-<part>`
pub fn border_longhand(side: Side, part: &str) -> String {
    format!("border-{}-{}", side.as_str(), part)
}

/// `<prefix>-<side>`, e.g. `padding-top`.
pub fn side_longhand(prefix: &str, side: Side) -> String {
    format!("{}-{}", prefix, side.as_str())
}

/// The twelve per-side border longhands.
pub fn border_longhands() -> Vec<String> {
    Side::ALL
        .iter()
        .flat_map(|side| BORDER_PARTS.iter().map(move |part| border_longhand(*side, part)))
        .collect()
}

pub fn parse_side(name: &str) -> Option<Side> {
    Side::ALL.into_iter().find(|side| side.as_str() == name)
}
