use std::fmt;

use serde::{Deserialize, Serialize};

/// One edge of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// CSS order: top, right, bottom, left.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

/// A value expressed per edge. Any side may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSides {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

impl BoxSides {
    pub fn uniform(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            top: Some(value.clone()),
            right: Some(value.clone()),
            bottom: Some(value.clone()),
            left: Some(value),
        }
    }

    pub fn new(
        top: impl Into<String>,
        right: impl Into<String>,
        bottom: impl Into<String>,
        left: impl Into<String>,
    ) -> Self {
        Self {
            top: Some(top.into()),
            right: Some(right.into()),
            bottom: Some(bottom.into()),
            left: Some(left.into()),
        }
    }

    pub fn side(&self, side: Side) -> Option<&str> {
        let value = match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, side: Side, value: impl Into<String>) {
        let slot = match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        };
        *slot = Some(value.into());
    }

    /// True when no side carries a value.
    pub fn is_empty(&self) -> bool {
        Side::ALL.iter().all(|side| self.side(*side).is_none())
    }

    /// True when every side carries a value.
    pub fn is_complete(&self) -> bool {
        Side::ALL.iter().all(|side| self.side(*side).is_some())
    }

    /// Expands a CSS box list of one to four values (`a`, `a b`, `a b c`,
    /// `a b c d`) into per-side values.
    pub fn from_css(value: &str) -> Option<Self> {
        let parts = super::shorthand::split_tokens(value);
        let [top, right, bottom, left] = match parts.as_slice() {
            [a] => [a, a, a, a],
            [a, b] => [a, b, a, b],
            [a, b, c] => [a, b, c, b],
            [a, b, c, d] => [a, b, c, d],
            _ => return None,
        };
        Some(Self::new(top.as_str(), right.as_str(), bottom.as_str(), left.as_str()))
    }

    /// Shortest CSS box list for a complete value; `None` when a side is
    /// missing.
    pub fn to_css(&self) -> Option<String> {
        let (Some(top), Some(right), Some(bottom), Some(left)) = (
            self.side(Side::Top),
            self.side(Side::Right),
            self.side(Side::Bottom),
            self.side(Side::Left),
        ) else {
            return None;
        };
        let css = if left != right {
            format!("{top} {right} {bottom} {left}")
        } else if top != bottom {
            format!("{top} {right} {bottom}")
        } else if top != right {
            format!("{top} {right}")
        } else {
            top.to_string()
        };
        Some(css)
    }
}

/// A style or model attribute value: a single string or a per-side map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Scalar(String),
    Sides(BoxSides),
}

impl StyleValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            StyleValue::Scalar(value) => Some(value),
            StyleValue::Sides(_) => None,
        }
    }

    pub fn as_sides(&self) -> Option<&BoxSides> {
        match self {
            StyleValue::Sides(sides) => Some(sides),
            StyleValue::Scalar(_) => None,
        }
    }

    /// Empty scalars and side maps without any side count as "no value".
    pub fn is_empty(&self) -> bool {
        match self {
            StyleValue::Scalar(value) => value.is_empty(),
            StyleValue::Sides(sides) => sides.is_empty(),
        }
    }

    /// A side map never equals a scalar default.
    pub fn is_default(&self, default: &str) -> bool {
        self.as_scalar() == Some(default)
    }

    /// CSS text for the value. Complete side maps use the shortest box list;
    /// incomplete ones list the present sides in `top right bottom left`
    /// order.
    pub fn to_css_string(&self) -> String {
        match self {
            StyleValue::Scalar(value) => value.clone(),
            StyleValue::Sides(sides) => sides.to_css().unwrap_or_else(|| {
                Side::ALL
                    .iter()
                    .filter_map(|side| sides.side(*side))
                    .collect::<Vec<_>>()
                    .join(" ")
            }),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string())
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Scalar(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Scalar(value)
    }
}

impl From<BoxSides> for StyleValue {
    fn from(value: BoxSides) -> Self {
        StyleValue::Sides(value)
    }
}

/// Reduces a per-side value to a single string when all four sides are
/// present and equal. A map with a missing side is returned unchanged.
pub fn reduce_box_sides(style: Option<&BoxSides>) -> Option<StyleValue> {
    let style = style?;
    if !style.is_complete() {
        return Some(StyleValue::Sides(style.clone()));
    }
    let top = style.side(Side::Top)?;
    if Side::ALL.iter().all(|side| style.side(*side) == Some(top)) {
        Some(StyleValue::Scalar(top.to_string()))
    } else {
        Some(StyleValue::Sides(style.clone()))
    }
}
