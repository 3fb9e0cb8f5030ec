//! Style normalization for view elements.
//!
//! The view stores styles as longhands. The [`StyleProcessor`] expands the
//! shorthands of the enabled families when a style is set, and the lookup
//! helpers rebuild per-side values from the longhands when a normalized style
//! is requested. Values are never rewritten: units and color spellings are
//! kept exactly as authored.

mod box_sides;
mod shorthand;

use std::collections::BTreeMap;

use tablesync_config::StyleRulesConfig;

pub use box_sides::{BoxSides, Side, StyleValue, reduce_box_sides};
pub use shorthand::{BorderShorthand, border_longhands, split_tokens};

use shorthand::{BORDER_PARTS, border_longhand, is_color, parse_side, side_longhand};

/// Shorthand families handled by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleRules {
    pub border: bool,
    pub background: bool,
    pub padding: bool,
}

impl StyleRules {
    pub fn all() -> Self {
        Self {
            border: true,
            background: true,
            padding: true,
        }
    }
}

impl From<&StyleRulesConfig> for StyleRules {
    fn from(config: &StyleRulesConfig) -> Self {
        Self {
            border: config.border,
            background: config.background,
            padding: config.padding,
        }
    }
}

/// Expands shorthand declarations into longhands for the enabled families.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleProcessor {
    rules: StyleRules,
}

impl StyleProcessor {
    pub fn new(rules: StyleRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> StyleRules {
        self.rules
    }

    /// Longhand declarations for `name: value`. Names outside the enabled
    /// families come back unchanged.
    pub fn expand(&self, name: &str, value: &str) -> Vec<(String, String)> {
        let value = value.trim();
        let name = name.trim().to_ascii_lowercase();
        if self.rules.border {
            if let Some(expanded) = expand_border(&name, value) {
                return expanded;
            }
        }
        if self.rules.padding {
            if let Some(expanded) = expand_box("padding", &name, value) {
                return expanded;
            }
        }
        if self.rules.background && name == "background" {
            let color = split_tokens(value).into_iter().find(|token| is_color(token));
            if let Some(color) = color {
                return vec![("background-color".to_string(), color)];
            }
        }
        vec![(name, value.to_string())]
    }
}

fn expand_border(name: &str, value: &str) -> Option<Vec<(String, String)>> {
    let rest = name.strip_prefix("border")?;
    if rest.is_empty() {
        let border = BorderShorthand::parse(value);
        return Some(
            Side::ALL
                .iter()
                .flat_map(|side| border_side_parts(*side, &border))
                .collect(),
        );
    }
    let rest = rest.strip_prefix('-')?;
    let mut segments = rest.split('-');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(first), None, None) => {
            if let Some(side) = parse_side(first) {
                let border = BorderShorthand::parse(value);
                return Some(border_side_parts(side, &border));
            }
            if BORDER_PARTS.contains(&first) {
                let sides = BoxSides::from_css(value)?;
                return Some(
                    Side::ALL
                        .iter()
                        .filter_map(|side| {
                            sides
                                .side(*side)
                                .map(|v| (border_longhand(*side, first), v.to_string()))
                        })
                        .collect(),
                );
            }
            None
        }
        (Some(side), Some(part), None) if parse_side(side).is_some() => {
            BORDER_PARTS
                .contains(&part)
                .then(|| vec![(name.to_string(), value.to_string())])
        }
        _ => None,
    }
}

fn border_side_parts(side: Side, border: &BorderShorthand) -> Vec<(String, String)> {
    BORDER_PARTS
        .iter()
        .filter_map(|part| {
            border
                .part(part)
                .map(|v| (border_longhand(side, part), v.to_string()))
        })
        .collect()
}

fn expand_box(prefix: &str, name: &str, value: &str) -> Option<Vec<(String, String)>> {
    if name != prefix {
        return None;
    }
    let sides = BoxSides::from_css(value)?;
    Some(
        Side::ALL
            .iter()
            .filter_map(|side| {
                sides
                    .side(*side)
                    .map(|v| (side_longhand(prefix, *side), v.to_string()))
            })
            .collect(),
    )
}

/// Longhands a style name covers; a longhand covers only itself.
pub fn longhands_of(name: &str) -> Vec<String> {
    match name {
        "border" => border_longhands(),
        "padding" | "margin" => Side::ALL
            .iter()
            .map(|side| side_longhand(name, *side))
            .collect(),
        "background" => vec!["background-color".to_string()],
        _ => {
            if let Some(part) = box_part(name) {
                return Side::ALL
                    .iter()
                    .map(|side| border_longhand(*side, part))
                    .collect();
            }
            if let Some(side) = name.strip_prefix("border-").and_then(parse_side) {
                return BORDER_PARTS
                    .iter()
                    .map(|part| border_longhand(side, part))
                    .collect();
            }
            vec![name.to_string()]
        }
    }
}

/// `border-width` → `width`
fn box_part(name: &str) -> Option<&'static str> {
    let part = name.strip_prefix("border-")?;
    BORDER_PARTS.iter().copied().find(|p| *p == part)
}

/// Longhand of a box style for one side: `border-width` gives
/// `border-top-width`, `padding` gives `padding-top`. `None` for names that
/// are not box styles.
pub fn box_side_longhand(name: &str, side: Side) -> Option<String> {
    match box_part(name) {
        Some(part) => Some(border_longhand(side, part)),
        None if name == "padding" || name == "margin" => Some(side_longhand(name, side)),
        None => None,
    }
}

pub fn is_box_style(name: &str) -> bool {
    box_side_longhand(name, Side::Top).is_some()
}

/// Per-side value of a box style (`border-width`, `padding`, ...) assembled
/// from its longhands. `None` when the name is not a box style or no side is
/// present.
pub fn box_sides_of(styles: &BTreeMap<String, String>, name: &str) -> Option<BoxSides> {
    let mut sides = BoxSides::default();
    for side in Side::ALL {
        let key = box_side_longhand(name, side)?;
        if let Some(value) = styles.get(&key) {
            sides.set(side, value.clone());
        }
    }
    (!sides.is_empty()).then_some(sides)
}

/// Normalized style: a per-side map for box styles, otherwise the raw value.
/// A box style stored unexpanded (its family disabled) is read as a box list.
pub fn normalized_style(styles: &BTreeMap<String, String>, name: &str) -> Option<StyleValue> {
    if let Some(sides) = box_sides_of(styles, name) {
        return Some(StyleValue::Sides(sides));
    }
    let raw = styles.get(name)?;
    if is_box_style(name) {
        if let Some(sides) = BoxSides::from_css(raw) {
            return Some(StyleValue::Sides(sides));
        }
    }
    Some(StyleValue::Scalar(raw.clone()))
}

/// Model value of raw CSS text written for `name`. Box lists of box styles
/// come back per side, reduced to a scalar when uniform.
pub fn style_value_from_css(name: &str, raw: &str) -> StyleValue {
    if is_box_style(name) {
        if let Some(value) = BoxSides::from_css(raw)
            .as_ref()
            .and_then(|sides| reduce_box_sides(Some(sides)))
        {
            return value;
        }
    }
    StyleValue::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(processor: &StyleProcessor, name: &str, value: &str) -> BTreeMap<String, String> {
        processor.expand(name, value).into_iter().collect()
    }

    #[test]
    fn border_shorthand_expands_to_twelve_longhands() {
        let styles = apply(&StyleProcessor::new(StyleRules::all()), "border", "2px solid red");
        assert_eq!(styles.len(), 12);
        assert_eq!(styles.get("border-left-color").map(String::as_str), Some("red"));
        assert_eq!(
            normalized_style(&styles, "border-width"),
            Some(StyleValue::Sides(BoxSides::uniform("2px")))
        );
    }

    #[test]
    fn border_side_shorthand_touches_one_side() {
        let styles = apply(&StyleProcessor::new(StyleRules::all()), "border-top", "1px dotted");
        assert_eq!(styles.len(), 2);
        let width = box_sides_of(&styles, "border-width").expect("top width");
        assert_eq!(width.side(Side::Top), Some("1px"));
        assert_eq!(width.side(Side::Bottom), None);
    }

    #[test]
    fn border_part_box_list_expands() {
        let styles = apply(
            &StyleProcessor::new(StyleRules::all()),
            "border-width",
            "1px 1px 2px",
        );
        assert_eq!(
            box_sides_of(&styles, "border-width"),
            Some(BoxSides::new("1px", "1px", "2px", "1px"))
        );
    }

    #[test]
    fn background_shorthand_extracts_color() {
        let styles = apply(
            &StyleProcessor::new(StyleRules::all()),
            "background",
            "url(a.png) no-repeat #ccc",
        );
        assert_eq!(styles.get("background-color").map(String::as_str), Some("#ccc"));
    }

    #[test]
    fn disabled_family_is_stored_verbatim() {
        let styles = apply(&StyleProcessor::default(), "border", "2px solid red");
        assert_eq!(styles.get("border").map(String::as_str), Some("2px solid red"));
        assert_eq!(box_sides_of(&styles, "border-width"), None);
        assert_eq!(
            normalized_style(&styles, "border"),
            Some(StyleValue::from("2px solid red"))
        );
    }

    #[test]
    fn padding_expands_when_enabled() {
        let styles = apply(&StyleProcessor::new(StyleRules::all()), "padding", "4px 8px");
        assert_eq!(
            normalized_style(&styles, "padding"),
            Some(StyleValue::Sides(BoxSides::new("4px", "8px", "4px", "8px")))
        );
    }

    #[test]
    fn unexpanded_box_list_reads_per_side() {
        let styles = apply(&StyleProcessor::default(), "border-width", "1px 1px 2px");
        assert_eq!(styles.get("border-width").map(String::as_str), Some("1px 1px 2px"));
        assert_eq!(
            normalized_style(&styles, "border-width"),
            Some(StyleValue::Sides(BoxSides::new("1px", "1px", "2px", "1px")))
        );
    }

    #[test]
    fn raw_box_lists_become_model_values() {
        assert_eq!(style_value_from_css("border-color", "red"), StyleValue::from("red"));
        assert_eq!(
            style_value_from_css("padding", "1px 2px"),
            StyleValue::Sides(BoxSides::new("1px", "2px", "1px", "2px"))
        );
        assert_eq!(
            style_value_from_css("border-color", "rgb(0, 0, 0) red"),
            StyleValue::Sides(BoxSides::new("rgb(0, 0, 0)", "red", "rgb(0, 0, 0)", "red"))
        );
        assert_eq!(style_value_from_css("width", "1px 2px"), StyleValue::from("1px 2px"));
    }

    #[test]
    fn box_side_longhands() {
        assert_eq!(
            box_side_longhand("border-style", Side::Left).as_deref(),
            Some("border-left-style")
        );
        assert_eq!(box_side_longhand("padding", Side::Top).as_deref(), Some("padding-top"));
        assert_eq!(box_side_longhand("height", Side::Top), None);
    }

    #[test]
    fn longhand_coverage() {
        assert_eq!(longhands_of("border").len(), 12);
        assert_eq!(
            longhands_of("border-color"),
            vec![
                "border-top-color",
                "border-right-color",
                "border-bottom-color",
                "border-left-color"
            ]
        );
        assert_eq!(longhands_of("border-left").len(), 3);
        assert_eq!(longhands_of("float"), vec!["float"]);
    }
}
