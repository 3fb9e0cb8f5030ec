//! View to model rules.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::conversion::{
    Conversion, Matcher, MatcherPattern, ModelMutation, Priority, UpcastContext,
};
use crate::css::{StyleValue, border_longhands, reduce_box_sides, style_value_from_css};
use crate::model::AttributeValue;
use crate::properties::{attributes, marker_class};
use crate::view::{ViewDocument, ViewElement};

static FLOAT_VALUES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(left|none|right)$").expect("valid float values regex"));
static ALIGN_VALUES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(left|center|right)$").expect("valid align values regex"));

/// Computes the model value for a matched element. `None` leaves the
/// element's parts unconsumed and writes nothing.
pub type ValueFn = Box<dyn Fn(&ViewDocument, &ViewElement) -> Option<AttributeValue>>;

/// Structural veto for a style upcast.
pub type GuardFn = Box<dyn Fn(&ViewDocument, &ViewElement) -> bool>;

/// Generic attribute-to-attribute rule: when `view` matches and its parts can
/// be consumed, `model_key` is set on the element's model node unless an
/// earlier rule already set it there. The parts are consumed either way.
pub struct AttributeToAttribute {
    pub view: MatcherPattern,
    pub model_key: String,
    /// Restricts the rule to model nodes of this type.
    pub model_name: Option<String>,
    pub value: ValueFn,
    pub priority: Priority,
}

impl AttributeToAttribute {
    pub fn new(view: MatcherPattern, model_key: impl Into<String>, value: ValueFn) -> Self {
        Self {
            view,
            model_key: model_key.into(),
            model_name: None,
            value,
            priority: Priority::Low,
        }
    }

    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }
}

pub fn upcast_attribute_to_attribute(conversion: &mut Conversion, rule: AttributeToAttribute) {
    let AttributeToAttribute {
        view,
        model_key,
        model_name,
        value,
        priority,
    } = rule;
    let event = match view.name.as_ref().and_then(Matcher::as_exact) {
        Some(name) => format!("element:{name}"),
        None => "element".to_string(),
    };
    conversion
        .upcast_mut()
        .add(event, priority, move |context: &mut UpcastContext<'_>| {
            let Some(node) = context.model_element() else {
                return Vec::new();
            };
            if model_name.as_deref().is_some_and(|name| name != node.name()) {
                return Vec::new();
            }
            if !context.model.schema().check_attribute(node.name(), &model_key) {
                return Vec::new();
            }
            let node = node.id();
            if !view.matches(context.item) || !context.test(&view) {
                return Vec::new();
            }
            let Some(value) = value(context.view, context.item) else {
                return Vec::new();
            };
            if !context.consume(&view) {
                return Vec::new();
            }
            // An earlier rule already set the attribute on this node.
            if context
                .model_element()
                .is_some_and(|node| node.has_attribute(&model_key))
            {
                return Vec::new();
            }
            vec![ModelMutation::set(node, model_key.as_str(), value)]
        });
}

/// Options of [`upcast_style_to_attribute`].
pub struct StyleToAttribute {
    pub model_attribute: String,
    pub style_name: String,
    pub view_element: Matcher,
    pub default_value: String,
    pub reduce_box_sides: bool,
    pub should_upcast: Option<GuardFn>,
}

impl StyleToAttribute {
    pub fn new(
        model_attribute: impl Into<String>,
        style_name: impl Into<String>,
        view_element: impl Into<Matcher>,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            model_attribute: model_attribute.into(),
            style_name: style_name.into(),
            view_element: view_element.into(),
            default_value: default_value.into(),
            reduce_box_sides: false,
            should_upcast: None,
        }
    }

    pub fn reduce_box_sides(mut self) -> Self {
        self.reduce_box_sides = true;
        self
    }

    pub fn should_upcast(
        mut self,
        guard: impl Fn(&ViewDocument, &ViewElement) -> bool + 'static,
    ) -> Self {
        self.should_upcast = Some(Box::new(guard));
        self
    }
}

/// Upcasts a style through its normalized value, skipping values equal to the
/// default.
pub fn upcast_style_to_attribute(conversion: &mut Conversion, options: StyleToAttribute) {
    let StyleToAttribute {
        model_attribute,
        style_name,
        view_element,
        default_value,
        reduce_box_sides: reduce,
        should_upcast,
    } = options;
    let view = MatcherPattern::named(view_element).style_value(style_name.clone(), Matcher::any());
    let value: ValueFn = Box::new(move |document: &ViewDocument, element: &ViewElement| {
        if let Some(guard) = &should_upcast {
            if !guard(document, element) {
                return None;
            }
        }
        let normalized = element.normalized_style(&style_name)?;
        let value = match normalized {
            StyleValue::Sides(sides) if reduce => reduce_box_sides(Some(&sides))?,
            other => other,
        };
        (!value.is_default(&default_value)).then_some(value)
    });
    upcast_attribute_to_attribute(
        conversion,
        AttributeToAttribute::new(view, model_attribute, value),
    );
}

/// Upcasts the class-marked raw attribute `style_name` (written by the
/// downcast rules) on elements matching `view_element`.
pub fn upcast_marked_attribute(
    conversion: &mut Conversion,
    model_attribute: &str,
    style_name: &str,
    view_element: impl Into<Matcher>,
    default_value: &str,
) {
    let view = MatcherPattern::named(view_element)
        .class(marker_class(style_name))
        .attribute_value(style_name, Matcher::any());
    let key = style_name.to_string();
    let default_value = default_value.to_string();
    let value: ValueFn = Box::new(move |_: &ViewDocument, element: &ViewElement| {
        element
            .attribute(&key)
            .filter(|value| *value != default_value)
            .map(AttributeValue::from)
    });
    upcast_attribute_to_attribute(
        conversion,
        AttributeToAttribute::new(view, model_attribute, value),
    );
}

/// Border sub-property triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleValues {
    pub color: String,
    pub style: String,
    pub width: String,
}

impl StyleValues {
    pub fn new(
        color: impl Into<String>,
        style: impl Into<String>,
        width: impl Into<String>,
    ) -> Self {
        Self {
            color: color.into(),
            style: style.into(),
            width: width.into(),
        }
    }

    /// `(view style name, value)` for each sub-property.
    fn parts(&self) -> [(&'static str, &str); 3] {
        [
            ("border-color", &self.color),
            ("border-style", &self.style),
            ("border-width", &self.width),
        ]
    }
}

/// Marker classes claimed by the class-gated cell handler.
pub const CELL_MARKER_CLASSES: [&str; 8] = [
    "ck-custom-border-style",
    "ck-custom-border-color",
    "ck-custom-border-width",
    "ck-custom-background-color",
    "ck-custom-height",
    "ck-custom-width",
    "ck-custom-vertical-align",
    "ck-custom-padding",
];

/// Raw cell attributes the class-gated handler maps onto model attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRawAttribute {
    BorderStyle,
    BorderColor,
    BorderWidth,
    BackgroundColor,
    Width,
    Height,
    Padding,
    VerticalAlign,
}

impl CellRawAttribute {
    pub const ALL: [CellRawAttribute; 8] = [
        CellRawAttribute::BorderStyle,
        CellRawAttribute::BorderColor,
        CellRawAttribute::BorderWidth,
        CellRawAttribute::BackgroundColor,
        CellRawAttribute::Width,
        CellRawAttribute::Height,
        CellRawAttribute::Padding,
        CellRawAttribute::VerticalAlign,
    ];

    pub fn view_attribute(self) -> &'static str {
        match self {
            CellRawAttribute::BorderStyle => "border-style",
            CellRawAttribute::BorderColor => "border-color",
            CellRawAttribute::BorderWidth => "border-width",
            CellRawAttribute::BackgroundColor => "background-color",
            CellRawAttribute::Width => "width",
            CellRawAttribute::Height => "height",
            CellRawAttribute::Padding => "padding",
            CellRawAttribute::VerticalAlign => "vertical-align",
        }
    }

    pub fn model_attribute(self) -> &'static str {
        match self {
            CellRawAttribute::BorderStyle => attributes::TABLE_CELL_BORDER_STYLE,
            CellRawAttribute::BorderColor => attributes::TABLE_CELL_BORDER_COLOR,
            CellRawAttribute::BorderWidth => attributes::TABLE_CELL_BORDER_WIDTH,
            CellRawAttribute::BackgroundColor => attributes::TABLE_CELL_BACKGROUND_COLOR,
            CellRawAttribute::Width => attributes::TABLE_CELL_WIDTH,
            CellRawAttribute::Height => attributes::TABLE_CELL_HEIGHT,
            CellRawAttribute::Padding => attributes::TABLE_CELL_PADDING,
            CellRawAttribute::VerticalAlign => attributes::TABLE_CELL_VERTICAL_ALIGNMENT,
        }
    }

    pub fn from_view_attribute(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|attribute| attribute.view_attribute() == name)
    }
}

/// Border handler for `view_element_name`. Marker-class raw attributes are
/// written first, then the twelve border longhands are consumed, reduced and
/// written when they differ from `default_border`. For `td` and `th` a
/// class-gated handler for the raw cell attributes is registered as well.
pub fn upcast_border_styles(
    conversion: &mut Conversion,
    view_element_name: &str,
    model_attributes: StyleValues,
    default_border: StyleValues,
) {
    let event = format!("element:{view_element_name}");
    conversion
        .upcast_mut()
        .add(event.clone(), Priority::Normal, move |context: &mut UpcastContext<'_>| {
            let Some(node) = context.model_node else {
                return Vec::new();
            };
            let mut mutations = Vec::new();

            for (style_name, model_key) in model_attributes.parts() {
                if !context.item.has_class(&marker_class(style_name)) {
                    continue;
                }
                if let Some(raw) = context.item.attribute(style_name).filter(|v| !v.is_empty()) {
                    mutations.push(ModelMutation::set(
                        node,
                        model_key,
                        style_value_from_css(style_name, raw),
                    ));
                }
            }

            let present = border_longhands()
                .into_iter()
                .filter(|longhand| context.item.has_style(longhand))
                .collect::<Vec<_>>();
            if present.is_empty() {
                return mutations;
            }
            let pattern = present
                .into_iter()
                .fold(MatcherPattern::new(), |pattern, longhand| pattern.style(longhand));
            if !context.consume(&pattern) {
                return mutations;
            }

            let defaults = default_border.parts();
            for ((style_name, model_key), (_, default)) in
                model_attributes.parts().into_iter().zip(defaults)
            {
                let sides = context
                    .item
                    .normalized_style(style_name)
                    .and_then(|value| value.as_sides().cloned());
                let Some(reduced) = reduce_box_sides(sides.as_ref()) else {
                    continue;
                };
                if !reduced.is_default(default) {
                    mutations.push(ModelMutation::set(node, model_key, reduced));
                }
            }
            mutations
        });

    if view_element_name == "td" || view_element_name == "th" {
        conversion
            .upcast_mut()
            .add(event, Priority::High, |context: &mut UpcastContext<'_>| {
                let Some(node) = context.model_node else {
                    return Vec::new();
                };
                let pattern = CELL_MARKER_CLASSES
                    .into_iter()
                    .filter(|class| context.item.has_class(class))
                    .fold(MatcherPattern::new(), |pattern, class| pattern.class(class));
                if pattern.classes.is_empty() || !context.consume(&pattern) {
                    return Vec::new();
                }
                context
                    .item
                    .attributes()
                    .filter_map(|(key, value)| {
                        CellRawAttribute::from_view_attribute(key).map(|attribute| {
                            ModelMutation::set(
                                node,
                                attribute.model_attribute(),
                                style_value_from_css(key, value),
                            )
                        })
                    })
                    .collect()
            });
    }
}

/// Remaps the view's `none` to the model's `center`.
fn float_to_alignment(value: &str) -> &str {
    if value == "none" { "center" } else { value }
}

/// The three alignment forms: class-marked `alignment` attribute and `float`
/// style on the table or its wrapper, and the legacy `align` attribute on the
/// table node.
pub fn upcast_alignment(conversion: &mut Conversion, wrapper_name: &str, default_value: &str) {
    let element_matcher = table_or_wrapper(wrapper_name);

    let default = default_value.to_string();
    let marked = MatcherPattern {
        name: Some(element_matcher.clone()),
        ..MatcherPattern::default()
    }
    .class(marker_class("alignment"))
    .attribute_value("alignment", Matcher::Pattern(FLOAT_VALUES_RE.clone()));
    upcast_attribute_to_attribute(
        conversion,
        AttributeToAttribute::new(
            marked,
            attributes::TABLE_ALIGNMENT,
            Box::new(move |_: &ViewDocument, element: &ViewElement| {
                let align = float_to_alignment(element.attribute("alignment")?);
                (align != default).then(|| AttributeValue::from(align))
            }),
        ),
    );

    let default = default_value.to_string();
    let float = MatcherPattern {
        name: Some(element_matcher),
        ..MatcherPattern::default()
    }
    .style_value("float", Matcher::Pattern(FLOAT_VALUES_RE.clone()));
    upcast_attribute_to_attribute(
        conversion,
        AttributeToAttribute::new(
            float,
            attributes::TABLE_ALIGNMENT,
            Box::new(move |_: &ViewDocument, element: &ViewElement| {
                let align = float_to_alignment(element.style("float")?);
                (align != default).then(|| AttributeValue::from(align))
            }),
        ),
    );

    let default = default_value.to_string();
    let legacy =
        MatcherPattern::new().attribute_value("align", Matcher::Pattern(ALIGN_VALUES_RE.clone()));
    upcast_attribute_to_attribute(
        conversion,
        AttributeToAttribute::new(
            legacy,
            attributes::TABLE_ALIGNMENT,
            Box::new(move |_: &ViewDocument, element: &ViewElement| {
                let align = element.attribute("align")?;
                (align != default).then(|| AttributeValue::from(align))
            }),
        )
        .model_name("table"),
    );
    debug!(wrapper = wrapper_name, "alignment upcast registered");
}

/// `^(table|<wrapper>)$`
pub fn table_or_wrapper(wrapper_name: &str) -> Matcher {
    let pattern = format!("^(table|{})$", regex::escape(wrapper_name));
    match Regex::new(&pattern) {
        Ok(regex) => Matcher::Pattern(regex),
        Err(_) => Matcher::exact("table"),
    }
}

/// Guard for table-level styles: a `table` directly inside the wrapper
/// leaves the style to the wrapper.
pub fn not_wrapped_table(wrapper_name: &str) -> impl Fn(&ViewDocument, &ViewElement) -> bool + 'static {
    let wrapper_name = wrapper_name.to_string();
    move |view, element| !(element.is("table") && view.is_wrapped(element.id(), &wrapper_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::Mapper;
    use crate::css::{BoxSides, StyleProcessor, StyleRules};
    use crate::model::{ModelDocument, ModelNodeId, Schema};
    use crate::view::ViewElementId;

    fn border_conversion() -> Conversion {
        let mut conversion = Conversion::default();
        upcast_border_styles(
            &mut conversion,
            "table",
            StyleValues::new(
                attributes::TABLE_BORDER_COLOR,
                attributes::TABLE_BORDER_STYLE,
                attributes::TABLE_BORDER_WIDTH,
            ),
            StyleValues::new("", "none", ""),
        );
        conversion
    }

    fn table_model() -> (ModelDocument, ModelNodeId) {
        let mut schema = Schema::default();
        schema.extend(
            "table",
            [
                attributes::TABLE_BORDER_COLOR,
                attributes::TABLE_BORDER_STYLE,
                attributes::TABLE_BORDER_WIDTH,
                attributes::TABLE_BACKGROUND_COLOR,
                attributes::TABLE_ALIGNMENT,
            ],
        );
        let mut model = ModelDocument::new(schema);
        let table = model.create_node("table", None).unwrap();
        (model, table)
    }

    fn table_view() -> (ViewDocument, ViewElementId) {
        let mut view = ViewDocument::new(StyleProcessor::new(StyleRules::all()));
        let table = view.create_element("table", None).unwrap();
        (view, table)
    }

    #[test]
    fn unmapped_element_is_left_alone() {
        let mut conversion = border_conversion();
        upcast_style_to_attribute(
            &mut conversion,
            StyleToAttribute::new(
                attributes::TABLE_BACKGROUND_COLOR,
                "background-color",
                "table",
                "",
            ),
        );
        upcast_alignment(&mut conversion, "figure", "center");

        let (mut view, table_view) = table_view();
        view.set_style(table_view, "border", "1px solid red").unwrap();
        view.set_style(table_view, "background-color", "blue").unwrap();
        view.set_attribute(table_view, "align", "left").unwrap();
        view.add_class(table_view, "ck-custom-border-width").unwrap();
        view.set_attribute(table_view, "border-width", "2px").unwrap();
        let (mut model, table) = table_model();

        let changes = conversion
            .upcast()
            .convert(&view, &mut model, &Mapper::new())
            .unwrap();
        assert!(changes.is_empty());
        assert_eq!(model.get(table).unwrap().attributes().count(), 0);
    }

    #[test]
    fn marker_classes_upcast_raw_border_attributes() {
        let conversion = border_conversion();
        let (mut view, table_view) = table_view();
        view.add_class(table_view, "ck-custom-border-color").unwrap();
        view.add_class(table_view, "ck-custom-border-width").unwrap();
        view.set_attribute(table_view, "border-color", "red").unwrap();
        view.set_attribute(table_view, "border-width", "1px 1px 2px").unwrap();
        // No marker class, so the raw value is ignored.
        view.set_attribute(table_view, "border-style", "dashed").unwrap();
        let (mut model, table) = table_model();
        let mut mapper = Mapper::new();
        mapper.bind_elements(table, table_view);

        conversion.upcast().convert(&view, &mut model, &mapper).unwrap();
        let node = model.get(table).unwrap();
        assert_eq!(
            node.attribute(attributes::TABLE_BORDER_COLOR),
            Some(&AttributeValue::from("red"))
        );
        assert_eq!(
            node.attribute(attributes::TABLE_BORDER_WIDTH),
            Some(&AttributeValue::Sides(BoxSides::new("1px", "1px", "2px", "1px")))
        );
        assert_eq!(node.attribute(attributes::TABLE_BORDER_STYLE), None);
    }

    #[test]
    fn longhands_override_marker_values() {
        let conversion = border_conversion();
        let (mut view, table_view) = table_view();
        view.add_class(table_view, "ck-custom-border-color").unwrap();
        view.set_attribute(table_view, "border-color", "blue").unwrap();
        view.set_style(table_view, "border-color", "red").unwrap();
        let (mut model, table) = table_model();
        let mut mapper = Mapper::new();
        mapper.bind_elements(table, table_view);

        let changes = conversion.upcast().convert(&view, &mut model, &mapper).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(
            model.get(table).unwrap().attribute(attributes::TABLE_BORDER_COLOR),
            Some(&AttributeValue::from("red"))
        );
    }

    #[test]
    fn first_matching_rule_keeps_the_attribute() {
        let mut conversion = Conversion::default();
        upcast_alignment(&mut conversion, "figure", "center");
        let (mut view, table_view) = table_view();
        view.set_style(table_view, "float", "right").unwrap();
        view.add_class(table_view, "ck-custom-alignment").unwrap();
        view.set_attribute(table_view, "alignment", "left").unwrap();
        view.set_attribute(table_view, "align", "center").unwrap();
        let (mut model, table) = table_model();
        let mut mapper = Mapper::new();
        mapper.bind_elements(table, table_view);

        conversion.upcast().convert(&view, &mut model, &mapper).unwrap();
        assert_eq!(
            model.get(table).unwrap().attribute(attributes::TABLE_ALIGNMENT),
            Some(&AttributeValue::from("left"))
        );
    }
}
