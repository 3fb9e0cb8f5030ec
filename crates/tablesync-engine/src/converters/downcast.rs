//! Model to view rules.
//!
//! Every rule claims its `attribute:<key>:<nodeType>` event, resolves the
//! target element and either writes the marker class plus the value or
//! removes both.

use tracing::{debug, warn};

use crate::conversion::{Conversion, DowncastContext, Priority, ViewMutation};
use crate::css::{Side, box_side_longhand, is_box_style};
use crate::model::AttributeValue;
use crate::properties::marker_class;
use crate::view::{ViewDocument, ViewElementId};

/// Which view element a downcast rule writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetResolver {
    /// The element the model node is mapped to.
    Element,
    /// The wrapping container of the mapped element.
    Wrapper { name: String },
}

impl TargetResolver {
    pub fn wrapper(name: impl Into<String>) -> Self {
        TargetResolver::Wrapper { name: name.into() }
    }

    pub fn resolve(&self, view: &ViewDocument, mapped: ViewElementId) -> Option<ViewElementId> {
        match self {
            TargetResolver::Element => Some(mapped),
            TargetResolver::Wrapper { name } => view.find_wrapper(mapped, name),
        }
    }
}

/// How a present value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteForm {
    /// Inline style plus the raw attribute of the same name.
    StyleAndAttribute,
    /// Raw attribute only.
    Attribute,
}

/// Translation of the serialized model value into view text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueMap {
    #[default]
    Verbatim,
    /// `center` becomes `none`.
    Alignment,
}

impl ValueMap {
    pub fn apply(self, css: String) -> String {
        match self {
            ValueMap::Verbatim => css,
            ValueMap::Alignment => alignment_to_view(&css),
        }
    }
}

/// One attribute-to-view rule.
#[derive(Debug, Clone)]
pub struct AttributeToView {
    pub node_type: String,
    pub model_attribute: String,
    pub style_name: String,
    pub target: TargetResolver,
    pub form: WriteForm,
    pub value_map: ValueMap,
}

impl AttributeToView {
    pub fn new(
        node_type: impl Into<String>,
        model_attribute: impl Into<String>,
        style_name: impl Into<String>,
        target: TargetResolver,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            model_attribute: model_attribute.into(),
            style_name: style_name.into(),
            target,
            form: WriteForm::StyleAndAttribute,
            value_map: ValueMap::Verbatim,
        }
    }

    pub fn event(&self) -> String {
        format!("attribute:{}:{}", self.model_attribute, self.node_type)
    }

    /// Mutations that bring `target` in line with `value`.
    pub fn mutations(
        &self,
        target: ViewElementId,
        value: Option<&AttributeValue>,
    ) -> Vec<ViewMutation> {
        let class = marker_class(&self.style_name);
        let with_style = self.form == WriteForm::StyleAndAttribute;
        match value.filter(|value| !value.is_empty()) {
            Some(AttributeValue::Sides(sides))
                if with_style && !sides.is_complete() && is_box_style(&self.style_name) =>
            {
                // Partial maps are written per side and carry no raw attribute.
                let mut mutations = vec![
                    ViewMutation::AddClass {
                        element: target,
                        class,
                    },
                    ViewMutation::RemoveStyle {
                        element: target,
                        name: self.style_name.clone(),
                    },
                ];
                for side in Side::ALL {
                    let (Some(value), Some(longhand)) =
                        (sides.side(side), box_side_longhand(&self.style_name, side))
                    else {
                        continue;
                    };
                    mutations.push(ViewMutation::SetStyle {
                        element: target,
                        name: longhand,
                        value: value.to_string(),
                    });
                }
                mutations.push(ViewMutation::RemoveAttribute {
                    element: target,
                    key: self.style_name.clone(),
                });
                mutations
            }
            Some(value) => {
                let text = self.value_map.apply(value.to_css_string());
                let mut mutations = vec![ViewMutation::AddClass {
                    element: target,
                    class,
                }];
                if with_style {
                    mutations.push(ViewMutation::SetStyle {
                        element: target,
                        name: self.style_name.clone(),
                        value: text.clone(),
                    });
                }
                mutations.push(ViewMutation::SetAttribute {
                    element: target,
                    key: self.style_name.clone(),
                    value: text,
                });
                mutations
            }
            None => {
                let mut mutations = vec![ViewMutation::RemoveClass {
                    element: target,
                    class,
                }];
                if with_style {
                    mutations.push(ViewMutation::RemoveStyle {
                        element: target,
                        name: self.style_name.clone(),
                    });
                }
                mutations.push(ViewMutation::RemoveAttribute {
                    element: target,
                    key: self.style_name.clone(),
                });
                mutations
            }
        }
    }

    fn handle(&self, context: &mut DowncastContext<'_>) -> Vec<ViewMutation> {
        if !context.consume() {
            return Vec::new();
        }
        let Some(mapped) = context.mapper.to_view_element(context.change.node) else {
            debug!(node = %context.change.node, event = context.event, "no view element mapped");
            return Vec::new();
        };
        let Some(target) = self.target.resolve(context.view, mapped) else {
            warn!(
                node = %context.change.node,
                element = %mapped,
                event = context.event,
                "wrapping container not found; attribute not rendered"
            );
            return Vec::new();
        };
        self.mutations(target, context.change.new_value.as_ref())
    }
}

/// Registers `rule` on the downcast dispatcher.
pub fn downcast_attribute(conversion: &mut Conversion, rule: AttributeToView) {
    conversion.downcast_mut().add(
        rule.event(),
        Priority::Normal,
        move |context: &mut DowncastContext<'_>| rule.handle(context),
    );
}

/// Cell-style rule writing to the cell's own element.
pub fn downcast_attribute_to_style(
    conversion: &mut Conversion,
    model_element: &str,
    model_attribute: &str,
    style_name: &str,
) {
    downcast_attribute(
        conversion,
        AttributeToView::new(
            model_element,
            model_attribute,
            style_name,
            TargetResolver::Element,
        ),
    );
}

/// Table rule writing to the `table` element itself, never to its wrapper.
pub fn downcast_table_attribute(conversion: &mut Conversion, model_attribute: &str, style_name: &str) {
    downcast_attribute(
        conversion,
        AttributeToView::new("table", model_attribute, style_name, TargetResolver::Element),
    );
}

/// Table rule writing to the wrapping container.
pub fn downcast_wrapper_attribute(
    conversion: &mut Conversion,
    model_attribute: &str,
    style_name: &str,
    wrapper_name: &str,
) {
    downcast_attribute(
        conversion,
        AttributeToView::new(
            "table",
            model_attribute,
            style_name,
            TargetResolver::wrapper(wrapper_name),
        ),
    );
}

/// `center` is rendered as `none`.
pub fn alignment_to_view(value: &str) -> String {
    if value == "center" {
        "none".to_string()
    } else {
        value.to_string()
    }
}

/// Alignment goes to the wrapper as the raw `alignment` attribute.
pub fn downcast_alignment(conversion: &mut Conversion, model_attribute: &str, wrapper_name: &str) {
    let mut rule = AttributeToView::new(
        "table",
        model_attribute,
        "alignment",
        TargetResolver::wrapper(wrapper_name),
    );
    rule.form = WriteForm::Attribute;
    rule.value_map = ValueMap::Alignment;
    downcast_attribute(conversion, rule);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::Mapper;
    use crate::css::{BoxSides, StyleProcessor, StyleRules};
    use crate::model::{AttributeChange, ModelDocument, ModelNodeId, Schema};

    fn wrapped_table() -> (ViewDocument, ViewElementId, ViewElementId) {
        let mut view = ViewDocument::new(StyleProcessor::new(StyleRules::all()));
        let figure = view.create_element("figure", None).unwrap();
        let table = view.create_element("table", Some(figure)).unwrap();
        (view, figure, table)
    }

    #[test]
    fn present_value_writes_class_style_and_attribute() {
        let (mut view, _, table) = wrapped_table();
        let rule = AttributeToView::new("table", "tableBorderWidth", "border-width", TargetResolver::Element);
        let value = AttributeValue::from("3px");
        for mutation in rule.mutations(table, Some(&value)) {
            view.apply(&mutation).unwrap();
        }
        let element = view.get(table).unwrap();
        assert!(element.has_class("ck-custom-border-width"));
        assert_eq!(element.style_text("border-width").as_deref(), Some("3px"));
        assert_eq!(element.attribute("border-width"), Some("3px"));
    }

    #[test]
    fn cleared_value_removes_everything() {
        let (mut view, _, table) = wrapped_table();
        let rule = AttributeToView::new("table", "tableBorderWidth", "border-width", TargetResolver::Element);
        let value = AttributeValue::from(BoxSides::new("1px", "1px", "2px", "1px"));
        for mutation in rule.mutations(table, Some(&value)) {
            view.apply(&mutation).unwrap();
        }
        assert_eq!(view.get(table).unwrap().attribute("border-width"), Some("1px 1px 2px"));

        for mutation in rule.mutations(table, None) {
            view.apply(&mutation).unwrap();
        }
        let element = view.get(table).unwrap();
        assert!(!element.has_class("ck-custom-border-width"));
        assert!(!element.has_style("border-width"));
        assert!(!element.has_attribute("border-width"));
    }

    #[test]
    fn wrapper_target_resolves_to_the_container() {
        let (view, figure, table) = wrapped_table();
        assert_eq!(TargetResolver::Element.resolve(&view, table), Some(table));
        assert_eq!(TargetResolver::wrapper("figure").resolve(&view, table), Some(figure));
        assert_eq!(TargetResolver::wrapper("section").resolve(&view, table), None);
    }

    #[test]
    fn alignment_is_attribute_only_and_remapped() {
        let (_, figure, _) = wrapped_table();
        let mut rule = AttributeToView::new(
            "table",
            "tableAlignment",
            "alignment",
            TargetResolver::wrapper("figure"),
        );
        rule.form = WriteForm::Attribute;
        rule.value_map = ValueMap::Alignment;

        let mutations = rule.mutations(figure, Some(&AttributeValue::from("center")));
        assert_eq!(
            mutations,
            vec![
                ViewMutation::AddClass {
                    element: figure,
                    class: "ck-custom-alignment".into()
                },
                ViewMutation::SetAttribute {
                    element: figure,
                    key: "alignment".into(),
                    value: "none".into()
                },
            ]
        );
        assert_eq!(rule.mutations(figure, Some(&AttributeValue::from(""))).len(), 2);
    }

    fn width_change() -> (ModelDocument, ModelNodeId, Vec<AttributeChange>) {
        let mut schema = Schema::default();
        schema.extend("table", ["tableWidth"]);
        let mut model = ModelDocument::new(schema);
        let table = model.create_node("table", None).unwrap();
        let ((), changes) = model
            .change(|writer| writer.set_attribute("tableWidth", "50%", table))
            .unwrap();
        (model, table, changes)
    }

    #[test]
    fn unclaimed_change_is_rendered() {
        let mut conversion = Conversion::default();
        downcast_table_attribute(&mut conversion, "tableWidth", "width");
        let (mut view, _, table_view) = wrapped_table();
        let (model, table, changes) = width_change();
        let mut mapper = Mapper::new();
        mapper.bind_elements(table, table_view);

        let mutations = conversion
            .downcast()
            .convert_changes(&changes, &model, &mut view, &mapper)
            .unwrap();
        assert_eq!(mutations.len(), 3);
        assert_eq!(view.get(table_view).unwrap().style("width"), Some("50%"));
    }

    #[test]
    fn change_claimed_by_an_earlier_handler_is_skipped() {
        let mut conversion = Conversion::default();
        conversion.downcast_mut().add(
            "attribute:tableWidth:table",
            Priority::High,
            |context: &mut DowncastContext<'_>| {
                assert!(context.consume());
                Vec::new()
            },
        );
        downcast_table_attribute(&mut conversion, "tableWidth", "width");
        let (mut view, _, table_view) = wrapped_table();
        let (model, table, changes) = width_change();
        let mut mapper = Mapper::new();
        mapper.bind_elements(table, table_view);

        let mutations = conversion
            .downcast()
            .convert_changes(&changes, &model, &mut view, &mapper)
            .unwrap();
        assert!(mutations.is_empty());
        let element = view.get(table_view).unwrap();
        assert!(!element.has_class("ck-custom-width"));
        assert!(!element.has_style("width"));
    }

    #[test]
    fn partial_sides_are_written_per_side() {
        let (mut view, _, table) = wrapped_table();
        let rule = AttributeToView::new("table", "tableBorderWidth", "border-width", TargetResolver::Element);
        view.set_style(table, "border-width", "4px").unwrap();
        view.set_attribute(table, "border-width", "4px").unwrap();
        let value = AttributeValue::from(BoxSides {
            top: Some("2px".into()),
            ..BoxSides::default()
        });
        for mutation in rule.mutations(table, Some(&value)) {
            view.apply(&mutation).unwrap();
        }
        let element = view.get(table).unwrap();
        assert_eq!(element.style("border-top-width"), Some("2px"));
        assert!(!element.has_style("border-left-width"));
        assert!(!element.has_attribute("border-width"));
        assert_eq!(
            element.normalized_style("border-width"),
            Some(value)
        );
    }
}
