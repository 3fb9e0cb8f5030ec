use tablesync_config::{NormalizedDefaults, TableSyncConfig};

use super::{Plugin, PropertyDefinition, attributes};
use crate::commands::AttributeCommand;
use crate::conversion::Conversion;
use crate::converters::{
    StyleToAttribute, StyleValues, TargetResolver, downcast_alignment, downcast_table_attribute,
    downcast_wrapper_attribute, not_wrapped_table, table_or_wrapper, upcast_alignment,
    upcast_border_styles, upcast_marked_attribute, upcast_style_to_attribute,
};
use crate::editor::Editor;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableProperty {
    Border,
    Background,
    Alignment,
    /// Width and height, owned by the wrapper.
    Layout,
}

/// Table-level properties: border, background, alignment, width and height.
#[derive(Debug, Clone)]
pub struct TablePropertiesEditing {
    defaults: NormalizedDefaults,
    wrapper_name: String,
}

impl TablePropertiesEditing {
    pub fn new(defaults: NormalizedDefaults, wrapper_name: impl Into<String>) -> Self {
        Self {
            defaults,
            wrapper_name: wrapper_name.into(),
        }
    }

    pub fn from_config(config: &TableSyncConfig) -> Self {
        Self::new(config.table_defaults(), config.view.wrapper_element.clone())
    }

    pub fn defaults(&self) -> &NormalizedDefaults {
        &self.defaults
    }

    pub fn definitions(&self) -> Vec<PropertyDefinition> {
        self.properties().into_iter().map(|(_, def)| def).collect()
    }

    fn properties(&self) -> Vec<(TableProperty, PropertyDefinition)> {
        let d = &self.defaults;
        let wrapper = || TargetResolver::wrapper(self.wrapper_name.as_str());
        vec![
            (
                TableProperty::Border,
                PropertyDefinition::new(
                    attributes::TABLE_BORDER_STYLE,
                    "border-style",
                    d.border_style.as_str(),
                    TargetResolver::Element,
                ),
            ),
            (
                TableProperty::Border,
                PropertyDefinition::new(
                    attributes::TABLE_BORDER_COLOR,
                    "border-color",
                    d.border_color.as_str(),
                    TargetResolver::Element,
                ),
            ),
            (
                TableProperty::Border,
                PropertyDefinition::new(
                    attributes::TABLE_BORDER_WIDTH,
                    "border-width",
                    d.border_width.as_str(),
                    TargetResolver::Element,
                ),
            ),
            (
                TableProperty::Background,
                PropertyDefinition::new(
                    attributes::TABLE_BACKGROUND_COLOR,
                    "background-color",
                    d.background_color.as_str(),
                    TargetResolver::Element,
                ),
            ),
            (
                TableProperty::Alignment,
                PropertyDefinition::new(
                    attributes::TABLE_ALIGNMENT,
                    "alignment",
                    d.alignment.as_str(),
                    wrapper(),
                ),
            ),
            (
                TableProperty::Layout,
                PropertyDefinition::new(attributes::TABLE_WIDTH, "width", d.width.as_str(), wrapper()),
            ),
            (
                TableProperty::Layout,
                PropertyDefinition::new(
                    attributes::TABLE_HEIGHT,
                    "height",
                    d.height.as_str(),
                    wrapper(),
                ),
            ),
        ]
    }

    fn register_conversion(&self, conversion: &mut Conversion) {
        let wrapper = self.wrapper_name.as_str();
        upcast_border_styles(
            conversion,
            "table",
            StyleValues::new(
                attributes::TABLE_BORDER_COLOR,
                attributes::TABLE_BORDER_STYLE,
                attributes::TABLE_BORDER_WIDTH,
            ),
            StyleValues::new(
                self.defaults.border_color.as_str(),
                self.defaults.border_style.as_str(),
                self.defaults.border_width.as_str(),
            ),
        );

        for (kind, def) in self.properties() {
            match kind {
                TableProperty::Border => {}
                TableProperty::Background => {
                    upcast_style_to_attribute(
                        conversion,
                        StyleToAttribute::new(
                            def.model_attribute,
                            def.style_name,
                            "table",
                            def.default_value.as_str(),
                        ),
                    );
                    upcast_marked_attribute(
                        conversion,
                        def.model_attribute,
                        def.style_name,
                        "table",
                        &def.default_value,
                    );
                }
                TableProperty::Alignment => {
                    upcast_alignment(conversion, wrapper, &def.default_value);
                    downcast_alignment(conversion, def.model_attribute, wrapper);
                    continue;
                }
                TableProperty::Layout => {
                    upcast_style_to_attribute(
                        conversion,
                        StyleToAttribute::new(
                            def.model_attribute,
                            def.style_name,
                            table_or_wrapper(wrapper),
                            def.default_value.as_str(),
                        )
                        .should_upcast(not_wrapped_table(wrapper)),
                    );
                    upcast_marked_attribute(
                        conversion,
                        def.model_attribute,
                        def.style_name,
                        table_or_wrapper(wrapper),
                        &def.default_value,
                    );
                }
            }
            match &def.target {
                TargetResolver::Element => {
                    downcast_table_attribute(conversion, def.model_attribute, def.style_name)
                }
                TargetResolver::Wrapper { name } => {
                    downcast_wrapper_attribute(conversion, def.model_attribute, def.style_name, name)
                }
            }
        }
    }
}

impl Plugin for TablePropertiesEditing {
    fn name(&self) -> &'static str {
        "TablePropertiesEditing"
    }

    fn init(&self, editor: &mut Editor) -> Result<()> {
        let definitions = self.definitions();
        editor
            .schema_mut()
            .extend("table", definitions.iter().map(|def| def.model_attribute));
        self.register_conversion(editor.conversion_mut());
        for def in definitions {
            editor.commands_mut().add(
                def.model_attribute,
                AttributeCommand::new(def.model_attribute, "table", def.default_value),
            );
        }
        Ok(())
    }
}
