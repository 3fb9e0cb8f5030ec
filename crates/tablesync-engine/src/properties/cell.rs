use tablesync_config::{NormalizedDefaults, TableSyncConfig};

use super::{Plugin, PropertyDefinition, attributes};
use crate::commands::AttributeCommand;
use crate::conversion::{Conversion, Matcher};
use crate::converters::{
    StyleToAttribute, StyleValues, TargetResolver, downcast_attribute_to_style,
    upcast_border_styles, upcast_style_to_attribute,
};
use crate::editor::Editor;
use crate::error::Result;

/// View elements a table cell converts from.
const CELL_ELEMENTS: [&str; 2] = ["td", "th"];

/// Table cell properties. Every cell property is rendered on the cell's own
/// element.
#[derive(Debug, Clone)]
pub struct TableCellPropertiesEditing {
    defaults: NormalizedDefaults,
}

impl TableCellPropertiesEditing {
    pub fn new(defaults: NormalizedDefaults) -> Self {
        Self { defaults }
    }

    pub fn from_config(config: &TableSyncConfig) -> Self {
        Self::new(config.table_cell_defaults())
    }

    pub fn defaults(&self) -> &NormalizedDefaults {
        &self.defaults
    }

    pub fn definitions(&self) -> Vec<PropertyDefinition> {
        let d = &self.defaults;
        [
            (attributes::TABLE_CELL_BORDER_STYLE, "border-style", &d.border_style),
            (attributes::TABLE_CELL_BORDER_COLOR, "border-color", &d.border_color),
            (attributes::TABLE_CELL_BORDER_WIDTH, "border-width", &d.border_width),
            (
                attributes::TABLE_CELL_BACKGROUND_COLOR,
                "background-color",
                &d.background_color,
            ),
            (attributes::TABLE_CELL_PADDING, "padding", &d.padding),
            (attributes::TABLE_CELL_WIDTH, "width", &d.width),
            (attributes::TABLE_CELL_HEIGHT, "height", &d.height),
            (
                attributes::TABLE_CELL_VERTICAL_ALIGNMENT,
                "vertical-align",
                &d.vertical_alignment,
            ),
        ]
        .into_iter()
        .map(|(key, style, default)| {
            PropertyDefinition::new(key, style, default.as_str(), TargetResolver::Element)
        })
        .collect()
    }

    fn register_conversion(&self, conversion: &mut Conversion) -> Result<()> {
        for element in CELL_ELEMENTS {
            upcast_border_styles(
                conversion,
                element,
                StyleValues::new(
                    attributes::TABLE_CELL_BORDER_COLOR,
                    attributes::TABLE_CELL_BORDER_STYLE,
                    attributes::TABLE_CELL_BORDER_WIDTH,
                ),
                StyleValues::new(
                    self.defaults.border_color.as_str(),
                    self.defaults.border_style.as_str(),
                    self.defaults.border_width.as_str(),
                ),
            );
        }

        let cell = Matcher::pattern("^(td|th)$")?;
        for def in self.definitions() {
            let is_border = matches!(
                def.model_attribute,
                attributes::TABLE_CELL_BORDER_STYLE
                    | attributes::TABLE_CELL_BORDER_COLOR
                    | attributes::TABLE_CELL_BORDER_WIDTH
            );
            if !is_border {
                let mut options = StyleToAttribute::new(
                    def.model_attribute,
                    def.style_name,
                    cell.clone(),
                    def.default_value.as_str(),
                );
                if def.model_attribute == attributes::TABLE_CELL_PADDING {
                    options = options.reduce_box_sides();
                }
                upcast_style_to_attribute(conversion, options);
            }
            downcast_attribute_to_style(conversion, "tableCell", def.model_attribute, def.style_name);
        }
        Ok(())
    }
}

impl Plugin for TableCellPropertiesEditing {
    fn name(&self) -> &'static str {
        "TableCellPropertiesEditing"
    }

    fn init(&self, editor: &mut Editor) -> Result<()> {
        let definitions = self.definitions();
        editor
            .schema_mut()
            .extend("tableCell", definitions.iter().map(|def| def.model_attribute));
        self.register_conversion(editor.conversion_mut())?;
        for def in definitions {
            editor.commands_mut().add(
                def.model_attribute,
                AttributeCommand::new(def.model_attribute, "tableCell", def.default_value),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_defaults_include_vertical_alignment() {
        let editing = TableCellPropertiesEditing::from_config(&TableSyncConfig::default());
        assert_eq!(editing.defaults().vertical_alignment, "middle");
        assert_eq!(editing.defaults().alignment, "");

        let definitions = editing.definitions();
        assert_eq!(definitions.len(), 8);
        assert!(definitions.iter().all(|def| def.target == TargetResolver::Element));
    }
}
