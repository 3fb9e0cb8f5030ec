//! Property registrars: each logical table or cell property gets its schema
//! entry, one upcast rule, one downcast rule and a command, all sharing the
//! same default value and target element.

mod cell;
mod table;

pub use cell::TableCellPropertiesEditing;
pub use table::TablePropertiesEditing;

use crate::converters::TargetResolver;
use crate::editor::Editor;
use crate::error::Result;

/// Model attribute names produced by the registrars.
pub mod attributes {
    pub const TABLE_BORDER_STYLE: &str = "tableBorderStyle";
    pub const TABLE_BORDER_COLOR: &str = "tableBorderColor";
    pub const TABLE_BORDER_WIDTH: &str = "tableBorderWidth";
    pub const TABLE_BACKGROUND_COLOR: &str = "tableBackgroundColor";
    pub const TABLE_ALIGNMENT: &str = "tableAlignment";
    pub const TABLE_WIDTH: &str = "tableWidth";
    pub const TABLE_HEIGHT: &str = "tableHeight";

    pub const TABLE_CELL_BORDER_STYLE: &str = "tableCellBorderStyle";
    pub const TABLE_CELL_BORDER_COLOR: &str = "tableCellBorderColor";
    pub const TABLE_CELL_BORDER_WIDTH: &str = "tableCellBorderWidth";
    pub const TABLE_CELL_BACKGROUND_COLOR: &str = "tableCellBackgroundColor";
    pub const TABLE_CELL_PADDING: &str = "tableCellPadding";
    pub const TABLE_CELL_WIDTH: &str = "tableCellWidth";
    pub const TABLE_CELL_HEIGHT: &str = "tableCellHeight";
    pub const TABLE_CELL_VERTICAL_ALIGNMENT: &str = "tableCellVerticalAlignment";
}

/// Prefix of every marker class.
pub const MARKER_CLASS_PREFIX: &str = "ck-custom-";

/// `ck-custom-<style_name>`: the class recording an explicitly authored value.
pub fn marker_class(style_name: &str) -> String {
    format!("{MARKER_CLASS_PREFIX}{style_name}")
}

/// One logical property as wired by a registrar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub model_attribute: &'static str,
    pub style_name: &'static str,
    pub default_value: String,
    pub target: TargetResolver,
}

impl PropertyDefinition {
    pub fn new(
        model_attribute: &'static str,
        style_name: &'static str,
        default_value: impl Into<String>,
        target: TargetResolver,
    ) -> Self {
        Self {
            model_attribute,
            style_name,
            default_value: default_value.into(),
            target,
        }
    }
}

/// Editor feature wired once at construction.
pub trait Plugin {
    fn name(&self) -> &'static str;

    fn init(&self, editor: &mut Editor) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_class_is_prefixed_style_name() {
        assert_eq!(marker_class("border-width"), "ck-custom-border-width");
        assert_eq!(marker_class("alignment"), "ck-custom-alignment");
    }
}
