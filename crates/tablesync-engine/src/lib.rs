//! Bidirectional conversion of table formatting properties between a
//! semantic model and a styled view tree.
//!
//! A property such as "this table's border is 2px solid red" lives once in
//! the model as `tableBorderWidth`, `tableBorderColor` and `tableBorderStyle`.
//! The view renders it as styles on the element plus a `ck-custom-<style>`
//! marker class recording that the value was set explicitly.

pub mod commands;
pub mod conversion;
pub mod converters;
pub mod css;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod model;
pub mod properties;
pub mod view;

pub use commands::{AttributeCommand, CommandRegistry};
pub use conversion::{Conversion, Mapper, Matcher, MatcherPattern, ModelMutation, Priority, ViewMutation};
pub use css::{BoxSides, Side, StyleProcessor, StyleRules, StyleValue, reduce_box_sides};
pub use diagnostics::Diagnostics;
pub use editor::Editor;
pub use error::{Error, Result};
pub use model::{AttributeChange, AttributeValue, ModelDocument, ModelNode, ModelNodeId, Schema};
pub use properties::{
    PropertyDefinition, TableCellPropertiesEditing, TablePropertiesEditing, attributes,
    marker_class,
};
pub use view::{ViewDocument, ViewElement, ViewElementId};

pub use tablesync_config::TableSyncConfig;
