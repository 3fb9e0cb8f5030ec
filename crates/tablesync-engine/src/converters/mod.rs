//! Table property conversion rules for both directions.

mod downcast;
mod upcast;

pub use downcast::{
    AttributeToView, TargetResolver, ValueMap, WriteForm, alignment_to_view, downcast_alignment,
    downcast_attribute, downcast_attribute_to_style, downcast_table_attribute,
    downcast_wrapper_attribute,
};
pub use upcast::{
    AttributeToAttribute, CELL_MARKER_CLASSES, CellRawAttribute, GuardFn, StyleToAttribute,
    StyleValues, ValueFn, not_wrapped_table, table_or_wrapper, upcast_alignment,
    upcast_attribute_to_attribute, upcast_border_styles, upcast_marked_attribute,
    upcast_style_to_attribute,
};
