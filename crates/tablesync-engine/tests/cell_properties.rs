use anyhow::{Context, Result};
use tablesync_config::TableSyncConfig;
use tablesync_engine::{AttributeValue, BoxSides, Editor, ModelNodeId, attributes};

fn table_with_cell(cell: &str) -> String {
    format!(r#"<figure class="table"><table><tbody><tr>{cell}</tr></tbody></table></figure>"#)
}

fn first_cell(editor: &Editor) -> Result<ModelNodeId> {
    editor.cells().first().copied().context("no cell in model")
}

fn attribute(editor: &Editor, node: ModelNodeId, key: &str) -> Result<Option<AttributeValue>> {
    Ok(editor.model().get(node)?.attribute(key).cloned())
}

#[test]
fn cell_styles_upcast_to_cell_attributes() -> Result<()> {
    let mut editor = Editor::new(TableSyncConfig::default())?;
    editor.load_html(&table_with_cell(
        r#"<td style="border:1px dotted blue;background-color:yellow;padding:2px 4px;vertical-align:top;width:80px">x</td>"#,
    ))?;
    let cell = first_cell(&editor)?;

    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_BORDER_STYLE)?,
        Some(AttributeValue::from("dotted"))
    );
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_BORDER_COLOR)?,
        Some(AttributeValue::from("blue"))
    );
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_BORDER_WIDTH)?,
        Some(AttributeValue::from("1px"))
    );
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_BACKGROUND_COLOR)?,
        Some(AttributeValue::from("yellow"))
    );
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_PADDING)?,
        Some(AttributeValue::Sides(BoxSides::new("2px", "4px", "2px", "4px")))
    );
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_VERTICAL_ALIGNMENT)?,
        Some(AttributeValue::from("top"))
    );
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_WIDTH)?,
        Some(AttributeValue::from("80px"))
    );
    Ok(())
}

#[test]
fn uniform_padding_is_reduced() -> Result<()> {
    let mut editor = Editor::new(TableSyncConfig::default())?;
    editor.load_html(&table_with_cell(r#"<th style="padding:5px">h</th>"#))?;
    let cell = first_cell(&editor)?;
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_PADDING)?,
        Some(AttributeValue::from("5px"))
    );
    Ok(())
}

#[test]
fn default_vertical_alignment_is_not_upcast() -> Result<()> {
    let mut editor = Editor::new(TableSyncConfig::default())?;
    editor.load_html(&table_with_cell(r#"<td style="vertical-align:middle">x</td>"#))?;
    let cell = first_cell(&editor)?;
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_VERTICAL_ALIGNMENT)?,
        None
    );
    Ok(())
}

#[test]
fn class_gated_raw_attributes_map_onto_the_cell() -> Result<()> {
    let mut editor = Editor::new(TableSyncConfig::default())?;
    editor.load_html(&table_with_cell(
        r#"<td class="ck-custom-border-style ck-custom-height" border-style="double" height="40px" data-note="kept">x</td>"#,
    ))?;
    let cell = first_cell(&editor)?;

    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_BORDER_STYLE)?,
        Some(AttributeValue::from("double"))
    );
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_HEIGHT)?,
        Some(AttributeValue::from("40px"))
    );
    let written = editor
        .model()
        .get(cell)?
        .attributes()
        .map(|(key, _)| key.to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        written,
        vec![
            attributes::TABLE_CELL_BORDER_STYLE.to_string(),
            attributes::TABLE_CELL_HEIGHT.to_string()
        ]
    );
    Ok(())
}

#[test]
fn raw_attributes_without_marker_classes_are_ignored() -> Result<()> {
    let mut editor = Editor::new(TableSyncConfig::default())?;
    editor.load_html(&table_with_cell(r#"<td border-style="double">x</td>"#))?;
    let cell = first_cell(&editor)?;
    assert_eq!(
        attribute(&editor, cell, attributes::TABLE_CELL_BORDER_STYLE)?,
        None
    );
    Ok(())
}

#[test]
fn cell_downcast_writes_to_the_cell_element() -> Result<()> {
    let mut editor = Editor::new(TableSyncConfig::default())?;
    editor.load_html(&table_with_cell("<td>x</td>"))?;
    let cell = first_cell(&editor)?;
    let cell_view = editor
        .mapper()
        .to_view_element(cell)
        .context("cell is mapped")?;

    editor.execute(
        attributes::TABLE_CELL_BACKGROUND_COLOR,
        cell,
        Some("#eee".into()),
    )?;
    let element = editor.view().get(cell_view)?;
    assert!(element.has_class("ck-custom-background-color"));
    assert_eq!(element.style("background-color"), Some("#eee"));
    assert_eq!(element.attribute("background-color"), Some("#eee"));

    editor.execute(attributes::TABLE_CELL_BACKGROUND_COLOR, cell, Some("".into()))?;
    let element = editor.view().get(cell_view)?;
    assert!(!element.has_class("ck-custom-background-color"));
    assert!(!element.has_style("background-color"));
    assert!(!element.has_attribute("background-color"));
    Ok(())
}

#[test]
fn cell_properties_survive_a_round_trip() -> Result<()> {
    let mut editor = Editor::new(TableSyncConfig::default())?;
    editor.load_html(&table_with_cell("<td>x</td>"))?;
    let cell = first_cell(&editor)?;

    let values = [
        (attributes::TABLE_CELL_BORDER_COLOR, AttributeValue::from("red")),
        (
            attributes::TABLE_CELL_BORDER_WIDTH,
            AttributeValue::Sides(BoxSides::new("1px", "2px", "1px", "2px")),
        ),
        (
            attributes::TABLE_CELL_PADDING,
            AttributeValue::Sides(BoxSides::new("1px", "2px", "3px", "4px")),
        ),
        (attributes::TABLE_CELL_VERTICAL_ALIGNMENT, AttributeValue::from("bottom")),
        (attributes::TABLE_CELL_HEIGHT, AttributeValue::from("30px")),
    ];
    for (key, value) in &values {
        editor.execute(key, cell, Some(value.clone()))?;
    }
    let html = editor.to_html();

    let mut reloaded = Editor::new(TableSyncConfig::default())?;
    reloaded.load_html(&html)?;
    let reloaded_cell = first_cell(&reloaded)?;
    for (key, value) in &values {
        assert_eq!(
            attribute(&reloaded, reloaded_cell, key)?.as_ref(),
            Some(value),
            "{key} after round trip through {html}"
        );
    }
    Ok(())
}
