use std::io::Write;

use anyhow::{Context, Result};
use tablesync_config::TableSyncConfig;
use tablesync_engine::{AttributeValue, Editor, attributes};

fn config_from(toml: &str) -> Result<TableSyncConfig> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "{toml}")?;
    Ok(TableSyncConfig::load_from_file(file.path())?)
}

#[test]
fn configured_wrapper_element_receives_layout_properties() -> Result<()> {
    let config = config_from(
        r#"
[view]
wrapper_element = "section"
"#,
    )?;
    let mut editor = Editor::new(config)?;
    editor.load_html(r#"<section style="height:90px"><table></table></section>"#)?;
    let table = *editor.tables().first().context("no table")?;
    assert_eq!(
        editor.model().get(table)?.attribute(attributes::TABLE_HEIGHT),
        Some(&AttributeValue::from("90px"))
    );

    editor.execute(attributes::TABLE_WIDTH, table, Some("25%".into()))?;
    let html = editor.to_html();
    assert!(html.starts_with("<section"), "{html}");
    assert!(html.contains("width:25%"), "{html}");
    Ok(())
}

#[test]
fn configured_defaults_suppress_matching_values() -> Result<()> {
    let config = config_from(
        r#"
diagnostics = "upcast,downcast"

[table.default_properties]
background_color = "white"
width = "100%"
"#,
    )?;
    let mut editor = Editor::new(config)?;
    let changes = editor.load_html(
        r#"<figure class="table" style="width:100%"><table style="background-color:white"></table></figure>"#,
    )?;
    assert!(changes.is_empty());

    let table = *editor.tables().first().context("no table")?;
    assert_eq!(
        editor.command_value(attributes::TABLE_WIDTH, table)?,
        None
    );

    editor.execute(attributes::TABLE_BACKGROUND_COLOR, table, Some("white".into()))?;
    assert_eq!(
        editor
            .model()
            .get(table)?
            .attribute(attributes::TABLE_BACKGROUND_COLOR),
        None
    );
    Ok(())
}
