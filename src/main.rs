use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::env;
use std::fs;
use std::path::PathBuf;

use tablesync_config::TableSyncConfig;
use tablesync_engine::{AttributeValue, Editor, ModelNodeId};

/// One `--set` request: a command applied to a table or to a cell.
struct SetRequest {
    command: String,
    value: Option<AttributeValue>,
    cell: bool,
}

fn parse_set(raw: &str, cell: bool) -> Result<SetRequest> {
    let Some((command, value)) = raw.split_once('=') else {
        bail!("--set expects <command>=<value>, got {raw}");
    };
    let value = value.trim();
    Ok(SetRequest {
        command: command.trim().to_string(),
        value: (!value.is_empty()).then(|| AttributeValue::from(value)),
        cell,
    })
}

fn main() -> Result<()> {
    let mut args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        eprintln!(
            "Usage: tablesync <html-file> [--config <toml>] [--table <n>] [--cell <n>] [--set <command>=<value> ...] [--set-cell <command>=<value> ...]"
        );
        bail!("missing <html-file>");
    }

    let input = PathBuf::from(args.remove(0));
    if !input.exists() {
        bail!("input file not found: {}", input.display());
    }

    let mut config_path: Option<PathBuf> = None;
    let mut table_index = 0usize;
    let mut cell_index = 0usize;
    let mut requests: Vec<SetRequest> = Vec::new();
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let Some(next) = args.get(i + 1) else {
            bail!("{flag} expects a value");
        };
        match flag {
            "--config" => config_path = Some(PathBuf::from(next)),
            "--table" => {
                table_index = next
                    .parse()
                    .with_context(|| format!("--table expects an index, got {next}"))?
            }
            "--cell" => {
                cell_index = next
                    .parse()
                    .with_context(|| format!("--cell expects an index, got {next}"))?
            }
            "--set" => requests.push(parse_set(next, false)?),
            "--set-cell" => requests.push(parse_set(next, true)?),
            other => bail!("unknown flag: {other}"),
        }
        i += 2;
    }

    let config = match config_path {
        Some(path) => TableSyncConfig::load_from_file(&path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => TableSyncConfig::load(),
    };

    let html = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mut editor = Editor::new(config)?;
    let upcast = editor.load_html(&html)?;

    let mut mutations = Vec::new();
    for request in requests {
        let node = target_node(&editor, &request, table_index, cell_index)?;
        let applied = editor
            .execute(&request.command, node, request.value)
            .with_context(|| format!("command {} failed", request.command))?;
        mutations.extend(applied);
    }

    let report = json!({
        "upcast": upcast.len(),
        "model": editor.model().to_json(),
        "mutations": serde_json::to_value(&mutations)?,
        "html": Value::String(editor.to_html()),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn target_node(
    editor: &Editor,
    request: &SetRequest,
    table_index: usize,
    cell_index: usize,
) -> Result<ModelNodeId> {
    let (nodes, index, kind) = if request.cell {
        (editor.cells(), cell_index, "cell")
    } else {
        (editor.tables(), table_index, "table")
    };
    nodes
        .get(index)
        .copied()
        .with_context(|| format!("no {kind} at index {index} ({} found)", nodes.len()))
}
