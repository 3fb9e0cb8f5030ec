use tablesync_config::TableSyncConfig;
use tracing::{debug, info};

use crate::commands::{AttributeCommand, CommandRegistry};
use crate::conversion::{Conversion, Mapper, ViewMutation, build_model};
use crate::css::{StyleProcessor, StyleRules};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::model::{
    AttributeChange, AttributeValue, ModelDocument, ModelNodeId, ModelWriter, Schema,
};
use crate::properties::{Plugin, TableCellPropertiesEditing, TablePropertiesEditing};
use crate::view::ViewDocument;
use crate::view::html::{view_from_html, view_to_html};

/// Owns both trees and the conversion wiring between them.
pub struct Editor {
    config: TableSyncConfig,
    processor: StyleProcessor,
    diagnostics: Diagnostics,
    model: ModelDocument,
    view: ViewDocument,
    mapper: Mapper,
    conversion: Conversion,
    commands: CommandRegistry,
}

impl Editor {
    /// Builds an editor with the table and table cell property registrars.
    pub fn new(config: TableSyncConfig) -> Result<Self> {
        let mut editor = Self::bare(config);
        let table = TablePropertiesEditing::from_config(&editor.config);
        let cell = TableCellPropertiesEditing::from_config(&editor.config);
        for plugin in [&table as &dyn Plugin, &cell] {
            plugin.init(&mut editor)?;
            debug!(plugin = plugin.name(), "plugin initialized");
        }
        Ok(editor)
    }

    /// An editor with no properties registered.
    pub fn bare(config: TableSyncConfig) -> Self {
        let processor = StyleProcessor::new(StyleRules::from(&config.style_rules));
        let diagnostics = Diagnostics::from_setting(config.diagnostics.as_deref());
        Self {
            processor,
            model: ModelDocument::new(Schema::default()),
            view: ViewDocument::new(processor),
            mapper: Mapper::new(),
            conversion: Conversion::new(diagnostics.clone()),
            commands: CommandRegistry::default(),
            diagnostics,
            config,
        }
    }

    pub fn config(&self) -> &TableSyncConfig {
        &self.config
    }

    pub fn wrapper_name(&self) -> &str {
        &self.config.view.wrapper_element
    }

    pub fn processor(&self) -> &StyleProcessor {
        &self.processor
    }

    pub fn model(&self) -> &ModelDocument {
        &self.model
    }

    pub fn view(&self) -> &ViewDocument {
        &self.view
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }

    pub fn conversion_mut(&mut self) -> &mut Conversion {
        &mut self.conversion
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        self.model.schema_mut()
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandRegistry {
        &mut self.commands
    }

    /// Replaces the view with `html` and upcasts it into a fresh model.
    pub fn load_html(&mut self, html: &str) -> Result<Vec<AttributeChange>> {
        let view = view_from_html(html, self.processor)?;
        self.load_view(view)
    }

    /// Replaces the view and upcasts it into a fresh model.
    pub fn load_view(&mut self, view: ViewDocument) -> Result<Vec<AttributeChange>> {
        self.view = view;
        self.model.clear();
        self.mapper.clear();
        let nodes = build_model(
            &self.view,
            &mut self.model,
            &mut self.mapper,
            &self.config.view.wrapper_element,
        )?;
        let changes = self
            .conversion
            .upcast()
            .convert(&self.view, &mut self.model, &self.mapper)?;
        if self.diagnostics.enabled("upcast") {
            info!(
                elements = self.view.len(),
                nodes,
                attributes = changes.len(),
                "view loaded"
            );
        }
        Ok(changes)
    }

    /// Runs `f` as one model change and downcasts the resulting attribute
    /// changes. Nothing reaches the view when `f` fails.
    pub fn change<F>(&mut self, f: F) -> Result<Vec<ViewMutation>>
    where
        F: FnOnce(&mut ModelWriter<'_>) -> Result<()>,
    {
        let ((), changes) = self.model.change(f)?;
        self.conversion
            .downcast()
            .convert_changes(&changes, &self.model, &mut self.view, &self.mapper)
    }

    /// Executes the named attribute command on `node`.
    pub fn execute(
        &mut self,
        command: &str,
        node: ModelNodeId,
        value: Option<AttributeValue>,
    ) -> Result<Vec<ViewMutation>> {
        let command: AttributeCommand = self.commands.get(command)?.clone();
        self.change(|writer| command.execute(writer, node, value))
    }

    /// Value the named command reads on `node`.
    pub fn command_value(&self, command: &str, node: ModelNodeId) -> Result<Option<AttributeValue>> {
        Ok(self.commands.get(command)?.value(&self.model, node))
    }

    pub fn tables(&self) -> Vec<ModelNodeId> {
        self.model.nodes_named("table").collect()
    }

    pub fn cells(&self) -> Vec<ModelNodeId> {
        self.model.nodes_named("tableCell").collect()
    }

    pub fn to_html(&self) -> String {
        view_to_html(&self.view)
    }
}
