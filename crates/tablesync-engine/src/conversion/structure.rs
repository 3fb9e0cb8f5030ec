use tracing::debug;

use super::Mapper;
use crate::error::Result;
use crate::model::{ModelDocument, ModelNodeId};
use crate::view::{ViewDocument, ViewElementId};

/// Model node type for a view element name, if the element is structural.
fn model_name_for(view_name: &str) -> Option<&'static str> {
    match view_name {
        "table" => Some("table"),
        "tr" => Some("tableRow"),
        "td" | "th" => Some("tableCell"),
        _ => None,
    }
}

/// Creates model nodes for the table structure of `view` and binds them in
/// `mapper`. A `table` inside a `wrapper_name` element also binds the wrapper
/// to the table node (view to model only), so rules on the wrapper write to
/// the table. Returns the number of nodes created.
pub fn build_model(
    view: &ViewDocument,
    model: &mut ModelDocument,
    mapper: &mut Mapper,
    wrapper_name: &str,
) -> Result<usize> {
    let mut created = 0;
    for root in view.roots() {
        created += visit(view, model, mapper, wrapper_name, *root, None)?;
    }
    debug!(nodes = created, "structural conversion finished");
    Ok(created)
}

fn visit(
    view: &ViewDocument,
    model: &mut ModelDocument,
    mapper: &mut Mapper,
    wrapper_name: &str,
    id: ViewElementId,
    model_parent: Option<ModelNodeId>,
) -> Result<usize> {
    let element = view.get(id)?;
    let mut created = 0;
    let mut parent = model_parent;
    if let Some(name) = model_name_for(element.name()) {
        let node = model.create_node(name, model_parent)?;
        mapper.bind_elements(node, id);
        if name == "table" && view.is_wrapped(id, wrapper_name) {
            if let Some(wrapper) = element.parent() {
                mapper.bind_view_to_model(wrapper, node);
            }
        }
        parent = Some(node);
        created += 1;
    }
    for child in element.children() {
        created += visit(view, model, mapper, wrapper_name, *child, parent)?;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::StyleProcessor;
    use crate::view::html::view_from_html;

    #[test]
    fn wrapped_table_binds_both_elements() {
        let view = view_from_html(
            "<figure class=\"table\"><table><tbody><tr><td>a</td><th>b</th></tr></tbody></table></figure>",
            StyleProcessor::default(),
        )
        .unwrap();
        let mut model = ModelDocument::default();
        let mut mapper = Mapper::new();

        let created = build_model(&view, &mut model, &mut mapper, "figure").unwrap();
        assert_eq!(created, 4);

        let figure = view.roots()[0];
        let table_view = view.get(figure).unwrap().children()[0];
        let table = mapper.to_model_element(table_view).expect("table node");
        assert_eq!(mapper.to_model_element(figure), Some(table));
        assert_eq!(mapper.to_view_element(table), Some(table_view));

        let names = model.nodes().map(|node| node.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["table", "tableRow", "tableCell", "tableCell"]);
        let row = model.get(table).unwrap().children()[0];
        assert_eq!(model.get(row).unwrap().children().len(), 2);
    }

    #[test]
    fn bare_table_has_no_wrapper_binding() {
        let view = view_from_html("<div><table></table></div>", StyleProcessor::default()).unwrap();
        let mut model = ModelDocument::default();
        let mut mapper = Mapper::new();
        build_model(&view, &mut model, &mut mapper, "figure").unwrap();

        let div = view.roots()[0];
        assert_eq!(mapper.to_model_element(div), None);
        assert_eq!(model.nodes_named("table").count(), 1);
    }
}
