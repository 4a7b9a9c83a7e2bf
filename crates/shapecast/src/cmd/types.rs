use serde::Serialize;
use shapecast_schema::SchemaNode;

use crate::cmd::{load_registry, TypesArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, table, OutputFormat};

#[derive(Serialize)]
struct TypeSummary<'a> {
    name: &'a str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<usize>,
    description: String,
}

pub fn run(args: TypesArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = load_registry(&args.registry)?;
    let mut summaries: Vec<TypeSummary<'_>> = registry
        .iter()
        .map(|(name, node)| TypeSummary {
            name,
            kind: node.kind_name(),
            fields: match node {
                SchemaNode::Object(object) => Some(object.fields.len()),
                _ => None,
            },
            description: node.describe(),
        })
        .collect();
    summaries.sort_by(|a, b| a.name.cmp(b.name));

    match format {
        OutputFormat::Json | OutputFormat::Pretty => print_json(&summaries, format),
        OutputFormat::Table => {
            let rows = summaries.iter().map(|summary| {
                vec![
                    summary.name.to_string(),
                    summary.kind.to_string(),
                    summary.fields.map(|n| n.to_string()).unwrap_or_default(),
                    summary.description.clone(),
                ]
            });
            let headers = vec!["NAME", "KIND", "FIELDS", "DESCRIPTION"];
            println!("{}", table(headers, rows));
        }
        OutputFormat::Raw => {
            for summary in &summaries {
                println!("{}", summary.name);
            }
        }
    }
    Ok(SUCCESS)
}
