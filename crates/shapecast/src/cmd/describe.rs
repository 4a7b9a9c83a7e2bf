use shapecast_schema::{to_definition, SchemaNode};

use crate::cmd::{load_registry, require_type, DescribeArgs};
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_json, table, OutputFormat};

pub fn run(args: DescribeArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = load_registry(&args.registry)?;
    require_type(&registry, &args.type_name)?;
    let node = registry
        .resolve(&args.type_name)
        .map_err(|err| schema_error("describe failed", err))?;

    match (format, node) {
        (OutputFormat::Table, SchemaNode::Object(object)) => {
            let rows = object.fields.iter().map(|field| {
                vec![
                    field.external.clone(),
                    field.internal.clone(),
                    field.schema.describe(),
                ]
            });
            println!("{}", table(vec!["EXTERNAL", "INTERNAL", "TYPE"], rows));
        }
        (OutputFormat::Table, other) => println!("{}: {}", args.type_name, other.describe()),
        (OutputFormat::Raw, other) => println!("{}", other.describe()),
        (OutputFormat::Json | OutputFormat::Pretty, other) => {
            let mut document = serde_json::Map::new();
            document.insert(args.type_name.clone(), to_definition(other));
            print_json(&document, format);
        }
    }
    Ok(SUCCESS)
}
