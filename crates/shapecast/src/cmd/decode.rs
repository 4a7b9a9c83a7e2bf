use shapecast_schema::SchemaNode;
use shapecast_transform::{Direction, TransformOptions, Transformer, Value};

use crate::cmd::{load_registry, read_input, require_type, TransformArgs};
use crate::exit::{transform_error, CliResult, SUCCESS};
use crate::output::{print_value, OutputFormat};

pub fn run(args: TransformArgs, format: OutputFormat) -> CliResult<i32> {
    run_transform(&args, Direction::Decode, format)
}

/// Shared body of `decode` and `encode`.
pub(crate) fn run_transform(
    args: &TransformArgs,
    direction: Direction,
    format: OutputFormat,
) -> CliResult<i32> {
    let registry = load_registry(&args.registry)?;
    require_type(&registry, &args.type_name)?;
    let input = Value::from(read_input(args)?);

    let engine = Transformer::with_options(
        &registry,
        TransformOptions {
            max_depth: args.max_depth,
            numeric_timestamps: args.numeric_timestamps,
        },
    );
    let output = engine
        .transform(&input, &SchemaNode::reference(&args.type_name), direction)
        .map_err(|err| transform_error(&format!("{direction} {} failed", args.type_name), err))?;

    tracing::debug!(type_name = %args.type_name, %direction, "transform succeeded");
    print_value(&output, format);
    Ok(SUCCESS)
}
