use shapecast_transform::Direction;

use crate::cmd::decode::run_transform;
use crate::cmd::TransformArgs;
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub fn run(args: TransformArgs, format: OutputFormat) -> CliResult<i32> {
    run_transform(&args, Direction::Encode, format)
}
