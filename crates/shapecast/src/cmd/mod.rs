use clap::{Args, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use shapecast_schema::{RegistryConfig, SchemaRegistry, SchemaRegistryBuilder};

use crate::exit::{io_error, schema_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod describe;
pub mod encode;
pub mod envinfo;
pub mod types;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate external JSON and convert it to its internal form.
    Decode(TransformArgs),
    /// Validate an internal value and convert it to its external JSON form.
    Encode(TransformArgs),
    /// List the registered types.
    Types(TypesArgs),
    /// Print the definition of one type.
    Describe(DescribeArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Types(args) => types::run(args, format),
        Command::Describe(args) => describe::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

/// Where the registry's types come from.
#[derive(Args, Debug, Default)]
pub struct RegistryArgs {
    /// Directory of `*.schema.json` definition documents to load.
    #[arg(long, value_name = "DIR", env = "SHAPECAST_SCHEMA_DIR")]
    pub schema_dir: Option<PathBuf>,
    /// Reject undeclared keys in objects that leave `additional` unspecified.
    #[arg(long)]
    pub strict: bool,
    /// Leave out the built-in job and task types.
    #[arg(long)]
    pub no_builtin: bool,
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Registered type to transform against.
    #[arg(value_name = "TYPE")]
    pub type_name: String,
    /// Inline JSON input.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read JSON input from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Read numbers reaching a date as epoch milliseconds.
    #[arg(long)]
    pub numeric_timestamps: bool,
    /// Maximum nesting depth of the input.
    #[arg(long, value_name = "N", default_value_t = 256)]
    pub max_depth: usize,
    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Args, Debug)]
pub struct TypesArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Registered type to describe.
    #[arg(value_name = "TYPE")]
    pub type_name: String,
    #[command(flatten)]
    pub registry: RegistryArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// Assemble and freeze the registry selected by the flags.
pub fn load_registry(args: &RegistryArgs) -> CliResult<SchemaRegistry> {
    let mut builder = SchemaRegistryBuilder::with_config(RegistryConfig {
        strict_mode: args.strict,
        ..RegistryConfig::default()
    });

    if !args.no_builtin {
        shapecast_jobs::register_builtin(&mut builder)
            .map_err(|err| schema_error("built-in types failed to load", err))?;
    }

    if let Some(dir) = &args.schema_dir {
        std::fs::read_dir(dir).map_err(|err| {
            io_error(&format!("cannot read schema directory {}", dir.display()), err)
        })?;
        let files = builder
            .load_directory(dir)
            .map_err(|err| schema_error("schema load failed", err))?;
        tracing::debug!(dir = %dir.display(), files, "loaded schema directory");
    }

    builder
        .build()
        .map_err(|err| schema_error("schema registry is invalid", err))
}

/// Read the input document from `--json`, `--file`, or stdin.
pub fn read_input(args: &TransformArgs) -> CliResult<serde_json::Value> {
    let (source, text) = if let Some(json) = &args.json {
        ("--json".to_string(), json.clone())
    } else if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        (path.display().to_string(), text)
    } else {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| io_error("failed reading stdin", err))?;
        ("stdin".to_string(), text)
    };

    serde_json::from_str(&text)
        .map_err(|err| CliError::new(USAGE, format!("{source} is not valid JSON: {err}")))
}

/// Fail with a usage error unless `type_name` is registered.
pub fn require_type(registry: &SchemaRegistry, type_name: &str) -> CliResult<()> {
    if registry.contains(type_name) {
        return Ok(());
    }
    Err(CliError::new(
        USAGE,
        format!(
            "unknown type {type_name:?} (known types: {})",
            registry.names().join(", ")
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_is_loaded_by_default() {
        let registry = load_registry(&RegistryArgs::default()).unwrap();
        assert!(registry.contains("JobSearchResponse"));
        assert!(registry.contains("Task"));
    }

    #[test]
    fn no_builtin_gives_an_empty_registry() {
        let registry = load_registry(&RegistryArgs {
            no_builtin: true,
            ..RegistryArgs::default()
        })
        .unwrap();
        assert!(registry.is_empty());
        assert_eq!(require_type(&registry, "Task").unwrap_err().code, USAGE);
    }

    #[test]
    fn missing_schema_dir_is_a_usage_error() {
        let err = load_registry(&RegistryArgs {
            schema_dir: Some(PathBuf::from("/nonexistent/shapecast-schemas")),
            ..RegistryArgs::default()
        })
        .unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn inline_json_must_parse() {
        let args = TransformArgs {
            type_name: "Task".to_string(),
            json: Some("{not json".to_string()),
            file: None,
            numeric_timestamps: false,
            max_depth: 256,
            registry: RegistryArgs::default(),
        };
        let err = read_input(&args).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("--json is not valid JSON"));
    }
}
