use serde::Serialize;

use crate::cmd::{load_registry, EnvinfoArgs, RegistryArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct EnvInfoOutput {
    schema_id: &'static str,
    version: &'static str,
    target: &'static str,
    registry: RegistryInfo,
}

/// What the registry flags resolve to in this environment.
#[derive(Serialize)]
struct RegistryInfo {
    builtin_types: usize,
    schema_dir: Option<String>,
    strict: bool,
    loaded_types: Option<usize>,
    load_error: Option<String>,
}

pub fn run(args: EnvinfoArgs, format: OutputFormat) -> CliResult<i32> {
    let output = EnvInfoOutput {
        schema_id: "https://schemas.3leaps.dev/shapecast/cli/v1/envinfo.schema.json",
        version: env!("CARGO_PKG_VERSION"),
        target: option_env!("SHAPECAST_BUILD_TARGET").unwrap_or("unknown"),
        registry: registry_info(&args.registry),
    };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table | OutputFormat::Pretty => print_text(&output),
        OutputFormat::Raw => println!("{}", output.version),
    }
    Ok(SUCCESS)
}

/// Try the registry the flags describe. A load failure is reported, not fatal.
fn registry_info(args: &RegistryArgs) -> RegistryInfo {
    let (loaded_types, load_error) = match load_registry(args) {
        Ok(registry) => (Some(registry.len()), None),
        Err(err) => (None, Some(err.message)),
    };
    let builtin_types = if args.no_builtin {
        0
    } else {
        shapecast_jobs::registry().len()
    };

    RegistryInfo {
        builtin_types,
        schema_dir: args.schema_dir.as_ref().map(|dir| dir.display().to_string()),
        strict: args.strict,
        loaded_types,
        load_error,
    }
}

fn print_text(output: &EnvInfoOutput) {
    let registry = &output.registry;
    println!("shapecast {} ({})\n", output.version, output.target);
    println!("  Built-in types: {}", registry.builtin_types);
    println!(
        "  Schema dir:     {}",
        registry.schema_dir.as_deref().unwrap_or("(none)")
    );
    println!("  Strict:         {}", registry.strict);
    match (&registry.loaded_types, &registry.load_error) {
        (Some(count), _) => println!("  Loaded types:   {count}"),
        (None, Some(err)) => println!("  Load error:     {err}"),
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envinfo_json_reports_registry() {
        let out = EnvInfoOutput {
            schema_id: "x",
            version: "0.1.0",
            target: "x86_64-unknown-linux-gnu",
            registry: registry_info(&RegistryArgs::default()),
        };

        let json = serde_json::to_string(&out).expect("envinfo output should serialize");
        assert!(json.contains("\"schema_id\""));
        assert!(json.contains("\"builtin_types\":10"));
        assert!(json.contains("\"loaded_types\":10"));
    }

    #[test]
    fn no_builtin_reports_empty_registry() {
        let info = registry_info(&RegistryArgs {
            no_builtin: true,
            ..RegistryArgs::default()
        });
        assert_eq!(info.builtin_types, 0);
        assert_eq!(info.loaded_types, Some(0));
    }

    #[test]
    fn broken_schema_dir_is_reported_not_fatal() {
        let info = registry_info(&RegistryArgs {
            schema_dir: Some("/nonexistent/shapecast-schemas".into()),
            ..RegistryArgs::default()
        });
        assert_eq!(info.loaded_types, None);
        assert!(info.load_error.is_some());
    }
}
