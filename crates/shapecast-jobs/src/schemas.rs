use std::sync::LazyLock;

use shapecast_schema::{Result, SchemaRegistry, SchemaRegistryBuilder};

/// Definition document for the built-in job search and task types.
pub const BUILTIN_DEFINITIONS: &str = include_str!("../schemas/jobs.schema.json");

/// Root type of a job search response body.
pub const JOB_SEARCH_RESPONSE: &str = "JobSearchResponse";
/// A single job listing.
pub const JOB_POSTING: &str = "JobPosting";
/// A task record.
pub const TASK: &str = "Task";

static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    build_registry().expect("built-in job definitions should be valid")
});

/// Process-wide registry holding the built-in types, built on first use.
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

/// Add the built-in types to `builder`, next to caller-defined ones.
pub fn register_builtin(builder: &mut SchemaRegistryBuilder) -> Result<()> {
    builder.register_json(BUILTIN_DEFINITIONS)
}

/// Build a fresh registry holding only the built-in types.
pub fn build_registry() -> Result<SchemaRegistry> {
    let mut builder = SchemaRegistry::builder();
    register_builtin(&mut builder)?;
    builder.build()
}

#[cfg(test)]
mod tests {
    use shapecast_schema::{SchemaError, SchemaNode};

    use super::*;

    #[test]
    fn builtin_definitions_build() {
        let registry = build_registry().unwrap();
        for name in [
            JOB_SEARCH_RESPONSE,
            "SearchParameters",
            JOB_POSTING,
            "JobHighlights",
            "JobRequiredEducation",
            "JobRequiredExperience",
            "JobEmploymentType",
            "JobCountry",
            "JobState",
            TASK,
        ] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.len(), 10);
    }

    #[test]
    fn shared_registry_is_built_once() {
        assert!(std::ptr::eq(registry(), registry()));
        assert!(registry().contains(JOB_POSTING));
    }

    #[test]
    fn country_is_restricted_to_us() {
        assert_eq!(
            registry().resolve("JobCountry").unwrap(),
            &SchemaNode::literals(["US"])
        );
    }

    #[test]
    fn builtin_types_clash_with_same_named_custom_types() {
        let mut builder = SchemaRegistry::builder();
        builder.register("Task", SchemaNode::string()).unwrap();
        assert!(matches!(
            register_builtin(&mut builder),
            Err(SchemaError::DuplicateType(name)) if name == "Task"
        ));
    }
}
