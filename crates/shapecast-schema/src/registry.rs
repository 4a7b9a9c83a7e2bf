use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::check::check_types;
use crate::config::RegistryConfig;
use crate::definition::parse_definitions;
use crate::error::{Result, SchemaError};
use crate::node::SchemaNode;

const DEFINITION_SUFFIX: &str = ".schema.json";

/// Mutable staging area for schema definitions.
///
/// Types are collected here and validated as a whole by [`build`](Self::build),
/// which produces the read-only [`SchemaRegistry`].
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    types: HashMap<String, SchemaNode>,
    config: RegistryConfig,
}

impl SchemaRegistryBuilder {
    /// Create an empty builder with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty builder with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            types: HashMap::new(),
            config,
        }
    }

    /// Register a single named type.
    pub fn register(&mut self, name: impl Into<String>, node: SchemaNode) -> Result<()> {
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(SchemaError::DuplicateType(name));
        }
        self.types.insert(name, node);
        Ok(())
    }

    /// Register every type of a definition document.
    pub fn register_json(&mut self, definitions_json: &str) -> Result<()> {
        let definitions = parse_definitions(definitions_json, self.config.strict_mode)?;
        self.register_definitions(definitions)
    }

    /// Register already-parsed `(name, node)` pairs.
    pub fn register_definitions<I>(&mut self, definitions: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, SchemaNode)>,
    {
        for (name, node) in definitions {
            self.register(name, node)?;
        }
        Ok(())
    }

    /// Load every `*.schema.json` definition document in a directory.
    ///
    /// Returns the number of files loaded.
    pub fn load_directory(&mut self, path: &Path) -> Result<usize> {
        let mut loaded_file_count = 0usize;

        let mut entries = std::fs::read_dir(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if !file_name.to_ascii_lowercase().ends_with(DEFINITION_SUFFIX) {
                continue;
            }

            let entry_path = entry.path();
            let path_metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_type = path_metadata.file_type();

            if file_type.is_symlink() {
                return Err(SchemaError::LoadFailed(format!(
                    "refusing to load definition symlink: {file_name}"
                )));
            }
            if !file_type.is_file() {
                continue;
            }

            loaded_file_count = loaded_file_count.saturating_add(1);
            if loaded_file_count > self.config.max_files_from_directory {
                return Err(SchemaError::LoadFailed(format!(
                    "definition file count exceeds configured max ({}): {}",
                    self.config.max_files_from_directory, loaded_file_count
                )));
            }

            let file = std::fs::File::open(&entry_path).map_err(|err| {
                SchemaError::LoadFailed(format!(
                    "failed opening definitions {}: {err}",
                    entry_path.display()
                ))
            })?;
            let opened_metadata = file
                .metadata()
                .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;

            #[cfg(unix)]
            {
                if !same_file_identity(&path_metadata, &opened_metadata) {
                    return Err(SchemaError::LoadFailed(format!(
                        "definition file changed during load: {file_name}"
                    )));
                }
            }

            if opened_metadata.len() > self.config.max_definition_file_size as u64 {
                return Err(SchemaError::LoadFailed(format!(
                    "definition file too large ({} bytes): {file_name}",
                    opened_metadata.len()
                )));
            }

            let max_bytes = self.config.max_definition_file_size;
            let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
            let mut content = String::new();
            file.take(read_limit)
                .read_to_string(&mut content)
                .map_err(|err| {
                    SchemaError::LoadFailed(format!(
                        "failed reading definitions {}: {err}",
                        entry_path.display()
                    ))
                })?;
            if content.len() > max_bytes {
                return Err(SchemaError::LoadFailed(format!(
                    "definition file too large while reading: {file_name}"
                )));
            }

            tracing::debug!(file = %file_name, "loading schema definitions");
            self.register_json(&content)?;
        }

        Ok(loaded_file_count)
    }

    /// Validate the collected types and freeze them.
    pub fn build(self) -> Result<SchemaRegistry> {
        check_types(&self.types)?;
        tracing::debug!(types = self.types.len(), "schema registry frozen");
        Ok(SchemaRegistry {
            types: self.types,
            config: self.config,
        })
    }

    /// Get builder configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

/// Name-keyed, read-only collection of schema definitions.
///
/// Every reference inside a registry resolves to a registered type; this is
/// checked when the registry is built.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    types: HashMap<String, SchemaNode>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// Build a registry from embedded definition documents.
    pub fn from_embedded(documents: &[&str]) -> Result<Self> {
        let mut builder = SchemaRegistryBuilder::new();
        for document in documents {
            builder.register_json(document)?;
        }
        builder.build()
    }

    /// Build a registry from a directory of definition documents.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, RegistryConfig::default())
    }

    /// Build a registry from a directory with explicit config.
    pub fn from_directory_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let mut builder = SchemaRegistryBuilder::with_config(config);
        builder.load_directory(path)?;
        builder.build()
    }

    /// Look up a type by name.
    pub fn resolve(&self, name: &str) -> Result<&SchemaNode> {
        self.types
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    /// Check if a type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered types, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.names()
            .into_iter()
            .map(move |name| (name, &self.types[name]))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}
