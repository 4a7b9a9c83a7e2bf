/// Controls how schema definitions are loaded into a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, object definitions without an explicit `additional` policy
    /// reject undeclared keys instead of carrying them through.
    pub strict_mode: bool,
    /// Maximum number of definition files loaded from a directory.
    pub max_files_from_directory: usize,
    /// Maximum bytes allowed per definition file loaded from a directory.
    pub max_definition_file_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            max_files_from_directory: 256,
            max_definition_file_size: 256 * 1024,
        }
    }
}
