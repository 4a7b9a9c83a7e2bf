/// Controls transform behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Maximum nesting depth of arrays and objects below the root.
    pub max_depth: usize,
    /// When true, a number reaching a date node is read as epoch milliseconds
    /// instead of being rejected.
    pub numeric_timestamps: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            numeric_timestamps: false,
        }
    }
}
