//! Parser configuration.

/// Default limit on grammar nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Resource limits applied to a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject inputs longer than this many bytes. `None` means unlimited.
    pub max_input_bytes: Option<usize>,
    /// Maximum nesting of expressions, predicates and queries.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input size limit.
    #[must_use]
    pub const fn max_input_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_input_bytes = limit;
        self
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.max_input_bytes, None);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_builder_setters() {
        let options = ParseOptions::new().max_input_bytes(Some(1024)).max_depth(16);
        assert_eq!(options.max_input_bytes, Some(1024));
        assert_eq!(options.max_depth, 16);
    }
}
