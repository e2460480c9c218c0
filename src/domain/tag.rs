use crate::template;

/// Everything needed to create an annotated tag
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagSpec {
    pub name: String,
    pub annotation: String,
    pub extra_args: Vec<String>,
}

impl TagSpec {
    pub fn new(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        TagSpec {
            name: name.into(),
            annotation: annotation.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

/// Tag naming pattern (e.g., "v${version}", "release-{version}", "v%s")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        TagPattern {
            pattern: pattern.into(),
        }
    }

    /// Format a version according to pattern
    /// Example: pattern="v${version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &str) -> String {
        let vars = template::vars([("version", version)]);
        template::render(&self.pattern, &vars).replacen("%s", version, 1)
    }
}
