use std::path::PathBuf;

/// A commit to record, relative to the context working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSpec {
    pub path: PathBuf,
    pub message: String,
    pub extra_args: Vec<String>,
}

impl CommitSpec {
    /// Commit in the context working directory itself
    pub fn new(message: impl Into<String>) -> Self {
        CommitSpec {
            path: PathBuf::from("."),
            message: message.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn in_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }
}

/// Stage everything below a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageAllSpec {
    pub base_dir: PathBuf,
    /// Also pick up files git does not track yet
    pub add_untracked_files: bool,
}

impl Default for StageAllSpec {
    fn default() -> Self {
        StageAllSpec {
            base_dir: PathBuf::from("."),
            add_untracked_files: false,
        }
    }
}
