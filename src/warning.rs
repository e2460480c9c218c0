use std::fmt;

/// Non-fatal problems raised by git operations.
/// The release may still proceed; these are reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationWarning {
    /// `git add` failed for the given paths
    StageFailed { files: Vec<String> },
    /// Restoring paths to their HEAD content failed
    ResetFailed { files: Vec<String> },
    /// The commit had nothing to record
    NothingToCommit,
    /// Tag creation failed, most likely because it is already there
    TagMayExist { tag: String },
}

impl fmt::Display for OperationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationWarning::StageFailed { files } => {
                write!(f, "Could not stage {}", files.join(", "))
            }
            OperationWarning::ResetFailed { files } => {
                write!(f, "Could not reset {}", files.join(", "))
            }
            OperationWarning::NothingToCommit => {
                write!(f, "No changes to commit. The latest commit will be tagged.")
            }
            OperationWarning::TagMayExist { tag } => {
                write!(f, "Could not tag. Does tag '{}' already exist?", tag)
            }
        }
    }
}
