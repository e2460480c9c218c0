//! Domain values - plain inputs to git operations, built per call

pub mod changelog;
pub mod commit;
pub mod push;
pub mod repo;
pub mod tag;

pub use changelog::ChangelogSpec;
pub use commit::{CommitSpec, StageAllSpec};
pub use push::{PushSpec, PushTarget};
pub use repo::RepoRef;
pub use tag::{TagPattern, TagSpec};
