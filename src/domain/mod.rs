//! Domain logic - pure versioning rules independent of git operations

pub mod branch;
pub mod policy;
pub mod summary;
pub mod tag;
pub mod version;

pub use branch::ReleaseLine;
pub use policy::{plan_next, BumpPolicy, NextVersion, PolicyKind};
pub use summary::{summarize, NOTHING_NEW};
pub use tag::{find_latest, Discovery, ParsedTag, TagRef};
pub use version::{is_newer, Convention, Suffix, Version};
