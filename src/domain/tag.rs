use crate::boundary::BoundaryWarning;
use crate::domain::version::{is_newer, Convention, Version};
use crate::error::TagBumpError;
use git2::Oid;
use tracing::{debug, warn};

/// A tag as enumerated from the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    /// Commit the tag points at (annotated tags already peeled)
    pub target: Oid,
}

impl TagRef {
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        TagRef {
            name: name.into(),
            target,
        }
    }
}

/// A tag whose name parsed as a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    pub name: String,
    pub target: Oid,
    pub version: Version,
}

/// Outcome of latest-tag discovery
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// `None` stands for the implicit zero version
    pub latest: Option<ParsedTag>,
    /// Tags that were skipped because they could not be parsed
    pub warnings: Vec<BoundaryWarning>,
}

impl Discovery {
    /// Version of the latest tag, or zero when nothing matched
    pub fn latest_version(&self) -> Version {
        self.latest
            .as_ref()
            .map(|tag| tag.version.clone())
            .unwrap_or_else(Version::zero)
    }
}

/// Find the newest tag among `tags` whose version passes `filter`.
///
/// Unparsable tags are skipped and reported, never fatal. Among equal
/// versions the one enumerated last wins.
pub fn find_latest<F>(tags: &[TagRef], convention: Convention, filter: F) -> Discovery
where
    F: Fn(&Version) -> bool,
{
    tags.iter().fold(Discovery::default(), |mut acc, tag| {
        match Version::parse(&tag.name, convention) {
            Ok(version) if filter(&version) => {
                let newer = acc
                    .latest
                    .as_ref()
                    .map_or(true, |current| is_newer(&version, &current.version));
                if newer {
                    acc.latest = Some(ParsedTag {
                        name: tag.name.clone(),
                        target: tag.target,
                        version,
                    });
                }
            }
            Ok(_) => debug!(tag = %tag.name, "tag outside the selected release line"),
            Err(e) => {
                warn!(tag = %tag.name, "skipping tag: {}", e);
                let reason = match e {
                    TagBumpError::MalformedTag { reason, .. } => reason,
                    other => other.to_string(),
                };
                acc.warnings.push(BoundaryWarning::UnparsableTag {
                    tag: tag.name.clone(),
                    reason,
                });
            }
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReleaseLine;

    fn oid(n: u8) -> Oid {
        Oid::from_bytes(&[n; 20]).unwrap()
    }

    fn tags(names: &[&str]) -> Vec<TagRef> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| TagRef::new(*name, oid(i as u8 + 1)))
            .collect()
    }

    #[test]
    fn test_find_latest_legacy() {
        let tags = tags(&["v1.2.3-4", "v1.2.3-10", "v1.2.2-50", "v0.9.0"]);
        let found = find_latest(&tags, Convention::Legacy, |_| true);
        assert_eq!(found.latest.unwrap().name, "v1.2.3-10");
    }

    #[test]
    fn test_find_latest_empty_is_zero() {
        let found = find_latest(&[], Convention::Legacy, |_| true);
        assert!(found.latest.is_none());
        assert_eq!(found.latest_version(), Version::zero());
    }

    #[test]
    fn test_unparsable_tags_are_skipped() {
        let tags = tags(&["nightly", "v1.0.0", "1.2", "v1.0.1-01"]);
        let found = find_latest(&tags, Convention::SemVer, |_| true);

        assert_eq!(found.latest.unwrap().name, "v1.0.0");
        assert_eq!(found.warnings.len(), 3);
        assert!(found.warnings.iter().any(|w| matches!(
            w,
            BoundaryWarning::UnparsableTag { tag, .. } if tag == "nightly"
        )));
    }

    #[test]
    fn test_pre_release_below_release() {
        let tags = tags(&["1.0.0", "1.0.0-rc.1"]);
        let found = find_latest(&tags, Convention::SemVer, |_| true);
        assert_eq!(found.latest.unwrap().name, "1.0.0");
    }

    #[test]
    fn test_ties_keep_last_enumerated() {
        let tags = tags(&["1.0.0", "v1.0.0"]);
        let found = find_latest(&tags, Convention::Legacy, |_| true);
        let latest = found.latest.unwrap();
        assert_eq!(latest.name, "v1.0.0");
        assert_eq!(latest.target, oid(2));
    }

    #[test]
    fn test_release_line_filter() {
        let line = ReleaseLine::new(2, 5);
        let tags = tags(&["2.5.0", "2.5.1", "2.6.0"]);
        let found = find_latest(&tags, Convention::SemVer, |v| line.contains(v));
        assert_eq!(found.latest.unwrap().name, "2.5.1");
        assert!(found.warnings.is_empty());
    }
}
