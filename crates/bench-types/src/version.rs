//! Engine release versions.
//!
//! Versions are parsed from the `major.minor.patch` prefix of a release
//! string. Strings without such a prefix (e.g. `"unknown"`) normalize to
//! `0.0.0` and keep the original text in `raw`, so they still group and
//! display as opaque tags.

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

static VERSION_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();

fn version_prefix() -> Option<&'static Regex> {
    VERSION_PREFIX
        .get_or_init(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)").ok())
        .as_ref()
}

/// A parsed engine release version.
///
/// Equality and ordering consider only the numeric `(major, minor, patch)`
/// tuple. Use [`Version::raw`] when the exact release string matters, e.g.
/// as a storage key.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Original release string, untouched
    pub raw: String,
}

impl Version {
    /// Parse a release string. Never fails; unparsable input maps to `0.0.0`.
    pub fn parse(raw: &str) -> Self {
        let parsed = version_prefix()
            .and_then(|re| re.captures(raw))
            .and_then(|caps| {
                let major = caps[1].parse().ok()?;
                let minor = caps[2].parse().ok()?;
                let patch = caps[3].parse().ok()?;
                Some((major, minor, patch))
            });
        let (major, minor, patch) = parsed.unwrap_or((0, 0, 0));

        Self {
            major,
            minor,
            patch,
            raw: raw.to_string(),
        }
    }

    /// Numeric tuple used for ordering.
    pub fn tuple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// True iff this version is `>= major.minor.patch`.
    pub fn is_at_least(&self, major: u64, minor: u64, patch: u64) -> bool {
        self.tuple() >= (major, minor, patch)
    }

    /// True when both versions share `major.minor`.
    pub fn same_minor(&self, other: &Version) -> bool {
        self.major == other.major && self.minor == other.minor
    }

    /// Most-recent-first comparator for sorting.
    pub fn cmp_desc(a: &Version, b: &Version) -> Ordering {
        b.cmp(a)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.tuple() == other.tuple()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tuple().cmp(&other.tuple())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Version::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_prefix_compiles() {
        assert!(version_prefix().is_some());
        assert!(version_prefix().is_some_and(|re| re.is_match("10.0.1")));
    }

    #[test]
    fn test_parse_full_version() {
        let v = Version::parse("4.12.2");
        assert_eq!(v.tuple(), (4, 12, 2));
        assert_eq!(v.raw, "4.12.2");
    }

    #[test]
    fn test_parse_with_suffix() {
        let v = Version::parse("4.11.0-rc.1");
        assert_eq!(v.tuple(), (4, 11, 0));
        assert_eq!(v.to_string(), "4.11.0-rc.1");
    }

    #[test]
    fn test_unparsable_falls_back_to_zero() {
        let v = Version::parse("unknown");
        assert_eq!(v.tuple(), (0, 0, 0));
        assert_eq!(v.raw, "unknown");

        let partial = Version::parse("4.12");
        assert_eq!(partial.tuple(), (0, 0, 0));
    }

    #[test]
    fn test_ordering_is_numeric_not_lexical() {
        assert!(Version::parse("4.10.0") > Version::parse("4.9.9"));
        assert!(Version::parse("4.12.10") > Version::parse("4.12.9"));
        assert!(Version::parse("5.0.0") > Version::parse("4.99.99"));
    }

    #[test]
    fn test_compare_is_strict_weak_ordering() {
        let versions: Vec<Version> = ["4.12.2", "4.12.1", "4.11.9", "unknown", "0.0.0", "5.0.0"]
            .iter()
            .map(|s| Version::parse(s))
            .collect();

        for a in &versions {
            assert_eq!(a.cmp(a), Ordering::Equal);
            for b in &versions {
                // antisymmetric
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
                for c in &versions {
                    if a.cmp(b) != Ordering::Greater && b.cmp(c) != Ordering::Greater {
                        assert_ne!(a.cmp(c), Ordering::Greater, "transitivity: {a} {b} {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_cmp_desc_sorts_most_recent_first() {
        let mut versions: Vec<Version> = ["4.10.7", "4.12.1", "4.11.9", "4.12.0"]
            .iter()
            .map(|s| Version::parse(s))
            .collect();
        versions.sort_by(Version::cmp_desc);
        let raws: Vec<&str> = versions.iter().map(|v| v.raw.as_str()).collect();
        assert_eq!(raws, vec!["4.12.1", "4.12.0", "4.11.9", "4.10.7"]);
    }

    #[test]
    fn test_is_at_least() {
        let v = Version::parse("4.11.3");
        assert!(v.is_at_least(4, 11, 0));
        assert!(v.is_at_least(4, 11, 3));
        assert!(!v.is_at_least(4, 11, 4));
        assert!(!v.is_at_least(4, 12, 0));
        assert!(v.is_at_least(3, 99, 99));
        assert!(!Version::parse("unknown").is_at_least(4, 11, 0));
    }

    #[test]
    fn test_same_minor() {
        let current = Version::parse("4.12.2");
        assert!(current.same_minor(&Version::parse("4.12.0")));
        assert!(!current.same_minor(&Version::parse("4.11.2")));
        assert!(!current.same_minor(&Version::parse("3.12.2")));
    }
}
