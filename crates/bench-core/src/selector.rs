//! Choosing which stored versions a fresh run is compared against.
//!
//! A run on version `M.m.p` is compared against at most three earlier
//! patches of `M.m` and the newest patch of each of the two previous
//! minors of `M`.

use std::collections::BTreeMap;
use std::fmt;

use bench_types::{BaselineRecord, Version};

/// Earlier patches of the current minor to compare against.
pub const MAX_PATCH_COMPARISONS: usize = 3;
/// Previous minors of the current major to compare against.
pub const MAX_MINOR_COMPARISONS: usize = 2;

/// Why a baseline was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonKind {
    Patch,
    Minor,
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonKind::Patch => f.write_str("patch"),
            ComparisonKind::Minor => f.write_str("minor"),
        }
    }
}

/// A stored baseline chosen for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedBaseline {
    pub kind: ComparisonKind,
    pub version: Version,
    pub record: BaselineRecord,
}

/// Select comparison baselines for a run on `current`.
///
/// Records for the current release string and unsupported records are never
/// selected. Patch selections come first, newest first, then minor
/// selections, newest minor first.
pub fn select_comparisons(current: &Version, records: &[BaselineRecord]) -> Vec<SelectedBaseline> {
    let candidates = records
        .iter()
        .filter(|r| r.id.engine_version != current.raw)
        .filter(|r| r.digest().is_supported())
        .map(|r| (r.version(), r));

    let mut patches = Vec::new();
    let mut newest_per_minor: BTreeMap<u64, (Version, &BaselineRecord)> = BTreeMap::new();

    for (version, record) in candidates {
        if version.same_minor(current) {
            patches.push((version, record));
        } else if version.major == current.major && version.minor < current.minor {
            let replace = newest_per_minor
                .get(&version.minor)
                .map_or(true, |(best, _)| version > *best);
            if replace {
                newest_per_minor.insert(version.minor, (version, record));
            }
        }
    }

    patches.sort_by(|a, b| Version::cmp_desc(&a.0, &b.0));

    let patch_selections = patches
        .into_iter()
        .take(MAX_PATCH_COMPARISONS)
        .map(|(version, record)| SelectedBaseline {
            kind: ComparisonKind::Patch,
            version,
            record: record.clone(),
        });
    let minor_selections = newest_per_minor
        .into_values()
        .rev()
        .take(MAX_MINOR_COMPARISONS)
        .map(|(version, record)| SelectedBaseline {
            kind: ComparisonKind::Minor,
            version,
            record: record.clone(),
        });

    patch_selections.chain(minor_selections).collect()
}
