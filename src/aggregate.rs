//! Record aggregation and comparison.

use crate::codec::types::{Record, TopologySummary};

/// Running aggregate of a module's records.
///
/// Holds the byte image of a topology summary. The first job's topology is
/// kept as representative; later records leave it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRecord {
    image: [u8; TopologySummary::SIZE],
}

impl Default for AggregateRecord {
    fn default() -> Self {
        AggregateRecord {
            image: [0; TopologySummary::SIZE],
        }
    }
}

impl AggregateRecord {
    pub fn as_bytes(&self) -> &[u8] {
        &self.image
    }

    /// The aggregate read back as a topology summary.
    pub fn summary(&self) -> TopologySummary {
        bytemuck::pod_read_unaligned(&self.image)
    }
}

/// Folds `record` into `acc`.
///
/// When `is_first` is set the first `TopologySummary::SIZE` bytes of the
/// record's image replace the aggregate. Otherwise nothing changes.
pub fn fold(record: &Record, acc: &mut AggregateRecord, is_first: bool) {
    if is_first {
        acc.image
            .copy_from_slice(&record.as_bytes()[..TopologySummary::SIZE]);
    }
}

/// Result of comparing two records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub lines: Vec<String>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Compares two records. This module reports no differences.
pub fn diff(_a: &Record, _name_a: &str, _b: &Record, _name_b: &str) -> DiffReport {
    DiffReport::default()
}
