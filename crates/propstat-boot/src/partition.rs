use std::ops::Range;

use propstat_core::errors::{ErrorInfo, PropError};
use serde::{Deserialize, Serialize};

/// Frame counts of the contiguous sub-runs that make up the data.
///
/// Group `i` owns frames `[offset_i, offset_i + count_i)` where `offset_i` is
/// the sum of the preceding counts. Resampling never crosses these bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct GroupPartition {
    counts: Vec<usize>,
}

impl GroupPartition {
    /// Builds a partition from per-group frame counts, all of them positive.
    pub fn new(counts: Vec<usize>) -> Result<Self, PropError> {
        if counts.is_empty() {
            return Err(PropError::validation(
                "empty_partition",
                "partition must contain at least one group",
            ));
        }
        if let Some(group) = counts.iter().position(|&count| count == 0) {
            return Err(PropError::Validation(
                ErrorInfo::new("empty_group", "partition groups must hold at least one frame")
                    .with_context("group", group),
            ));
        }
        Ok(Self { counts })
    }

    /// A single group spanning `total` frames.
    pub fn single(total: usize) -> Result<Self, PropError> {
        Self::new(vec![total])
    }

    /// Per-group frame counts.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.counts.len()
    }

    /// Total number of frames covered.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Checks that the partition covers exactly `total` frames.
    pub fn check_total(&self, total: usize) -> Result<(), PropError> {
        if self.total() != total {
            return Err(PropError::Validation(
                ErrorInfo::new(
                    "partition_sum",
                    "partition counts do not sum to the number of frames",
                )
                .with_context("partition_total", self.total())
                .with_context("frames", total)
                .with_hint("pass one count per concatenated sub-run"),
            ));
        }
        Ok(())
    }

    /// Absolute frame ranges of each group, in order.
    pub fn spans(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.counts.iter().scan(0usize, |offset, &count| {
            let span = *offset..*offset + count;
            *offset += count;
            Some(span)
        })
    }
}

impl TryFrom<Vec<usize>> for GroupPartition {
    type Error = PropError;

    fn try_from(counts: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(counts)
    }
}

impl From<GroupPartition> for Vec<usize> {
    fn from(partition: GroupPartition) -> Self {
        partition.counts
    }
}
