use crate::{Result, SeedbenchError};
use rand::Rng;
use std::collections::HashMap;

/// The contiguous id range `[1, max]` of a fully populated table.
///
/// Ids are assigned by serial primary keys on freshly created tables, so
/// after `n` rows have been loaded the live ids are exactly `1..=n`.
#[derive(Debug, Clone, Copy)]
pub struct IdRange {
    max: i64,
}

impl IdRange {
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Uniform draw from the range. Every value returned here refers to a row
    /// that already exists, which is what keeps generated foreign keys valid.
    pub fn sample(&self, rng: &mut impl Rng) -> i64 {
        rng.gen_range(1..=self.max)
    }
}

/// Tracks which tables have been populated and how many rows each holds.
///
/// Tables register here right after their load finishes. Asking for a range
/// before that is a bug in the loading order and fails rather than handing
/// out ids that do not exist yet.
#[derive(Debug, Default)]
pub struct IdRegistry {
    ranges: HashMap<String, IdRange>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, table: &str, row_count: u64) {
        self.ranges.insert(
            table.to_string(),
            IdRange {
                max: row_count as i64,
            },
        );
    }

    pub fn range(&self, table: &str) -> Result<IdRange> {
        let range = self
            .ranges
            .get(table)
            .ok_or_else(|| SeedbenchError::TableNotPopulated(table.to_string()))?;

        if range.max == 0 {
            return Err(SeedbenchError::EmptyIdSpace(table.to_string()));
        }

        Ok(*range)
    }
}
