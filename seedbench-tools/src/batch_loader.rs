use crate::models::{SqlValue, TableDef};
use crate::storage::LoadDestination;
use crate::{Result, SeedbenchError};
use tracing::{debug, info, instrument};

/// What a finished table load amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows: u64,
    pub batches: u64,
}

/// Streams `target_rows` rows into `destination` in batches of `batch_size`.
///
/// `next_row` is called once per row with the zero-based row index, in order.
/// Batches are flushed sequentially and the last one holds whatever remains,
/// so only that one may be smaller than `batch_size`. Each flush is checked
/// against the affected-row count the destination reports; a short write is
/// an error, not a warning.
#[instrument(skip_all, fields(table = table.name))]
pub async fn load_table<D, F>(
    destination: &mut D,
    table: &TableDef,
    target_rows: u64,
    batch_size: usize,
    mut next_row: F,
) -> Result<LoadSummary>
where
    D: LoadDestination,
    F: FnMut(u64) -> Vec<SqlValue>,
{
    if batch_size == 0 {
        return Err(SeedbenchError::InvalidBatchSize);
    }

    let mut rows: Vec<Vec<SqlValue>> = Vec::with_capacity(batch_size);
    let mut inserted: u64 = 0;
    let mut batch_index: u64 = 0;

    while inserted < target_rows {
        let batch_rows = (target_rows - inserted).min(batch_size as u64);

        rows.clear();
        for offset in 0..batch_rows {
            rows.push(next_row(inserted + offset));
        }

        let affected =
            destination
                .insert_rows(table, &rows)
                .await
                .map_err(|source| SeedbenchError::BatchWriteFailed {
                    table: table.name.to_string(),
                    batch_index,
                    source: Box::new(source),
                })?;

        if affected != batch_rows {
            return Err(SeedbenchError::BatchRowCountMismatch {
                table: table.name.to_string(),
                batch_index,
                expected: batch_rows,
                actual: affected,
            });
        }

        debug!(batch_index, rows = batch_rows, "flushed batch");

        inserted += batch_rows;
        batch_index += 1;
    }

    info!(rows = inserted, batches = batch_index, "table populated");

    Ok(LoadSummary {
        rows: inserted,
        batches: batch_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::users_table;
    use crate::test_helpers::RecordingDestination;

    fn index_row(index: u64) -> Vec<SqlValue> {
        vec![
            format!("user.{index}@example.com").into(),
            SqlValue::Integer(index as i64),
        ]
    }

    #[tokio::test]
    async fn splits_rows_into_full_batches_plus_a_final_partial_one() {
        let mut destination = RecordingDestination::new();
        let table = users_table();

        let summary = load_table(&mut destination, &table, 2500, 1000, index_row)
            .await
            .unwrap();

        assert_eq!(summary, LoadSummary { rows: 2500, batches: 3 });
        assert_eq!(destination.batch_sizes_for("users"), vec![1000, 1000, 500]);
    }

    #[tokio::test]
    async fn a_load_smaller_than_one_batch_flushes_once() {
        let mut destination = RecordingDestination::new();
        let table = users_table();

        let summary = load_table(&mut destination, &table, 200, 1000, index_row)
            .await
            .unwrap();

        assert_eq!(summary, LoadSummary { rows: 200, batches: 1 });
        assert_eq!(destination.batch_sizes_for("users"), vec![200]);
    }

    #[tokio::test]
    async fn an_exact_multiple_produces_no_partial_batch() {
        let mut destination = RecordingDestination::new();
        let table = users_table();

        let summary = load_table(&mut destination, &table, 3000, 1000, index_row)
            .await
            .unwrap();

        assert_eq!(summary, LoadSummary { rows: 3000, batches: 3 });
        assert_eq!(destination.batch_sizes_for("users"), vec![1000, 1000, 1000]);
    }

    #[tokio::test]
    async fn a_zero_row_target_never_touches_the_destination() {
        let mut destination = RecordingDestination::new();
        let table = users_table();

        let summary = load_table(&mut destination, &table, 0, 1000, index_row)
            .await
            .unwrap();

        assert_eq!(summary, LoadSummary { rows: 0, batches: 0 });
        assert!(destination.batches.is_empty());
    }

    #[tokio::test]
    async fn rejects_a_zero_batch_size() {
        let mut destination = RecordingDestination::new();
        let table = users_table();

        let err = load_table(&mut destination, &table, 100, 0, index_row)
            .await
            .unwrap_err();

        assert!(matches!(err, SeedbenchError::InvalidBatchSize));
        assert!(destination.batches.is_empty());
    }

    #[tokio::test]
    async fn rows_are_generated_in_index_order() {
        let mut destination = RecordingDestination::new();
        let table = users_table();

        load_table(&mut destination, &table, 2300, 1000, index_row)
            .await
            .unwrap();

        let indexes: Vec<i64> = destination
            .rows_for("users")
            .iter()
            .map(|row| match row[1] {
                SqlValue::Integer(index) => index,
                ref other => panic!("unexpected value {other:?}"),
            })
            .collect();

        let expected: Vec<i64> = (0..2300).collect();
        assert_eq!(indexes, expected);
    }

    #[tokio::test]
    async fn a_failed_flush_stops_the_load_at_that_batch() {
        let mut destination = RecordingDestination::new();
        destination.fail_on_batch = Some(1);
        let table = users_table();

        let err = load_table(&mut destination, &table, 2500, 1000, index_row)
            .await
            .unwrap_err();

        match err {
            SeedbenchError::BatchWriteFailed {
                table, batch_index, ..
            } => {
                assert_eq!(table, "users");
                assert_eq!(batch_index, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }

        // Only the first batch made it in before the failure.
        assert_eq!(destination.batch_sizes_for("users"), vec![1000]);
    }

    #[tokio::test]
    async fn a_short_write_is_reported_as_a_mismatch() {
        let mut destination = RecordingDestination::new();
        destination.misreport_affected = Some(7);
        let table = users_table();

        let err = load_table(&mut destination, &table, 500, 1000, index_row)
            .await
            .unwrap_err();

        match err {
            SeedbenchError::BatchRowCountMismatch {
                table,
                batch_index,
                expected,
                actual,
            } => {
                assert_eq!(table, "users");
                assert_eq!(batch_index, 0);
                assert_eq!(expected, 500);
                assert_eq!(actual, 7);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
