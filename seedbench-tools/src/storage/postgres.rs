use crate::models::{SqlValue, TableDef};
use crate::postgres_client_wrapper::PostgresClientWrapper;
use crate::storage::LoadDestination;
use crate::Result;

/// Loads generated data straight into a live Postgres instance.
///
/// Batches arrive as multi-row insert statements, one statement per batch,
/// so every batch is applied atomically on its own.
pub struct PostgresDestination<'a> {
    connection: &'a PostgresClientWrapper,
}

impl<'a> PostgresDestination<'a> {
    pub fn new(connection: &'a PostgresClientWrapper) -> Self {
        PostgresDestination { connection }
    }
}

impl LoadDestination for PostgresDestination<'_> {
    async fn apply_ddl(&mut self, sql: &str) -> Result<()> {
        self.connection.execute_non_query(sql).await?;
        Ok(())
    }

    async fn insert_rows(&mut self, table: &TableDef, rows: &[Vec<SqlValue>]) -> Result<u64> {
        let statement = table.get_insert_statement(rows);
        let affected = self.connection.execute_returning_count(&statement).await?;
        Ok(affected)
    }

    async fn begin_transaction(&mut self) -> Result<()> {
        self.connection.execute_non_query("begin;").await?;
        Ok(())
    }

    async fn commit_transaction(&mut self) -> Result<()> {
        self.connection.execute_non_query("commit;").await?;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
