use crate::models::{SqlValue, TableDef};
use crate::Result;

mod postgres;
mod sql_file;

pub use postgres::PostgresDestination;
pub use sql_file::{apply_sql_script, SqlFileDestination};

/// Somewhere generated rows can be loaded into.
///
/// Destinations receive DDL and batches of rows in the order the loader
/// produces them and are free to turn them into live tables or a SQL script.
pub trait LoadDestination: Send {
    /// Applies schema statements, such as dropping and recreating a table.
    fn apply_ddl(&mut self, sql: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Inserts one batch of rows into `table` and returns how many rows the
    /// destination actually took.
    fn insert_rows(
        &mut self,
        table: &TableDef,
        rows: &[Vec<SqlValue>],
    ) -> impl std::future::Future<Output = Result<u64>> + Send;

    fn begin_transaction(&mut self) -> impl std::future::Future<Output = Result<()>> + Send;

    fn commit_transaction(&mut self) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Called once after the last table finished loading.
    fn finish(&mut self) -> impl std::future::Future<Output = Result<()>> + Send;
}
