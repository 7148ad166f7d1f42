use crate::models::{SqlValue, TableDef};
use crate::postgres_client_wrapper::{FromRow, PostgresClientWrapper};
use crate::storage::LoadDestination;
use crate::SeedbenchError;
use std::panic::{RefUnwindSafe, UnwindSafe};
use tokio_postgres::error::SqlState;
use tokio_postgres::types::FromSqlOwned;
use uuid::Uuid;

/// A helper for running tests that require a database.
///
/// This will automatically create a new database for each test,
/// and drop it when the test is done, if the test succeeded.
///
/// All the methods on this struct unwraps errors directly to make it easier to write tests.
pub struct TestHelper {
    /// The name of the test database
    pub test_db_name: String,
    /// The main connection used against the database
    main_connection: PostgresClientWrapper,
    /// An identifier for the test helper
    helper_name: String,
    /// The port of the Postgres instance that was connected to.
    pub port: u16,
    /// If the database was cleaned up nicely
    cleaned_up_nicely: bool,
}

impl Drop for TestHelper {
    /// Drops the test helper, cleaning up the database if the test succeeded.
    fn drop(&mut self) {
        if self.cleaned_up_nicely {
            return;
        }

        if std::thread::panicking() {
            eprintln!("Thread is panicking when dropping test helper. Leaving database '{}' ({}) around to be inspected", self.test_db_name, self.helper_name);
        } else {
            let db_name = self.test_db_name.clone();
            let port = self.port;
            std::thread::spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .unwrap();
                runtime.block_on(cleanup(&db_name, port));
            })
            .join()
            .expect("Failed to run test helper cleanup from drop");
        }
    }
}

impl RefUnwindSafe for TestHelper {}

impl UnwindSafe for TestHelper {}

/// Creates a new test helper, using a random database name.
/// This connects to Postgres on the default port 5432.
pub async fn get_test_helper(name: &str) -> TestHelper {
    get_test_helper_on_port(name, 5432).await
}

/// Creates a new test helper, using a random database name and a specific port.
pub async fn get_test_helper_on_port(name: &str, port: u16) -> TestHelper {
    let id = Uuid::new_v4().simple().to_string();

    let test_db_name = format!("test_db_{}", id);
    {
        let conn = get_test_connection_on_port("postgres", port).await;

        conn.execute_non_query(&format!("create database {}", test_db_name))
            .await
            .expect("Failed to create test database");
    }

    let conn = get_test_connection_on_port(&test_db_name, port).await;

    TestHelper {
        test_db_name,
        main_connection: conn,
        helper_name: name.to_string(),
        port,
        cleaned_up_nicely: false,
    }
}

impl TestHelper {
    /// Executes a query that does not return any results.
    pub async fn execute_not_query(&self, sql: &str) {
        self.get_conn()
            .execute_non_query(sql)
            .await
            .unwrap_or_else(|e| panic!("Failed to execute non query: {:?}\n{}", e, sql));
    }

    /// Executes a query that returns results.
    pub async fn get_results<T: FromRow>(&self, sql: &str) -> Vec<T> {
        self.get_conn()
            .get_results(sql)
            .await
            .unwrap_or_else(|e| panic!("Failed to get results for query: {:?}\n{}", e, sql))
    }

    /// Executes a query that returns a single column.
    pub async fn get_single_results<T: FromSqlOwned>(&self, sql: &str) -> Vec<T> {
        self.get_results::<(T,)>(sql)
            .await
            .into_iter()
            .map(|t| t.0)
            .collect()
    }

    /// Executes a query that returns a single row result.
    pub async fn get_result<T: FromRow>(&self, sql: &str) -> T {
        let results = self.get_results(sql).await;
        assert_eq!(results.len(), 1, "Expected one result, got {}", results.len());
        results.into_iter().next().unwrap()
    }

    /// Executes a query that returns a single column of a single row result.
    pub async fn get_single_result<T: FromSqlOwned>(&self, sql: &str) -> T {
        let result = self.get_result::<(T,)>(sql).await;
        result.0
    }

    /// Gets the underlying connection to the database.
    pub fn get_conn(&self) -> &PostgresClientWrapper {
        &self.main_connection
    }

    /// Stops the test helper, cleaning up the database.
    pub async fn stop(mut self) {
        cleanup(&self.test_db_name, self.port).await;
        self.cleaned_up_nicely = true;
    }
}

/// Gets a connection to the specified database on the specified port.
async fn get_test_connection_on_port(database_name: &str, port: u16) -> PostgresClientWrapper {
    let connection_string = format!(
        "host=localhost port={port} user=postgres password=passw0rd dbname={database_name}"
    );

    PostgresClientWrapper::new(&connection_string)
        .await
        .expect("Connection to test database failed. Is postgres running?")
}

async fn cleanup(db_name: &str, port: u16) {
    let conn = get_test_connection_on_port("postgres", port).await;
    let version: i32 = conn
        .get_single_result::<String>("show server_version_num;")
        .await
        .unwrap()
        .parse()
        .unwrap();
    if version >= 130000 {
        conn.execute_non_query(&format!("drop database {} with (force);", db_name))
            .await
            .expect("Failed to drop test database");
    } else {
        conn.execute_non_query(&format!("SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}' AND pid != pg_backend_pid()", db_name))
            .await
            .expect("Failed to drop test database");
        conn.execute_non_query(&format!("drop database {};", db_name))
            .await
            .expect("Failed to drop test database");
    }
}

/// Assert that the specified Postgres error occurred.
pub fn assert_pg_error(result: crate::Result, code: SqlState) {
    match result {
        Err(SeedbenchError::PostgresErrorWithQuery { source, .. }) => {
            assert_eq!(*source.as_db_error().unwrap().code(), code);
        }
        _ => {
            panic!("Expected PostgresErrorWithQuery, got {:?}", result);
        }
    }
}

/// A destination that keeps everything it is handed in memory, with hooks
/// for making a chosen batch fail or report a wrong affected count.
pub struct RecordingDestination {
    pub statements: Vec<String>,
    /// Every flushed batch in arrival order, as (table name, rows).
    pub batches: Vec<(String, Vec<Vec<SqlValue>>)>,
    pub transactions_begun: usize,
    pub transactions_committed: usize,
    pub finished: bool,
    /// Fail the flush with this position in the overall batch sequence.
    pub fail_on_batch: Option<usize>,
    /// Report this affected-row count instead of the real one.
    pub misreport_affected: Option<u64>,
}

impl RecordingDestination {
    pub fn new() -> Self {
        RecordingDestination {
            statements: vec![],
            batches: vec![],
            transactions_begun: 0,
            transactions_committed: 0,
            finished: false,
            fail_on_batch: None,
            misreport_affected: None,
        }
    }

    /// The sizes of the batches that arrived for `table`, in order.
    pub fn batch_sizes_for(&self, table: &str) -> Vec<usize> {
        self.batches
            .iter()
            .filter(|(batch_table, _)| batch_table == table)
            .map(|(_, rows)| rows.len())
            .collect()
    }

    /// All rows that arrived for `table`, flattened across batches.
    pub fn rows_for(&self, table: &str) -> Vec<Vec<SqlValue>> {
        self.batches
            .iter()
            .filter(|(batch_table, _)| batch_table == table)
            .flat_map(|(_, rows)| rows.clone())
            .collect()
    }
}

impl LoadDestination for RecordingDestination {
    async fn apply_ddl(&mut self, sql: &str) -> crate::Result<()> {
        self.statements.push(sql.to_string());
        Ok(())
    }

    async fn insert_rows(&mut self, table: &TableDef, rows: &[Vec<SqlValue>]) -> crate::Result<u64> {
        if self.fail_on_batch == Some(self.batches.len()) {
            return Err(std::io::Error::other("injected batch failure").into());
        }

        self.batches.push((table.name.to_string(), rows.to_vec()));

        if let Some(affected) = self.misreport_affected {
            return Ok(affected);
        }

        Ok(rows.len() as u64)
    }

    async fn begin_transaction(&mut self) -> crate::Result<()> {
        self.transactions_begun += 1;
        Ok(())
    }

    async fn commit_transaction(&mut self) -> crate::Result<()> {
        self.transactions_committed += 1;
        Ok(())
    }

    async fn finish(&mut self) -> crate::Result<()> {
        self.finished = true;
        Ok(())
    }
}
