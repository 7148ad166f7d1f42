use crate::models::{SqlValue, TableDef};
use crate::postgres_client_wrapper::PostgresClientWrapper;
use crate::storage::LoadDestination;
use crate::Result;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::instrument;

/// Writes the dataset as a plain SQL script instead of loading it into a
/// live database. Replaying the script yields the same tables a direct load
/// would have produced.
pub struct SqlFileDestination<F: AsyncWrite + Unpin + Send + Sync> {
    /// The underlying file, though it can be anything that implements `AsyncWrite`
    file: F,
}

impl SqlFileDestination<BufWriter<File>> {
    /// Creates a destination writing to a new file at `path`.
    #[instrument(skip_all)]
    pub async fn new_file(path: &str) -> Result<Self> {
        let file = File::create(path).await?;

        let file = BufWriter::new(file);

        Ok(SqlFileDestination::new(file))
    }
}

impl<F: AsyncWrite + Unpin + Send + Sync> SqlFileDestination<F> {
    /// Wraps a file-like object. This does not do any additional buffering
    /// so it's recommended to use a `BufWriter` or similar.
    pub fn new(file: F) -> Self {
        SqlFileDestination { file }
    }
}

impl<F: AsyncWrite + Unpin + Send + Sync> LoadDestination for SqlFileDestination<F> {
    async fn apply_ddl(&mut self, sql: &str) -> Result<()> {
        self.file.write_all(sql.as_bytes()).await?;
        self.file.write_all(b"\n\n").await?;
        Ok(())
    }

    async fn insert_rows(&mut self, table: &TableDef, rows: &[Vec<SqlValue>]) -> Result<u64> {
        let statement = table.get_insert_statement(rows);
        self.file.write_all(statement.as_bytes()).await?;
        self.file.write_all(b"\n").await?;
        Ok(rows.len() as u64)
    }

    // Scripts replay inside whatever transaction the caller wraps them in,
    // so nothing is emitted for transaction boundaries.
    async fn begin_transaction(&mut self) -> Result<()> {
        Ok(())
    }

    async fn commit_transaction(&mut self) -> Result<()> {
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.file.flush().await?;
        Ok(())
    }
}

/// Applies a script produced by [SqlFileDestination] to a live connection.
#[instrument(skip_all)]
pub async fn apply_sql_script(script: &str, target_connection: &PostgresClientWrapper) -> Result<()> {
    target_connection.execute_non_query(script).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::products_table;
    use indoc::indoc;
    use similar_asserts::assert_eq;

    #[tokio::test]
    async fn writes_the_statement_stream_verbatim() {
        let table = products_table();
        let mut destination = SqlFileDestination::new(Vec::new());

        destination
            .apply_ddl(&table.get_drop_statement())
            .await
            .unwrap();
        destination
            .apply_ddl(&table.get_create_statement())
            .await
            .unwrap();

        let rows = vec![
            vec![
                "Sturdy Desk".into(),
                SqlValue::Numeric(199.99),
                SqlValue::Integer(12),
            ],
            vec![
                "Foldable Chair".into(),
                SqlValue::Numeric(240.0),
                SqlValue::Integer(3),
            ],
        ];

        let affected = destination.insert_rows(&table, &rows).await.unwrap();
        assert_eq!(affected, 2);

        destination.finish().await.unwrap();

        let script = String::from_utf8(destination.file).unwrap();
        assert_eq!(
            script,
            indoc! {r#"
                drop table if exists products cascade;

                create table products (
                    id serial primary key,
                    name text not null,
                    price numeric(10, 2) not null,
                    stock int not null
                );

                insert into products (name, price, stock) values
                ('Sturdy Desk', 199.99, 12),
                ('Foldable Chair', 240.00, 3);
            "#}
        );
    }

    #[tokio::test]
    async fn reports_every_row_it_wrote() {
        let table = products_table();
        let mut destination = SqlFileDestination::new(Vec::new());

        let rows: Vec<Vec<SqlValue>> = (0..17)
            .map(|index| {
                vec![
                    format!("Product {index}").into(),
                    SqlValue::Numeric(9.99),
                    SqlValue::Integer(index),
                ]
            })
            .collect();

        let affected = destination.insert_rows(&table, &rows).await.unwrap();
        assert_eq!(affected, 17);
    }

    #[tokio::test]
    #[ignore = "needs a postgres instance listening on localhost:5432"]
    async fn a_replayed_script_matches_a_direct_load() {
        use crate::seed_data::{seed_oltp, OltpSizes, SeedOptions};
        use crate::storage::PostgresDestination;
        use crate::test_helpers::get_test_helper;

        let sizes = OltpSizes {
            users: 30,
            products: 8,
            orders: 60,
            order_items: 150,
        };
        let options = SeedOptions {
            batch_size: 25,
            rng_seed: Some(99),
            ..SeedOptions::default()
        };

        let mut file_destination = SqlFileDestination::new(Vec::new());
        seed_oltp(&mut file_destination, &sizes, &options)
            .await
            .unwrap();
        let script = String::from_utf8(file_destination.file).unwrap();

        let replayed = get_test_helper("replayed_script").await;
        apply_sql_script(&script, replayed.get_conn()).await.unwrap();

        let direct = get_test_helper("direct_load").await;
        {
            let mut destination = PostgresDestination::new(direct.get_conn());
            seed_oltp(&mut destination, &sizes, &options).await.unwrap();
        }

        for table in ["users", "products", "orders", "order_items"] {
            let from_script: i64 = replayed
                .get_single_result(&format!("select count(*) from {table};"))
                .await;
            let from_direct: i64 = direct
                .get_single_result(&format!("select count(*) from {table};"))
                .await;
            assert_eq!(from_script, from_direct, "{table} diverged");
        }

        // Same seed, same rows, whichever way they arrived.
        let script_emails: Vec<String> = replayed
            .get_single_results("select email from users order by id;")
            .await;
        let direct_emails: Vec<String> = direct
            .get_single_results("select email from users order by id;")
            .await;
        assert_eq!(script_emails, direct_emails);

        replayed.stop().await;
        direct.stop().await;
    }
}
