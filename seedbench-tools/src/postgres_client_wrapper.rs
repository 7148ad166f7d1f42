use crate::Result;
use tokio::task::JoinHandle;
use tokio_postgres::types::{FromSqlOwned, ToSql};
use tokio_postgres::{Client, NoTls, Row, Statement};

pub struct PostgresClientWrapper {
    client: Client,
    join_handle: JoinHandle<Result<()>>,
    version: i32,
}

impl PostgresClientWrapper {
    pub async fn new(connection_string: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

        // The connection object performs the actual communication with the database,
        // so spawn it off to run on its own.
        let join_handle = tokio::spawn(async move {
            match connection.await {
                Err(e) => Err(crate::SeedbenchError::PostgresError(e)),
                Ok(_) => Ok(()),
            }
        });

        let messages = client.simple_query("SHOW server_version_num;").await?;
        let version = match messages.first() {
            Some(tokio_postgres::SimpleQueryMessage::Row(row)) => {
                let version: i32 = row
                    .get(0)
                    .and_then(|raw| raw.parse().ok())
                    .ok_or(crate::SeedbenchError::InvalidPostgresVersionResponse)?;
                if version < 120000 {
                    return Err(crate::SeedbenchError::UnsupportedPostgresVersion(version));
                }
                version / 1000
            }
            _ => return Err(crate::SeedbenchError::InvalidPostgresVersionResponse),
        };

        Ok(PostgresClientWrapper {
            client,
            join_handle,
            version,
        })
    }

    pub async fn execute_non_query(&self, sql: &str) -> Result {
        self.client.batch_execute(sql).await.map_err(|e| {
            crate::SeedbenchError::PostgresErrorWithQuery {
                source: e,
                query: sql.to_string(),
            }
        })?;

        Ok(())
    }

    /// Runs a single statement and returns the affected-row count the server
    /// reported for it.
    pub async fn execute_returning_count(&self, sql: &str) -> Result<u64> {
        let affected = self.client.execute(sql, &[]).await.map_err(|e| {
            crate::SeedbenchError::PostgresErrorWithQuery {
                source: e,
                query: sql.to_string(),
            }
        })?;

        Ok(affected)
    }

    /// Runs a query over the simple protocol, no parameter binding involved,
    /// and returns how many data rows came back.
    pub async fn execute_simple(&self, sql: &str) -> Result<u64> {
        let messages = self.client.simple_query(sql).await.map_err(|e| {
            crate::SeedbenchError::PostgresErrorWithQuery {
                source: e,
                query: sql.to_string(),
            }
        })?;

        let rows = messages
            .iter()
            .filter(|m| matches!(m, tokio_postgres::SimpleQueryMessage::Row(_)))
            .count();

        Ok(rows as u64)
    }

    pub async fn prepare(&self, sql: &str) -> Result<Statement> {
        let statement = self.client.prepare(sql).await.map_err(|e| {
            crate::SeedbenchError::PostgresErrorWithQuery {
                source: e,
                query: sql.to_string(),
            }
        })?;

        Ok(statement)
    }

    pub async fn query_prepared(
        &self,
        statement: &Statement,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let rows = self.client.query(statement, params).await?;
        Ok(rows)
    }

    pub async fn query_with_params(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let rows = self.client.query(sql, params).await.map_err(|e| {
            crate::SeedbenchError::PostgresErrorWithQuery {
                source: e,
                query: sql.to_string(),
            }
        })?;

        Ok(rows)
    }

    pub async fn get_results<T: FromRow>(&self, sql: &str) -> Result<Vec<T>> {
        let query_results = self.client.query(sql, &[]).await.map_err(|e| {
            crate::SeedbenchError::PostgresErrorWithQuery {
                source: e,
                query: sql.to_string(),
            }
        })?;

        let mut output = Vec::with_capacity(query_results.len());

        for row in query_results.into_iter() {
            output.push(T::from_row(row)?);
        }

        Ok(output)
    }

    pub async fn get_result<T: FromRow>(&self, sql: &str) -> Result<T> {
        let results = self.get_results(sql).await?;
        if results.len() != 1 {
            return Err(crate::SeedbenchError::InvalidNumberOfResults {
                actual: results.len(),
                expected: 1,
            });
        }

        // Safe, we have just checked the length of the vector
        let r = results.into_iter().next().unwrap();

        Ok(r)
    }

    pub async fn get_single_results<T: FromSqlOwned>(&self, sql: &str) -> Result<Vec<T>> {
        let r = self
            .get_results::<(T,)>(sql)
            .await?
            .into_iter()
            .map(|t| t.0)
            .collect();

        Ok(r)
    }

    pub async fn get_single_result<T: FromSqlOwned>(&self, sql: &str) -> Result<T> {
        let result = self.get_result::<(T,)>(sql).await?;
        Ok(result.0)
    }

    pub fn version(&self) -> i32 {
        self.version
    }
}

impl Drop for PostgresClientWrapper {
    fn drop(&mut self) {
        self.join_handle.abort();
    }
}

pub trait FromRow: Sized {
    fn from_row(row: Row) -> Result<Self>;
}

impl<T1: FromSqlOwned> FromRow for (T1,) {
    fn from_row(row: Row) -> Result<Self> {
        Ok((row.try_get(0)?,))
    }
}

impl<T1: FromSqlOwned, T2: FromSqlOwned> FromRow for (T1, T2) {
    fn from_row(row: Row) -> Result<Self> {
        Ok((row.try_get(0)?, row.try_get(1)?))
    }
}

impl<T1: FromSqlOwned, T2: FromSqlOwned, T3: FromSqlOwned> FromRow for (T1, T2, T3) {
    fn from_row(row: Row) -> Result<Self> {
        Ok((row.try_get(0)?, row.try_get(1)?, row.try_get(2)?))
    }
}
