use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedbenchError {
    #[error("Error from postgres: `{0}`")]
    PostgresError(#[from] tokio_postgres::Error),

    #[error("Error from postgres: `{source}` when executing query: `{query}`")]
    PostgresErrorWithQuery {
        query: String,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("Invalid number of results returned from query. Expected `{expected}`, got `{actual}`")]
    InvalidNumberOfResults {
        actual: usize,
        expected: usize,
    },

    #[error("Unsupported postgres version: `{0}`")]
    UnsupportedPostgresVersion(i32),

    #[error("Postgres returned an unexpected response when asked for its version")]
    InvalidPostgresVersionResponse,

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    #[error("Benchmark iteration count must be at least 1")]
    InvalidIterationCount,

    #[error("Vocabulary list `{0}` is empty")]
    EmptyVocabulary(String),

    #[error("Table `{0}` has not been populated yet, so no ids can be handed out for it")]
    TableNotPopulated(String),

    #[error("Table `{0}` holds zero rows, so no foreign keys can be sampled from it")]
    EmptyIdSpace(String),

    #[error("Failed to flush batch `{batch_index}` of table `{table}`: {source}")]
    BatchWriteFailed {
        table: String,
        batch_index: u64,
        #[source]
        source: Box<SeedbenchError>,
    },

    #[error("Batch `{batch_index}` of table `{table}` reported `{actual}` affected rows, expected `{expected}`")]
    BatchRowCountMismatch {
        table: String,
        batch_index: u64,
        expected: u64,
        actual: u64,
    },

    #[error("io error: `{0}`")]
    IoError(#[from] std::io::Error),
}

pub type Result<T = ()> = std::result::Result<T, SeedbenchError>;
