#[cfg(test)]
mod test_helpers;

mod batch_loader;
mod benchmark;
mod error;
mod generator;
mod ids;
mod models;
mod postgres_client_wrapper;
mod quoting;
mod seed_data;
mod storage;
mod vocabulary;

pub use batch_loader::*;
pub use benchmark::*;
pub use error::*;
pub use generator::*;
pub use ids::*;
pub use models::*;
pub use postgres_client_wrapper::{FromRow, PostgresClientWrapper};
pub use seed_data::*;
pub use storage::*;
pub use vocabulary::{Category, Vocabulary};
