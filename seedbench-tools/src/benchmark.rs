use crate::postgres_client_wrapper::PostgresClientWrapper;
use crate::{Result, SeedbenchError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument};

/// How query parameters travel to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLayer {
    /// Parameters inlined into the SQL text, sent over the simple protocol.
    Simple,
    /// Bound parameters, statement prepared again on every execution.
    Prepared,
    /// Bound parameters, statement prepared once and reused.
    PreparedReuse,
}

impl AccessLayer {
    pub const ALL: [AccessLayer; 3] = [
        AccessLayer::Simple,
        AccessLayer::Prepared,
        AccessLayer::PreparedReuse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AccessLayer::Simple => "simple",
            AccessLayer::Prepared => "prepared",
            AccessLayer::PreparedReuse => "prepared-reuse",
        }
    }
}

/// Where the `$1` placeholder of a query draws its values from.
#[derive(Debug, Clone, Copy)]
enum ParamSource {
    None,
    /// A random live id from this table per execution.
    Table(&'static str),
}

pub struct BenchQuery {
    pub name: &'static str,
    pub sql: &'static str,
    param: ParamSource,
}

/// Queries behind typical shop pages: point lookups, a join and one write.
pub fn oltp_suite() -> Vec<BenchQuery> {
    vec![
        BenchQuery {
            name: "user_by_id",
            sql: "select id, email, name from users where id = $1",
            param: ParamSource::Table("users"),
        },
        BenchQuery {
            name: "orders_for_user",
            sql: "select id, total_price, status from orders where user_id = $1",
            param: ParamSource::Table("users"),
        },
        BenchQuery {
            name: "order_items_with_products",
            sql: "select i.quantity, p.name, p.price from order_items i join products p on p.id = i.product_id where i.order_id = $1",
            param: ParamSource::Table("orders"),
        },
        BenchQuery {
            name: "order_count_by_status",
            sql: "select status, count(*) from orders group by status",
            param: ParamSource::None,
        },
        BenchQuery {
            name: "restock_product",
            sql: "update products set stock = stock + 1 where id = $1",
            param: ParamSource::Table("products"),
        },
    ]
}

/// Aggregations over the star schema, plus one per-customer slice.
pub fn olap_suite() -> Vec<BenchQuery> {
    vec![
        BenchQuery {
            name: "revenue_by_country",
            sql: "select r.country, sum(f.total_amount) from fact_sales f join dim_region r on r.id = f.region_id group by r.country order by 2 desc",
            param: ParamSource::None,
        },
        BenchQuery {
            name: "quarterly_revenue",
            sql: "select d.year, d.quarter, sum(f.total_amount) from fact_sales f join dim_date d on d.id = f.date_id group by d.year, d.quarter order by d.year, d.quarter",
            param: ParamSource::None,
        },
        BenchQuery {
            name: "top_products_by_quantity",
            sql: "select p.name, sum(f.quantity) as units from fact_sales f join dim_product p on p.id = f.product_id group by p.name order by units desc limit 10",
            param: ParamSource::None,
        },
        BenchQuery {
            name: "weekend_revenue_share",
            sql: "select d.is_weekend, sum(f.total_amount) from fact_sales f join dim_date d on d.id = f.date_id group by d.is_weekend",
            param: ParamSource::None,
        },
        BenchQuery {
            name: "customer_sales",
            sql: "select f.quantity, f.unit_price, f.total_amount from fact_sales f where f.customer_id = $1",
            param: ParamSource::Table("dim_customer"),
        },
    ]
}

pub struct BenchOptions {
    pub iterations: u32,
    pub layers: Vec<AccessLayer>,
    /// Seed for the parameter draws, so two runs can hit the same rows.
    pub rng_seed: Option<u64>,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            iterations: 20,
            layers: AccessLayer::ALL.to_vec(),
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryTiming {
    pub query: String,
    pub layer: AccessLayer,
    pub iterations: u32,
    pub rows: u64,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub dataset: String,
    pub timings: Vec<QueryTiming>,
}

/// Runs every query of the suite through every requested access layer
/// against an already seeded database.
#[instrument(skip_all)]
pub async fn run_benchmark(
    connection: &PostgresClientWrapper,
    dataset: &str,
    queries: &[BenchQuery],
    options: &BenchOptions,
) -> Result<BenchReport> {
    if options.iterations == 0 {
        return Err(SeedbenchError::InvalidIterationCount);
    }

    let mut rng = match options.rng_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut timings = Vec::with_capacity(queries.len() * options.layers.len());

    for query in queries {
        let param_bound = match query.param {
            ParamSource::None => None,
            ParamSource::Table(table) => {
                // Seeded tables hold contiguous ids from 1, so the row count
                // doubles as the highest live id.
                let rows: i64 = connection
                    .get_single_result(&format!("select count(*) from {table};"))
                    .await?;
                if rows == 0 {
                    return Err(SeedbenchError::EmptyIdSpace(table.to_string()));
                }
                Some(rows)
            }
        };

        for layer in &options.layers {
            let timing = run_query(
                connection,
                query,
                *layer,
                param_bound,
                options.iterations,
                &mut rng,
            )
            .await?;

            info!(
                query = timing.query,
                layer = timing.layer.name(),
                mean_ms = timing.mean_ms,
                "query timed"
            );

            timings.push(timing);
        }
    }

    Ok(BenchReport {
        dataset: dataset.to_string(),
        timings,
    })
}

async fn run_query(
    connection: &PostgresClientWrapper,
    query: &BenchQuery,
    layer: AccessLayer,
    param_bound: Option<i64>,
    iterations: u32,
    rng: &mut SmallRng,
) -> Result<QueryTiming> {
    let prepared = match layer {
        AccessLayer::PreparedReuse => Some(connection.prepare(query.sql).await?),
        _ => None,
    };

    let mut total_ms = 0.0;
    let mut min_ms = f64::MAX;
    let mut max_ms: f64 = 0.0;
    let mut rows = 0;

    for _ in 0..iterations {
        let param = param_bound.map(|bound| rng.gen_range(1..=bound) as i32);

        let started_at = Instant::now();

        rows = match layer {
            AccessLayer::Simple => {
                let sql = inline_param(query.sql, param);
                connection.execute_simple(&sql).await?
            }
            AccessLayer::Prepared => match param {
                Some(id) => connection.query_with_params(query.sql, &[&id]).await?.len() as u64,
                None => connection.query_with_params(query.sql, &[]).await?.len() as u64,
            },
            AccessLayer::PreparedReuse => {
                // Safe, prepared above for this layer
                let statement = prepared.as_ref().unwrap();
                match param {
                    Some(id) => connection.query_prepared(statement, &[&id]).await?.len() as u64,
                    None => connection.query_prepared(statement, &[]).await?.len() as u64,
                }
            }
        };

        let elapsed_ms = started_at.elapsed().as_secs_f64() * 1000.0;
        total_ms += elapsed_ms;
        min_ms = min_ms.min(elapsed_ms);
        max_ms = max_ms.max(elapsed_ms);
    }

    Ok(QueryTiming {
        query: query.name.to_string(),
        layer,
        iterations,
        rows,
        mean_ms: total_ms / iterations as f64,
        min_ms,
        max_ms,
    })
}

fn inline_param(sql: &str, param: Option<i32>) -> String {
    match param {
        Some(id) => sql.replace("$1", &id.to_string()),
        None => sql.to_string(),
    }
}
