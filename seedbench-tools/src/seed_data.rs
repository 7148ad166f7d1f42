use crate::batch_loader::{load_table, LoadSummary};
use crate::generator::{
    date_dimension_row_count, dim_customer_table, dim_date_table, dim_product_table,
    dim_region_table, fact_sales_table, olap_tables, oltp_tables, order_items_table,
    orders_table, products_table, users_table, DimCustomerRow, DimDateRow, DimProductRow,
    DimRegionRow, FactSalesRow, OrderItemRow, OrderRow, ProductRow, StarDimensionIds, UserRow,
};
use crate::ids::IdRegistry;
use crate::models::TableDef;
use crate::storage::LoadDestination;
use crate::vocabulary::Vocabulary;
use crate::{Result, SeedbenchError};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument};

/// Options shared by every seed run.
pub struct SeedOptions {
    /// How many rows go into each insert statement.
    pub batch_size: usize,
    /// Runs with the same seed, sizes and vocabulary produce the same
    /// dataset. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    pub vocabulary: Vocabulary,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            rng_seed: None,
            vocabulary: Vocabulary::default(),
        }
    }
}

impl SeedOptions {
    fn validate(&self) -> Result {
        if self.batch_size == 0 {
            return Err(SeedbenchError::InvalidBatchSize);
        }

        self.vocabulary.validate()
    }

    fn build_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}

/// Row counts for the shop schema.
#[derive(Debug, Clone, Copy)]
pub struct OltpSizes {
    pub users: u64,
    pub products: u64,
    pub orders: u64,
    pub order_items: u64,
}

impl Default for OltpSizes {
    fn default() -> Self {
        Self {
            users: 1_000_000,
            products: 200,
            orders: 2_000_000,
            order_items: 5_000_000,
        }
    }
}

impl OltpSizes {
    /// Scales every table by `factor`, keeping at least one row per table.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            users: scale_rows(self.users, factor),
            products: scale_rows(self.products, factor),
            orders: scale_rows(self.orders, factor),
            order_items: scale_rows(self.order_items, factor),
        }
    }
}

/// Row counts for the star schema. The date dimension is not listed here;
/// it always holds one row per day of its calendar window.
#[derive(Debug, Clone, Copy)]
pub struct OlapSizes {
    pub regions: u64,
    pub customers: u64,
    pub products: u64,
    pub facts: u64,
}

impl Default for OlapSizes {
    fn default() -> Self {
        Self {
            regions: 500,
            customers: 500_000,
            products: 1_000,
            facts: 10_000_000,
        }
    }
}

impl OlapSizes {
    /// Scales every sized table by `factor`, keeping at least one row per
    /// table. The date dimension keeps its full calendar window.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            regions: scale_rows(self.regions, factor),
            customers: scale_rows(self.customers, factor),
            products: scale_rows(self.products, factor),
            facts: scale_rows(self.facts, factor),
        }
    }
}

fn scale_rows(rows: u64, factor: f64) -> u64 {
    (rows as f64 * factor).round().max(1.0) as u64
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSeedReport {
    pub table: String,
    pub rows: u64,
    pub batches: u64,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub dataset: String,
    pub tables: Vec<TableSeedReport>,
    pub elapsed_ms: u64,
}

/// Drops and recreates every table in one transaction, referencing tables
/// dropped first, referenced tables created first. A seed run always starts
/// from empty tables, which is also what makes the handed-out id ranges
/// trustworthy.
async fn recreate_schema<D: LoadDestination>(destination: &mut D, tables: &[TableDef]) -> Result {
    destination.begin_transaction().await?;

    for table in tables.iter().rev() {
        destination.apply_ddl(&table.get_drop_statement()).await?;
    }

    for table in tables {
        destination.apply_ddl(&table.get_create_statement()).await?;
    }

    destination.commit_transaction().await?;

    Ok(())
}

fn table_report(table: &TableDef, summary: LoadSummary, started_at: Instant) -> TableSeedReport {
    TableSeedReport {
        table: table.name.to_string(),
        rows: summary.rows,
        batches: summary.batches,
        elapsed_ms: started_at.elapsed().as_millis() as u64,
    }
}

/// Seeds the shop schema: users and products first, then orders drawing
/// user ids, then order items drawing order and product ids. The first
/// failed batch aborts the run with everything after it untouched.
#[instrument(skip_all)]
pub async fn seed_oltp<D: LoadDestination>(
    destination: &mut D,
    sizes: &OltpSizes,
    options: &SeedOptions,
) -> Result<SeedReport> {
    options.validate()?;

    let mut rng = options.build_rng();
    let vocabulary = &options.vocabulary;
    let started_at = Instant::now();

    recreate_schema(destination, &oltp_tables()).await?;

    let mut ids = IdRegistry::new();
    let mut reports = Vec::with_capacity(4);

    let users = users_table();
    let table_started = Instant::now();
    let summary = load_table(destination, &users, sizes.users, options.batch_size, |index| {
        UserRow::generate(index, vocabulary, &mut rng).into_row()
    })
    .await?;
    ids.register(users.name, summary.rows);
    reports.push(table_report(&users, summary, table_started));

    let products = products_table();
    let table_started = Instant::now();
    let summary = load_table(destination, &products, sizes.products, options.batch_size, |_| {
        ProductRow::generate(vocabulary, &mut rng).into_row()
    })
    .await?;
    ids.register(products.name, summary.rows);
    reports.push(table_report(&products, summary, table_started));

    let user_ids = ids.range(users.name)?;
    let orders = orders_table();
    let table_started = Instant::now();
    let summary = load_table(destination, &orders, sizes.orders, options.batch_size, |_| {
        OrderRow::generate(user_ids, vocabulary, &mut rng).into_row()
    })
    .await?;
    ids.register(orders.name, summary.rows);
    reports.push(table_report(&orders, summary, table_started));

    let order_ids = ids.range(orders.name)?;
    let product_ids = ids.range(products.name)?;
    let order_items = order_items_table();
    let table_started = Instant::now();
    let summary = load_table(
        destination,
        &order_items,
        sizes.order_items,
        options.batch_size,
        |_| OrderItemRow::generate(order_ids, product_ids, &mut rng).into_row(),
    )
    .await?;
    reports.push(table_report(&order_items, summary, table_started));

    destination.finish().await?;

    let elapsed_ms = started_at.elapsed().as_millis() as u64;
    info!(elapsed_ms, "oltp dataset seeded");

    Ok(SeedReport {
        dataset: "oltp".to_string(),
        tables: reports,
        elapsed_ms,
    })
}

/// Seeds the star schema: the four dimensions first, the fact table last
/// with its foreign keys drawn from the populated dimensions.
#[instrument(skip_all)]
pub async fn seed_olap<D: LoadDestination>(
    destination: &mut D,
    sizes: &OlapSizes,
    options: &SeedOptions,
) -> Result<SeedReport> {
    options.validate()?;

    let mut rng = options.build_rng();
    let vocabulary = &options.vocabulary;
    let started_at = Instant::now();

    recreate_schema(destination, &olap_tables()).await?;

    let mut ids = IdRegistry::new();
    let mut reports = Vec::with_capacity(5);

    let dim_date = dim_date_table();
    let table_started = Instant::now();
    let summary = load_table(
        destination,
        &dim_date,
        date_dimension_row_count(),
        options.batch_size,
        |index| DimDateRow::for_index(index).into_row(),
    )
    .await?;
    ids.register(dim_date.name, summary.rows);
    reports.push(table_report(&dim_date, summary, table_started));

    let dim_region = dim_region_table();
    let table_started = Instant::now();
    let summary = load_table(destination, &dim_region, sizes.regions, options.batch_size, |_| {
        DimRegionRow::generate(vocabulary, &mut rng).into_row()
    })
    .await?;
    ids.register(dim_region.name, summary.rows);
    reports.push(table_report(&dim_region, summary, table_started));

    let region_ids = ids.range(dim_region.name)?;
    let dim_customer = dim_customer_table();
    let table_started = Instant::now();
    let summary = load_table(
        destination,
        &dim_customer,
        sizes.customers,
        options.batch_size,
        |index| DimCustomerRow::generate(index, region_ids, vocabulary, &mut rng).into_row(),
    )
    .await?;
    ids.register(dim_customer.name, summary.rows);
    reports.push(table_report(&dim_customer, summary, table_started));

    let dim_product = dim_product_table();
    let table_started = Instant::now();
    let summary = load_table(
        destination,
        &dim_product,
        sizes.products,
        options.batch_size,
        |_| DimProductRow::generate(vocabulary, &mut rng).into_row(),
    )
    .await?;
    ids.register(dim_product.name, summary.rows);
    reports.push(table_report(&dim_product, summary, table_started));

    let dimensions = StarDimensionIds {
        dates: ids.range(dim_date.name)?,
        regions: region_ids,
        customers: ids.range(dim_customer.name)?,
        products: ids.range(dim_product.name)?,
    };

    let fact_sales = fact_sales_table();
    let table_started = Instant::now();
    let summary = load_table(destination, &fact_sales, sizes.facts, options.batch_size, |_| {
        FactSalesRow::generate(&dimensions, &mut rng).into_row()
    })
    .await?;
    reports.push(table_report(&fact_sales, summary, table_started));

    destination.finish().await?;

    let elapsed_ms = started_at.elapsed().as_millis() as u64;
    info!(elapsed_ms, "olap dataset seeded");

    Ok(SeedReport {
        dataset: "olap".to_string(),
        tables: reports,
        elapsed_ms,
    })
}
