use super::round_to_cents;
use crate::models::{ColumnDef, ColumnType, ForeignKeyDef, SqlValue, TableDef};
use crate::vocabulary::{pick, Vocabulary};
use crate::IdRange;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::Rng;

/// The date dimension covers exactly this window, one row per calendar day,
/// both endpoints included.
const DATE_DIMENSION_START: NaiveDate = match NaiveDate::from_ymd_opt(2022, 1, 1) {
    Some(date) => date,
    None => panic!("date dimension start is not a valid date"),
};

const DATE_DIMENSION_END: NaiveDate = match NaiveDate::from_ymd_opt(2024, 12, 31) {
    Some(date) => date,
    None => panic!("date dimension end is not a valid date"),
};

pub fn date_dimension_row_count() -> u64 {
    ((DATE_DIMENSION_END - DATE_DIMENSION_START).num_days() + 1) as u64
}

pub fn dim_date_table() -> TableDef {
    TableDef {
        name: "dim_date",
        columns: vec![
            ColumnDef::new("full_date", ColumnType::Date),
            ColumnDef::new("year", ColumnType::SmallInt),
            ColumnDef::new("quarter", ColumnType::SmallInt),
            ColumnDef::new("month", ColumnType::SmallInt),
            ColumnDef::new("day", ColumnType::SmallInt),
            ColumnDef::new("day_of_week", ColumnType::SmallInt),
            ColumnDef::new("is_weekend", ColumnType::Boolean),
        ],
        foreign_keys: vec![],
    }
}

pub fn dim_region_table() -> TableDef {
    TableDef {
        name: "dim_region",
        columns: vec![
            ColumnDef::new("country", ColumnType::Text),
            ColumnDef::new("state", ColumnType::Text),
            ColumnDef::new("city", ColumnType::Text),
        ],
        foreign_keys: vec![],
    }
}

pub fn dim_customer_table() -> TableDef {
    TableDef {
        name: "dim_customer",
        columns: vec![
            ColumnDef::new("name", ColumnType::Text),
            ColumnDef::new("email", ColumnType::Text),
            ColumnDef::new("segment", ColumnType::Text),
            ColumnDef::new("region_id", ColumnType::Integer),
        ],
        foreign_keys: vec![ForeignKeyDef {
            column: "region_id",
            references_table: "dim_region",
        }],
    }
}

pub fn dim_product_table() -> TableDef {
    TableDef {
        name: "dim_product",
        columns: vec![
            ColumnDef::new("name", ColumnType::Text),
            ColumnDef::new("category", ColumnType::Text),
            ColumnDef::new("subcategory", ColumnType::Text),
            ColumnDef::new("brand", ColumnType::Text),
            ColumnDef::new(
                "unit_cost",
                ColumnType::Numeric {
                    precision: 10,
                    scale: 2,
                },
            ),
        ],
        foreign_keys: vec![],
    }
}

pub fn fact_sales_table() -> TableDef {
    TableDef {
        name: "fact_sales",
        columns: vec![
            ColumnDef::new("date_id", ColumnType::Integer),
            ColumnDef::new("customer_id", ColumnType::Integer),
            ColumnDef::new("product_id", ColumnType::Integer),
            ColumnDef::new("region_id", ColumnType::Integer),
            ColumnDef::new("quantity", ColumnType::Integer),
            ColumnDef::new(
                "unit_price",
                ColumnType::Numeric {
                    precision: 10,
                    scale: 2,
                },
            ),
            ColumnDef::new(
                "discount",
                ColumnType::Numeric {
                    precision: 4,
                    scale: 2,
                },
            ),
            ColumnDef::new(
                "total_amount",
                ColumnType::Numeric {
                    precision: 12,
                    scale: 2,
                },
            ),
        ],
        foreign_keys: vec![
            ForeignKeyDef {
                column: "date_id",
                references_table: "dim_date",
            },
            ForeignKeyDef {
                column: "customer_id",
                references_table: "dim_customer",
            },
            ForeignKeyDef {
                column: "product_id",
                references_table: "dim_product",
            },
            ForeignKeyDef {
                column: "region_id",
                references_table: "dim_region",
            },
        ],
    }
}

/// The star schema in dependency order: all dimensions first, the fact table
/// last.
pub fn olap_tables() -> Vec<TableDef> {
    vec![
        dim_date_table(),
        dim_region_table(),
        dim_customer_table(),
        dim_product_table(),
        fact_sales_table(),
    ]
}

#[derive(Debug)]
pub struct DimDateRow {
    pub full_date: NaiveDate,
    pub year: i64,
    pub quarter: i64,
    pub month: i64,
    pub day: i64,
    pub day_of_week: i64,
    pub is_weekend: bool,
}

impl DimDateRow {
    pub fn build(date: NaiveDate) -> Self {
        let weekday = date.weekday();

        Self {
            full_date: date,
            year: date.year() as i64,
            quarter: ((date.month() + 2) / 3) as i64,
            month: date.month() as i64,
            day: date.day() as i64,
            day_of_week: weekday.number_from_monday() as i64,
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }

    /// The row for the `index`th day of the dimension window, zero-based.
    pub fn for_index(index: u64) -> Self {
        Self::build(DATE_DIMENSION_START + Duration::days(index as i64))
    }

    pub fn into_row(self) -> Vec<SqlValue> {
        vec![
            self.full_date.into(),
            SqlValue::Integer(self.year),
            SqlValue::Integer(self.quarter),
            SqlValue::Integer(self.month),
            SqlValue::Integer(self.day),
            SqlValue::Integer(self.day_of_week),
            SqlValue::Bool(self.is_weekend),
        ]
    }
}

#[derive(Debug)]
pub struct DimRegionRow {
    pub country: &'static str,
    pub state: &'static str,
    pub city: &'static str,
}

impl DimRegionRow {
    pub fn generate(vocabulary: &Vocabulary, rng: &mut impl Rng) -> Self {
        Self {
            country: pick(rng, &vocabulary.countries),
            state: pick(rng, &vocabulary.states),
            city: pick(rng, &vocabulary.cities),
        }
    }

    pub fn into_row(self) -> Vec<SqlValue> {
        vec![self.country.into(), self.state.into(), self.city.into()]
    }
}

#[derive(Debug)]
pub struct DimCustomerRow {
    pub name: String,
    pub email: String,
    pub segment: &'static str,
    pub region_id: i64,
}

impl DimCustomerRow {
    pub fn generate(
        index: u64,
        regions: IdRange,
        vocabulary: &Vocabulary,
        rng: &mut impl Rng,
    ) -> Self {
        let first = pick(rng, &vocabulary.first_names);
        let last = pick(rng, &vocabulary.last_names);
        let domain = pick(rng, &vocabulary.email_domains);

        Self {
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}.{}@{}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase(),
                index,
                domain
            ),
            segment: pick(rng, &vocabulary.customer_segments),
            region_id: regions.sample(rng),
        }
    }

    pub fn into_row(self) -> Vec<SqlValue> {
        vec![
            self.name.into(),
            self.email.into(),
            self.segment.into(),
            SqlValue::Integer(self.region_id),
        ]
    }
}

#[derive(Debug)]
pub struct DimProductRow {
    pub name: String,
    pub category: &'static str,
    pub subcategory: &'static str,
    pub brand: &'static str,
    pub unit_cost: f64,
}

impl DimProductRow {
    pub fn generate(vocabulary: &Vocabulary, rng: &mut impl Rng) -> Self {
        let adjective = pick(rng, &vocabulary.product_adjectives);
        let noun = pick(rng, &vocabulary.product_nouns);
        let category = vocabulary.category(rng);

        Self {
            name: format!("{adjective} {noun}"),
            category: category.name,
            subcategory: category.subcategory(rng),
            brand: pick(rng, &vocabulary.brands),
            unit_cost: round_to_cents(rng.gen_range(1.0..1000.0)),
        }
    }

    pub fn into_row(self) -> Vec<SqlValue> {
        vec![
            self.name.into(),
            self.category.into(),
            self.subcategory.into(),
            self.brand.into(),
            SqlValue::Numeric(self.unit_cost),
        ]
    }
}

/// Id ranges of the four populated dimensions, everything a fact row needs
/// its foreign keys drawn from.
#[derive(Debug, Clone, Copy)]
pub struct StarDimensionIds {
    pub dates: IdRange,
    pub regions: IdRange,
    pub customers: IdRange,
    pub products: IdRange,
}

#[derive(Debug)]
pub struct FactSalesRow {
    pub date_id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub region_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
    pub total_amount: f64,
}

impl FactSalesRow {
    pub fn generate(dimensions: &StarDimensionIds, rng: &mut impl Rng) -> Self {
        let quantity = rng.gen_range(1..=20);
        let unit_price = round_to_cents(rng.gen_range(1.0..1000.0));
        // Pre-rounded so the stored numeric(4, 2) value is exactly the value
        // the total was derived from.
        let discount = round_to_cents(rng.gen_range(0.0..=0.30));

        Self {
            date_id: dimensions.dates.sample(rng),
            customer_id: dimensions.customers.sample(rng),
            product_id: dimensions.products.sample(rng),
            region_id: dimensions.regions.sample(rng),
            quantity,
            unit_price,
            discount,
            total_amount: round_to_cents(quantity as f64 * unit_price * (1.0 - discount)),
        }
    }

    pub fn into_row(self) -> Vec<SqlValue> {
        vec![
            SqlValue::Integer(self.date_id),
            SqlValue::Integer(self.customer_id),
            SqlValue::Integer(self.product_id),
            SqlValue::Integer(self.region_id),
            SqlValue::Integer(self.quantity),
            SqlValue::Numeric(self.unit_price),
            SqlValue::Numeric(self.discount),
            SqlValue::Numeric(self.total_amount),
        ]
    }
}
