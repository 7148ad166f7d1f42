use super::round_to_cents;
use crate::models::{ColumnDef, ColumnType, ForeignKeyDef, SqlValue, TableDef};
use crate::vocabulary::{pick, Vocabulary};
use crate::IdRange;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;

/// First day a generated user can have signed up. Signup timestamps fall in
/// the five years starting here.
const SIGNUP_WINDOW_START: NaiveDate = match NaiveDate::from_ymd_opt(2020, 1, 1) {
    Some(date) => date,
    None => panic!("signup window start is not a valid date"),
};

const SIGNUP_WINDOW_DAYS: i64 = 1827;

pub fn users_table() -> TableDef {
    TableDef {
        name: "users",
        columns: vec![
            ColumnDef::unique("email", ColumnType::Text),
            ColumnDef::new("name", ColumnType::Text),
            ColumnDef::new("created_at", ColumnType::Timestamp),
        ],
        foreign_keys: vec![],
    }
}

pub fn products_table() -> TableDef {
    TableDef {
        name: "products",
        columns: vec![
            ColumnDef::new("name", ColumnType::Text),
            ColumnDef::new(
                "price",
                ColumnType::Numeric {
                    precision: 10,
                    scale: 2,
                },
            ),
            ColumnDef::new("stock", ColumnType::Integer),
        ],
        foreign_keys: vec![],
    }
}

pub fn orders_table() -> TableDef {
    TableDef {
        name: "orders",
        columns: vec![
            ColumnDef::new("user_id", ColumnType::Integer),
            ColumnDef::new(
                "total_price",
                ColumnType::Numeric {
                    precision: 10,
                    scale: 2,
                },
            ),
            ColumnDef::new("status", ColumnType::Text),
        ],
        foreign_keys: vec![ForeignKeyDef {
            column: "user_id",
            references_table: "users",
        }],
    }
}

pub fn order_items_table() -> TableDef {
    TableDef {
        name: "order_items",
        columns: vec![
            ColumnDef::new("order_id", ColumnType::Integer),
            ColumnDef::new("product_id", ColumnType::Integer),
            ColumnDef::new("quantity", ColumnType::Integer),
        ],
        foreign_keys: vec![
            ForeignKeyDef {
                column: "order_id",
                references_table: "orders",
            },
            ForeignKeyDef {
                column: "product_id",
                references_table: "products",
            },
        ],
    }
}

/// The shop schema in dependency order. Tables later in the list reference
/// tables earlier in it, never the other way around.
pub fn oltp_tables() -> Vec<TableDef> {
    vec![
        users_table(),
        products_table(),
        orders_table(),
        order_items_table(),
    ]
}

#[derive(Debug)]
pub struct UserRow {
    pub email: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl UserRow {
    /// `index` is the zero-based position of the row in the load, embedded in
    /// the email so every address is unique no matter how the name draws
    /// collide.
    pub fn generate(index: u64, vocabulary: &Vocabulary, rng: &mut impl Rng) -> Self {
        let first = pick(rng, &vocabulary.first_names);
        let last = pick(rng, &vocabulary.last_names);
        let domain = pick(rng, &vocabulary.email_domains);

        let day_offset = rng.gen_range(0..SIGNUP_WINDOW_DAYS);
        let second_of_day = rng.gen_range(0..86_400);
        let created_at = (SIGNUP_WINDOW_START + Duration::days(day_offset))
            .and_time(NaiveTime::MIN)
            + Duration::seconds(second_of_day);

        Self {
            email: format!(
                "{}.{}.{}@{}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase(),
                index,
                domain
            ),
            name: format!("{first} {last}"),
            created_at,
        }
    }

    pub fn into_row(self) -> Vec<SqlValue> {
        vec![
            self.email.into(),
            self.name.into(),
            self.created_at.into(),
        ]
    }
}

#[derive(Debug)]
pub struct ProductRow {
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

impl ProductRow {
    pub fn generate(vocabulary: &Vocabulary, rng: &mut impl Rng) -> Self {
        let adjective = pick(rng, &vocabulary.product_adjectives);
        let noun = pick(rng, &vocabulary.product_nouns);

        Self {
            name: format!("{adjective} {noun}"),
            price: round_to_cents(rng.gen_range(1.0..500.0)),
            stock: rng.gen_range(0..=1000),
        }
    }

    pub fn into_row(self) -> Vec<SqlValue> {
        vec![
            self.name.into(),
            SqlValue::Numeric(self.price),
            SqlValue::Integer(self.stock),
        ]
    }
}

#[derive(Debug)]
pub struct OrderRow {
    pub user_id: i64,
    pub total_price: f64,
    pub status: &'static str,
}

impl OrderRow {
    pub fn generate(users: IdRange, vocabulary: &Vocabulary, rng: &mut impl Rng) -> Self {
        Self {
            user_id: users.sample(rng),
            total_price: round_to_cents(rng.gen_range(5.0..2000.0)),
            status: pick(rng, &vocabulary.order_statuses),
        }
    }

    pub fn into_row(self) -> Vec<SqlValue> {
        vec![
            SqlValue::Integer(self.user_id),
            SqlValue::Numeric(self.total_price),
            self.status.into(),
        ]
    }
}

#[derive(Debug)]
pub struct OrderItemRow {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

impl OrderItemRow {
    pub fn generate(orders: IdRange, products: IdRange, rng: &mut impl Rng) -> Self {
        Self {
            order_id: orders.sample(rng),
            product_id: products.sample(rng),
            quantity: rng.gen_range(1..=10),
        }
    }

    pub fn into_row(self) -> Vec<SqlValue> {
        vec![
            SqlValue::Integer(self.order_id),
            SqlValue::Integer(self.product_id),
            SqlValue::Integer(self.quantity),
        ]
    }
}
