use crate::models::SqlValue;
use crate::quoting::quote_identifier;
use itertools::Itertools;

/// The type of a generated column as it appears in DDL.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColumnType {
    Text,
    Integer,
    SmallInt,
    Numeric { precision: u8, scale: u8 },
    Boolean,
    Date,
    Timestamp,
}

impl ColumnType {
    fn sql_type(&self) -> String {
        match self {
            ColumnType::Text => "text".to_string(),
            ColumnType::Integer => "int".to_string(),
            ColumnType::SmallInt => "smallint".to_string(),
            ColumnType::Numeric { precision, scale } => format!("numeric({}, {})", precision, scale),
            ColumnType::Boolean => "boolean".to_string(),
            ColumnType::Date => "date".to_string(),
            ColumnType::Timestamp => "timestamp".to_string(),
        }
    }
}

/// A generated column. Generated columns are always `not null`; the data
/// generator has no notion of missing values.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: &'static str,
    pub data_type: ColumnType,
    pub unique: bool,
}

impl ColumnDef {
    pub fn new(name: &'static str, data_type: ColumnType) -> Self {
        Self {
            name,
            data_type,
            unique: false,
        }
    }

    pub fn unique(name: &'static str, data_type: ColumnType) -> Self {
        Self {
            name,
            data_type,
            unique: true,
        }
    }
}

/// A foreign key edge to another generated table. Edges always point at the
/// referenced table's `id` column.
#[derive(Debug, Clone)]
pub struct ForeignKeyDef {
    pub column: &'static str,
    pub references_table: &'static str,
}

/// Definition of a single generated table.
///
/// Every table gets a store-assigned `id serial primary key` on top of the
/// columns listed here, which are exactly the ones inserts provide values
/// for.
#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: Vec<ColumnDef>,
    pub foreign_keys: Vec<ForeignKeyDef>,
}

impl TableDef {
    pub fn new(
        name: &'static str,
        columns: Vec<ColumnDef>,
        foreign_keys: Vec<ForeignKeyDef>,
    ) -> Self {
        Self {
            name,
            columns,
            foreign_keys,
        }
    }

    pub fn get_create_statement(&self) -> String {
        let mut sql = format!("create table {} (\n", quote_identifier(self.name));
        sql.push_str("    id serial primary key");

        for column in &self.columns {
            sql.push_str(",\n    ");
            sql.push_str(&quote_identifier(column.name));
            sql.push(' ');
            sql.push_str(&column.data_type.sql_type());
            sql.push_str(" not null");
            if column.unique {
                sql.push_str(" unique");
            }
        }

        for fk in &self.foreign_keys {
            sql.push_str(&format!(
                ",\n    constraint {}_{}_fkey foreign key ({}) references {} (id)",
                self.name,
                fk.column,
                quote_identifier(fk.column),
                quote_identifier(fk.references_table)
            ));
        }

        sql.push_str("\n);");

        sql
    }

    pub fn get_drop_statement(&self) -> String {
        format!("drop table if exists {} cascade;", quote_identifier(self.name))
    }

    /// Renders one multi-row insert statement covering all of `rows`. One
    /// statement per batch is what makes a batch atomic at the store.
    pub fn get_insert_statement(&self, rows: &[Vec<SqlValue>]) -> String {
        let mut sql = String::with_capacity(64 * (rows.len() + 1));
        sql.push_str("insert into ");
        sql.push_str(&quote_identifier(self.name));
        sql.push_str(" (");
        sql.push_str(
            &self
                .columns
                .iter()
                .map(|c| quote_identifier(c.name))
                .join(", "),
        );
        sql.push_str(") values");

        for (index, row) in rows.iter().enumerate() {
            sql.push_str(if index == 0 { "\n(" } else { ",\n(" });
            for (column_index, value) in row.iter().enumerate() {
                if column_index != 0 {
                    sql.push_str(", ");
                }
                value.write_literal(&mut sql);
            }
            sql.push(')');
        }

        sql.push(';');

        sql
    }
}
