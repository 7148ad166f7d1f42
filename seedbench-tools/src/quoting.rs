/// Quotes an identifier for usage in Postgres as needed.
///
/// Everything seedbench generates uses plain lowercase names, so quoting only
/// kicks in for identifiers that would not survive as-is.
pub(crate) fn quote_identifier(identifier: &str) -> String {
    let mut chars = identifier.chars();

    let safe = matches!(chars.next(), Some('a'..='z' | '_'))
        && chars.all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'));

    if safe {
        identifier.to_string()
    } else {
        let escaped = identifier.replace('"', r#""""#);

        format!("\"{escaped}\"")
    }
}

/// Quotes a string value for usage in Postgres.
pub(crate) fn quote_value_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    #[test]
    fn quoting_identifiers() {
        macro_rules! test_quote {
            ($identifier:literal, $expected:literal) => {
                let quoted = super::quote_identifier($identifier);
                assert_eq!(quoted, $expected);
            };
        }

        test_quote!("users", "users");
        test_quote!("order_items", "order_items");
        test_quote!("dim_date", "dim_date");
        test_quote!("table1", "table1");
        test_quote!("table-1", "\"table-1\"");
        test_quote!("table 1", "\"table 1\"");
        test_quote!("1table", "\"1table\"");
        test_quote!("MyTable", "\"MyTable\"");
        test_quote!("my\"table", "\"my\"\"table\"");
        test_quote!("", "\"\"");
    }

    #[test]
    fn quoting_values() {
        assert_eq!(super::quote_value_string("plain"), "'plain'");
        assert_eq!(super::quote_value_string("O'Neill"), "'O''Neill'");
        assert_eq!(super::quote_value_string(""), "''");
    }
}
