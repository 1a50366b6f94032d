//! SQL query builders
//!
//! The product table lives in a configurable schema, so the statements are
//! rendered once per store from the (already validated) schema name.
//! User-supplied values are always bound parameters.

/// Name of the product table inside the configured schema
pub const PRODUCT_TABLE: &str = "products";

const PRODUCT_COLUMNS: &str = "id, name, description, price::text AS price";

/// Quote an identifier for safe interpolation
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Statements used by the product store
#[derive(Debug, Clone)]
pub struct ProductQueries {
    pub create_schema: String,
    pub create_table: String,
    pub list: String,
    pub get: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
}

impl ProductQueries {
    pub fn for_schema(schema: &str) -> Self {
        let schema = quote_ident(schema);
        let table = format!("{}.{}", schema, quote_ident(PRODUCT_TABLE));

        Self {
            create_schema: format!("CREATE SCHEMA IF NOT EXISTS {}", schema),
            create_table: format!(
                r#"CREATE TABLE IF NOT EXISTS {} (
                    id BIGSERIAL PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    description TEXT NOT NULL,
                    price NUMERIC(10, 2) NOT NULL
                )"#,
                table
            ),
            list: format!("SELECT {} FROM {} ORDER BY id", PRODUCT_COLUMNS, table),
            get: format!("SELECT {} FROM {} WHERE id = $1", PRODUCT_COLUMNS, table),
            // The price arrives as text and is cast by the server, so a bad
            // value fails in the database rather than in the gateway.
            insert: format!(
                "INSERT INTO {} (name, description, price) VALUES ($1, $2, $3::text::numeric) RETURNING {}",
                table, PRODUCT_COLUMNS
            ),
            update: format!(
                "UPDATE {} SET name = $1, description = $2, price = $3::text::numeric WHERE id = $4 RETURNING {}",
                table, PRODUCT_COLUMNS
            ),
            delete: format!("DELETE FROM {} WHERE id = $1", table),
        }
    }
}
