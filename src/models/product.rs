//! Product models and DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A row of the product table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Decimal rendered as text, e.g. `"9.99"`
    #[schema(example = "9.99")]
    pub price: String,
}

/// Body of `POST /product` and `PUT /product/{id}`
///
/// Fields are forwarded to the database as received, whatever their JSON
/// type; a missing or malformed field is reported by the database itself.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductInput {
    #[schema(value_type = Option<String>, example = "Teclado")]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>, example = "Teclado mecânico ABNT2")]
    pub description: Option<Value>,
    #[schema(value_type = Option<f64>, example = 9.99)]
    pub price: Option<Value>,
}

impl ProductInput {
    pub fn name_text(&self) -> Option<String> {
        column_text(&self.name)
    }

    pub fn description_text(&self) -> Option<String> {
        column_text(&self.description)
    }

    /// The price as the text handed to the database's numeric cast
    pub fn price_text(&self) -> Option<String> {
        column_text(&self.price)
    }
}

/// Strings pass through unquoted; other values keep their JSON text.
fn column_text(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Result of `POST /product`
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreated {
    pub insert_id: i64,
    pub affected_rows: u64,
    #[serde(flatten)]
    pub product: Product,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(price: Value) -> ProductInput {
        serde_json::from_value(json!({ "name": "A", "description": "d", "price": price })).unwrap()
    }

    #[test]
    fn test_price_text_passes_values_through() {
        assert_eq!(input(json!(9.99)).price_text().as_deref(), Some("9.99"));
        assert_eq!(input(json!("12.50")).price_text().as_deref(), Some("12.50"));
        assert_eq!(input(json!(3)).price_text().as_deref(), Some("3"));
        assert_eq!(input(json!(null)).price_text(), None);
        assert_eq!(input(json!(true)).price_text().as_deref(), Some("true"));
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let input: ProductInput = serde_json::from_value(json!({})).unwrap();
        assert!(input.name_text().is_none());
        assert!(input.description_text().is_none());
        assert!(input.price_text().is_none());
    }

    #[test]
    fn test_non_string_columns_are_accepted_as_text() {
        let input: ProductInput =
            serde_json::from_value(json!({ "name": 5, "description": ["a"], "price": 1 }))
                .unwrap();
        assert_eq!(input.name_text().as_deref(), Some("5"));
        assert_eq!(input.description_text().as_deref(), Some("[\"a\"]"));
    }

    #[test]
    fn test_created_serializes_insert_id_alongside_fields() {
        let created = ProductCreated {
            insert_id: 7,
            affected_rows: 1,
            product: Product {
                id: 7,
                name: "A".to_string(),
                description: "d".to_string(),
                price: "9.99".to_string(),
            },
        };
        let value = serde_json::to_value(created).unwrap();
        assert_eq!(value["insertId"], 7);
        assert_eq!(value["affectedRows"], 1);
        assert_eq!(value["price"], "9.99");
    }
}
