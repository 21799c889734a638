//! Grocery item types.

use super::coerce::{coerce_integer, coerce_number, display_text, is_truthy, number_value};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A typed grocery item, as kept by the console front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: f64,
    /// Number of units to buy.
    pub quantity: i64,
    /// Whether the item has been bought.
    pub bought: bool,
}

impl Item {
    /// Creates a new, not yet bought item.
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            bought: false,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Quantity: {}, Price: ${:.2}, Bought: {}",
            self.name,
            self.quantity,
            self.price,
            if self.bought { "Yes" } else { "No" }
        )
    }
}

/// An item as stored on disk and returned over HTTP.
///
/// Updates merge caller-supplied fields without coercion, so a record is an
/// insertion-ordered JSON object rather than an [`Item`]. New records have the
/// fields `name`, `price`, `quantity`, `bought` in that order; merged fields
/// keep their position when they already exist and are appended otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemRecord(Map<String, Value>);

impl ItemRecord {
    /// Builds a record from a create payload, coercing loosely typed fields.
    ///
    /// `name` must be truthy and is stored as given. `price` and `quantity`
    /// accept numbers or numeric strings; `quantity` keeps the leading
    /// integer of its text. `bought` is evaluated for truthiness and
    /// defaults to `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the payload is not an object,
    /// `name` is missing or falsy, or `price`/`quantity` are not numeric.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let fields = payload
            .as_object()
            .ok_or_else(|| Error::InvalidInput("payload must be a JSON object".to_string()))?;

        let name = fields
            .get("name")
            .filter(|name| is_truthy(Some(*name)))
            .ok_or_else(|| Error::InvalidInput("name is required".to_string()))?;
        let price = fields
            .get("price")
            .and_then(coerce_number)
            .ok_or_else(|| Error::InvalidInput("price must be numeric".to_string()))?;
        let quantity = fields
            .get("quantity")
            .and_then(coerce_integer)
            .ok_or_else(|| Error::InvalidInput("quantity must be numeric".to_string()))?;

        let mut record = Map::new();
        record.insert("name".to_string(), name.clone());
        record.insert("price".to_string(), number_value(price));
        record.insert("quantity".to_string(), Value::from(quantity));
        record.insert("bought".to_string(), Value::Bool(is_truthy(fields.get("bought"))));
        Ok(Self(record))
    }

    /// Returns a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Shallow-merges `patch` over this record, as an object spread would.
    ///
    /// Object fields replace existing values verbatim and absent fields are
    /// preserved. Arrays and strings contribute their elements under index
    /// keys (`"0"`, `"1"`, ...); other values contribute nothing. New keys
    /// are appended.
    pub fn merge(&mut self, patch: &Value) {
        match patch {
            Value::Object(fields) => {
                for (key, value) in fields {
                    self.0.insert(key.clone(), value.clone());
                }
            },
            Value::Array(items) => {
                for (i, value) in items.iter().enumerate() {
                    self.0.insert(i.to_string(), value.clone());
                }
            },
            Value::String(s) => {
                for (i, c) in s.chars().enumerate() {
                    self.0.insert(i.to_string(), Value::String(c.to_string()));
                }
            },
            Value::Null | Value::Bool(_) | Value::Number(_) => {},
        }
    }

    /// Renders the `name` field for messages.
    ///
    /// Objects print as `[object Object]` and arrays join their elements
    /// with `,`; a missing name renders as `undefined`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.0
            .get("name")
            .map_or_else(|| "undefined".to_string(), display_text)
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(item.name));
        fields.insert("price".to_string(), number_value(item.price));
        fields.insert("quantity".to_string(), Value::from(item.quantity));
        fields.insert("bought".to_string(), Value::Bool(item.bought));
        Self(fields)
    }
}

impl From<Map<String, Value>> for ItemRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_json(record: &ItemRecord) -> Value {
        serde_json::to_value(record).unwrap()
    }

    #[test]
    fn test_from_payload_coerces_fields() {
        let record = ItemRecord::from_payload(&json!({
            "name": "Milk",
            "price": "2.5",
            "quantity": "3.9",
            "bought": 1
        }))
        .unwrap();

        assert_eq!(
            record_json(&record),
            json!({"name": "Milk", "price": 2.5, "quantity": 3, "bought": true})
        );
    }

    #[test]
    fn test_from_payload_defaults_bought() {
        let record =
            ItemRecord::from_payload(&json!({"name": "Eggs", "price": 3, "quantity": 12})).unwrap();
        assert_eq!(record.get("bought"), Some(&json!(false)));
    }

    #[test]
    fn test_from_payload_keeps_truthy_non_string_name() {
        for name in [json!(42), json!(true), json!(["Tea"]), json!({"en": "Tea"})] {
            let record = ItemRecord::from_payload(&json!({
                "name": name.clone(),
                "price": 1,
                "quantity": 1
            }))
            .unwrap();
            assert_eq!(record.get("name"), Some(&name));
        }
    }

    #[test]
    fn test_from_payload_quantity_keeps_leading_integer() {
        let record = ItemRecord::from_payload(&json!({
            "name": "Rice",
            "price": 2,
            "quantity": "1e3"
        }))
        .unwrap();
        assert_eq!(record.get("quantity"), Some(&json!(1)));
    }

    #[test]
    fn test_from_payload_rejects_bad_input() {
        let cases = [
            json!({"price": 1, "quantity": 1}),
            json!({"name": "", "price": 1, "quantity": 1}),
            json!({"name": null, "price": 1, "quantity": 1}),
            json!({"name": 0, "price": 1, "quantity": 1}),
            json!({"name": false, "price": 1, "quantity": 1}),
            json!({"name": "Bread", "price": "cheap", "quantity": 1}),
            json!({"name": "Bread", "price": 1}),
            json!({"name": "Bread", "price": 1, "quantity": "lots"}),
            json!({"name": "Bread", "price": 1, "quantity": "12.9kg"}),
            json!(["Bread", 1, 1]),
            json!(null),
        ];

        for payload in cases {
            let err = ItemRecord::from_payload(&payload).unwrap_err();
            assert!(
                matches!(err, Error::InvalidInput(_)),
                "expected InvalidInput for {payload}"
            );
        }
    }

    #[test]
    fn test_record_from_item_field_order() {
        let record = ItemRecord::from(Item::new("Apples", 1.99, 5));
        let rendered = serde_json::to_string(&record).unwrap();
        assert_eq!(
            rendered,
            r#"{"name":"Apples","price":1.99,"quantity":5,"bought":false}"#
        );
    }

    #[test]
    fn test_merge_preserves_and_appends() {
        let mut record = ItemRecord::from(Item::new("Apples", 1.99, 5));
        record.merge(&json!({"price": 2.49, "aisle": "produce"}));

        assert_eq!(record.get("price"), Some(&json!(2.49)));
        assert_eq!(record.get("name"), Some(&json!("Apples")));
        let rendered = serde_json::to_string(&record).unwrap();
        assert_eq!(
            rendered,
            r#"{"name":"Apples","price":2.49,"quantity":5,"bought":false,"aisle":"produce"}"#
        );
    }

    #[test]
    fn test_merge_passes_types_through() {
        let mut record = ItemRecord::from(Item::new("Apples", 1.99, 5));
        record.merge(&json!({"quantity": "a dozen", "bought": "yes"}));

        assert_eq!(record.get("quantity"), Some(&json!("a dozen")));
        assert_eq!(record.get("bought"), Some(&json!("yes")));
    }

    #[test]
    fn test_merge_scalar_changes_nothing() {
        let original = ItemRecord::from(Item::new("Apples", 1.99, 5));
        for patch in [json!(null), json!(7), json!(false)] {
            let mut record = original.clone();
            record.merge(&patch);
            assert_eq!(record, original, "patch {patch}");
        }
    }

    #[test]
    fn test_merge_spreads_arrays_and_strings_by_index() {
        let mut record = ItemRecord::from(Item::new("Apples", 1.99, 5));
        record.merge(&json!(["x", 2]));
        assert_eq!(record.get("0"), Some(&json!("x")));
        assert_eq!(record.get("1"), Some(&json!(2)));

        record.merge(&json!("ab"));
        assert_eq!(record.get("0"), Some(&json!("a")));
        assert_eq!(record.get("1"), Some(&json!("b")));
        assert_eq!(record.get("name"), Some(&json!("Apples")));
    }

    #[test]
    fn test_display_name() {
        let record = ItemRecord::from(Item::new("Pears", 1.0, 1));
        assert_eq!(record.display_name(), "Pears");

        let record = ItemRecord::from(json!({"name": 42}).as_object().unwrap().clone());
        assert_eq!(record.display_name(), "42");

        let record = ItemRecord::from(json!({"name": {"en": "Tea"}}).as_object().unwrap().clone());
        assert_eq!(record.display_name(), "[object Object]");

        let record = ItemRecord::from(json!({"name": ["a"]}).as_object().unwrap().clone());
        assert_eq!(record.display_name(), "a");

        assert_eq!(ItemRecord::default().display_name(), "undefined");
    }

    #[test]
    fn test_item_display() {
        let mut item = Item::new("Bananas", 0.5, 6);
        assert_eq!(
            item.to_string(),
            "Bananas - Quantity: 6, Price: $0.50, Bought: No"
        );
        item.bought = true;
        assert!(item.to_string().ends_with("Bought: Yes"));
    }
}
