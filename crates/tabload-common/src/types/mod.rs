//! Canonical record model shared by the normalizer, uploader and validator
//!
//! The serde shape of these types is the wire shape of the key/attribute
//! upload protocol (`{Key, Attributes: [{Name, Type, Value}]}`).

use serde::{Deserialize, Serialize};

/// Name of the synthetic 1-based row index column
pub const SYNTHETIC_INDEX_FIELD: &str = "index";

/// Declared type of a field
///
/// `datetime` is accepted on input and always read as [`FieldType::Date`];
/// `integer` is read as [`FieldType::Number`]. Unknown type names become
/// [`FieldType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    #[serde(alias = "integer")]
    Number,
    #[serde(alias = "datetime")]
    Date,
    Boolean,
    #[serde(other)]
    Other,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
            FieldType::Other => "other",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column of the dataset (primary key excluded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "Type")]
    pub declared_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, declared_type: FieldType) -> Self {
        Self {
            name: name.into(),
            declared_type,
        }
    }
}

/// A coerced scalar cell value
///
/// Values keep their native type so comparison can apply type-specific
/// rules; [`std::fmt::Display`] gives the canonical string form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// The empty-string value used for missing cells
    pub fn empty() -> Self {
        AttributeValue::Text(String::new())
    }

    pub fn text(value: impl Into<String>) -> Self {
        AttributeValue::Text(value.into())
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(x) => {
                // Integral floats keep their fractional marker: 5.0, not 5
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            },
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

/// One non-key column of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "Type")]
    pub attr_type: FieldType,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, attr_type: FieldType, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            attr_type,
            value,
        }
    }
}

/// Canonical `{Key, Attributes[]}` record, one per source row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub key: String,
    pub attributes: Vec<Attribute>,
}

impl Record {
    pub fn new(key: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            key: key.into(),
            attributes,
        }
    }

    /// Names of all attributes, in column order
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes.iter().map(|a| a.name.clone()).collect()
    }
}

/// Normalized dataset: records in source row order plus the non-key fields
///
/// Built once by the normalizer and read-only afterward.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dataset {
    records: Vec<Record>,
    fields: Vec<Field>,
    #[serde(skip)]
    row_index_key: bool,
}

impl Dataset {
    pub fn new(records: Vec<Record>, fields: Vec<Field>) -> Self {
        Self {
            records,
            fields,
            row_index_key: false,
        }
    }

    /// Mark the records as keyed by the synthetic row index
    pub fn keyed_by_row_index(mut self) -> Self {
        self.row_index_key = true;
        self
    }

    pub fn is_keyed_by_row_index(&self) -> bool {
        self.row_index_key
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record by source order
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Last record by source order
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_field_type_downgrades_datetime() {
        let t: FieldType = serde_json::from_str("\"datetime\"").unwrap();
        assert_eq!(t, FieldType::Date);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"date\"");
    }

    #[test]
    fn test_field_type_integer_and_unknown() {
        let t: FieldType = serde_json::from_str("\"integer\"").unwrap();
        assert_eq!(t, FieldType::Number);

        let t: FieldType = serde_json::from_str("\"duration\"").unwrap();
        assert_eq!(t, FieldType::Other);
    }

    #[test]
    fn test_value_string_forms() {
        assert_eq!(AttributeValue::Float(5.0).to_string(), "5.0");
        assert_eq!(AttributeValue::Float(2.5).to_string(), "2.5");
        assert_eq!(AttributeValue::Integer(42).to_string(), "42");
        assert_eq!(AttributeValue::Boolean(true).to_string(), "true");
        assert_eq!(AttributeValue::Null.to_string(), "");
        assert_eq!(AttributeValue::empty().to_string(), "");
    }

    #[test]
    fn test_value_deserializes_remote_shapes() {
        let values: Vec<AttributeValue> =
            serde_json::from_str(r#"[null, true, 5, 5.0, "5", ""]"#).unwrap();
        assert_eq!(
            values,
            vec![
                AttributeValue::Null,
                AttributeValue::Boolean(true),
                AttributeValue::Integer(5),
                AttributeValue::Float(5.0),
                AttributeValue::text("5"),
                AttributeValue::empty(),
            ]
        );
    }

    #[test]
    fn test_record_wire_shape() {
        let record = Record::new(
            "7",
            vec![Attribute::new(
                "Discounts",
                FieldType::Number,
                AttributeValue::Float(0.0),
            )],
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Key": "7",
                "Attributes": [{ "Name": "Discounts", "Type": "number", "Value": 0.0 }]
            })
        );
    }

    #[test]
    fn test_dataset_row_index_key_flag() {
        let keyed = Dataset::new(vec![], vec![]);
        assert!(!keyed.is_keyed_by_row_index());
        assert!(keyed.keyed_by_row_index().is_keyed_by_row_index());
    }

    #[test]
    fn test_dataset_first_last_empty() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert!(dataset.first().is_none());
        assert!(dataset.last().is_none());
    }

    proptest! {
        #[test]
        fn prop_integral_float_keeps_fraction_marker(n in -1_000_000_000i64..1_000_000_000i64) {
            let shown = AttributeValue::Float(n as f64).to_string();
            prop_assert!(shown.ends_with(".0"));
            prop_assert_eq!(shown.parse::<f64>().unwrap(), n as f64);
        }
    }
}
