//! API request and response types
//!
//! Field names follow the collection store's PascalCase protocol.

use serde::{Deserialize, Serialize};
use tabload_common::types::{Attribute, Field, Record};

/// Bearer token returned by `authenticate`
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Response from the authenticate endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub accesstoken: String,
}

/// Body of an `additems` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddItemsRequest<'a> {
    pub collection_name: &'a str,
    pub items: &'a [Record],
}

/// Body of a `getcollectiondetails` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CollectionRequest<'a> {
    pub collection_name: &'a str,
}

/// Remote collection metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CollectionDetails {
    pub count: usize,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Body of a `getitem` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemRequest<'a> {
    pub collection_name: &'a str,
    pub attributes: Vec<String>,
    pub key: &'a str,
}

/// Response from `getitem`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemResponse {
    pub item_found: bool,
    #[serde(default)]
    pub item: Option<RemoteItem>,
}

/// The remote store's representation of one record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteItem {
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tabload_common::types::{AttributeValue, FieldType};

    #[test]
    fn test_add_items_request_shape() {
        let items = vec![Record::new(
            "1",
            vec![Attribute::new("Month", FieldType::String, AttributeValue::text("01"))],
        )];
        let request = AddItemsRequest {
            collection_name: "Orders",
            items: &items,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["CollectionName"], "Orders");
        assert_eq!(json["Items"][0]["Key"], "1");
        assert_eq!(json["Items"][0]["Attributes"][0]["Value"], "01");
    }

    #[test]
    fn test_collection_details_reads_datetime_as_date() {
        let details: CollectionDetails = serde_json::from_value(serde_json::json!({
            "Count": 3,
            "Fields": [
                { "Name": "OrderDate", "Type": "datetime" },
                { "Name": "Units", "Type": "integer" }
            ]
        }))
        .unwrap();

        assert_eq!(details.count, 3);
        assert_eq!(details.fields[0].declared_type, FieldType::Date);
        assert_eq!(details.fields[1].declared_type, FieldType::Number);
    }

    #[test]
    fn test_get_item_response_without_item() {
        let response: GetItemResponse =
            serde_json::from_value(serde_json::json!({ "ItemFound": false })).unwrap();
        assert!(!response.item_found);
        assert!(response.item.is_none());
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("secret-token");
        assert_eq!(format!("{:?}", token), "AccessToken(***)");
        assert_eq!(token.as_str(), "secret-token");
    }
}
