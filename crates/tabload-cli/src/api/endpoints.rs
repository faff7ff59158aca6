//! API endpoint URL builders
//!
//! Every call of the collection store protocol is a `POST` to
//! `{base}/{endpoint}`.

pub const AUTHENTICATE: &str = "authenticate";
pub const ADD_ITEMS: &str = "additems";
pub const COLLECTION_DETAILS: &str = "getcollectiondetails";
pub const GET_ITEM: &str = "getitem";

/// Build the URL for an endpoint, tolerating a trailing slash on the base
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
}
