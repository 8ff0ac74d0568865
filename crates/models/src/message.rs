use serde::{Deserialize, Serialize};

/// One message entry in a collection.
///
/// `id` is assigned by the store on creation and is unique and monotonically
/// increasing within a collection. The append-only compat mode stores records
/// without ids, so the field is optional on the wire and skipped when absent.
/// The body serializes under the legacy field name `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub sender: String,
    pub receiver: String,
    #[serde(rename = "message")]
    pub body: String,
    pub date: String,
}
