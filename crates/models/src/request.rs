use serde::Deserialize;

/// One inbound operation against a named collection.
///
/// `action` selects the operation (`get`, `add`, `update`, `delete`) and
/// `filename` names the collection. The remaining fields are only required
/// for appends; `id` is accepted for forward compatibility with update/delete
/// payloads but currently unused.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub filename: String,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub message: Option<String>,
    pub date: Option<String>,
    pub id: Option<i64>,
}
