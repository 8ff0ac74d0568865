use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Client-caused: missing/invalid action, missing filename, missing
    /// required fields for an append. Never retried.
    #[error("validation error: {0}")]
    Validation(String),
    /// The action is part of the wire contract but intentionally unbuilt.
    /// Kept distinct from `Validation` so the gap reads as deliberate.
    #[error("not implemented: {0}")]
    NotImplemented(String),
    /// The object store call itself failed (network, permission, throttling).
    /// "Object absent" is not one of these; it maps to an empty collection.
    #[error("store error: {0}")]
    Store(String),
    /// The stored object exists but is not the expected JSON array shape.
    #[error("data integrity error: {0}")]
    DataIntegrity(String),
}
