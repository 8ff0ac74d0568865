//! Service layer for the message collection store.
//! - `storage` abstracts the backing object store behind a trait.
//! - `collection` maps logical collection names to JSON-array objects.
//! - `dispatch` interprets operation requests against a collection store.

pub mod collection;
pub mod dispatch;
pub mod errors;
pub mod storage;
