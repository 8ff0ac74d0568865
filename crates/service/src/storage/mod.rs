//! Storage abstractions for the service layer.
//!
//! The collection store talks to a narrow `ObjectStore` trait so the backing
//! store can be S3 in deployment and in-memory in tests.

pub mod memory;
pub mod object_store;
pub mod s3;

pub use memory::MemoryObjectStore;
pub use object_store::ObjectStore;
pub use s3::S3ObjectStore;
