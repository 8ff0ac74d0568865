//! Wire and domain types shared by the service and transport layers.

pub mod message;
pub mod request;
