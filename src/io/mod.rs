//! Input helpers.
//!
//! - CSV decoding, schema validation and row parsing (`ingest`)

pub mod ingest;

pub use ingest::*;
