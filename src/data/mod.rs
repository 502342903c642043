//! Built-in data sources.

pub mod synthetic;
