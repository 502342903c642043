//! Terminal reporting for the CLI front-end.

pub mod format;

pub use format::*;
