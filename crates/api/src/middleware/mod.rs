//! HTTP middleware applied in the shared router builder.

pub mod error_path;
