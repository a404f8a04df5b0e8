//! Request handlers, one module per resource.

pub mod forecast;
pub mod location;
pub mod weather;
