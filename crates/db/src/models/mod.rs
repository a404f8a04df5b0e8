//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - An outward-facing DTO carrying the resolved location name
//!
//! Audit timestamps are set by SQL (`DEFAULT NOW()` on insert,
//! `updated_at = NOW()` in update statements), so every entity struct
//! carries non-optional `created_at`/`updated_at` fields.

pub mod forecast_record;
pub mod location;
pub mod weather_record;
