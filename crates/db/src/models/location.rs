//! Location entity model and DTOs.

use nimbus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub name: String,
    pub country: String,
    pub region: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 128))]
    pub country: String,
    #[validate(length(max = 128))]
    pub region: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// DTO for updating an existing location. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLocation {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub country: Option<String>,
    #[validate(length(max = 128))]
    pub region: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// Outward read-only projection of a location.
#[derive(Debug, Clone, Serialize)]
pub struct LocationDto {
    pub id: DbId,
    pub name: String,
    pub country: String,
    pub region: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Location> for LocationDto {
    fn from(loc: Location) -> Self {
        Self {
            id: loc.id,
            name: loc.name,
            country: loc.country,
            region: loc.region,
            latitude: loc.latitude,
            longitude: loc.longitude,
            created_at: loc.created_at,
            updated_at: loc.updated_at,
        }
    }
}
