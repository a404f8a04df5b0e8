//! Repository for the `locations` table.

use nimbus_core::types::DbId;
use sqlx::PgPool;

use crate::models::location::{CreateLocation, Location, UpdateLocation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, country, region, latitude, longitude, created_at, updated_at";

/// Provides CRUD operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location, returning the created row.
    ///
    /// Fails with a unique-constraint violation (`uq_locations_name_country`)
    /// when a location with the same `(name, country)` already exists.
    pub async fn create(pool: &PgPool, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (name, country, region, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.name)
            .bind(&input.country)
            .bind(&input.region)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_one(pool)
            .await
    }

    /// Insert a location or refresh an existing `(name, country)` row.
    ///
    /// Used for implicit creation when a weather/forecast fetch requests
    /// persistence: provider metadata wins for coordinates, a previously
    /// stored region is kept when the provider omits one.
    pub async fn upsert(pool: &PgPool, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (name, country, region, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_locations_name_country DO UPDATE SET
                region = COALESCE(EXCLUDED.region, locations.region),
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.name)
            .bind(&input.country)
            .bind(&input.region)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_one(pool)
            .await
    }

    /// Find a location by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a location by its unique `(name, country)` pair.
    pub async fn find_by_name_country(
        pool: &PgPool,
        name: &str,
        country: &str,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE name = $1 AND country = $2");
        sqlx::query_as::<_, Location>(&query)
            .bind(name)
            .bind(country)
            .fetch_optional(pool)
            .await
    }

    /// List locations, newest first, with limit/offset pagination.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every location, ordered by name then country.
    ///
    /// Used by the background refresh sweep and the non-paginated list
    /// endpoint.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations ORDER BY name ASC, country ASC");
        sqlx::query_as::<_, Location>(&query).fetch_all(pool).await
    }

    /// Case-insensitive search over name, country, and region.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let pattern = format!("%{}%", term.replace('%', "\\%").replace('_', "\\_"));
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE name ILIKE $1 OR country ILIKE $1 OR region ILIKE $1
             ORDER BY name ASC, country ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a location. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                name = COALESCE($2, name),
                country = COALESCE($3, country),
                region = COALESCE($4, region),
                latitude = COALESCE($5, latitude),
                longitude = COALESCE($6, longitude),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.country)
            .bind(&input.region)
            .bind(input.latitude)
            .bind(input.longitude)
            .fetch_optional(pool)
            .await
    }

    /// Delete a location by ID. Dependent weather/forecast rows cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
