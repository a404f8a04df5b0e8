//! Input validation constants and helpers.
//!
//! Pure functions used by the API handlers and the provider client.
//! Every rejection happens before any network or database work.

use chrono::NaiveDate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum number of forecast days the provider accepts.
pub const MIN_FORECAST_DAYS: u8 = 1;

/// Maximum number of forecast days the provider accepts.
pub const MAX_FORECAST_DAYS: u8 = 14;

/// Widest allowed history date range, in days.
pub const MAX_HISTORY_RANGE_DAYS: i64 = 90;

/// Maximum length of a location name or country.
const MAX_NAME_LEN: usize = 128;

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Validate a forecast day count against the provider's accepted range.
pub fn validate_forecast_days(days: u8) -> Result<(), CoreError> {
    if !(MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&days) {
        return Err(CoreError::Validation(format!(
            "forecast days must be between {MIN_FORECAST_DAYS} and {MAX_FORECAST_DAYS}, got {days}"
        )));
    }
    Ok(())
}

/// Validate a latitude/longitude pair.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), CoreError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CoreError::Validation(format!(
            "latitude must be between -90 and 90, got {latitude}"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CoreError::Validation(format!(
            "longitude must be between -180 and 180, got {longitude}"
        )));
    }
    Ok(())
}

/// Validate an optional history date range.
///
/// Rules:
/// - `from` must not be after `to`.
/// - The range must not exceed [`MAX_HISTORY_RANGE_DAYS`].
///
/// A half-open or absent range is always valid.
pub fn validate_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(CoreError::Validation(format!(
                "date range start {from} is after end {to}"
            )));
        }
        let span = (to - from).num_days();
        if span > MAX_HISTORY_RANGE_DAYS {
            return Err(CoreError::Validation(format!(
                "date range spans {span} days, maximum is {MAX_HISTORY_RANGE_DAYS}"
            )));
        }
    }
    Ok(())
}

/// Validate a free-text location query.
///
/// Rules:
/// - Must not be empty or whitespace-only.
/// - Must not exceed [`MAX_NAME_LEN`] characters.
pub fn validate_location_query(query: &str) -> Result<(), CoreError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "location query must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "location query exceeds {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}
